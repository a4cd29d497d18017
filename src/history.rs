//! Interaction history
//!
//! Append-only per-subscriber log used only for read-side statistics,
//! never for replay. Capped at the newest 100 entries; the trim is
//! best-effort since it only bounds storage growth.

use std::sync::Arc;
use tracing::warn;

use crate::keys;
use crate::store::KvStore;
use crate::types::{HistoryEntry, Result, StokeError};

pub struct HistoryRecorder {
    store: Arc<dyn KvStore>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Append an entry and trim the log to the retained cap.
    /// A failed trim is logged and ignored.
    pub async fn record(&self, sub_id: &str, entry: &HistoryEntry) -> Result<()> {
        let key = keys::history(sub_id);
        let json = serde_json::to_string(entry)
            .map_err(|e| StokeError::Store(format!("history entry encode: {e}")))?;

        self.store.lpush(&key, &json).await?;

        if let Err(e) = self
            .store
            .ltrim(&key, 0, keys::HISTORY_MAX_LEN as isize - 1)
            .await
        {
            warn!("History trim failed for {}: {}", sub_id, e);
        }
        Ok(())
    }

    /// Up to `limit` entries, newest first. Entries that fail to parse
    /// are skipped with a warning rather than failing the whole read.
    pub async fn recent(&self, sub_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let raw = self
            .store
            .lrange(&keys::history(sub_id), 0, limit as isize - 1)
            .await?;

        let mut entries = Vec::with_capacity(raw.len());
        for item in raw {
            match serde_json::from_str(&item) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping unreadable history entry for {}: {}", sub_id, e),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::ActionKind;

    fn recorder() -> (HistoryRecorder, Arc<dyn KvStore>) {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        (HistoryRecorder::new(Arc::clone(&store)), store)
    }

    fn entry(kind: ActionKind, n: u64) -> HistoryEntry {
        let mut extra = serde_json::Map::new();
        extra.insert("n".to_string(), serde_json::json!(n));
        HistoryEntry::new(kind, "2026-08-23", extra)
    }

    #[tokio::test]
    async fn test_record_and_read_newest_first() {
        let (history, _) = recorder();
        history.record("a", &entry(ActionKind::Open, 0)).await.unwrap();
        history.record("a", &entry(ActionKind::Click, 1)).await.unwrap();

        let entries = history.recent("a", 10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, ActionKind::Click);
        assert_eq!(entries[1].kind, ActionKind::Open);
    }

    #[tokio::test]
    async fn test_log_is_capped_oldest_evicted() {
        let (history, _) = recorder();
        for n in 0..120 {
            history.record("a", &entry(ActionKind::Open, n)).await.unwrap();
        }

        let entries = history.recent("a", 200).await.unwrap();
        assert_eq!(entries.len(), keys::HISTORY_MAX_LEN);

        // Newest entry survives, the 20 oldest were evicted
        assert_eq!(entries[0].extra["n"], serde_json::json!(119));
        assert_eq!(
            entries.last().unwrap().extra["n"],
            serde_json::json!(20)
        );
    }

    #[tokio::test]
    async fn test_unreadable_entries_are_skipped() {
        let (history, store) = recorder();
        history.record("a", &entry(ActionKind::Open, 0)).await.unwrap();
        store.lpush(&keys::history("a"), "not json").await.unwrap();

        let entries = history.recent("a", 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, ActionKind::Open);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let (history, _) = recorder();
        assert!(history.recent("nobody", 10).await.unwrap().is_empty());
        assert!(history.recent("nobody", 0).await.unwrap().is_empty());
    }
}
