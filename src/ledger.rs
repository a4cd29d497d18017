//! Points ledger
//!
//! The single source of truth for a subscriber's score: one non-negative
//! counter per subscriber, created implicitly on first credit. Every
//! credit mirrors the new total into the ranking index before returning,
//! so no caller can observe a ledger value without a matching ranking
//! entry.

use std::sync::Arc;

use crate::keys;
use crate::ranking::RankingIndex;
use crate::store::KvStore;
use crate::types::{Result, StokeError};

pub struct PointsLedger {
    store: Arc<dyn KvStore>,
    ranking: RankingIndex,
}

impl PointsLedger {
    pub fn new(store: Arc<dyn KvStore>, ranking: RankingIndex) -> Self {
        Self { store, ranking }
    }

    /// Atomically add `delta` points and sync the ranking index.
    /// Returns the new total.
    pub async fn credit(&self, sub_id: &str, delta: u64) -> Result<u64> {
        let total = self
            .store
            .incr_by(&keys::points(sub_id), delta as i64)
            .await?;
        let total = total.max(0) as u64;
        self.ranking.upsert(sub_id, total).await?;
        Ok(total)
    }

    /// Current total; an absent counter reads as 0
    pub async fn total(&self, sub_id: &str) -> Result<u64> {
        match self.store.get(&keys::points(sub_id)).await? {
            Some(raw) => raw.parse().map_err(|_| {
                StokeError::Store(format!("corrupt point counter for '{sub_id}': {raw}"))
            }),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn ledger() -> (PointsLedger, RankingIndex) {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let ranking = RankingIndex::new(Arc::clone(&store));
        (PointsLedger::new(store, ranking.clone()), ranking)
    }

    #[tokio::test]
    async fn test_credit_accumulates_and_mirrors_ranking() {
        let (ledger, ranking) = ledger();

        assert_eq!(ledger.credit("a", 1).await.unwrap(), 1);
        assert_eq!(ledger.credit("a", 2).await.unwrap(), 3);
        assert_eq!(ledger.total("a").await.unwrap(), 3);

        // Ranking carries the same score immediately after each mutation
        assert_eq!(
            ranking.page(0, 1).await.unwrap(),
            vec![("a".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn test_total_defaults_to_zero() {
        let (ledger, _) = ledger();
        assert_eq!(ledger.total("unknown").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_counter_is_a_store_error() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        store.set(&keys::points("a"), "garbage").await.unwrap();
        let ranking = RankingIndex::new(Arc::clone(&store));
        let ledger = PointsLedger::new(store, ranking);

        assert!(ledger.total("a").await.is_err());
    }
}
