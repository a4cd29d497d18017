//! Engagement facade
//!
//! The operations the HTTP/CLI layer consumes: credit-once-per-day
//! recording, per-subscriber statistics, leaderboard pages and the decay
//! sweep trigger. Composes the dedup gate, points ledger, ranking index
//! and history recorder over one injected store handle.

use std::sync::Arc;
use tracing::debug;

use crate::dedup::InteractionDedup;
use crate::history::HistoryRecorder;
use crate::keys;
use crate::ledger::PointsLedger;
use crate::ranking::RankingIndex;
use crate::store::KvStore;
use crate::sweeper::DecaySweeper;
use crate::types::{
    ActionKind, HistoryEntry, RankingPage, RankingRow, Result, StokeError, SubscriberStats,
    SweepSummary,
};

pub struct Engagement {
    dedup: InteractionDedup,
    ledger: PointsLedger,
    ranking: RankingIndex,
    history: HistoryRecorder,
    sweeper: DecaySweeper,
}

impl Engagement {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        let ranking = RankingIndex::new(Arc::clone(&store));
        Self {
            dedup: InteractionDedup::new(Arc::clone(&store)),
            ledger: PointsLedger::new(Arc::clone(&store), ranking.clone()),
            history: HistoryRecorder::new(Arc::clone(&store)),
            sweeper: DecaySweeper::new(store, ranking.clone()),
            ranking,
        }
    }

    /// Record an interaction, crediting it if it is the first of its
    /// type today. Uncredited occurrences are still logged for
    /// statistics. Returns the subscriber's current point total.
    pub async fn record_engagement(
        &self,
        sub_id: &str,
        kind: ActionKind,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Result<u64> {
        self.record_on(sub_id, kind, &keys::today(), extra).await
    }

    pub(crate) async fn record_on(
        &self,
        sub_id: &str,
        kind: ActionKind,
        day: &str,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Result<u64> {
        validate_sub_id(sub_id)?;

        // The marker write is the gate: only its creator credits
        let credited = kind.credits() && self.dedup.mark_if_first_on(sub_id, kind, day).await?;

        let total = if credited {
            self.ledger.credit(sub_id, kind.delta()).await?
        } else {
            self.ledger.total(sub_id).await?
        };

        self.history
            .record(sub_id, &HistoryEntry::new(kind, day, extra))
            .await?;

        debug!(
            "Recorded {} for {}: credited={}, total={}",
            kind, sub_id, credited, total
        );
        Ok(total)
    }

    /// Whether this action type was already credited today (read-only)
    pub async fn has_interacted_today(&self, sub_id: &str, kind: ActionKind) -> Result<bool> {
        validate_sub_id(sub_id)?;
        self.dedup.has_interacted_today(sub_id, kind).await
    }

    /// Current point total; absent subscribers read as 0
    pub async fn points(&self, sub_id: &str) -> Result<u64> {
        validate_sub_id(sub_id)?;
        self.ledger.total(sub_id).await
    }

    /// Read-side statistics: total, 1-based position, ranked population,
    /// and counts over the retained history
    pub async fn stats(&self, sub_id: &str) -> Result<SubscriberStats> {
        validate_sub_id(sub_id)?;

        let points = self.ledger.total(sub_id).await?;
        let position = self.ranking.rank_of(sub_id).await?.map(|rank| rank + 1);
        let total_users = self.ranking.size().await?;

        let entries = self.history.recent(sub_id, keys::HISTORY_MAX_LEN).await?;
        let total_opens = entries
            .iter()
            .filter(|e| e.kind == ActionKind::Open)
            .count() as u64;
        let total_clicks = entries.iter().filter(|e| e.kind.is_click()).count() as u64;
        let last_activity = entries.first().and_then(HistoryEntry::timestamp_ms);

        Ok(SubscriberStats {
            points,
            position,
            total_users,
            total_opens,
            total_clicks,
            last_activity,
        })
    }

    /// One leaderboard page, descending by score, positions 1-based
    pub async fn ranking_page(&self, start: usize, count: usize) -> Result<RankingPage> {
        let total_users = self.ranking.size().await?;
        let rows = self
            .ranking
            .page(start, count)
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, (sub_id, points))| RankingRow {
                position: (start + i + 1) as u64,
                sub_id,
                points,
            })
            .collect();

        Ok(RankingPage { total_users, rows })
    }

    /// Run one decay sweep now. Triggering is the caller's concern.
    pub async fn run_decay_sweep(&self) -> Result<SweepSummary> {
        self.sweeper.run_sweep().await
    }
}

fn validate_sub_id(sub_id: &str) -> Result<()> {
    if sub_id.is_empty() {
        return Err(StokeError::Validation(
            "subscriber id must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const DAY: &str = "2026-08-23";
    const NEXT_DAY: &str = "2026-08-24";

    fn engine() -> Engagement {
        Engagement::new(Arc::new(MemoryStore::new()))
    }

    fn no_extra() -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }

    fn click_extra(url: &str) -> serde_json::Map<String, serde_json::Value> {
        let mut extra = serde_json::Map::new();
        extra.insert("url".to_string(), serde_json::json!(url));
        extra
    }

    #[tokio::test]
    async fn test_open_then_click_yields_expected_stats() {
        let engine = engine();
        engine
            .record_on("a", ActionKind::Open, DAY, no_extra())
            .await
            .unwrap();
        let total = engine
            .record_on("a", ActionKind::Click, DAY, click_extra("https://x.test"))
            .await
            .unwrap();
        assert_eq!(total, 3);

        let stats = engine.stats("a").await.unwrap();
        assert_eq!(stats.points, 3);
        assert_eq!(stats.position, Some(1));
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_opens, 1);
        assert_eq!(stats.total_clicks, 1);
        assert!(stats.last_activity.is_some());
    }

    #[tokio::test]
    async fn test_same_action_credits_once_per_day() {
        let engine = engine();
        assert_eq!(
            engine
                .record_on("a", ActionKind::Open, DAY, no_extra())
                .await
                .unwrap(),
            1
        );
        // Second open the same day: logged but not credited
        assert_eq!(
            engine
                .record_on("a", ActionKind::Open, DAY, no_extra())
                .await
                .unwrap(),
            1
        );
        // A distinct action type still credits independently
        assert_eq!(
            engine
                .record_on("a", ActionKind::Click, DAY, no_extra())
                .await
                .unwrap(),
            3
        );
        // The next day the same action credits again
        assert_eq!(
            engine
                .record_on("a", ActionKind::Open, NEXT_DAY, no_extra())
                .await
                .unwrap(),
            4
        );

        // Both opens were logged, credited or not
        let stats = engine.stats("a").await.unwrap();
        assert_eq!(stats.total_opens, 3);
    }

    #[tokio::test]
    async fn test_click_nopoints_is_logged_never_credited() {
        let engine = engine();
        engine
            .record_on("a", ActionKind::Click, DAY, no_extra())
            .await
            .unwrap();
        let total = engine
            .record_on("a", ActionKind::ClickNopoints, DAY, click_extra("https://x.test"))
            .await
            .unwrap();
        assert_eq!(total, 2);

        let stats = engine.stats("a").await.unwrap();
        assert_eq!(stats.points, 2);
        assert_eq!(stats.total_clicks, 2);

        // Repeating it still never credits
        let total = engine
            .record_on("a", ActionKind::ClickNopoints, DAY, no_extra())
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_ranking_page_positions() {
        let engine = engine();
        // Build totals a:10, b:30, c:20 via the credit path, one open per day
        for (sub, days) in [("a", 10), ("b", 30), ("c", 20)] {
            for d in 0..days {
                engine
                    .record_on(sub, ActionKind::Open, &format!("2026-01-{:02}", d + 1), no_extra())
                    .await
                    .unwrap();
            }
        }

        let page = engine.ranking_page(0, 2).await.unwrap();
        assert_eq!(page.total_users, 3);
        assert_eq!(
            page.rows,
            vec![
                RankingRow { position: 1, sub_id: "b".to_string(), points: 30 },
                RankingRow { position: 2, sub_id: "c".to_string(), points: 20 },
            ]
        );

        let rest = engine.ranking_page(2, 2).await.unwrap();
        assert_eq!(
            rest.rows,
            vec![RankingRow { position: 3, sub_id: "a".to_string(), points: 10 }]
        );
    }

    #[tokio::test]
    async fn test_ranking_mirrors_ledger_after_every_mutation() {
        let engine = engine();
        engine
            .record_on("a", ActionKind::Open, DAY, no_extra())
            .await
            .unwrap();
        let page = engine.ranking_page(0, 10).await.unwrap();
        assert_eq!(page.rows[0].points, engine.points("a").await.unwrap());

        engine
            .record_on("a", ActionKind::Click, DAY, no_extra())
            .await
            .unwrap();
        let page = engine.ranking_page(0, 10).await.unwrap();
        assert_eq!(page.rows[0].points, engine.points("a").await.unwrap());

        engine.run_decay_sweep().await.unwrap();
        let page = engine.ranking_page(0, 10).await.unwrap();
        assert_eq!(page.rows[0].points, engine.points("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_decayed_to_zero_reenters_ranking_on_next_credit() {
        let engine = engine();
        engine
            .record_on("a", ActionKind::Open, DAY, no_extra())
            .await
            .unwrap();

        // Mid-day sweep retires the subscriber entirely
        engine.run_decay_sweep().await.unwrap();
        let stats = engine.stats("a").await.unwrap();
        assert_eq!(stats.points, 0);
        assert_eq!(stats.position, None);
        assert_eq!(stats.total_users, 0);

        // A later credit the same day re-enters the ranking
        let total = engine
            .record_on("a", ActionKind::Click, DAY, no_extra())
            .await
            .unwrap();
        assert_eq!(total, 2);
        let stats = engine.stats("a").await.unwrap();
        assert_eq!(stats.position, Some(1));
    }

    #[tokio::test]
    async fn test_unranked_subscriber_stats() {
        let engine = engine();
        let stats = engine.stats("ghost").await.unwrap();
        assert_eq!(stats.points, 0);
        assert_eq!(stats.position, None);
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_opens, 0);
        assert_eq!(stats.total_clicks, 0);
        assert_eq!(stats.last_activity, None);
    }

    #[tokio::test]
    async fn test_empty_sub_id_is_rejected_without_mutation() {
        let engine = engine();
        let err = engine
            .record_on("", ActionKind::Open, DAY, no_extra())
            .await
            .unwrap_err();
        assert!(matches!(err, StokeError::Validation(_)));

        assert!(engine.stats("").await.is_err());
        assert_eq!(engine.ranking_page(0, 10).await.unwrap().total_users, 0);
    }

    #[tokio::test]
    async fn test_read_only_gate_matches_marker_state() {
        let engine = engine();
        engine
            .record_engagement("a", ActionKind::Open, no_extra())
            .await
            .unwrap();

        assert!(engine
            .has_interacted_today("a", ActionKind::Open)
            .await
            .unwrap());
        assert!(!engine
            .has_interacted_today("a", ActionKind::Click)
            .await
            .unwrap());
    }
}
