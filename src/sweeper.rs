//! Decay sweeper
//!
//! Periodically reduces every subscriber's score by one point, retiring
//! anyone who reaches zero from both the ledger and the ranking index.
//! Enumeration pages through the ranking index itself: it already lists
//! exactly the subscribers with positive scores, so no keyspace pattern
//! scan is needed. The member list is snapshotted before any mutation; a
//! subscriber credited between snapshot and decrement loses that point,
//! decay wins ties within one sweep.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::keys;
use crate::ranking::RankingIndex;
use crate::store::KvStore;
use crate::types::{Result, SweepSummary};

/// Ranking index page size used while snapshotting members
const DEFAULT_PAGE_SIZE: usize = 100;

pub struct DecaySweeper {
    store: Arc<dyn KvStore>,
    ranking: RankingIndex,
    page_size: usize,
}

impl DecaySweeper {
    pub fn new(store: Arc<dyn KvStore>, ranking: RankingIndex) -> Self {
        Self {
            store,
            ranking,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Run one sweep over all ranked subscribers.
    ///
    /// Each subscriber is processed independently: a store error on one
    /// is logged and counted, and the sweep moves on. Re-running with no
    /// intervening credits only moves totals monotonically toward zero,
    /// so a duplicate trigger is harmless once the floor is reached.
    pub async fn run_sweep(&self) -> Result<SweepSummary> {
        let members = self.snapshot_members().await?;
        info!("Decay sweep starting over {} subscribers", members.len());

        let mut summary = SweepSummary::default();
        for sub_id in &members {
            match self.decay_one(sub_id).await {
                Ok(retired) => {
                    summary.swept += 1;
                    if retired {
                        summary.retired += 1;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!("Decay failed for {}, continuing: {}", sub_id, e);
                }
            }
        }

        info!(
            "Decay sweep done: {} swept, {} retired, {} failed",
            summary.swept, summary.retired, summary.failed
        );
        Ok(summary)
    }

    /// Collect all ranked members before mutating anything, so removals
    /// during the sweep cannot shift pagination under us
    async fn snapshot_members(&self) -> Result<Vec<String>> {
        let mut members = Vec::new();
        let mut start = 0;
        loop {
            let page = self.ranking.page(start, self.page_size).await?;
            if page.is_empty() {
                break;
            }
            let fetched = page.len();
            members.extend(page.into_iter().map(|(sub_id, _)| sub_id));
            if fetched < self.page_size {
                break;
            }
            start += fetched;
        }
        Ok(members)
    }

    /// Decay a single subscriber. Returns true if they were retired.
    async fn decay_one(&self, sub_id: &str) -> Result<bool> {
        let key = keys::points(sub_id);
        let total: i64 = match self.store.get(&key).await? {
            Some(raw) => raw
                .parse()
                .map_err(|_| crate::types::StokeError::Store(format!(
                    "corrupt point counter for '{sub_id}': {raw}"
                )))?,
            None => 0,
        };

        if total <= 1 {
            self.store.del(&key).await?;
            self.ranking.remove(sub_id).await?;
            return Ok(true);
        }

        let updated = self.store.incr_by(&key, -1).await?;
        self.ranking.upsert(sub_id, updated.max(0) as u64).await?;
        Ok(false)
    }
}

/// Spawn the periodic decay loop. The first sweep runs one full period
/// after startup, not immediately, so restarts do not double-decay.
pub fn spawn_decay_task(
    sweeper: Arc<DecaySweeper>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // Consume the immediate first tick
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = sweeper.run_sweep().await {
                error!("Decay sweep failed: {}", e);
            }
        }
    })
}
