//! Ranking index
//!
//! Sorted view over all subscribers with a positive point total, backed
//! by the single global sorted set `user:ranking`. Kept consistent with
//! the ledger by construction: every ledger mutation upserts or removes
//! its member here in the same logical step.

use std::sync::Arc;

use crate::keys;
use crate::store::KvStore;
use crate::types::Result;

#[derive(Clone)]
pub struct RankingIndex {
    store: Arc<dyn KvStore>,
}

impl RankingIndex {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Set or overwrite a member's score, creating it if absent
    pub async fn upsert(&self, sub_id: &str, score: u64) -> Result<()> {
        self.store
            .zadd(keys::RANKING_KEY, sub_id, score as i64)
            .await
    }

    /// Remove a member; absent members are a no-op
    pub async fn remove(&self, sub_id: &str) -> Result<()> {
        self.store.zrem(keys::RANKING_KEY, sub_id).await
    }

    /// 0-based rank in descending score order, `None` if unranked
    pub async fn rank_of(&self, sub_id: &str) -> Result<Option<u64>> {
        self.store.zrevrank(keys::RANKING_KEY, sub_id).await
    }

    /// Up to `count` members starting at 0-based offset `start`,
    /// descending by score. Ties follow the store's deterministic order.
    pub async fn page(&self, start: usize, count: usize) -> Result<Vec<(String, u64)>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let stop = (start + count - 1) as isize;
        let rows = self
            .store
            .zrevrange_withscores(keys::RANKING_KEY, start as isize, stop)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(member, score)| (member, score.max(0) as u64))
            .collect())
    }

    /// Total ranked members
    pub async fn size(&self) -> Result<u64> {
        self.store.zcard(keys::RANKING_KEY).await
    }
}
