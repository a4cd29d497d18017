//! Interaction deduplication
//!
//! A subscriber is credited for at most one instance of a given action
//! type per calendar day (server-local). The marker key lives for 48
//! hours, long enough to outlast the day it gates, and then expires out
//! of the store on its own.

use std::sync::Arc;

use crate::keys;
use crate::store::KvStore;
use crate::types::{ActionKind, Result};

pub struct InteractionDedup {
    store: Arc<dyn KvStore>,
}

impl InteractionDedup {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Read-only check: has this action type already been credited today?
    pub async fn has_interacted_today(&self, sub_id: &str, kind: ActionKind) -> Result<bool> {
        self.has_interacted_on(sub_id, kind, &keys::today()).await
    }

    pub(crate) async fn has_interacted_on(
        &self,
        sub_id: &str,
        kind: ActionKind,
        day: &str,
    ) -> Result<bool> {
        self.store.exists(&keys::dedup(sub_id, kind, day)).await
    }

    /// Atomically create today's marker if absent. Returns true exactly
    /// once per subscriber, action type and day; this is the gate the
    /// credit path relies on, so two concurrent requests cannot both
    /// observe "first of the day".
    pub async fn mark_if_first_today(&self, sub_id: &str, kind: ActionKind) -> Result<bool> {
        self.mark_if_first_on(sub_id, kind, &keys::today()).await
    }

    pub(crate) async fn mark_if_first_on(
        &self,
        sub_id: &str,
        kind: ActionKind,
        day: &str,
    ) -> Result<bool> {
        self.store
            .set_nx_ex(&keys::dedup(sub_id, kind, day), "1", keys::DEDUP_TTL_SECS)
            .await
    }
}
