//! In-memory store
//!
//! Backs tests and local development without a Redis. Expiry is
//! wall-clock based and checked lazily on read, the same observable
//! behavior as store-level TTLs. Sorted-set ordering reproduces Redis:
//! ascending score with lexicographic members, reversed for the
//! descending-rank queries, so tie order is deterministic and matches
//! production.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::KvStore;
use crate::types::{Result, StokeError};

#[derive(Debug, Clone)]
struct StringEntry {
    value: String,
    /// Absolute expiry; `None` means the key does not expire
    expires_at: Option<Instant>,
}

impl StringEntry {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            expires_at: None,
        }
    }

    fn with_ttl(value: &str, ttl_secs: u64) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Some(Instant::now() + Duration::from_secs(ttl_secs)),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

/// In-memory implementation of [`KvStore`]
#[derive(Default)]
pub struct MemoryStore {
    strings: DashMap<String, StringEntry>,
    zsets: DashMap<String, BTreeMap<String, i64>>,
    lists: DashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members of a zset ordered descending by score, ties in reverse
    /// lexicographic member order (Redis ZREVRANGE semantics)
    fn zset_desc(&self, key: &str) -> Vec<(String, i64)> {
        let Some(zset) = self.zsets.get(key) else {
            return Vec::new();
        };
        let mut members: Vec<(String, i64)> =
            zset.iter().map(|(m, s)| (m.clone(), *s)).collect();
        members.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        members
    }
}

/// Resolve Redis-style inclusive range indices against a length
fn resolve_range(start: isize, stop: isize, len: usize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(entry) = self.strings.get(key) {
            if entry.is_expired() {
                drop(entry);
                self.strings.remove(key);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.strings.insert(key.to_string(), StringEntry::new(value));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.strings.remove(key);
        Ok(())
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut entry = self
            .strings
            .entry(key.to_string())
            .or_insert_with(|| StringEntry::new("0"));
        if entry.is_expired() {
            *entry = StringEntry::new("0");
        }
        let current: i64 = entry.value.parse().map_err(|_| {
            StokeError::Store(format!("value at '{key}' is not an integer"))
        })?;
        let updated = current + delta;
        entry.value = updated.to_string();
        Ok(updated)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool> {
        match self.strings.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(StringEntry::with_ttl(value, ttl_secs));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StringEntry::with_ttl(value, ttl_secs));
                Ok(true)
            }
        }
    }

    async fn zadd(&self, key: &str, member: &str, score: i64) -> Result<()> {
        self.zsets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<()> {
        if let Some(mut zset) = self.zsets.get_mut(key) {
            zset.remove(member);
        }
        Ok(())
    }

    async fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        Ok(self
            .zset_desc(key)
            .iter()
            .position(|(m, _)| m == member)
            .map(|i| i as u64))
    }

    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, i64)>> {
        let members = self.zset_desc(key);
        Ok(match resolve_range(start, stop, members.len()) {
            Some((lo, hi)) => members[lo..=hi].to_vec(),
            None => Vec::new(),
        })
    }

    async fn zcard(&self, key: &str) -> Result<u64> {
        Ok(self.zsets.get(key).map_or(0, |z| z.len() as u64))
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<()> {
        self.lists
            .entry(key.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        if let Some(mut list) = self.lists.get_mut(key) {
            match resolve_range(start, stop, list.len()) {
                Some((lo, hi)) => {
                    list.truncate(hi + 1);
                    list.drain(..lo);
                }
                None => list.clear(),
            }
        }
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let Some(list) = self.lists.get(key) else {
            return Ok(Vec::new());
        };
        Ok(match resolve_range(start, stop, list.len()) {
            Some((lo, hi)) => list[lo..=hi].to_vec(),
            None => Vec::new(),
        })
    }
}
