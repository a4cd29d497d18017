//! Key-value store seam
//!
//! The engine holds no state of its own; everything durable lives behind
//! [`KvStore`]. Production uses [`RedisStore`]; tests (and dev mode
//! without a Redis) use [`MemoryStore`].
//!
//! The trait exposes exactly the primitives the engine needs: plain
//! string keys with optional expiry, an atomic increment, one sorted set
//! for the ranking, and capped lists for history. Callers pass handles as
//! `Arc<dyn KvStore>`.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;

use crate::types::Result;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a string key; `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a string key, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key; deleting an absent key is not an error
    async fn del(&self, key: &str) -> Result<()>;

    /// Atomically add `delta` to an integer-valued key, creating it at 0
    /// first if absent. Returns the new value.
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64>;

    /// Whether a live (non-expired) key exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Set `key` to `value` with a TTL only if it does not already exist.
    /// Returns true if this call created the key. This is the atomic
    /// check-and-mark used for daily dedup gating.
    async fn set_nx_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool>;

    /// Insert or overwrite a sorted-set member with the given score
    async fn zadd(&self, key: &str, member: &str, score: i64) -> Result<()>;

    /// Remove a sorted-set member; removing an absent member is not an error
    async fn zrem(&self, key: &str, member: &str) -> Result<()>;

    /// 0-based rank of a member in descending score order, `None` if absent
    async fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>>;

    /// Members and scores between ranks `start` and `stop` (inclusive,
    /// 0-based) in descending score order. Ties follow the store's native
    /// ordering, which must be deterministic.
    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, i64)>>;

    /// Number of members in a sorted set
    async fn zcard(&self, key: &str) -> Result<u64>;

    /// Prepend a value to a list, creating the list if absent
    async fn lpush(&self, key: &str, value: &str) -> Result<()>;

    /// Keep only list elements between `start` and `stop` (inclusive)
    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()>;

    /// List elements between `start` and `stop` (inclusive), head first
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>>;
}
