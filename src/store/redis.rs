//! Redis-backed store
//!
//! Wraps a multiplexed connection manager; each operation clones the
//! manager handle, so a single [`RedisStore`] can be shared across tasks.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::KvStore;
use crate::types::{Result, StokeError};

/// Redis implementation of [`KvStore`]
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    url: String,
}

fn store_err(op: &str, e: redis::RedisError) -> StokeError {
    StokeError::Store(format!("{op}: {e}"))
}

impl RedisStore {
    /// Connect and verify the connection with a ping
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to Redis at {}", url);

        let client =
            redis::Client::open(url).map_err(|e| store_err("invalid redis url", e))?;
        let mut conn = client
            .get_connection_manager()
            .await
            .map_err(|e| store_err("redis connect failed", e))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| store_err("redis ping failed", e))?;

        info!("Redis connected");
        Ok(Self {
            conn,
            url: url.to_string(),
        })
    }

    /// Close the connection. The manager shuts down when the last clone
    /// drops; this exists so startup/shutdown are symmetric in callers.
    pub fn close(self) {
        info!("Closing Redis connection to {}", self.url);
        drop(self.conn);
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(|e| store_err("GET", e))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set(key, value).await.map_err(|e| store_err("SET", e))
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del(key).await.map_err(|e| store_err("DEL", e))
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64> {
        let mut conn = self.conn.clone();
        conn.incr(key, delta)
            .await
            .map_err(|e| store_err("INCRBY", e))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists(key).await.map_err(|e| store_err("EXISTS", e))
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool> {
        let mut conn = self.conn.clone();
        // SET key value NX EX ttl replies OK on creation, nil otherwise
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(|e| store_err("SET NX EX", e))?;
        Ok(reply.is_some())
    }

    async fn zadd(&self, key: &str, member: &str, score: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.zadd(key, member, score)
            .await
            .map_err(|e| store_err("ZADD", e))
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.zrem(key, member)
            .await
            .map_err(|e| store_err("ZREM", e))
    }

    async fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        let mut conn = self.conn.clone();
        conn.zrevrank(key, member)
            .await
            .map_err(|e| store_err("ZREVRANK", e))
    }

    async fn zrevrange_withscores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<(String, i64)>> {
        let mut conn = self.conn.clone();
        conn.zrevrange_withscores(key, start, stop)
            .await
            .map_err(|e| store_err("ZREVRANGE", e))
    }

    async fn zcard(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn.clone();
        conn.zcard(key).await.map_err(|e| store_err("ZCARD", e))
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.lpush(key, value)
            .await
            .map_err(|e| store_err("LPUSH", e))
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.ltrim(key, start, stop)
            .await
            .map_err(|e| store_err("LTRIM", e))
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.lrange(key, start, stop)
            .await
            .map_err(|e| store_err("LRANGE", e))
    }
}
