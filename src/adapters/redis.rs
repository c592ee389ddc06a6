// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis cache adapter.
//!
//! This module provides a cache that stores each guild's configuration as one
//! Redis hash under `{namespace}:{guild_id}`.

use crate::domain::{FieldMap, GuildId, Result, StoreError, DEFAULT_CACHE_NAMESPACE};
use crate::ports::ConfigCache;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::MultiplexedConnection;
use redis::{Client, Script};
use std::time::Duration;

/// Writes fields into a hash only if the hash already exists, in one round trip
/// so a concurrent expiry cannot leave behind a partial entry without a TTL.
static SET_FIELDS_IF_PRESENT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 1 then
            redis.call('HSET', KEYS[1], unpack(ARGV))
            return 1
        end
        return 0
        ",
    )
});

/// Cache adapter backed by Redis hashes.
///
/// # Examples
///
/// ```rust,no_run
/// use guildcfg::adapters::RedisCache;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = RedisCache::connect("redis://localhost:6379/0", "guild_configs").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisCache {
    /// Shared multiplexed connection; cloning it is cheap
    conn: MultiplexedConnection,
    /// Key namespace, e.g. `guild_configs`
    namespace: String,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Validates namespace to prevent injection attacks
    fn validate_namespace(namespace: &str) -> Result<()> {
        if namespace.is_empty() {
            return Err(StoreError::CacheError {
                backend: "redis".to_string(),
                message: "Namespace must not be empty".to_string(),
                source: None,
            });
        }
        // Disallow wildcard characters and other special Redis pattern characters
        if namespace.contains(['*', '?', '[', ']', '\\']) {
            return Err(StoreError::CacheError {
                backend: "redis".to_string(),
                message: "Namespace contains invalid characters (* ? [ ] \\)".to_string(),
                source: None,
            });
        }
        Ok(())
    }

    /// Connects to Redis.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., `"redis://localhost:6379/0"`)
    /// * `namespace` - Prefix of every per-guild key
    pub async fn connect(url: &str, namespace: &str) -> Result<Self> {
        Self::validate_namespace(namespace)?;

        let client = Client::open(url)
            .map_err(|e| StoreError::cache("redis", format!("Failed to create Redis client: {}", e), e))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::cache("redis", format!("Failed to connect to Redis: {}", e), e))?;

        tracing::debug!(namespace, "Connected to Redis cache");

        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    /// Connects to Redis using the default `guild_configs` namespace.
    pub async fn connect_default(url: &str) -> Result<Self> {
        Self::connect(url, DEFAULT_CACHE_NAMESPACE).await
    }

    /// Returns the key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, guild_id: GuildId) -> String {
        guild_id.cache_key(&self.namespace)
    }

    /// Returns the remaining time-to-live of a guild's entry.
    ///
    /// `None` if the key does not exist or has no expiry.
    pub async fn ttl(&self, guild_id: GuildId) -> Result<Option<Duration>> {
        let mut conn = self.conn.clone();
        let millis: i64 = redis::cmd("PTTL")
            .arg(self.key(guild_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::cache("redis", format!("Failed to read TTL: {}", e), e))?;

        // -2: no such key, -1: no expiry
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }
}

#[async_trait]
impl ConfigCache for RedisCache {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get_fields(&self, guild_id: GuildId) -> Result<Option<FieldMap>> {
        let mut conn = self.conn.clone();
        let hash: FieldMap = redis::cmd("HGETALL")
            .arg(self.key(guild_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                StoreError::cache("redis", format!("Failed to fetch hash from Redis: {}", e), e)
            })?;

        // Redis deletes a hash with its last field, so an empty reply is a missing key.
        Ok(if hash.is_empty() { None } else { Some(hash) })
    }

    async fn set_fields(&self, guild_id: GuildId, fields: &FieldMap) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("HSET");
        cmd.arg(self.key(guild_id));
        for (field, value) in fields {
            cmd.arg(field).arg(value);
        }

        let _: () = cmd.query_async(&mut conn).await.map_err(|e| {
            StoreError::cache("redis", format!("Failed to write hash to Redis: {}", e), e)
        })?;
        Ok(())
    }

    async fn set_ttl(&self, guild_id: GuildId, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("PEXPIRE")
            .arg(self.key(guild_id))
            .arg(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::cache("redis", format!("Failed to set TTL: {}", e), e))?;
        Ok(())
    }

    async fn exists(&self, guild_id: GuildId) -> Result<bool> {
        let mut conn = self.conn.clone();
        redis::cmd("EXISTS")
            .arg(self.key(guild_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::cache("redis", format!("Failed to check key: {}", e), e))
    }

    async fn set_fields_if_present(&self, guild_id: GuildId, fields: &FieldMap) -> Result<bool> {
        if fields.is_empty() {
            return self.exists(guild_id).await;
        }

        let mut conn = self.conn.clone();
        let mut invocation = SET_FIELDS_IF_PRESENT.prepare_invoke();
        invocation.key(self.key(guild_id));
        for (field, value) in fields {
            invocation.arg(field).arg(value);
        }

        let wrote: i64 = invocation.invoke_async(&mut conn).await.map_err(|e| {
            StoreError::cache("redis", format!("Failed to update cached hash: {}", e), e)
        })?;
        Ok(wrote == 1)
    }

    async fn remove(&self, guild_id: GuildId) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("DEL")
            .arg(self.key(guild_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::cache("redis", format!("Failed to delete key: {}", e), e))?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // The multiplexed connection closes when its last clone is dropped.
        tracing::debug!(namespace = %self.namespace, "Releasing Redis cache connection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_namespace() {
        assert!(RedisCache::validate_namespace("guild_configs").is_ok());
        assert!(RedisCache::validate_namespace("bot:staging").is_ok());
        assert!(RedisCache::validate_namespace("").is_err());
        assert!(RedisCache::validate_namespace("guild_*").is_err());
        assert!(RedisCache::validate_namespace("a[b]").is_err());
    }

    #[test]
    fn test_connect_rejects_bad_url() {
        let result = tokio_test::block_on(RedisCache::connect("not a url", "guild_configs"));
        assert!(matches!(result, Err(StoreError::CacheError { .. })));
    }
}
