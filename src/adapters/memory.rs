// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process adapters.
//!
//! `InMemoryDurableStore` and `InMemoryCache` implement the ports with plain
//! maps behind a lock. They back local development and the test suite; the
//! cache honours expiry exactly like the Redis adapter does.

use crate::domain::{ConfigPatch, FieldMap, GuildConfig, GuildId, Result, StoreError};
use crate::ports::{ConfigCache, DurableStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

fn poisoned(backend: &str) -> StoreError {
    StoreError::CacheError {
        backend: backend.to_string(),
        message: "lock poisoned".to_string(),
        source: None,
    }
}

/// A durable store held in process memory.
///
/// # Examples
///
/// ```rust
/// use guildcfg::adapters::InMemoryDurableStore;
/// use guildcfg::domain::{ConfigPatch, GuildId};
/// use guildcfg::ports::DurableStore;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryDurableStore::new();
/// store.upsert(GuildId::new(1), &ConfigPatch::new().prefix("?")).await.unwrap();
///
/// let row = store.load(GuildId::new(1)).await.unwrap().unwrap();
/// assert_eq!(row.prefix.as_deref(), Some("?"));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDurableStore {
    rows: RwLock<HashMap<GuildId, GuildConfig>>,
}

impl InMemoryDurableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with rows.
    pub fn with_rows(rows: impl IntoIterator<Item = GuildConfig>) -> Self {
        Self {
            rows: RwLock::new(rows.into_iter().map(|r| (r.guild_id, r)).collect()),
        }
    }

    /// Returns a copy of a guild's row without going through the port.
    pub fn row(&self, guild_id: GuildId) -> Option<GuildConfig> {
        self.rows.read().ok()?.get(&guild_id).cloned()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn durable_poisoned() -> StoreError {
        StoreError::DurableStoreError {
            backend: "memory".to_string(),
            message: "lock poisoned".to_string(),
            source: None,
        }
    }
}

#[async_trait]
impl DurableStore for InMemoryDurableStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, guild_id: GuildId) -> Result<Option<GuildConfig>> {
        guild_id.as_i64()?;
        let rows = self.rows.read().map_err(|_| Self::durable_poisoned())?;
        Ok(rows.get(&guild_id).cloned())
    }

    async fn upsert(&self, guild_id: GuildId, patch: &ConfigPatch) -> Result<GuildConfig> {
        guild_id.as_i64()?;
        let mut rows = self.rows.write().map_err(|_| Self::durable_poisoned())?;
        rows.entry(guild_id)
            .or_insert_with(|| GuildConfig::new(guild_id))
            .apply(patch);
        Ok(GuildConfig::from_patch(guild_id, patch))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fields: FieldMap,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// A field-map cache held in process memory.
///
/// Expired entries are treated as absent on every access and dropped lazily.
/// An entry with no expiry set lives until removed, as a Redis key would.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<GuildId, CacheEntry>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<GuildId, CacheEntry>>> {
        self.entries.read().map_err(|_| poisoned("memory"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<GuildId, CacheEntry>>> {
        let mut entries = self.entries.write().map_err(|_| poisoned("memory"))?;
        let now = Instant::now();
        entries.retain(|_, e| e.is_live(now));
        Ok(entries)
    }

    /// Returns the remaining time-to-live of an entry.
    ///
    /// `None` if the entry is absent or has no expiry.
    pub fn ttl(&self, guild_id: GuildId) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().ok()?;
        let entry = entries.get(&guild_id).filter(|e| e.is_live(now))?;
        entry.expires_at.map(|at| at.saturating_duration_since(now))
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .map(|e| e.values().filter(|e| e.is_live(now)).count())
            .unwrap_or(0)
    }

    /// Returns `true` if no live entries exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ConfigCache for InMemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_fields(&self, guild_id: GuildId) -> Result<Option<FieldMap>> {
        let now = Instant::now();
        let entries = self.read()?;
        Ok(entries
            .get(&guild_id)
            .filter(|e| e.is_live(now))
            .map(|e| e.fields.clone()))
    }

    async fn set_fields(&self, guild_id: GuildId, fields: &FieldMap) -> Result<()> {
        let mut entries = self.write()?;
        let entry = entries.entry(guild_id).or_insert_with(|| CacheEntry {
            fields: FieldMap::new(),
            expires_at: None,
        });
        entry
            .fields
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn set_ttl(&self, guild_id: GuildId, ttl: Duration) -> Result<()> {
        let mut entries = self.write()?;
        if let Some(entry) = entries.get_mut(&guild_id) {
            // A TTL past the end of the clock means the entry never expires.
            entry.expires_at = Instant::now().checked_add(ttl);
        }
        Ok(())
    }

    async fn exists(&self, guild_id: GuildId) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .read()?
            .get(&guild_id)
            .is_some_and(|e| e.is_live(now)))
    }

    async fn set_fields_if_present(&self, guild_id: GuildId, fields: &FieldMap) -> Result<bool> {
        let mut entries = self.write()?;
        match entries.get_mut(&guild_id) {
            Some(entry) => {
                entry
                    .fields
                    .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, guild_id: GuildId) -> Result<()> {
        self.write()?.remove(&guild_id);
        Ok(())
    }
}
