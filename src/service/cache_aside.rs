// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache-aside guild configuration service.
//!
//! This module provides the implementation of [`GuildConfigService`] that keeps
//! a fast cache and a durable store consistent. Reads go to the cache first and
//! fall through to the durable store on a miss; writes always reach the durable
//! store and touch the cache only where an entry already exists.

use crate::domain::{ConfigPatch, GuildConfig, GuildConfigService, GuildId, Result, StoreError};
use crate::ports::{ConfigCache, DurableStore};
use crate::service::policy::{CachePolicy, WriteMode};
use async_trait::async_trait;
use std::sync::Arc;

/// Cache-aside implementation of the guild configuration service.
///
/// Both adapters are injected at construction time and shared by every caller.
/// The service holds no locks: two concurrent reads of the same guild may both
/// populate the cache, and the last write wins. Store errors are returned to the
/// caller without retries.
///
/// # Examples
///
/// ```rust
/// use guildcfg::adapters::{InMemoryCache, InMemoryDurableStore};
/// use guildcfg::domain::{ConfigPatch, GuildConfigService, GuildId};
/// use guildcfg::service::CacheAsideConfigService;
///
/// # tokio_test::block_on(async {
/// let service = CacheAsideConfigService::builder()
///     .with_durable_store(InMemoryDurableStore::new())
///     .with_cache(InMemoryCache::new())
///     .build()
///     .unwrap();
///
/// let guild = GuildId::new(81384788765712384);
/// service
///     .update_configuration(guild, &ConfigPatch::new().prefix("?"))
///     .await
///     .unwrap();
///
/// let config = service.get_configuration(guild).await.unwrap();
/// assert_eq!(config.prefix.as_deref(), Some("?"));
/// # });
/// ```
pub struct CacheAsideConfigService {
    durable: Arc<dyn DurableStore>,
    cache: Arc<dyn ConfigCache>,
    policy: CachePolicy,
}

impl CacheAsideConfigService {
    /// Creates a service from already constructed adapters.
    pub fn new(
        durable: Arc<dyn DurableStore>,
        cache: Arc<dyn ConfigCache>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            durable,
            cache,
            policy,
        }
    }

    /// Creates a new service builder.
    pub fn builder() -> CacheAsideConfigServiceBuilder {
        CacheAsideConfigServiceBuilder::new()
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Reads a guild from the cache.
    ///
    /// An entry that no longer decodes (for instance after a field changed
    /// type) is dropped and reported as a miss so the durable store rebuilds it.
    async fn read_cache(&self, guild_id: GuildId) -> Result<Option<GuildConfig>> {
        let Some(fields) = self.cache.get_fields(guild_id).await? else {
            return Ok(None);
        };
        if fields.is_empty() {
            return Ok(None);
        }

        match GuildConfig::from_field_map(guild_id, &fields) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                tracing::warn!(%guild_id, error = %e, "Discarding undecodable cache entry");
                self.cache.remove(guild_id).await?;
                Ok(None)
            }
        }
    }

    async fn populate_cache(&self, config: &GuildConfig) -> Result<()> {
        let fields = config.to_field_map();
        if fields.is_empty() {
            // A row with every column NULL caches nothing useful.
            return Ok(());
        }
        self.cache.set_fields(config.guild_id, &fields).await?;
        self.cache.set_ttl(config.guild_id, self.policy.ttl).await?;
        tracing::debug!(
            guild_id = %config.guild_id,
            fields = fields.len(),
            ttl_secs = self.policy.ttl.as_secs(),
            "Populated guild config cache"
        );
        Ok(())
    }

    async fn write_through(&self, guild_id: GuildId, patch: &ConfigPatch) -> Result<()> {
        if !self.cache.exists(guild_id).await? {
            tracing::debug!(%guild_id, "No cached entry; writing durable store only");
            return Ok(());
        }

        let wrote = self
            .cache
            .set_fields_if_present(guild_id, &patch.to_field_map())
            .await?;
        if wrote && self.policy.refresh_ttl_on_write {
            self.cache.set_ttl(guild_id, self.policy.ttl).await?;
        }
        tracing::debug!(%guild_id, wrote, "Wrote update through to cache");
        Ok(())
    }
}

#[async_trait]
impl GuildConfigService for CacheAsideConfigService {
    async fn get_configuration(&self, guild_id: GuildId) -> Result<GuildConfig> {
        if let Some(config) = self.read_cache(guild_id).await? {
            tracing::debug!(%guild_id, "Guild config cache hit");
            return Ok(config);
        }

        tracing::debug!(%guild_id, store = self.durable.name(), "Guild config cache miss");
        match self.durable.load(guild_id).await? {
            Some(config) => {
                self.populate_cache(&config).await?;
                Ok(config)
            }
            // Defaults are not cached, so a first write is never masked.
            None => Ok(GuildConfig::new(guild_id)),
        }
    }

    async fn update_configuration(
        &self,
        guild_id: GuildId,
        patch: &ConfigPatch,
    ) -> Result<GuildConfig> {
        match self.policy.write_mode {
            WriteMode::WriteThrough => {
                self.write_through(guild_id, patch).await?;
                self.durable.upsert(guild_id, patch).await?;
            }
            WriteMode::Invalidate => {
                self.durable.upsert(guild_id, patch).await?;
                self.cache.remove(guild_id).await?;
            }
        }

        // Only the fields just written; not re-read from either store.
        Ok(GuildConfig::from_patch(guild_id, patch))
    }

    async fn invalidate(&self, guild_id: GuildId) -> Result<()> {
        self.cache.remove(guild_id).await?;
        tracing::debug!(%guild_id, "Invalidated guild config cache entry");
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        let cache = self.cache.close().await;
        let durable = self.durable.close().await;
        if let Err(e) = &cache {
            tracing::warn!(cache = self.cache.name(), error = %e, "Failed to close cache");
        }
        if let Err(e) = &durable {
            tracing::warn!(store = self.durable.name(), error = %e, "Failed to close durable store");
        }
        cache.and(durable)
    }
}

/// Builder for constructing a `CacheAsideConfigService`.
///
/// Both adapters are required; the policy defaults to [`CachePolicy::default`].
///
/// # Examples
///
/// ```rust
/// use guildcfg::adapters::{InMemoryCache, InMemoryDurableStore};
/// use guildcfg::service::{CacheAsideConfigService, CachePolicy, WriteMode};
///
/// let service = CacheAsideConfigService::builder()
///     .with_durable_store(InMemoryDurableStore::new())
///     .with_cache(InMemoryCache::new())
///     .with_policy(CachePolicy::default().with_write_mode(WriteMode::Invalidate))
///     .build()
///     .unwrap();
/// assert_eq!(service.policy().write_mode, WriteMode::Invalidate);
/// ```
#[derive(Default)]
pub struct CacheAsideConfigServiceBuilder {
    durable: Option<Arc<dyn DurableStore>>,
    cache: Option<Arc<dyn ConfigCache>>,
    policy: CachePolicy,
}

impl CacheAsideConfigServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the durable store.
    pub fn with_durable_store(self, store: impl DurableStore + 'static) -> Self {
        self.with_shared_durable_store(Arc::new(store))
    }

    /// Sets a durable store that is shared with other owners.
    pub fn with_shared_durable_store(mut self, store: Arc<dyn DurableStore>) -> Self {
        self.durable = Some(store);
        self
    }

    /// Sets the cache.
    pub fn with_cache(self, cache: impl ConfigCache + 'static) -> Self {
        self.with_shared_cache(Arc::new(cache))
    }

    /// Sets a cache that is shared with other owners.
    pub fn with_shared_cache(mut self, cache: Arc<dyn ConfigCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the consistency policy.
    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the service.
    pub fn build(self) -> Result<CacheAsideConfigService> {
        let durable = self.durable.ok_or_else(|| StoreError::MissingAdapter {
            adapter: "durable store".to_string(),
        })?;
        let cache = self.cache.ok_or_else(|| StoreError::MissingAdapter {
            adapter: "cache".to_string(),
        })?;
        Ok(CacheAsideConfigService::new(durable, cache, self.policy))
    }
}
