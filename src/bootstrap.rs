// SPDX-License-Identifier: MIT OR Apache-2.0

//! Start-up wiring for the production adapters.
//!
//! [`connect`] opens the PostgreSQL pool, makes sure the configuration table
//! exists, connects to Redis, and hands both to a [`CacheAsideConfigService`].
//! Call [`GuildConfigService::shutdown`] on the result before exiting.
//!
//! [`GuildConfigService::shutdown`]: crate::domain::GuildConfigService::shutdown

use crate::adapters::{PostgresStore, RedisCache};
use crate::domain::Result;
use crate::service::CacheAsideConfigService;
use crate::settings::StoreSettings;

/// Connects both stores and builds the service.
///
/// # Examples
///
/// ```rust,no_run
/// use guildcfg::bootstrap;
/// use guildcfg::domain::GuildConfigService;
/// use guildcfg::settings::StoreSettings;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut settings = StoreSettings::from_file("config.local.yaml")?;
/// settings.fill_from_env();
///
/// let service = bootstrap::connect(&settings).await?;
/// // ... serve requests ...
/// service.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub async fn connect(settings: &StoreSettings) -> Result<CacheAsideConfigService> {
    settings.validate()?;

    let durable = PostgresStore::connect(&settings.database.url(), settings.database.max_connections).await?;
    durable.ensure_schema().await?;

    let cache = match RedisCache::connect(&settings.redis.url(), &settings.cache.namespace).await {
        Ok(cache) => cache,
        Err(e) => {
            // Don't leak the pool when the second connection fails.
            durable.pool().close().await;
            return Err(e);
        }
    };

    let policy = settings.cache.policy();
    tracing::info!(
        namespace = %settings.cache.namespace,
        ttl_secs = policy.ttl.as_secs(),
        write_mode = ?policy.write_mode,
        "Guild configuration store ready"
    );

    CacheAsideConfigService::builder()
        .with_durable_store(durable)
        .with_cache(cache)
        .with_policy(policy)
        .build()
}
