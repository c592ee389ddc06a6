// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture store for per-guild bot configuration.
//!
//! Every guild (tenant) of a chat bot has a small configuration record that is
//! read on nearly every incoming event and written rarely. This crate keeps a
//! fast, volatile cache and a durable relational store consistent for those
//! records, with bounded staleness and explicit invalidation on write.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`GuildId`, `GuildConfig`, `ConfigPatch`, errors)
//!   and the consumer-facing `GuildConfigService` trait
//! - **Ports**: Trait definitions for the two stores (`DurableStore`, `ConfigCache`)
//! - **Adapters**: Implementations for specific backends (in-memory, Redis, PostgreSQL)
//! - **Service**: The cache-aside service that orchestrates both stores
//!
//! # Consistency
//!
//! - Reads are served from the cache when it holds an entry; a miss loads the
//!   durable row and caches it with a 24 hour expiry. Guilds with no row get
//!   defaults, which are never cached.
//! - Writes always reach the durable store. The cache is patched only if it
//!   already holds the guild, and the patch never extends the entry's expiry.
//! - There is no transaction across the two stores. A failed durable write after
//!   a successful cache write is reconciled when the entry expires.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable loading settings from YAML files (default)
//! - `redis`: Enable the Redis cache adapter
//! - `postgres`: Enable the PostgreSQL durable store adapter
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use guildcfg::prelude::*;
//! use guildcfg::adapters::{InMemoryCache, InMemoryDurableStore};
//!
//! # tokio_test::block_on(async {
//! let service = CacheAsideConfigService::builder()
//!     .with_durable_store(InMemoryDurableStore::new())
//!     .with_cache(InMemoryCache::new())
//!     .build()?;
//!
//! let guild = GuildId::new(81384788765712384);
//! let config = service.get_configuration(guild).await?;
//! assert!(config.is_default());
//! # Ok::<(), StoreError>(())
//! # }).unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
#[cfg(all(feature = "redis", feature = "postgres"))]
pub mod bootstrap;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigField, ConfigPatch, FieldValue, GuildConfig, GuildConfigService, GuildId, Result,
        StoreError,
    };
    pub use crate::ports::{ConfigCache, DurableStore};
    pub use crate::service::{CacheAsideConfigService, CachePolicy, WriteMode};
    pub use crate::settings::StoreSettings;

    // Re-export adapters based on feature flags
    #[cfg(feature = "postgres")]
    pub use crate::adapters::PostgresStore;
    #[cfg(feature = "redis")]
    pub use crate::adapters::RedisCache;
}
