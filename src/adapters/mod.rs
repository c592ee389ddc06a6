// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing store implementations.
//!
//! This module contains concrete implementations of the `DurableStore` and
//! `ConfigCache` ports. The in-memory adapters are always available; the
//! PostgreSQL and Redis adapters sit behind feature flags.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis;

// Re-export adapters based on feature flags
pub use memory::{InMemoryCache, InMemoryDurableStore};
#[cfg(feature = "postgres")]
pub use self::postgres::PostgresStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisCache;
