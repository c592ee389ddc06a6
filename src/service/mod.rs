// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the guild configuration service implementation.
//!
//! This module contains the cache-aside implementation of the
//! `GuildConfigService` trait and the policy that tunes it.

pub mod cache_aside;
pub mod policy;

// Re-export commonly used types
pub use cache_aside::{CacheAsideConfigService, CacheAsideConfigServiceBuilder};
pub use policy::{CachePolicy, WriteMode, DEFAULT_CACHE_TTL, MAX_CACHE_TTL};
