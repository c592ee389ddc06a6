// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache lifetime and write propagation policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time-to-live applied when an entry is populated from the durable store.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest time-to-live a cache entry may be given.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// How an update reaches the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Patch an existing cache entry in place, then write the durable store.
    ///
    /// A failed durable write leaves the cache holding values that were never
    /// committed until the entry expires.
    #[default]
    WriteThrough,
    /// Write the durable store, then delete the cache entry so the next read
    /// repopulates it.
    Invalidate,
}

/// Consistency settings of a [`CacheAsideConfigService`].
///
/// [`CacheAsideConfigService`]: crate::service::CacheAsideConfigService
///
/// # Examples
///
/// ```
/// use guildcfg::service::{CachePolicy, WriteMode};
/// use std::time::Duration;
///
/// let policy = CachePolicy::default()
///     .with_ttl(Duration::from_secs(600))
///     .with_write_mode(WriteMode::Invalidate);
/// assert_eq!(policy.ttl, Duration::from_secs(600));
/// assert!(!policy.refresh_ttl_on_write);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    /// Expiry set whenever an entry is populated from the durable store
    pub ttl: Duration,
    /// How updates reach the cache
    pub write_mode: WriteMode,
    /// Re-arm the expiry after a write-through. Off by default so a frequently
    /// written guild still expires on schedule.
    pub refresh_ttl_on_write: bool,
}

impl CachePolicy {
    /// Sets the population TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the write mode.
    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    /// Sets whether a write-through re-arms the TTL.
    pub fn with_refresh_ttl_on_write(mut self, enabled: bool) -> Self {
        self.refresh_ttl_on_write = enabled;
        self
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            write_mode: WriteMode::WriteThrough,
            refresh_ttl_on_write: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = CachePolicy::default();
        assert_eq!(policy.ttl, Duration::from_secs(86400));
        assert_eq!(policy.write_mode, WriteMode::WriteThrough);
        assert!(!policy.refresh_ttl_on_write);
    }

    #[test]
    fn test_write_mode_serde_names() {
        let mode: WriteMode = mode_from_name("invalidate");
        assert_eq!(mode, WriteMode::Invalidate);
    }

    fn mode_from_name(name: &str) -> WriteMode {
        use serde::de::value::{Error, StrDeserializer};
        use serde::de::IntoDeserializer;
        let de: StrDeserializer<'_, Error> = name.into_deserializer();
        WriteMode::deserialize(de).unwrap()
    }
}
