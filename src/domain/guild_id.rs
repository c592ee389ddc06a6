// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guild identifier newtype for type-safe tenant handling.
//!
//! This module provides the `GuildId` type, a newtype wrapper around the 64-bit
//! snowflake a chat platform assigns to a guild. It keeps tenant identifiers from
//! being confused with the channel and role ids stored inside a configuration.

use crate::domain::errors::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default namespace for per-guild cache keys.
pub const DEFAULT_CACHE_NAMESPACE: &str = "guild_configs";

/// A type-safe wrapper for guild identifiers.
///
/// A guild id is the primary key of a configuration record and never changes
/// once the record exists.
///
/// # Examples
///
/// ```
/// use guildcfg::domain::GuildId;
///
/// let id = GuildId::new(81384788765712384);
/// assert_eq!(id.get(), 81384788765712384);
/// assert_eq!(id.cache_key("guild_configs"), "guild_configs:81384788765712384");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(u64);

impl GuildId {
    /// Creates a new `GuildId`.
    pub const fn new(id: u64) -> Self {
        GuildId(id)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the identifier as the signed 64-bit value relational stores use
    /// for `BIGINT` keys.
    ///
    /// Snowflakes never use the sign bit, so this only fails for ids that did
    /// not come from the platform.
    ///
    /// # Examples
    ///
    /// ```
    /// use guildcfg::domain::GuildId;
    ///
    /// assert_eq!(GuildId::new(42).as_i64().unwrap(), 42);
    /// assert!(GuildId::new(u64::MAX).as_i64().is_err());
    /// ```
    pub fn as_i64(self) -> Result<i64> {
        i64::try_from(self.0).map_err(|_| StoreError::InvalidGuildId {
            value: self.0.to_string(),
            message: "exceeds the signed 64-bit range of the durable store".to_string(),
        })
    }

    /// Formats the namespaced cache key for this guild.
    pub fn cache_key(self, namespace: &str) -> String {
        format!("{}:{}", namespace, self.0)
    }
}

impl From<u64> for GuildId {
    fn from(id: u64) -> Self {
        GuildId(id)
    }
}

impl From<GuildId> for u64 {
    fn from(id: GuildId) -> Self {
        id.0
    }
}

impl FromStr for GuildId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(GuildId)
            .map_err(|e| StoreError::InvalidGuildId {
                value: s.to_string(),
                message: e.to_string(),
            })
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
