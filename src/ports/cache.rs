// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fast cache trait definition.
//!
//! The cache holds a flat field map per guild with an absolute expiry. It is
//! disposable: anything it holds can be rebuilt from the durable store.

use crate::domain::{FieldMap, GuildId, Result};
use async_trait::async_trait;
use std::time::Duration;

/// A trait for per-guild field-map caches.
///
/// Entries expire only by time; there is no capacity bound or LRU eviction.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Each method is atomic with respect to
/// itself only; callers get no ordering across methods.
#[async_trait]
pub trait ConfigCache: Send + Sync {
    /// Returns the name of this cache, used in logs and errors.
    fn name(&self) -> &str;

    /// Reads every cached field of a guild.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - No entry exists or it has expired
    /// * `Ok(Some(map))` - The entry exists; `map` may in principle be empty
    async fn get_fields(&self, guild_id: GuildId) -> Result<Option<FieldMap>>;

    /// Writes the given fields, creating the entry if needed.
    ///
    /// Fields already cached but absent from `fields` are left alone.
    async fn set_fields(&self, guild_id: GuildId, fields: &FieldMap) -> Result<()>;

    /// Sets the absolute expiry of the whole entry to `ttl` from now.
    async fn set_ttl(&self, guild_id: GuildId, ttl: Duration) -> Result<()>;

    /// Returns `true` if an unexpired entry exists.
    async fn exists(&self, guild_id: GuildId) -> Result<bool>;

    /// Writes the given fields only if the entry already exists.
    ///
    /// Never creates an entry and never touches the expiry. Returns whether a
    /// write happened.
    async fn set_fields_if_present(&self, guild_id: GuildId, fields: &FieldMap) -> Result<bool>;

    /// Deletes the entry, if any.
    async fn remove(&self, guild_id: GuildId) -> Result<()>;

    /// Closes the underlying connection.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
