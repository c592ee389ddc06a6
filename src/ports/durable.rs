// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable store trait definition.
//!
//! The durable store is the source of truth: one row per guild, one nullable
//! column per configuration field.

use crate::domain::{ConfigPatch, GuildConfig, GuildId, Result};
use async_trait::async_trait;

/// A trait for durable guild configuration stores.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// request handler in the process.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use guildcfg::domain::{ConfigPatch, GuildConfig, GuildId, Result};
/// use guildcfg::ports::DurableStore;
///
/// struct NullStore;
///
/// #[async_trait]
/// impl DurableStore for NullStore {
///     fn name(&self) -> &str {
///         "null"
///     }
///
///     async fn load(&self, _guild_id: GuildId) -> Result<Option<GuildConfig>> {
///         Ok(None)
///     }
///
///     async fn upsert(&self, guild_id: GuildId, patch: &ConfigPatch) -> Result<GuildConfig> {
///         Ok(GuildConfig::from_patch(guild_id, patch))
///     }
/// }
/// ```
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Returns the name of this store, used in logs and errors.
    fn name(&self) -> &str;

    /// Loads a guild's row.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(config))` - The guild has a row
    /// * `Ok(None)` - The guild has never been configured
    /// * `Err(StoreError)` - The store could not be queried
    async fn load(&self, guild_id: GuildId) -> Result<Option<GuildConfig>>;

    /// Inserts or updates a guild's row with the fields of `patch`.
    ///
    /// A new row leaves every field outside the patch unset; an existing row
    /// keeps them. Exactly one durable mutation is made per call.
    ///
    /// The returned record is built from the patch alone and need not reflect
    /// columns the patch did not touch.
    async fn upsert(&self, guild_id: GuildId, patch: &ConfigPatch) -> Result<GuildConfig>;

    /// Closes the underlying connection pool.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
