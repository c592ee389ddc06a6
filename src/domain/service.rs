// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guild configuration service trait definition.
//!
//! This module defines the `GuildConfigService` trait, the only interface command
//! and event handlers use to read or change a guild's configuration. Handlers
//! never talk to the cache or the durable store directly.

use crate::domain::{ConfigPatch, GuildConfig, GuildId, Result};
use async_trait::async_trait;

/// The consumer-facing guild configuration service.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use guildcfg::domain::{ConfigPatch, GuildConfig, GuildConfigService, GuildId, Result};
///
/// struct DefaultsOnly;
///
/// #[async_trait]
/// impl GuildConfigService for DefaultsOnly {
///     async fn get_configuration(&self, guild_id: GuildId) -> Result<GuildConfig> {
///         Ok(GuildConfig::new(guild_id))
///     }
///
///     async fn update_configuration(
///         &self,
///         guild_id: GuildId,
///         patch: &ConfigPatch,
///     ) -> Result<GuildConfig> {
///         Ok(GuildConfig::from_patch(guild_id, patch))
///     }
///
///     async fn invalidate(&self, _guild_id: GuildId) -> Result<()> {
///         Ok(())
///     }
///
///     async fn shutdown(&self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait GuildConfigService: Send + Sync {
    /// Returns the effective configuration of a guild.
    ///
    /// A guild that has never been configured yields an all-defaults record;
    /// that is not an error.
    async fn get_configuration(&self, guild_id: GuildId) -> Result<GuildConfig>;

    /// Writes the fields of `patch` for a guild, creating its record if needed.
    ///
    /// The returned record holds **only** the fields in `patch`. It is not the
    /// merged effective configuration; call [`get_configuration`] for that.
    ///
    /// [`get_configuration`]: GuildConfigService::get_configuration
    async fn update_configuration(
        &self,
        guild_id: GuildId,
        patch: &ConfigPatch,
    ) -> Result<GuildConfig>;

    /// Drops any cached copy of a guild's configuration.
    async fn invalidate(&self, guild_id: GuildId) -> Result<()>;

    /// Releases the connections held by the service.
    async fn shutdown(&self) -> Result<()>;
}
