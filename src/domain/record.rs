// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-guild configuration record.

use crate::domain::errors::Result;
use crate::domain::field::{ConfigField, FieldMap, FieldValue};
use crate::domain::guild_id::GuildId;
use crate::domain::patch::ConfigPatch;
use serde::{Deserialize, Serialize};

/// Default XP cooldown applied when a guild has not set one.
pub const DEFAULT_XP_COOLDOWN_SECS: i64 = 60;

/// The configuration of a single guild.
///
/// Every field is optional. An absent field means "use the system default",
/// never zero or empty; the `*_or_default` accessors apply those defaults.
///
/// # Examples
///
/// ```
/// use guildcfg::domain::{ConfigPatch, GuildConfig, GuildId};
///
/// let mut config = GuildConfig::new(GuildId::new(1));
/// assert!(config.is_default());
///
/// config.apply(&ConfigPatch::new().prefix("?"));
/// assert_eq!(config.effective_prefix("!"), "?");
/// assert!(!config.xp_enabled_or_default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    /// The guild this configuration belongs to
    pub guild_id: GuildId,
    /// Command prefix override
    pub prefix: Option<String>,
    /// Moderation log channel
    pub log_channel_id: Option<i64>,
    /// Channel greeted on member join
    pub welcome_channel_id: Option<i64>,
    /// Greeting template
    pub welcome_message: Option<String>,
    /// Role applied by the mute command
    pub mute_role_id: Option<i64>,
    /// Whether members earn XP
    pub xp_enabled: Option<bool>,
    /// Seconds between XP grants
    pub xp_cooldown_secs: Option<i64>,
    /// Whether the AI completion command is enabled
    pub ai_enabled: Option<bool>,
}

impl GuildConfig {
    /// Creates the all-defaults configuration for a guild.
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            prefix: None,
            log_channel_id: None,
            welcome_channel_id: None,
            welcome_message: None,
            mute_role_id: None,
            xp_enabled: None,
            xp_cooldown_secs: None,
            ai_enabled: None,
        }
    }

    /// Builds a record holding only the fields of `patch`.
    pub fn from_patch(guild_id: GuildId, patch: &ConfigPatch) -> Self {
        let mut config = Self::new(guild_id);
        config.apply(patch);
        config
    }

    /// Decodes a cache field map.
    ///
    /// Field names outside the declared set are skipped so that an entry written
    /// by a newer schema still loads. A value that does not decode as its
    /// field's kind is an error.
    pub fn from_field_map(guild_id: GuildId, map: &FieldMap) -> Result<Self> {
        let mut config = Self::new(guild_id);
        for (name, raw) in map {
            let Some(field) = ConfigField::from_name(name) else {
                tracing::debug!(%guild_id, field = %name, "Ignoring unknown cached field");
                continue;
            };
            config.set(field, Some(FieldValue::decode(field, raw)?));
        }
        Ok(config)
    }

    /// Encodes the present fields as a cache field map.
    pub fn to_field_map(&self) -> FieldMap {
        ConfigField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f.as_str().to_string(), v.encode())))
            .collect()
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, field: ConfigField) -> Option<FieldValue> {
        match field {
            ConfigField::Prefix => self.prefix.clone().map(FieldValue::Text),
            ConfigField::LogChannelId => self.log_channel_id.map(FieldValue::Integer),
            ConfigField::WelcomeChannelId => self.welcome_channel_id.map(FieldValue::Integer),
            ConfigField::WelcomeMessage => self.welcome_message.clone().map(FieldValue::Text),
            ConfigField::MuteRoleId => self.mute_role_id.map(FieldValue::Integer),
            ConfigField::XpEnabled => self.xp_enabled.map(FieldValue::Boolean),
            ConfigField::XpCooldownSecs => self.xp_cooldown_secs.map(FieldValue::Integer),
            ConfigField::AiEnabled => self.ai_enabled.map(FieldValue::Boolean),
        }
    }

    // Values reaching here have already been kind-checked by ConfigPatch or
    // produced by FieldValue::decode for the same field, so a mismatch clears
    // the slot.
    fn set(&mut self, field: ConfigField, value: Option<FieldValue>) {
        match field {
            ConfigField::Prefix => self.prefix = value.and_then(|v| v.as_text().map(String::from)),
            ConfigField::LogChannelId => {
                self.log_channel_id = value.and_then(|v| v.as_integer())
            }
            ConfigField::WelcomeChannelId => {
                self.welcome_channel_id = value.and_then(|v| v.as_integer())
            }
            ConfigField::WelcomeMessage => {
                self.welcome_message = value.and_then(|v| v.as_text().map(String::from))
            }
            ConfigField::MuteRoleId => self.mute_role_id = value.and_then(|v| v.as_integer()),
            ConfigField::XpEnabled => self.xp_enabled = value.and_then(|v| v.as_bool()),
            ConfigField::XpCooldownSecs => {
                self.xp_cooldown_secs = value.and_then(|v| v.as_integer())
            }
            ConfigField::AiEnabled => self.ai_enabled = value.and_then(|v| v.as_bool()),
        }
    }

    /// Overlays the fields of `patch` onto this record.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        for (field, value) in patch.iter() {
            self.set(field, Some(value.clone()));
        }
    }

    /// Returns the fields that hold a value.
    pub fn present_fields(&self) -> Vec<ConfigField> {
        ConfigField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    /// Returns `true` if no field holds a value.
    pub fn is_default(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Returns the guild's prefix, or `default` when unset.
    pub fn effective_prefix<'a>(&'a self, default: &'a str) -> &'a str {
        self.prefix.as_deref().unwrap_or(default)
    }

    /// Returns whether XP is enabled; off unless a guild opts in.
    pub fn xp_enabled_or_default(&self) -> bool {
        self.xp_enabled.unwrap_or(false)
    }

    /// Returns the XP cooldown, falling back to [`DEFAULT_XP_COOLDOWN_SECS`].
    pub fn xp_cooldown_secs_or_default(&self) -> i64 {
        self.xp_cooldown_secs.unwrap_or(DEFAULT_XP_COOLDOWN_SECS)
    }

    /// Returns whether the AI command is enabled; off unless a guild opts in.
    pub fn ai_enabled_or_default(&self) -> bool {
        self.ai_enabled.unwrap_or(false)
    }
}
