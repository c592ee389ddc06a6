// SPDX-License-Identifier: MIT OR Apache-2.0

//! The statically declared configuration field set.
//!
//! Every guild configuration has the same fixed set of optional scalar fields.
//! This module names them ([`ConfigField`]), describes their type ([`FieldKind`]),
//! and carries typed values ([`FieldValue`]) to and from the flat string map the
//! cache stores.

use crate::domain::errors::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The cache wire representation of a configuration: field name to string value.
pub type FieldMap = HashMap<String, String>;

/// The scalar type of a configuration field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-form text
    Text,
    /// Signed 64-bit integer (ids, counters, durations)
    Integer,
    /// On/off switch
    Boolean,
}

impl FieldKind {
    /// Returns a lowercase name for messages.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field of the guild configuration record.
///
/// The wire name is both the cache hash field and the durable column name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// Command prefix override
    Prefix,
    /// Channel that receives moderation logs
    LogChannelId,
    /// Channel greeted when a member joins
    WelcomeChannelId,
    /// Greeting template
    WelcomeMessage,
    /// Role applied by the mute command
    MuteRoleId,
    /// Whether members earn XP
    XpEnabled,
    /// Seconds between XP grants for one member
    XpCooldownSecs,
    /// Whether the AI completion command is enabled
    AiEnabled,
}

impl ConfigField {
    /// Every field, in column order.
    pub const ALL: [ConfigField; 8] = [
        ConfigField::Prefix,
        ConfigField::LogChannelId,
        ConfigField::WelcomeChannelId,
        ConfigField::WelcomeMessage,
        ConfigField::MuteRoleId,
        ConfigField::XpEnabled,
        ConfigField::XpCooldownSecs,
        ConfigField::AiEnabled,
    ];

    /// Returns the wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigField::Prefix => "prefix",
            ConfigField::LogChannelId => "log_channel_id",
            ConfigField::WelcomeChannelId => "welcome_channel_id",
            ConfigField::WelcomeMessage => "welcome_message",
            ConfigField::MuteRoleId => "mute_role_id",
            ConfigField::XpEnabled => "xp_enabled",
            ConfigField::XpCooldownSecs => "xp_cooldown_secs",
            ConfigField::AiEnabled => "ai_enabled",
        }
    }

    /// Returns the declared kind of the field.
    pub fn kind(self) -> FieldKind {
        match self {
            ConfigField::Prefix | ConfigField::WelcomeMessage => FieldKind::Text,
            ConfigField::LogChannelId
            | ConfigField::WelcomeChannelId
            | ConfigField::MuteRoleId
            | ConfigField::XpCooldownSecs => FieldKind::Integer,
            ConfigField::XpEnabled | ConfigField::AiEnabled => FieldKind::Boolean,
        }
    }

    /// Looks up a field by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl FromStr for ConfigField {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| StoreError::UnknownField {
            field: s.to_string(),
        })
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed configuration value.
///
/// # Examples
///
/// ```
/// use guildcfg::domain::{ConfigField, FieldValue};
///
/// let value = FieldValue::decode(ConfigField::XpEnabled, "yes").unwrap();
/// assert_eq!(value, FieldValue::Boolean(true));
/// assert_eq!(value.encode(), "true");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Boolean value
    Boolean(bool),
}

impl FieldValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Boolean(_) => FieldKind::Boolean,
        }
    }

    /// Encodes the value as its cache wire string.
    pub fn encode(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
        }
    }

    /// Decodes a cache wire string according to the field's declared kind.
    ///
    /// Booleans accept `true/yes/1/on` and `false/no/0/off`, case-insensitive.
    pub fn decode(field: ConfigField, raw: &str) -> Result<Self> {
        match field.kind() {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|e| StoreError::from_parse_int_error(field.as_str(), e)),
            FieldKind::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(FieldValue::Boolean(true)),
                "false" | "no" | "0" | "off" => Ok(FieldValue::Boolean(false)),
                _ => raw
                    .parse::<bool>()
                    .map(FieldValue::Boolean)
                    .map_err(|e| StoreError::from_parse_bool_error(field.as_str(), e)),
            },
        }
    }

    /// Fails unless this value may be stored in `field`.
    pub fn check_kind(&self, field: ConfigField) -> Result<()> {
        if self.kind() == field.kind() {
            Ok(())
        } else {
            Err(StoreError::FieldKindMismatch {
                field: field.as_str().to_string(),
                expected: field.kind().to_string(),
                actual: self.kind().to_string(),
            })
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<_> = ConfigField::ALL.iter().map(|f| f.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ConfigField::ALL.len());
    }

    #[test]
    fn test_field_from_name() {
        for field in ConfigField::ALL {
            assert_eq!(ConfigField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(ConfigField::from_name("nickname"), None);
    }

    #[test]
    fn test_field_from_str_unknown() {
        let result = "nickname".parse::<ConfigField>();
        assert!(matches!(result, Err(StoreError::UnknownField { .. })));
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(ConfigField::Prefix.kind(), FieldKind::Text);
        assert_eq!(ConfigField::MuteRoleId.kind(), FieldKind::Integer);
        assert_eq!(ConfigField::AiEnabled.kind(), FieldKind::Boolean);
    }

    #[test]
    fn test_decode_bool_variants() {
        for raw in ["true", "TRUE", "yes", "1", "on"] {
            assert_eq!(
                FieldValue::decode(ConfigField::XpEnabled, raw).unwrap(),
                FieldValue::Boolean(true),
                "Failed for value: {}",
                raw
            );
        }
        for raw in ["false", "No", "0", "OFF"] {
            assert_eq!(
                FieldValue::decode(ConfigField::XpEnabled, raw).unwrap(),
                FieldValue::Boolean(false),
                "Failed for value: {}",
                raw
            );
        }
    }

    #[test]
    fn test_decode_bool_invalid() {
        let result = FieldValue::decode(ConfigField::AiEnabled, "maybe");
        assert!(matches!(
            result,
            Err(StoreError::TypeConversionError { .. })
        ));
    }

    #[test]
    fn test_decode_integer() {
        assert_eq!(
            FieldValue::decode(ConfigField::LogChannelId, "81384788765712384").unwrap(),
            FieldValue::Integer(81384788765712384)
        );
        assert!(FieldValue::decode(ConfigField::LogChannelId, "#general").is_err());
    }

    #[test]
    fn test_decode_text_is_verbatim() {
        let value = FieldValue::decode(ConfigField::WelcomeMessage, "  hi {user}  ").unwrap();
        assert_eq!(value.as_text(), Some("  hi {user}  "));
    }

    #[test]
    fn test_check_kind() {
        assert!(FieldValue::from("!").check_kind(ConfigField::Prefix).is_ok());
        let err = FieldValue::from(5i64)
            .check_kind(ConfigField::Prefix)
            .unwrap_err();
        assert!(matches!(err, StoreError::FieldKindMismatch { .. }));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::from(3i64).as_integer(), Some(3));
        assert_eq!(FieldValue::from(true).as_bool(), Some(true));
        assert_eq!(FieldValue::from(true).as_text(), None);
    }
}
