// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partial updates to a guild configuration.

use crate::domain::errors::Result;
use crate::domain::field::{ConfigField, FieldMap, FieldValue};
use std::collections::BTreeMap;

/// A typed, partial set of field assignments.
///
/// Only the fields present in a patch are written; every other field keeps its
/// stored value. Values are checked against the field's declared kind when they
/// are added, so a patch is always valid for the durable schema.
///
/// # Examples
///
/// ```
/// use guildcfg::domain::{ConfigField, ConfigPatch};
///
/// let patch = ConfigPatch::new()
///     .prefix("?")
///     .xp_enabled(false);
///
/// assert_eq!(patch.len(), 2);
/// assert!(patch.contains(ConfigField::Prefix));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    values: BTreeMap<ConfigField, FieldValue>,
}

impl ConfigPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a value to a field after checking its kind.
    pub fn set(&mut self, field: ConfigField, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();
        value.check_kind(field)?;
        self.values.insert(field, value);
        Ok(())
    }

    /// Builder form of [`ConfigPatch::set`].
    pub fn with(mut self, field: ConfigField, value: impl Into<FieldValue>) -> Result<Self> {
        self.set(field, value)?;
        Ok(self)
    }

    // The typed setters below cannot fail a kind check.
    fn insert(mut self, field: ConfigField, value: FieldValue) -> Self {
        self.values.insert(field, value);
        self
    }

    /// Sets the command prefix.
    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        self.insert(ConfigField::Prefix, FieldValue::Text(prefix.into()))
    }

    /// Sets the moderation log channel.
    pub fn log_channel_id(self, id: i64) -> Self {
        self.insert(ConfigField::LogChannelId, FieldValue::Integer(id))
    }

    /// Sets the welcome channel.
    pub fn welcome_channel_id(self, id: i64) -> Self {
        self.insert(ConfigField::WelcomeChannelId, FieldValue::Integer(id))
    }

    /// Sets the welcome message template.
    pub fn welcome_message(self, message: impl Into<String>) -> Self {
        self.insert(ConfigField::WelcomeMessage, FieldValue::Text(message.into()))
    }

    /// Sets the mute role.
    pub fn mute_role_id(self, id: i64) -> Self {
        self.insert(ConfigField::MuteRoleId, FieldValue::Integer(id))
    }

    /// Enables or disables XP.
    pub fn xp_enabled(self, enabled: bool) -> Self {
        self.insert(ConfigField::XpEnabled, FieldValue::Boolean(enabled))
    }

    /// Sets the XP cooldown in seconds.
    pub fn xp_cooldown_secs(self, secs: i64) -> Self {
        self.insert(ConfigField::XpCooldownSecs, FieldValue::Integer(secs))
    }

    /// Enables or disables the AI completion command.
    pub fn ai_enabled(self, enabled: bool) -> Self {
        self.insert(ConfigField::AiEnabled, FieldValue::Boolean(enabled))
    }

    /// Returns the value assigned to `field`, if any.
    pub fn get(&self, field: ConfigField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Returns `true` if the patch assigns `field`.
    pub fn contains(&self, field: ConfigField) -> bool {
        self.values.contains_key(&field)
    }

    /// Returns the number of assigned fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the patch assigns nothing.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over assignments in column order.
    pub fn iter(&self) -> impl Iterator<Item = (ConfigField, &FieldValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }

    /// Encodes the patch as a cache field map.
    pub fn to_field_map(&self) -> FieldMap {
        self.values
            .iter()
            .map(|(f, v)| (f.as_str().to_string(), v.encode()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StoreError;

    #[test]
    fn test_typed_setters() {
        let patch = ConfigPatch::new()
            .prefix("!")
            .log_channel_id(10)
            .xp_enabled(true);

        assert_eq!(patch.len(), 3);
        assert_eq!(patch.get(ConfigField::Prefix), Some(&FieldValue::from("!")));
        assert_eq!(
            patch.get(ConfigField::LogChannelId),
            Some(&FieldValue::Integer(10))
        );
        assert!(!patch.contains(ConfigField::MuteRoleId));
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut patch = ConfigPatch::new();
        let err = patch.set(ConfigField::XpEnabled, "yes").unwrap_err();
        assert!(matches!(err, StoreError::FieldKindMismatch { .. }));
        assert!(patch.is_empty());
    }

    #[test]
    fn test_with_chains() {
        let patch = ConfigPatch::new()
            .with(ConfigField::MuteRoleId, 5i64)
            .and_then(|p| p.with(ConfigField::AiEnabled, false))
            .unwrap();
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn test_later_assignment_wins() {
        let patch = ConfigPatch::new().prefix("!").prefix("?");
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get(ConfigField::Prefix), Some(&FieldValue::from("?")));
    }

    #[test]
    fn test_to_field_map() {
        let map = ConfigPatch::new()
            .xp_cooldown_secs(60)
            .ai_enabled(false)
            .to_field_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("xp_cooldown_secs"), Some(&"60".to_string()));
        assert_eq!(map.get("ai_enabled"), Some(&"false".to_string()));
    }

    #[test]
    fn test_iter_is_column_ordered() {
        let patch = ConfigPatch::new().ai_enabled(true).prefix("!");
        let fields: Vec<_> = patch.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![ConfigField::Prefix, ConfigField::AiEnabled]);
    }
}
