// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the guild configuration record, its field set, and the
//! errors and service interface shared by every other layer. It has no
//! knowledge of any particular cache or database.

pub mod errors;
pub mod field;
pub mod guild_id;
pub mod patch;
pub mod record;
pub mod service;

// Re-export commonly used types
pub use errors::{Result, StoreError};
pub use field::{ConfigField, FieldKind, FieldMap, FieldValue};
pub use guild_id::{GuildId, DEFAULT_CACHE_NAMESPACE};
pub use patch::ConfigPatch;
pub use record::GuildConfig;
pub use service::GuildConfigService;
