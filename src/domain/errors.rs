// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the guild configuration store.
//!
//! This module defines the errors that can occur while reading or writing guild
//! configuration through either store. All errors use `thiserror` for proper
//! error handling and conversion.
//!
//! A missing durable row is *not* an error: it is represented as `Ok(None)` by
//! the durable store port and as an all-defaults [`GuildConfig`] by the service.
//!
//! [`GuildConfig`]: crate::domain::GuildConfig

use std::num::ParseIntError;
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for guild configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use guildcfg::domain::errors::StoreError;
///
/// fn connect() -> Result<(), StoreError> {
///     Err(StoreError::CacheError {
///         backend: "redis".to_string(),
///         message: "connection refused".to_string(),
///         source: None,
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The fast cache could not be reached or rejected a command.
    #[error("Cache '{backend}' error: {message}")]
    CacheError {
        /// The name of the cache backend
        backend: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The durable store could not be reached or rejected a statement.
    #[error("Durable store '{backend}' error: {message}")]
    DurableStoreError {
        /// The name of the durable store backend
        backend: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored field value could not be converted to the field's declared type.
    #[error("Failed to convert value for field '{field}' to type {target_type}: {source}")]
    TypeConversionError {
        /// The field being converted
        field: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A field name that is not part of the configuration field set.
    #[error("Unknown configuration field: {field}")]
    UnknownField {
        /// The unrecognised field name
        field: String,
    },

    /// A value of the wrong kind was supplied for a field.
    #[error("Field '{field}' expects a {expected} value, got {actual}")]
    FieldKindMismatch {
        /// The field being written
        field: String,
        /// The kind the field declares
        expected: String,
        /// The kind that was supplied
        actual: String,
    },

    /// A guild identifier that cannot be represented in a store.
    #[error("Invalid guild id '{value}': {message}")]
    InvalidGuildId {
        /// The offending value
        value: String,
        /// Why it was rejected
        message: String,
    },

    /// The service builder was not given a required adapter.
    #[error("No {adapter} adapter was configured")]
    MissingAdapter {
        /// Which adapter is missing
        adapter: String,
    },

    /// The store settings could not be loaded.
    #[error("Failed to load store settings: {message}")]
    SettingsError {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading settings.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StoreError {
    /// Wraps a cache backend failure.
    pub fn cache<E>(backend: &str, message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::CacheError {
            backend: backend.to_string(),
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Wraps a durable store failure.
    pub fn durable<E>(backend: &str, message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::DurableStoreError {
            backend: backend.to_string(),
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(field: &str, err: ParseIntError) -> Self {
        StoreError::TypeConversionError {
            field: field.to_string(),
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(field: &str, err: ParseBoolError) -> Self {
        StoreError::TypeConversionError {
            field: field.to_string(),
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Returns `true` if the error came from either backing store rather than
    /// from decoding or validation.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::CacheError { .. } | StoreError::DurableStoreError { .. }
        )
    }
}

/// A specialized Result type for guild configuration operations.
pub type Result<T> = std::result::Result<T, StoreError>;
