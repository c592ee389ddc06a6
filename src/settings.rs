// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection and policy settings for the guild configuration store.
//!
//! Settings are read from a YAML document. Any connection value left blank in
//! the file is filled from the process environment (`DB_USER`, `DB_PASSWORD`,
//! `DB_DATABASE`, `DB_HOST`, `DB_PORT`, `REDIS_HOST`, `REDIS_PORT`), so secrets
//! can stay out of the file.
//!
//! ```yaml
//! database:
//!   host: localhost
//!   user: bot
//!   database: bot
//! redis:
//!   host: localhost
//! cache:
//!   ttl_secs: 86400
//!   write_mode: write_through
//! ```

use crate::domain::{Result, StoreError, DEFAULT_CACHE_NAMESPACE};
use crate::service::{CachePolicy, WriteMode, MAX_CACHE_TTL};
use serde::Deserialize;
use std::time::Duration;

/// Maximum allowed size for a settings file (10MB)
#[cfg(feature = "yaml")]
const MAX_SETTINGS_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// PostgreSQL connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Login role
    pub user: String,
    /// Login password
    pub password: String,
    /// Database name
    pub database: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 5432,
            user: String::new(),
            password: String::new(),
            database: String::new(),
            max_connections: 10,
        }
    }
}

impl DatabaseSettings {
    /// Returns the connection URL with the credentials and database name
    /// percent-encoded.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            urlencoding::encode(&self.database)
        )
    }
}

/// Redis connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Logical database index
    pub db: u32,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 6379,
            db: 0,
        }
    }
}

impl RedisSettings {
    /// Returns the connection URL.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

/// Cache key and consistency settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Prefix of every per-guild cache key
    pub namespace: String,
    /// Expiry applied when an entry is populated, in seconds
    pub ttl_secs: u64,
    /// How updates reach the cache
    pub write_mode: WriteMode,
    /// Whether a write-through re-arms the expiry
    pub refresh_ttl_on_write: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let policy = CachePolicy::default();
        Self {
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            ttl_secs: policy.ttl.as_secs(),
            write_mode: policy.write_mode,
            refresh_ttl_on_write: policy.refresh_ttl_on_write,
        }
    }
}

impl CacheSettings {
    /// Returns the service policy these settings describe.
    pub fn policy(&self) -> CachePolicy {
        CachePolicy::default()
            .with_ttl(Duration::from_secs(self.ttl_secs))
            .with_write_mode(self.write_mode)
            .with_refresh_ttl_on_write(self.refresh_ttl_on_write)
    }
}

/// All settings needed to start the store.
///
/// # Examples
///
/// ```
/// use guildcfg::settings::StoreSettings;
///
/// let mut settings = StoreSettings::from_yaml_str("database:\n  host: db\n").unwrap();
/// settings.fill_from(|name| match name {
///     "DB_USER" => Some("bot".to_string()),
///     _ => None,
/// });
/// assert_eq!(settings.database.host, "db");
/// assert_eq!(settings.database.user, "bot");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Durable store connection
    pub database: DatabaseSettings,
    /// Cache connection
    pub redis: RedisSettings,
    /// Cache policy
    pub cache: CacheSettings,
}

impl StoreSettings {
    /// Parses settings from a YAML document.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| StoreError::SettingsError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Reads settings from a YAML file.
    #[cfg(feature = "yaml")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_SETTINGS_FILE_SIZE {
            return Err(StoreError::SettingsError {
                message: format!(
                    "Settings file too large: {} bytes (max: {} bytes)",
                    metadata.len(),
                    MAX_SETTINGS_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded store settings file");
        Self::from_yaml_str(&content)
    }

    /// Fills blank connection values from the process environment.
    pub fn fill_from_env(&mut self) {
        self.fill_from(|name| std::env::var(name).ok());
    }

    /// Fills blank connection values using `lookup` for each variable name.
    ///
    /// Values present in the file always win. Ports are only replaced when the
    /// variable parses as a port number.
    pub fn fill_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn fill(slot: &mut String, value: Option<String>) {
            if slot.is_empty() {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    *slot = value;
                }
            }
        }

        fill(&mut self.database.user, lookup("DB_USER"));
        fill(&mut self.database.password, lookup("DB_PASSWORD"));
        fill(&mut self.database.database, lookup("DB_DATABASE"));
        fill(&mut self.database.host, lookup("DB_HOST"));
        fill(&mut self.redis.host, lookup("REDIS_HOST"));

        if self.database.port == DatabaseSettings::default().port {
            if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse().ok()) {
                self.database.port = port;
            }
        }
        if self.redis.port == RedisSettings::default().port {
            if let Some(port) = lookup("REDIS_PORT").and_then(|p| p.parse().ok()) {
                self.redis.port = port;
            }
        }
    }

    /// Checks that every connection value needed to start is present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("database.host", &self.database.host),
            ("database.user", &self.database.user),
            ("database.database", &self.database.database),
            ("redis.host", &self.redis.host),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k)
        .collect();

        if !missing.is_empty() {
            return Err(StoreError::SettingsError {
                message: format!("Missing required settings: {}", missing.join(", ")),
                source: None,
            });
        }
        if self.cache.ttl_secs == 0 {
            return Err(StoreError::SettingsError {
                message: "cache.ttl_secs must be greater than zero".to_string(),
                source: None,
            });
        }
        if self.cache.ttl_secs > MAX_CACHE_TTL.as_secs() {
            return Err(StoreError::SettingsError {
                message: format!(
                    "cache.ttl_secs must not exceed {} seconds",
                    MAX_CACHE_TTL.as_secs()
                ),
                source: None,
            });
        }
        Ok(())
    }
}
