//! Configuration Management
//!
//! This module handles runtime settings and the on-disk profile file.
//!
//! # Configuration Locations
//! - Profile: `<config_dir>/config.json`, where `config_dir` defaults to
//!   `~/.config/db-cli` (platform equivalent via `dirs`)
//! - Credential: platform secret store (see [`crate::credential`])
//!
//! # Environment Overrides
//! - `DB_CLI_CONFIG_DIR` - directory holding `config.json`
//! - `DB_CLI_ADMIN_DATABASE` - maintenance database used for probing and provisioning
//! - `DB_CLI_TIMEOUT_SECS` - connection timeout in seconds (1-300)
//!
//! Settings are validated once at load time; nothing downstream re-checks them.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DbCliError, Result};
use crate::identifier::validate_database_name;

pub mod profile;

pub use profile::{FileProfileStore, MemoryProfileStore, Profile, ProfileField, ProfileStore};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "DB_CLI_CONFIG_DIR";

/// Environment variable overriding the administrative database
pub const ADMIN_DATABASE_ENV: &str = "DB_CLI_ADMIN_DATABASE";

/// Environment variable overriding the connection timeout
pub const TIMEOUT_ENV: &str = "DB_CLI_TIMEOUT_SECS";

/// Default administrative database (PostgreSQL's maintenance database)
pub const DEFAULT_ADMIN_DATABASE: &str = "postgres";

/// Default connection timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upper bound accepted for the connection timeout
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// File name of the profile inside the configuration directory
pub const PROFILE_FILE_NAME: &str = "config.json";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the profile file
    pub config_dir: PathBuf,

    /// Database used for connection tests and `CREATE DATABASE`
    /// Default: `postgres`
    pub admin_database: String,

    /// Bound on every connection attempt
    /// Default: 10 seconds
    pub connect_timeout: Duration,
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_dir = match lookup(CONFIG_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_config_dir()?,
        };

        let admin_database = match lookup(ADMIN_DATABASE_ENV) {
            Some(name) => {
                validate_database_name(name.trim()).map_err(|e| {
                    DbCliError::config_error(format!("{ADMIN_DATABASE_ENV}: {}", e.message()))
                })?;
                name.trim().to_string()
            }
            None => DEFAULT_ADMIN_DATABASE.to_string(),
        };

        let timeout_secs = match lookup(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            config_dir,
            admin_database,
            connect_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Path of the profile file
    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        self.config_dir.join(PROFILE_FILE_NAME)
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        DbCliError::config_error(format!(
            "{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"
        ))
    })?;

    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(DbCliError::config_error(format!(
            "{TIMEOUT_ENV} must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}"
        )));
    }

    Ok(secs)
}

/// Get the default configuration directory (`~/.config/db-cli`)
pub fn default_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| DbCliError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("db-cli"))
}
