//! Profile Store
//!
//! Persists the non-secret half of the connection (host, port, user) as JSON:
//!
//! ```json
//! {
//!   "host": "db.local",
//!   "port": 5432,
//!   "user": "root"
//! }
//! ```
//!
//! Missing `port` and `user` fall back to [`Profile::DEFAULT_PORT`] and
//! [`Profile::DEFAULT_USER`]. A file that does not parse, or holds out-of-range
//! values, is reported as [`DbCliError::StoreCorruption`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DbCliError, Result};

/// Non-secret connection descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Server hostname or address (required, non-empty)
    pub host: String,

    /// Server port
    /// Default: 5432
    pub port: u16,

    /// Login role
    /// Default: "root"
    pub user: String,
}

impl Profile {
    pub const DEFAULT_PORT: u16 = 5432;
    pub const DEFAULT_USER: &'static str = "root";

    pub fn new(host: impl Into<String>, port: u16, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
        }
    }

    /// Check the field constraints
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(DbCliError::validation("Host is required"));
        }
        if self.port == 0 {
            return Err(DbCliError::validation("Port must be between 1 and 65535"));
        }
        if self.user.trim().is_empty() {
            return Err(DbCliError::validation("User is required"));
        }
        Ok(())
    }
}

/// Individual profile fields, for presence checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Host,
    Port,
    User,
}

/// Durable storage for the single [`Profile`]
pub trait ProfileStore {
    /// Whether `field` is explicitly set
    fn has(&self, field: ProfileField) -> Result<bool>;

    /// Read the full profile, applying field defaults
    ///
    /// Returns [`DbCliError::NotConfigured`] when no host is stored.
    fn read(&self) -> Result<Profile>;

    /// Replace the stored profile
    fn write(&self, profile: &Profile) -> Result<()>;

    /// Remove every stored field
    fn clear(&self) -> Result<()>;
}

/// On-disk shape; every field is optional so partial files can be detected
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileDocument {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
}

impl ProfileDocument {
    fn has(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::Host => self.host.is_some(),
            ProfileField::Port => self.port.is_some(),
            ProfileField::User => self.user.is_some(),
        }
    }

    fn into_profile(self) -> Result<Profile> {
        let host = self.host.ok_or(DbCliError::NotConfigured)?;
        let profile = Profile {
            host,
            port: self.port.unwrap_or(Profile::DEFAULT_PORT),
            user: self.user.unwrap_or_else(|| Profile::DEFAULT_USER.to_string()),
        };
        profile
            .validate()
            .map_err(|e| DbCliError::store_corruption(format!("profile file: {}", e.message())))?;
        Ok(profile)
    }
}

/// Profile store backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ProfileDocument> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(ProfileDocument::default());
            }
            Err(err) => {
                return Err(DbCliError::config_error(format!(
                    "Could not read profile file: {err}"
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            DbCliError::store_corruption(format!("invalid profile file format: {e}"))
        })
    }
}

impl ProfileStore for FileProfileStore {
    fn has(&self, field: ProfileField) -> Result<bool> {
        Ok(self.load()?.has(field))
    }

    fn read(&self) -> Result<Profile> {
        self.load()?.into_profile()
    }

    fn write(&self, profile: &Profile) -> Result<()> {
        profile.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DbCliError::config_error(format!("Could not create config directory: {e}"))
            })?;
        }

        let contents = serde_json::to_string_pretty(profile).map_err(|e| {
            DbCliError::config_error(format!("Could not serialize profile: {e}"))
        })?;

        // Write beside the target and rename so readers never see a partial file.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, contents).map_err(|e| {
            DbCliError::config_error(format!("Could not write profile file: {e}"))
        })?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(DbCliError::config_error(format!(
                "Could not write profile file: {e}"
            )));
        }

        debug!(path = %self.path.display(), "profile written");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "profile removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DbCliError::config_error(format!(
                "Could not remove profile file: {err}"
            ))),
        }
    }
}

/// In-process profile store
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    slot: Arc<Mutex<Option<Profile>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(profile))),
        }
    }

    /// Snapshot of the stored profile
    #[must_use]
    pub fn snapshot(&self) -> Option<Profile> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn has(&self, _field: ProfileField) -> Result<bool> {
        // Writes are whole-record, so every field is present or none is.
        Ok(self.snapshot().is_some())
    }

    fn read(&self) -> Result<Profile> {
        self.snapshot().ok_or(DbCliError::NotConfigured)
    }

    fn write(&self, profile: &Profile) -> Result<()> {
        profile.validate()?;
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}
