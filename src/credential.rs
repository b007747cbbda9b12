//! Credential Store
//!
//! The password lives in the platform secret store (macOS Keychain, Windows
//! Credential Manager, Linux kernel keyutils), never in the profile file.
//!
//! There is exactly one credential slot, addressed by a fixed service/account pair.
//! The [`CredentialStore`] trait exposes that slot directly instead of a keyed map,
//! so the one-profile rule is part of the type signature.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use keyring::Entry;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Result;

/// Service name under which the credential is filed
pub const SERVICE_NAME: &str = "db-cli";

/// Account name under which the credential is filed
pub const ACCOUNT_NAME: &str = "database";

/// Database password
///
/// `Debug` output is redacted; the value is only reachable through [`Credential::expose`].
pub struct Credential(SecretString);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    /// Borrow the plain-text secret
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Single-slot secret persistence
pub trait CredentialStore {
    /// Read the stored credential, `None` when the slot is empty
    fn get(&self) -> Result<Option<Credential>>;

    /// Whether the slot holds a credential
    ///
    /// Callers that only need presence use this instead of [`CredentialStore::get`]
    /// so the secret never leaves the store.
    fn exists(&self) -> Result<bool> {
        Ok(self.get()?.is_some())
    }

    /// Store the credential, replacing any previous one
    fn set(&self, credential: &Credential) -> Result<()>;

    /// Remove the credential; removing an empty slot succeeds
    fn delete(&self) -> Result<()>;
}

/// Credential store backed by the platform keyring
pub struct KeyringCredentialStore {
    service_name: String,
    account_name: String,
}

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self {
            service_name: SERVICE_NAME.into(),
            account_name: ACCOUNT_NAME.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Ok(Entry::new(&self.service_name, &self.account_name)?)
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self) -> Result<Option<Credential>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(value) => Ok(Some(Credential::new(value))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn exists(&self) -> Result<bool> {
        // Attribute lookup answers NoEntry without handing back the secret.
        let entry = self.entry()?;
        match entry.get_attributes() {
            Ok(_) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, credential: &Credential) -> Result<()> {
        let entry = self.entry()?;
        entry.set_password(credential.expose())?;
        debug!(
            service = %self.service_name,
            account = %self.account_name,
            "credential stored"
        );
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(
                    service = %self.service_name,
                    account = %self.account_name,
                    "credential removed"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process credential store
///
/// Clones share the same slot, so a caller can keep a handle for inspection
/// after moving a clone into the controller.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `secret`
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(secret.into()))),
        }
    }
}

impl fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("MemoryCredentialStore")
            .field("occupied", &occupied)
            .finish()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Credential>> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.as_deref().map(Credential::new))
    }

    fn exists(&self) -> Result<bool> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.is_some())
    }

    fn set(&self, credential: &Credential) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(credential.expose().to_string());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}
