//! Profile Lifecycle
//!
//! The controller owns every write to the profile file and the credential slot.
//! The pair is always in one of three states:
//!
//! | profile | credential | state        |
//! |---------|------------|--------------|
//! | no      | no         | `Absent`     |
//! | yes     | yes        | `Complete`   |
//! | yes     | no         | `Incomplete` |
//! | no      | yes        | `Incomplete` |
//!
//! A profile file that cannot be parsed is `Incomplete` whatever the credential
//! slot holds, so it never passes for a usable profile nor for an empty one.
//!
//! # Transitions
//! - `configure`: probe the candidate first, persist only on success
//! - `view` / `add_database`: read-only, require `Complete`
//! - `reset`: the only way out of `Incomplete`
//!
//! Configure writes the profile, then the credential. If a write fails the
//! controller clears both stores and restores whatever was there before.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Profile, ProfileField, ProfileStore};
use crate::credential::{Credential, CredentialStore};
use crate::engine::{connection_string, ConnectionTarget, DatabaseEngine};
use crate::error::{DbCliError, Result};
use crate::identifier::validate_database_name;
use crate::prompt::Interaction;

pub const OVERWRITE_QUESTION: &str = "Existing configuration found. Do you want to overwrite it?";
pub const RESET_QUESTION: &str = "Are you sure you want to remove all saved configuration?";
pub const TESTING_NOTICE: &str = "Testing connection...";

/// Derived state of the stored profile/credential pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileState {
    Absent,
    Complete,
    Incomplete,
}

/// Which halves of the pair are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presence {
    pub profile: bool,
    /// The profile file exists but could not be parsed
    pub profile_corrupt: bool,
    pub credential: bool,
}

impl Presence {
    #[must_use]
    pub const fn state(self) -> ProfileState {
        if self.profile_corrupt {
            return ProfileState::Incomplete;
        }
        match (self.profile, self.credential) {
            (false, false) => ProfileState::Absent,
            (true, true) => ProfileState::Complete,
            _ => ProfileState::Incomplete,
        }
    }

    fn corruption(self) -> DbCliError {
        if self.profile_corrupt {
            DbCliError::store_corruption("profile file is unreadable")
        } else if self.profile {
            DbCliError::store_corruption("password missing from secure storage")
        } else {
            DbCliError::store_corruption("password stored but connection settings are missing")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfigureOutcome {
    /// Existing profile kept because overwrite was declined
    Unchanged,
    /// Candidate passed the connection test and was stored
    Saved { connection_string: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewReport {
    pub connection_string: String,
    pub password_shown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedDatabase {
    pub database: String,
    /// Includes the real password
    pub connection_string: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResetOutcome {
    NothingToReset,
    Cancelled,
    Removed,
}

/// Whatever was stored before a configure run, for rollback
struct Snapshot {
    profile: Option<Profile>,
    credential: Option<Credential>,
}

/// Orchestrates reads, validation and writes across both stores
pub struct ProfileController<P, C, E> {
    profiles: P,
    credentials: C,
    engine: E,
    admin_database: String,
}

impl<P, C, E> ProfileController<P, C, E>
where
    P: ProfileStore,
    C: CredentialStore,
    E: DatabaseEngine,
{
    pub fn new(profiles: P, credentials: C, engine: E, admin_database: impl Into<String>) -> Self {
        Self {
            profiles,
            credentials,
            engine,
            admin_database: admin_database.into(),
        }
    }

    /// Inspect both stores without reading the secret
    pub fn presence(&self) -> Result<Presence> {
        let (profile, profile_corrupt) = match self.profiles.has(ProfileField::Host) {
            Ok(present) => (present, false),
            Err(DbCliError::StoreCorruption(detail)) => {
                warn!(%detail, "profile file is unreadable");
                (true, true)
            }
            Err(e) => return Err(e),
        };
        let credential = self.credentials.exists()?;
        Ok(Presence {
            profile,
            profile_corrupt,
            credential,
        })
    }

    pub fn state(&self) -> Result<ProfileState> {
        Ok(self.presence()?.state())
    }

    /// Fail unless the pair is complete; returns the stored profile
    pub fn ensure_configured(&self) -> Result<Profile> {
        let presence = self.presence()?;
        match presence.state() {
            ProfileState::Absent => Err(DbCliError::NotConfigured),
            ProfileState::Incomplete => Err(presence.corruption()),
            ProfileState::Complete => self.profiles.read(),
        }
    }

    /// Collect, test, and store a new profile
    pub async fn configure(&self, ui: &mut impl Interaction) -> Result<ConfigureOutcome> {
        let prior_state = self.state()?;
        debug!(?prior_state, "configure requested");

        if prior_state == ProfileState::Complete && !ui.confirm(OVERWRITE_QUESTION)? {
            info!("overwrite declined, configuration unchanged");
            return Ok(ConfigureOutcome::Unchanged);
        }

        let candidate = ui.candidate()?;
        candidate.profile.validate()?;

        ui.notice(TESTING_NOTICE);
        let target = ConnectionTarget::new(
            &candidate.profile,
            &candidate.password,
            &self.admin_database,
        );
        let probe = self.engine.probe(&target).await;
        if !probe.success {
            let detail = probe.error_detail.unwrap_or_else(|| "unknown error".to_string());
            return Err(DbCliError::probe_failure(detail));
        }

        let prior = match prior_state {
            ProfileState::Absent => None,
            _ => Some(self.snapshot()?),
        };
        self.commit(&candidate.profile, &candidate.password, prior.as_ref())?;

        info!(
            host = %candidate.profile.host,
            port = candidate.profile.port,
            "configuration saved"
        );
        Ok(ConfigureOutcome::Saved {
            connection_string: connection_string(&candidate.profile, None, &self.admin_database),
        })
    }

    /// Connection string for the administrative database
    ///
    /// The credential store is only read when `reveal` is set.
    pub fn view(&self, reveal: bool) -> Result<ViewReport> {
        let profile = self.ensure_configured()?;
        let password = if reveal {
            Some(self.stored_credential()?)
        } else {
            None
        };

        Ok(ViewReport {
            connection_string: connection_string(&profile, password.as_ref(), &self.admin_database),
            password_shown: reveal,
        })
    }

    /// Create database `name` using the stored profile
    pub async fn add_database(&self, name: &str) -> Result<CreatedDatabase> {
        let profile = self.ensure_configured()?;
        let name = validate_database_name(name)?;
        let password = self.stored_credential()?;

        let target = ConnectionTarget::new(&profile, &password, &self.admin_database);
        self.engine.create_database(&target, name).await?;

        Ok(CreatedDatabase {
            database: name.to_string(),
            connection_string: connection_string(&profile, Some(&password), name),
        })
    }

    /// Ask `ui` for the database name once the pair is known to be usable
    pub async fn add_database_prompted(
        &self,
        ui: &mut impl Interaction,
    ) -> Result<CreatedDatabase> {
        self.ensure_configured()?;
        let name = ui.database_name()?;
        self.add_database(&name).await
    }

    /// Remove both halves of the pair after confirmation
    pub fn reset(&self, ui: &mut impl Interaction) -> Result<ResetOutcome> {
        if self.state()? == ProfileState::Absent {
            info!("nothing to reset");
            return Ok(ResetOutcome::NothingToReset);
        }

        if !ui.confirm(RESET_QUESTION)? {
            info!("reset cancelled");
            return Ok(ResetOutcome::Cancelled);
        }

        self.clear_both()?;
        info!("configuration removed");
        Ok(ResetOutcome::Removed)
    }

    fn stored_credential(&self) -> Result<Credential> {
        self.credentials
            .get()?
            .ok_or_else(|| DbCliError::store_corruption("password missing from secure storage"))
    }

    fn snapshot(&self) -> Result<Snapshot> {
        // An unreadable profile is not restored; rollback leaves it absent.
        let profile = self.profiles.read().ok();
        let credential = self.credentials.get()?;
        Ok(Snapshot { profile, credential })
    }

    /// Tear down any prior pair, then write profile and credential
    fn commit(
        &self,
        profile: &Profile,
        credential: &Credential,
        prior: Option<&Snapshot>,
    ) -> Result<()> {
        if prior.is_some() {
            if let Err(e) = self.clear_both() {
                return Err(self.roll_back(prior, e));
            }
        }
        if let Err(e) = self.profiles.write(profile) {
            return Err(self.roll_back(prior, e));
        }
        if let Err(e) = self.credentials.set(credential) {
            return Err(self.roll_back(prior, e));
        }
        Ok(())
    }

    /// Return the stores to `prior`; a failed rollback becomes `StoreCorruption`
    fn roll_back(&self, prior: Option<&Snapshot>, cause: DbCliError) -> DbCliError {
        warn!(error = %cause, "write failed, rolling back");

        let restored = self.clear_both().and_then(|()| match prior {
            Some(snapshot) => self.restore(snapshot),
            None => Ok(()),
        });

        match restored {
            Ok(()) => cause,
            Err(rollback_error) => DbCliError::store_corruption(format!(
                "{} (rollback failed: {})",
                cause.message(),
                rollback_error.message()
            )),
        }
    }

    fn restore(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(profile) = &snapshot.profile {
            self.profiles.write(profile)?;
        }
        if let Some(credential) = &snapshot.credential {
            self.credentials.set(credential)?;
        }
        Ok(())
    }

    /// Clear both stores, attempting the second even if the first fails
    fn clear_both(&self) -> Result<()> {
        let profile = self.profiles.clear();
        let credential = self.credentials.delete();
        profile.and(credential)
    }
}
