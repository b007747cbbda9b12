//! db-cli - Single-Profile PostgreSQL Connection Manager
//!
//! db-cli stores one database connection profile, tests it before saving,
//! and uses it to provision new databases.
//!
//! # Core Principles
//! - Validate before persist (nothing is saved until a live connection succeeds)
//! - Secrets live in the platform credential store, never in the profile file
//! - Profile and credential are created and removed together
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`output`] - Human and JSON output
//! - [`config`] - Settings and the profile store
//! - [`credential`] - Single-slot credential store
//! - [`engine`] - Database engine trait and the PostgreSQL implementation
//! - [`identifier`] - Database name validation and quoting
//! - [`prompt`] - Interactive prompts
//! - [`lifecycle`] - Profile lifecycle controller

pub mod config;
pub mod credential;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod lifecycle;
pub mod output;
pub mod prompt;

// Re-export commonly used types for convenience
pub use config::{
    FileProfileStore, MemoryProfileStore, Profile, ProfileField, ProfileStore, Settings,
};
pub use credential::{Credential, CredentialStore, KeyringCredentialStore, MemoryCredentialStore};
pub use engine::postgres::PostgresEngine;
pub use engine::{connection_string, ConnectionTarget, DatabaseEngine, ProbeResult};
pub use error::{DbCliError, Result};
pub use identifier::{quote_identifier, validate_database_name};
pub use lifecycle::{
    ConfigureOutcome, CreatedDatabase, ProfileController, ProfileState, ResetOutcome, ViewReport,
};
pub use output::{ErrorEnvelope, ErrorInfo, Metadata, SuccessEnvelope};
pub use prompt::{Candidate, Interaction, TerminalPrompter};
