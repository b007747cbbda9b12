//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout db-cli.
//! All errors are structured and map to stable error codes (for `--json` output)
//! and to distinct process exit codes (for scripting).
//!
//! # Error Categories
//! - `NotConfigured`: No stored profile exists yet
//! - `ValidationError`: Empty or malformed required input
//! - `ProbeFailure`: Candidate credentials rejected or server unreachable
//! - `StoreCorruption`: Profile and credential presence disagree
//! - `EngineError`: Failure reported by the database while creating a database
//! - `ConfigError`: Settings or profile file I/O errors
//! - `CredentialStoreError`: Platform secret store errors
//! - `PromptError`: Terminal interaction errors

use thiserror::Error;

/// Main error type for db-cli operations
///
/// Messages never contain the stored credential.
#[derive(Error, Debug)]
pub enum DbCliError {
    /// No stored profile exists
    #[error("No configuration found. Use \"db-cli config\" to set up the database connection.")]
    NotConfigured,

    /// Required input is empty or malformed
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Candidate credentials failed the connection test
    #[error("Connection failed: {0}")]
    ProbeFailure(String),

    /// Profile and credential stores disagree on presence, or the profile file is unreadable
    #[error(
        "Stored configuration is incomplete or corrupt: {0}. Run \"db-cli reset\" and configure again."
    )]
    StoreCorruption(String),

    /// Database engine error while provisioning
    #[error("Failed to create database: {0}")]
    EngineError(String),

    /// Configuration error (settings, profile file I/O)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Platform credential store error
    #[error("Secure storage error: {0}")]
    CredentialStoreError(String),

    /// Interactive prompt failed (no terminal, interrupted input)
    #[error("Prompt failed: {0}")]
    PromptError(String),
}

impl DbCliError {
    /// Convert error to error code string for JSON output
    ///
    /// Error codes are stable and suitable for programmatic handling.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "NOT_CONFIGURED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ProbeFailure(_) => "PROBE_FAILURE",
            Self::StoreCorruption(_) => "STORE_CORRUPTION",
            Self::EngineError(_) => "ENGINE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::CredentialStoreError(_) => "CREDENTIAL_STORE_ERROR",
            Self::PromptError(_) => "PROMPT_ERROR",
        }
    }

    /// Process exit code for this error kind
    ///
    /// `0` is success and `2` is reserved for usage errors reported by clap.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotConfigured => 3,
            Self::ValidationError(_) => 4,
            Self::ProbeFailure(_) => 5,
            Self::StoreCorruption(_) => 6,
            Self::EngineError(_) => 7,
            Self::ConfigError(_) => 8,
            Self::CredentialStoreError(_) => 9,
            Self::PromptError(_) => 10,
        }
    }

    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Create a probe failure error
    pub fn probe_failure(detail: impl Into<String>) -> Self {
        Self::ProbeFailure(detail.into())
    }

    /// Create a store corruption error
    pub fn store_corruption(detail: impl Into<String>) -> Self {
        Self::StoreCorruption(detail.into())
    }

    /// Create an engine error
    pub fn engine_error(detail: impl Into<String>) -> Self {
        Self::EngineError(detail.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a credential store error
    pub fn credential_store(message: impl Into<String>) -> Self {
        Self::CredentialStoreError(message.into())
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::PromptError(message.into())
    }
}

impl From<keyring::Error> for DbCliError {
    fn from(err: keyring::Error) -> Self {
        Self::CredentialStoreError(err.to_string())
    }
}

impl From<dialoguer::Error> for DbCliError {
    fn from(err: dialoguer::Error) -> Self {
        Self::PromptError(err.to_string())
    }
}

/// Result type alias for db-cli operations
pub type Result<T> = std::result::Result<T, DbCliError>;
