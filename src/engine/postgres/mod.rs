//! `PostgreSQL` Database Engine Implementation
//!
//! This module implements the `DatabaseEngine` trait for `PostgreSQL` servers.
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - Plain TCP (`NoTls`)
//! - Every connection attempt is bounded by `tokio::time::timeout` as well as
//!   the driver's own connect timeout
//! - Server errors are surfaced with the server's message text only

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};
use tracing::{debug, info, warn};

use crate::engine::{ConnectionTarget, DatabaseEngine, ProbeResult};
use crate::error::{DbCliError, Result};
use crate::identifier::quote_identifier;

/// `PostgreSQL` database engine implementation
#[derive(Debug, Clone)]
pub struct PostgresEngine {
    connect_timeout: Duration,
}

impl PostgresEngine {
    pub const fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Open a connection and spawn its driver task
    ///
    /// The error side is a user-facing description of the failure.
    async fn connect(
        &self,
        target: &ConnectionTarget,
    ) -> std::result::Result<(Client, JoinHandle<()>), String> {
        let pg_config = build_pg_config(target, self.connect_timeout);

        debug!(
            host = %target.host,
            port = target.port,
            user = %target.user,
            database = %target.database,
            "connecting to PostgreSQL"
        );

        let (client, connection) =
            match tokio::time::timeout(self.connect_timeout, pg_config.connect(NoTls)).await {
                Ok(Ok(pair)) => pair,
                Ok(Err(e)) => return Err(describe_error(&e)),
                Err(_) => {
                    return Err(format!(
                        "timed out after {}s connecting to {}:{}",
                        self.connect_timeout.as_secs(),
                        target.host,
                        target.port
                    ))
                }
            };

        // Connection errors are not logged to prevent credential leakage
        let handle = tokio::spawn(async move {
            let _ = connection.await;
        });

        Ok((client, handle))
    }
}

impl Default for PostgresEngine {
    fn default() -> Self {
        Self::new(Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS))
    }
}

impl DatabaseEngine for PostgresEngine {
    async fn probe(&self, target: &ConnectionTarget) -> ProbeResult {
        match self.connect(target).await {
            Ok((client, handle)) => {
                drop(client);
                let _ = handle.await;
                info!(host = %target.host, port = target.port, "connection test succeeded");
                ProbeResult::ok()
            }
            Err(detail) => {
                warn!(host = %target.host, port = target.port, %detail, "connection test failed");
                ProbeResult::failed(detail)
            }
        }
    }

    async fn create_database(&self, target: &ConnectionTarget, name: &str) -> Result<()> {
        let (client, handle) = self.connect(target).await.map_err(DbCliError::engine_error)?;

        let statement = format!("CREATE DATABASE {}", quote_identifier(name));
        let outcome = client.batch_execute(&statement).await;

        drop(client);
        let _ = handle.await;

        outcome.map_err(|e| DbCliError::engine_error(describe_error(&e)))?;
        info!(database = %name, host = %target.host, "database created");
        Ok(())
    }
}

/// Build `PostgreSQL` connection config from a `ConnectionTarget`
fn build_pg_config(target: &ConnectionTarget, connect_timeout: Duration) -> Config {
    let mut pg_config = Config::new();
    pg_config
        .host(&target.host)
        .port(target.port)
        .user(&target.user)
        .password(target.password.expose())
        .dbname(&target.database)
        .application_name("db-cli")
        .connect_timeout(connect_timeout);
    pg_config
}

/// Prefer the server's own message (e.g. `database "x" already exists`)
fn describe_error(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db_error) => db_error.message().to_string(),
        None => err.to_string(),
    }
}
