//! db-cli Entry Point
//!
//! This is the main binary entry point for db-cli.
//! It provides four subcommands:
//! - `config` - Create or replace the stored connection profile
//! - `view` - Show the stored connection string
//! - `add db` - Create a database with the stored profile
//! - `reset` - Remove the stored profile and password
//!
//! Command results go to stdout. Logs and prompts go to stderr.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use db_cli::lifecycle::{ConfigureOutcome, ResetOutcome};
use db_cli::output::{Message, OutputFormat, Reporter, Tone};
use db_cli::{
    DbCliError, FileProfileStore, KeyringCredentialStore, PostgresEngine, ProfileController,
    Settings, TerminalPrompter,
};

type Controller = ProfileController<FileProfileStore, KeyringCredentialStore, PostgresEngine>;

/// db-cli - manage a PostgreSQL connection profile and provision databases
#[derive(Parser)]
#[command(name = "db-cli")]
#[command(about = "Manage a PostgreSQL connection profile and provision databases")]
#[command(version)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Print a JSON envelope instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure database connection
    Config(ConfirmArgs),

    /// View database connection
    View {
        /// Show password in clear text
        #[arg(short = 'p', long = "show-password")]
        show_password: bool,
    },

    /// Add a new resource
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },

    /// Remove all saved configuration
    Reset(ConfirmArgs),
}

#[derive(Subcommand)]
enum AddTarget {
    /// Add a new database
    Db {
        /// Database name (prompted for when omitted)
        name: Option<String>,
    },
}

#[derive(Args)]
struct ConfirmArgs {
    /// Answer "yes" to confirmation prompts
    #[arg(short, long)]
    yes: bool,
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::View { .. } => "view",
            Self::Add { .. } => "add-db",
            Self::Reset(_) => "reset",
        }
    }

    const fn assume_yes(&self) -> bool {
        match self {
            Self::Config(args) | Self::Reset(args) => args.yes,
            Self::View { .. } | Self::Add { .. } => false,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let reporter = Reporter::new(format, cli.command.name());

    let result = match Settings::load() {
        Ok(settings) => execute(&cli.command, &settings, &reporter).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.failure(&e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "db_cli=warn",
            1 => "db_cli=info",
            2 => "db_cli=debug",
            _ => "db_cli=trace,tokio_postgres=debug",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

fn build_controller(settings: &Settings) -> Controller {
    debug!(profile = %settings.profile_path().display(), "using profile file");
    ProfileController::new(
        FileProfileStore::new(settings.profile_path()),
        KeyringCredentialStore::new(),
        PostgresEngine::new(settings.connect_timeout),
        settings.admin_database.clone(),
    )
}

async fn execute(
    command: &Commands,
    settings: &Settings,
    reporter: &Reporter,
) -> Result<(), DbCliError> {
    let controller = build_controller(settings);
    let interactive = reporter.format() == OutputFormat::Human;
    let mut prompter = TerminalPrompter::new()
        .assume_yes(command.assume_yes())
        .show_notices(interactive);

    match command {
        Commands::Config(_) => {
            let outcome = controller.configure(&mut prompter).await?;
            let message = match &outcome {
                ConfigureOutcome::Unchanged => {
                    Message::new(Tone::Info, ["Configuration unchanged"])
                }
                ConfigureOutcome::Saved { .. } => Message::new(
                    Tone::Success,
                    ["Connection successful!", "", "Configuration saved successfully!"],
                ),
            };
            reporter.success(&outcome, &message);
        }

        Commands::View { show_password } => {
            let report = controller.view(*show_password)?;
            let mut lines = vec![
                "Current Configuration:".to_string(),
                String::new(),
                report.connection_string.clone(),
            ];
            if !report.password_shown {
                lines.extend([String::new(), "Use -p flag to show password".to_string()]);
            }
            let message = Message::new(Tone::Info, lines).titled("Connection Info");
            reporter.success(&report, &message);
        }

        Commands::Add {
            target: AddTarget::Db { name },
        } => {
            let created = match name {
                Some(name) => controller.add_database(name).await?,
                None => controller.add_database_prompted(&mut prompter).await?,
            };
            let message = Message::new(
                Tone::Success,
                [
                    "Database created successfully!".to_string(),
                    String::new(),
                    "Connection string:".to_string(),
                    created.connection_string.clone(),
                ],
            );
            reporter.success(&created, &message);
        }

        Commands::Reset(_) => {
            let outcome = controller.reset(&mut prompter)?;
            let message = match outcome {
                ResetOutcome::NothingToReset => {
                    Message::new(Tone::Info, ["No configuration found to reset"])
                }
                ResetOutcome::Cancelled => Message::new(Tone::Info, ["Reset cancelled"]),
                ResetOutcome::Removed => {
                    Message::new(Tone::Success, ["Configuration successfully removed"])
                }
            };
            reporter.success(outcome, &message);
        }
    }

    Ok(())
}
