//! Command Output
//!
//! Every command produces exactly one result on stdout, in one of two formats:
//! - Human (default): a titled message block
//! - JSON (`--json`): a success or error envelope
//!
//! # Output Contract
//! - Success: `{"ok": true, "engine": "...", "command": "...", "data": {...}, "meta": {...}}`
//! - Error: `{"ok": false, "engine": "...", "command": "...", "error": {"code": "...", "message": "..."}}`
//!
//! Logs and prompts go to stderr.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::engine::ENGINE_NAME;
use crate::error::DbCliError;

/// Success envelope for operation results
///
/// Generic over the data type to support different operation return values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always true for success envelopes
    pub ok: bool,

    /// Database engine (always postgres)
    pub engine: String,

    /// Command that was executed (config, view, add-db, reset)
    pub command: String,

    /// Operation-specific data
    pub data: T,

    /// Execution metadata
    pub meta: Metadata,
}

impl<T> SuccessEnvelope<T> {
    /// Create a new success envelope
    pub fn new(command: impl Into<String>, data: T, meta: Metadata) -> Self {
        Self {
            ok: true,
            engine: ENGINE_NAME.to_string(),
            command: command.into(),
            data,
            meta,
        }
    }
}

/// Error envelope for operation failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always false for error envelopes
    pub ok: bool,

    pub engine: String,

    /// Command that was attempted
    pub command: String,

    pub error: ErrorInfo,
}

impl ErrorEnvelope {
    /// Create error envelope from `DbCliError`
    pub fn from_error(command: impl Into<String>, err: &DbCliError) -> Self {
        Self {
            ok: false,
            engine: ENGINE_NAME.to_string(),
            command: command.into(),
            error: ErrorInfo {
                code: err.error_code().to_string(),
                message: err.message(),
            },
        }
    }
}

/// Error information structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code (e.g., "PROBE_FAILURE", "NOT_CONFIGURED")
    pub code: String,

    /// Human-readable error message (never contains the password)
    pub message: String,
}

/// Execution metadata included in all success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Execution time in milliseconds
    pub execution_ms: u64,
}

impl Metadata {
    pub fn new(execution_ms: u64) -> Self {
        Self { execution_ms }
    }
}

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Severity of a human-readable message block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

impl Tone {
    const fn title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }
}

/// A titled block of text for human output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub tone: Tone,
    pub title: Option<&'static str>,
    pub lines: Vec<String>,
}

impl Message {
    pub fn new(tone: Tone, lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tone,
            title: None,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Override the default title derived from the tone
    #[must_use]
    pub fn titled(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    /// Every entry is at least one row; an empty entry is a blank row
    fn rows(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flat_map(|line| line.split('\n'))
    }

    /// Render as a framed block
    #[must_use]
    pub fn render(&self) -> String {
        let title = self.title.unwrap_or_else(|| self.tone.title());
        let width = self
            .rows()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(title.chars().count() + 2);

        let mut out = format!(
            "┌─ {title} {}┐\n",
            "─".repeat(width - title.chars().count() - 1)
        );
        for line in self.rows() {
            let pad = width - line.chars().count();
            out.push_str(&format!("│ {line}{} │\n", " ".repeat(pad)));
        }
        out.push_str(&format!("└{}┘", "─".repeat(width + 2)));
        out
    }
}

/// Writes the single result of a command to stdout
#[derive(Debug)]
pub struct Reporter {
    format: OutputFormat,
    command: &'static str,
    started: Instant,
}

impl Reporter {
    pub fn new(format: OutputFormat, command: &'static str) -> Self {
        Self {
            format,
            command,
            started: Instant::now(),
        }
    }

    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Report a completed command
    pub fn success<T: Serialize>(&self, data: T, message: &Message) {
        match self.format {
            OutputFormat::Human => println!("{}", message.render()),
            OutputFormat::Json => {
                let elapsed =
                    u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
                let envelope = SuccessEnvelope::new(self.command, data, Metadata::new(elapsed));
                print_json(&envelope);
            }
        }
    }

    /// Report a failed command
    pub fn failure(&self, err: &DbCliError) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", Message::new(Tone::Error, [err.message()]).render());
            }
            OutputFormat::Json => print_json(&ErrorEnvelope::from_error(self.command, err)),
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => println!(
            r#"{{"ok": false, "engine": "{ENGINE_NAME}", "command": "", "error": {{"code": "INTERNAL", "message": "could not serialize output: {e}"}}}}"#
        ),
    }
}
