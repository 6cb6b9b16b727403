//! Shared CLI plumbing: error type, exit codes, and service construction.

use crate::config::Config;
use crate::models::{GroupKind, PointCategory};
use crate::parser::ManifestLayout;
use crate::services::{AppService, FileStore};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Input was rejected (bad name, out-of-range point, unknown app, ...)
    ValidationError = 1,
    /// A file, store, or archive could not be read or written
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process should terminate with
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Creates a validation error (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Creates an I/O error (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Formats an `anyhow` error with its full context chain.
pub fn describe(err: &anyhow::Error) -> String {
    format!("{err:#}")
}

impl From<anyhow::Error> for CliError {
    /// File-system and archive failures map to I/O; everything else is a
    /// rejected input.
    fn from(err: anyhow::Error) -> Self {
        let is_io = err.chain().any(|cause| {
            cause.is::<std::io::Error>()
                || cause.is::<zip::result::ZipError>()
                || cause.is::<serde_json::Error>()
        });

        if is_io {
            Self::io(describe(&err))
        } else {
            Self::validation(describe(&err))
        }
    }
}

/// Loads the configuration, mapping failures to a validation error.
pub fn load_config() -> CliResult<Config> {
    Config::load()
        .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Opens the app service over the configured store directory.
pub fn open_service(config: &Config) -> CliResult<AppService<FileStore>> {
    let store_dir = config
        .store_dir()
        .map_err(|e| CliError::io(format!("Failed to resolve store directory: {e:#}")))?;
    tracing::debug!(store = %store_dir.display(), "Opening app store");
    Ok(AppService::new(FileStore::new(store_dir)))
}

/// Parses a command-line value, reporting failures as validation errors.
fn parse_value<T>(value: &str) -> CliResult<T>
where
    T: FromStr<Err = anyhow::Error>,
{
    value
        .parse()
        .map_err(|e: anyhow::Error| CliError::validation(e.to_string()))
}

/// Parses a `--category` value.
pub fn parse_category(value: &str) -> CliResult<PointCategory> {
    parse_value(value)
}

/// Parses a `--kind` value.
pub fn parse_group_kind(value: &str) -> CliResult<GroupKind> {
    parse_value(value)
}

/// Parses a `--layout` value.
pub fn parse_layout(value: &str) -> CliResult<ManifestLayout> {
    parse_value(value)
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize output to JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
