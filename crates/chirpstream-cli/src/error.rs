//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use chirpstream_config::ConfigError;
use chirpstream_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not stream from the feed")]
    #[diagnostic(
        code(chirpstream::connection_failed),
        help(
            "Check that the relay is running and accessible.\n\
             Try: chirpstream watch --stream http://localhost:8080/api/stream"
        )
    )]
    ConnectionFailed {
        #[source]
        source: CoreError,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(chirpstream::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(chirpstream::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Or bypass the config file with --stream <URL>."
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error")]
    #[diagnostic(code(chirpstream::config))]
    Config(#[source] Box<ConfigError>),

    // ── Internal ─────────────────────────────────────────────────────

    #[error(transparent)]
    Core(CoreError),

    #[error("Could not render configuration: {0}")]
    #[diagnostic(code(chirpstream::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ProfileNotFound { .. } | Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error conversions ────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { .. } => CliError::ConnectionFailed { source: err },
            other => CliError::Core(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { profile } => CliError::ProfileNotFound {
                name: profile,
                available: String::new(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}
