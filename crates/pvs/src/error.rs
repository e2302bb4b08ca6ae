//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError` and snapshot errors into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pvs_config::ConfigError;
use pvs_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const SOURCE: i32 = 7;
    pub const DATA: i32 = 65;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Record source ────────────────────────────────────────────────
    #[error("Could not read record snapshot {path}")]
    #[diagnostic(
        code(pvs::snapshot_unreadable),
        help("Check the path given with --snapshot or the profile's `snapshot` setting.")
    )]
    SnapshotUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No record snapshot selected for profile '{profile}'")]
    #[diagnostic(
        code(pvs::no_snapshot),
        help(
            "Pass one with --snapshot FILE (or PVS_SNAPSHOT),\n\
             or set `snapshot` under [profiles.{profile}] in the config file."
        )
    )]
    NoSnapshot { profile: String },

    #[error("Record source failed during the {pass} pass: {message}")]
    #[diagnostic(code(pvs::source_failed))]
    SourceFailed { pass: String, message: String },

    #[error("Malformed record in {context}: {message}")]
    #[diagnostic(
        code(pvs::malformed_record),
        help("The snapshot does not match the provider's record shape.")
    )]
    MalformedRecord { context: String, message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(pvs::not_found),
        help("Run: pvs {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pvs::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(pvs::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Add one under [profiles.<name>] in: {path}"
        )
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("Configuration could not be loaded: {message}")]
    #[diagnostic(code(pvs::config))]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON output: {0}")]
    #[diagnostic(code(pvs::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML output: {0}")]
    #[diagnostic(code(pvs::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SnapshotUnreadable { .. } | Self::SourceFailed { .. } => exit_code::SOURCE,
            Self::MalformedRecord { .. } => exit_code::DATA,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoSnapshot { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── Layer mappings ───────────────────────────────────────────────────

impl From<pvs_api::Error> for CliError {
    fn from(err: pvs_api::Error) -> Self {
        match err {
            pvs_api::Error::Io { path, source } => CliError::SnapshotUnreadable {
                path: path.display().to_string(),
                source,
            },
            pvs_api::Error::Deserialization { message, context } => {
                CliError::MalformedRecord { context, message }
            }
            pvs_api::Error::Request { resource, message } => CliError::SourceFailed {
                pass: resource,
                message,
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Source { pass, source } => CliError::SourceFailed {
                pass: pass.to_string(),
                message: source.to_string(),
            },
            CoreError::MalformedRecord { pass, source } => match CliError::from(source) {
                malformed @ CliError::MalformedRecord { .. } => malformed,
                other => CliError::SourceFailed {
                    pass: pass.to_string(),
                    message: other.to_string(),
                },
            },
            CoreError::Config { message } => CliError::Validation {
                field: "profile".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: "(none)".into(),
                path: pvs_config::config_path().display().to_string(),
            },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
