//! CLI-side configuration: `GlobalOpts`-aware wrappers over `pvs-config`.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use pvs_config::{Config, ConfigError};
use pvs_core::ProviderConnection;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// What a graph-building command needs from configuration.
#[derive(Debug)]
pub struct Workspace {
    pub connection: ProviderConnection,
    pub snapshot: PathBuf,
}

/// The config file in effect: `--config` or the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(pvs_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(pvs_config::load_config_from(&config_file(global))?)
}

/// `--output` if given, otherwise the configured default.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.defaults.output, true).map_err(|reason| CliError::Validation {
        field: "defaults.output".into(),
        reason,
    })
}

/// Resolve the selected profile into a connection and a snapshot path.
///
/// A relative snapshot path from the profile is taken relative to the
/// config file's directory; `--snapshot` is used as given.
pub fn resolve_workspace(global: &GlobalOpts, cfg: &Config) -> Result<Workspace, CliError> {
    let path = config_file(global);
    let (name, profile) = cfg
        .profile(global.profile.as_deref())
        .map_err(|err| match err {
            ConfigError::NoProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: available_profiles(cfg),
                path: path.display().to_string(),
            },
            other => other.into(),
        })?;

    let connection = pvs_config::profile_to_connection(profile, name)?;

    let snapshot = match (&global.snapshot, &profile.snapshot) {
        (Some(flag), _) => flag.clone(),
        (None, Some(configured)) => relative_to(&path, configured),
        (None, None) => {
            return Err(CliError::NoSnapshot {
                profile: name.into(),
            });
        }
    };

    Ok(Workspace {
        connection,
        snapshot,
    })
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn relative_to(config_file: &Path, snapshot: &Path) -> PathBuf {
    match config_file.parent() {
        Some(dir) if snapshot.is_relative() => dir.join(snapshot),
        _ => snapshot.to_path_buf(),
    }
}
