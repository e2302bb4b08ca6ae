//! Configuration for the `pvs` inventory tool.
//!
//! TOML profiles, one per PowerVS workspace, layered under `PVS_`
//! environment overrides, and translation of the selected profile into a
//! `pvs_core::ProviderConnection`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pvs_core::ProviderConnection;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' is configured")]
    NoProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

const OUTPUT_FORMATS: [&str; 5] = ["table", "json", "json-compact", "yaml", "plain"];
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is selected on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named workspace profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            log_level: default_log_level(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_log_level() -> String {
    "warn".into()
}

/// One PowerVS workspace.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Display name of the workspace. Defaults to the profile key.
    pub name: Option<String>,

    /// Cloud instance (workspace) id.
    pub cloud_instance_id: String,

    /// Region the workspace lives in (e.g. "dal10").
    pub region: Option<String>,

    /// Record snapshot to refresh from when none is given on the command line.
    pub snapshot: Option<PathBuf>,
}

impl Config {
    /// Check value constraints the TOML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !OUTPUT_FORMATS.contains(&self.defaults.output.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    OUTPUT_FORMATS.join(", "),
                    self.defaults.output
                ),
            });
        }
        if !LOG_LEVELS.contains(&self.defaults.log_level.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.log_level".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.defaults.log_level
                ),
            });
        }
        for (name, profile) in &self.profiles {
            if profile.cloud_instance_id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("profiles.{name}.cloud_instance_id"),
                    reason: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    /// Select a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .ok_or_else(|| ConfigError::NoProfile {
                profile: "<none>".into(),
            })?;
        self.profiles
            .get_key_value(name)
            .map(|(key, profile)| (key.as_str(), profile))
            .ok_or_else(|| ConfigError::NoProfile {
                profile: name.into(),
            })
    }

    /// Serialize the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "pvs", "pvs").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pvs");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the platform config file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and environment still apply.
/// Nested keys are addressed with a double underscore in the environment
/// (`PVS_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PVS_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Profile translation ─────────────────────────────────────────────

/// Build the core connection identity from a profile.
pub fn profile_to_connection(
    profile: &Profile,
    profile_name: &str,
) -> Result<ProviderConnection, ConfigError> {
    let name = profile.name.as_deref().unwrap_or(profile_name);
    ProviderConnection::new(name, profile.cloud_instance_id.trim()).map_err(|e| {
        ConfigError::Validation {
            field: format!("profiles.{profile_name}"),
            reason: e.to_string(),
        }
    })
}
