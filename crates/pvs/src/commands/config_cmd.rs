//! Config subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use pvs_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Serialize)]
struct ProfileEntry<'a> {
    profile: &'a str,
    default: bool,
    #[serde(flatten)]
    settings: &'a Profile,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Workspace")]
    workspace: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Snapshot")]
    snapshot: String,
}

impl From<&ProfileEntry<'_>> for ProfileRow {
    fn from(e: &ProfileEntry<'_>) -> Self {
        Self {
            name: e.profile.to_owned(),
            default: if e.default { "*".into() } else { String::new() },
            workspace: e.settings.cloud_instance_id.clone(),
            region: or_dash(e.settings.region.as_deref()),
            snapshot: or_dash(e.settings.snapshot.as_ref().map(|p| p.display())),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

/// `cfg` is the load result rather than a loaded config so that
/// `config path` still works when the file is broken.
pub fn handle(
    args: ConfigArgs,
    global: &GlobalOpts,
    cfg: Result<Config, CliError>,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_file(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = cfg?;
            let format = config::output_format(global, &cfg)?;
            let toml = cfg.to_toml()?;
            let out = output::render_single(format, &cfg, |_| toml.clone(), |_| {
                config::config_file(global).display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = cfg?;
            let format = config::output_format(global, &cfg)?;
            if cfg.profiles.is_empty() {
                eprintln!(
                    "No profiles configured. Add one under [profiles.<name>] in: {}",
                    config::config_file(global).display()
                );
                return Ok(());
            }

            let default = cfg.default_profile.as_deref().unwrap_or("default");
            let entries: Vec<ProfileEntry<'_>> = cfg
                .profiles
                .iter()
                .map(|(name, settings)| ProfileEntry {
                    profile: name,
                    default: name == default,
                    settings,
                })
                .collect();
            let out = output::render_list(format, &entries, |e| ProfileRow::from(e), |e| {
                e.profile.to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
