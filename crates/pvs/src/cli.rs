//! Clap derive structures for the `pvs` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pvs -- inventory graphs for IBM Power Virtual Server workspaces
#[derive(Debug, Parser)]
#[command(
    name = "pvs",
    version,
    about = "Build and inspect the inventory graph of a Power Virtual Server workspace",
    long_about = "Builds a normalized inventory graph (VMs, hardware, disks, volumes,\n\
        networks, ports) from a captured record snapshot of one PowerVS\n\
        workspace, and renders it for inspection.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Workspace profile to use
    #[arg(long, short = 'p', env = "PVS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PVS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Record snapshot to build from (overrides the profile's snapshot)
    #[arg(long, short = 's', env = "PVS_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Output format (defaults to the configured output)
    #[arg(long, short = 'o', env = "PVS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the inventory graph and show per-kind counts
    Refresh,

    /// Inspect virtual machines
    #[command(alias = "vm")]
    Vms(VmsArgs),

    /// Inspect block-storage volumes
    #[command(alias = "vol")]
    Volumes(VolumesArgs),

    /// List references that did not resolve at commit
    Unresolved,

    /// Dump the whole committed graph
    Export,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── VMs ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VmsArgs {
    #[command(subcommand)]
    pub command: VmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VmsCommand {
    /// List VMs with their hardware profile
    #[command(alias = "ls")]
    List,

    /// Show one VM with its disks, ports and settings
    Get {
        /// PVM instance id
        id: String,
    },
}

// ── Volumes ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VolumesArgs {
    #[command(subcommand)]
    pub command: VolumesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VolumesCommand {
    /// List volumes
    #[command(alias = "ls")]
    List,

    /// List VMs a volume could be attached to
    Attachable {
        /// Volume id
        id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
