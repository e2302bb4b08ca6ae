//! Command dispatch: snapshot -> refresh -> committed graph -> output.

pub mod config_cmd;
pub mod graph;
pub mod vms;
pub mod volumes;

use tracing::debug;

use pvs_api::SnapshotSource;
use pvs_config::Config;
use pvs_core::{InventoryGraph, InventoryRefresh, StagingStore};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;

/// Load the selected workspace's snapshot and build its graph.
pub fn build_graph(global: &GlobalOpts, cfg: &Config) -> Result<InventoryGraph, CliError> {
    let workspace = config::resolve_workspace(global, cfg)?;
    debug!(
        connection = %workspace.connection.name,
        snapshot = %workspace.snapshot.display(),
        "loading record snapshot"
    );

    let source = SnapshotSource::from_path(&workspace.snapshot)?;
    let store = StagingStore::new();
    Ok(InventoryRefresh::new(workspace.connection).run(&source, &store)?)
}

/// Dispatch a graph-bound command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    graph: &InventoryGraph,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Refresh => graph::summary(graph, format, global),
        Command::Unresolved => graph::unresolved(graph, format, global),
        Command::Export => graph::export(graph, format, global),
        Command::Vms(args) => vms::handle(graph, args, format, global),
        Command::Volumes(args) => volumes::handle(graph, args, format, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
