//! Whole-graph commands: refresh summary, unresolved references, export.

use tabled::Tabled;

use pvs_core::{GraphSummary, InventoryGraph, UnresolvedReference};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct UnresolvedRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Key")]
    from_key: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Missing Key")]
    key: String,
}

impl From<&UnresolvedReference> for UnresolvedRow {
    fn from(r: &UnresolvedReference) -> Self {
        Self {
            from: r.from.to_string(),
            from_key: r.from_key.clone(),
            target: r.target.to_string(),
            key: r.key.clone(),
        }
    }
}

fn summary_detail(summary: &GraphSummary) -> String {
    let rows: Vec<CountRow> = summary
        .counts
        .iter()
        .map(|(kind, count)| CountRow {
            kind: kind.to_string(),
            count: *count,
        })
        .collect();
    format!(
        "{}\nUnresolved references: {}",
        output::render_table(&rows),
        summary.unresolved
    )
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn summary(
    graph: &InventoryGraph,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = output::render_single(format, &graph.summary(), summary_detail, |s| {
        s.counts
            .iter()
            .map(|(kind, count)| format!("{kind}\t{count}"))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn unresolved(
    graph: &InventoryGraph,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = output::render_list(format, graph.unresolved(), |r| UnresolvedRow::from(r), |r| {
        format!("{}:{} -> {}:{}", r.from, r.from_key, r.target, r.key)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// The full graph; table and plain output fall back to pretty JSON.
pub fn export(
    graph: &InventoryGraph,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match format {
        OutputFormat::Yaml => output::render_yaml(graph)?,
        OutputFormat::JsonCompact => output::render_json(graph, true)?,
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Plain => {
            output::render_json(graph, false)?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
