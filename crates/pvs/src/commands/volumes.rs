//! Volume command handlers.

use tabled::Tabled;

use pvs_core::convert::BYTES_PER_GIGABYTE;
use pvs_core::{CloudVolume, InventoryGraph, Row};

use crate::cli::{GlobalOpts, OutputFormat, VolumesArgs, VolumesCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::vms::{VmRow, VmView};

#[derive(Tabled)]
struct VolumeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Type")]
    volume_type: String,
    #[tabled(rename = "Size (GB)")]
    size: String,
    #[tabled(rename = "Shareable")]
    shareable: String,
    #[tabled(rename = "Bootable")]
    bootable: String,
}

impl From<&&Row<CloudVolume>> for VolumeRow {
    fn from(row: &&Row<CloudVolume>) -> Self {
        let v = &row.entity;
        Self {
            id: v.ems_ref.to_string(),
            name: or_dash(v.name.as_deref()),
            status: or_dash(v.status.as_deref()),
            volume_type: or_dash(v.volume_type.as_deref()),
            size: or_dash(v.size.map(gigabytes)),
            shareable: or_dash(v.multi_attachment),
            bootable: or_dash(v.bootable),
        }
    }
}

/// Byte count as gigabytes with up to two decimals (`0.5`, `20`).
#[allow(clippy::cast_precision_loss)]
fn gigabytes(bytes: u64) -> String {
    let text = format!("{:.2}", bytes as f64 / BYTES_PER_GIGABYTE as f64);
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

pub fn handle(
    graph: &InventoryGraph,
    args: VolumesArgs,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VolumesCommand::List => {
            let volumes: Vec<&Row<CloudVolume>> = graph.cloud_volumes.values().collect();
            let out = output::render_list(format, &volumes, |v| VolumeRow::from(v), |v| {
                v.entity.ems_ref.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VolumesCommand::Attachable { id } => {
            if !graph.cloud_volumes.contains_key(&id) {
                return Err(CliError::NotFound {
                    resource_type: "volume".into(),
                    identifier: id,
                    list_command: "volumes list".into(),
                });
            }

            let views: Vec<VmView<'_>> = graph
                .available_vms(&id)
                .into_iter()
                .map(|vm| VmView::new(graph, vm))
                .collect();
            let out = output::render_list(format, &views, |v| VmRow::from(v), |v| {
                v.vm.entity.ems_ref.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_keep_fractional_gigabytes() {
        assert_eq!(gigabytes(BYTES_PER_GIGABYTE / 2), "0.5");
        assert_eq!(gigabytes(0), "0");
        assert_eq!(gigabytes(20 * BYTES_PER_GIGABYTE), "20");
        assert_eq!(gigabytes(BYTES_PER_GIGABYTE + BYTES_PER_GIGABYTE / 4), "1.25");
    }
}
