//! VM command handlers.

use serde::Serialize;
use tabled::Tabled;

use pvs_core::{
    AdvancedSetting, Disk, EntityKind, Hardware, InventoryGraph, NetworkPort, OperatingSystem,
    Row, Vm,
};

use crate::cli::{GlobalOpts, OutputFormat, VmsArgs, VmsCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── Views ───────────────────────────────────────────────────────────

/// A VM joined with its hardware profile.
#[derive(Serialize)]
pub(crate) struct VmView<'a> {
    #[serde(flatten)]
    pub vm: &'a Row<Vm>,
    pub hardware: Option<&'a Row<Hardware>>,
}

impl<'a> VmView<'a> {
    pub(crate) fn new(graph: &'a InventoryGraph, vm: &'a Row<Vm>) -> Self {
        Self {
            vm,
            hardware: graph.hardware_for(&vm.entity.ems_ref.to_string()),
        }
    }
}

#[derive(Serialize)]
struct PortView<'a> {
    #[serde(flatten)]
    port: &'a Row<NetworkPort>,
    addresses: Vec<String>,
}

#[derive(Serialize)]
struct VmDetail<'a> {
    #[serde(flatten)]
    view: VmView<'a>,
    operating_system: Option<&'a Row<OperatingSystem>>,
    disks: Vec<&'a Row<Disk>>,
    ports: Vec<PortView<'a>>,
    settings: Vec<&'a Row<AdvancedSetting>>,
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct VmRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Flavor")]
    flavor: String,
    #[tabled(rename = "Cores")]
    cores: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory (MB)")]
    memory: String,
    #[tabled(rename = "OS")]
    os: String,
}

impl From<&VmView<'_>> for VmRow {
    fn from(v: &VmView<'_>) -> Self {
        let vm = &v.vm.entity;
        let hw = v.hardware.map(|row| &row.entity);
        Self {
            id: vm.ems_ref.to_string(),
            name: or_dash(vm.name.as_deref()),
            status: or_dash(vm.raw_power_state.as_deref()),
            flavor: or_dash(vm.flavor.as_ref().map(|f| f.key.as_str())),
            cores: or_dash(hw.and_then(|h| h.cpu_total_cores)),
            cpu: or_dash(hw.and_then(|h| h.cpu_type.as_deref())),
            memory: or_dash(hw.map(|h| h.memory_mb)),
            os: or_dash(hw.and_then(|h| h.guest_os)),
        }
    }
}

fn detail(d: &VmDetail<'_>) -> String {
    let vm = &d.view.vm.entity;
    let hw = d.view.hardware.map(|row| &row.entity);
    let mut lines = vec![
        format!("ID:       {}", vm.ems_ref),
        format!("Name:     {}", or_dash(vm.name.as_deref())),
        format!("Status:   {}", or_dash(vm.raw_power_state.as_deref())),
        format!("Flavor:   {}", or_dash(vm.flavor.as_ref().map(|f| f.key.as_str()))),
        format!("Storage:  {}", or_dash(vm.format.as_deref())),
        format!("Cores:    {}", or_dash(hw.and_then(|h| h.cpu_total_cores))),
        format!("CPU:      {}", or_dash(hw.and_then(|h| h.cpu_type.as_deref()))),
        format!("Memory:   {}", or_dash(hw.map(|h| format!("{} MB", h.memory_mb)))),
    ];
    if let Some(os) = d.operating_system {
        lines.push(format!(
            "OS:       {} {}",
            or_dash(os.entity.product_name),
            os.entity.version.as_deref().unwrap_or_default()
        ));
    }
    for disk in &d.disks {
        let disk = &disk.entity;
        lines.push(format!(
            "Disk:     {} ({}, {})",
            disk.location,
            or_dash(disk.device_name.as_deref()),
            or_dash(disk.device_type.as_deref())
        ));
    }
    for port in &d.ports {
        lines.push(format!(
            "Port:     {} [{}] {}",
            port.port.entity.name,
            or_dash(port.port.entity.mac_address.as_ref()),
            port.addresses.join(", ")
        ));
    }
    for setting in &d.settings {
        let setting = &setting.entity;
        lines.push(format!(
            "Setting:  {} = {}",
            setting.display_name,
            or_dash(setting.value.as_deref())
        ));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    graph: &InventoryGraph,
    args: VmsArgs,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VmsCommand::List => {
            let views: Vec<VmView<'_>> = graph
                .vms
                .values()
                .map(|vm| VmView::new(graph, vm))
                .collect();
            let out = output::render_list(format, &views, |v| VmRow::from(v), |v| {
                v.vm.entity.ems_ref.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VmsCommand::Get { id } => {
            let vm = graph.vm(&id).ok_or_else(|| CliError::NotFound {
                resource_type: "VM".into(),
                identifier: id.clone(),
                list_command: "vms list".into(),
            })?;

            let ports = graph
                .ports_for_vm(&id)
                .into_iter()
                .map(|port| PortView {
                    addresses: graph
                        .associations_for_port(&port.entity.ems_ref.to_string())
                        .iter()
                        .filter_map(|a| a.entity.address.clone())
                        .collect(),
                    port,
                })
                .collect();

            let d = VmDetail {
                view: VmView::new(graph, vm),
                operating_system: graph.operating_system_for(EntityKind::Vm, &id),
                disks: graph.disks_for(&id),
                ports,
                settings: graph.settings_for(&id),
            };
            let out = output::render_single(format, &d, detail, |d| {
                d.view.vm.entity.ems_ref.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
