// ── Compute domain types ──
//
// VMs and templates together with the records they own: hardware profile,
// disks, operating system and advanced settings. Flavors (host system
// types) live here too since only VMs reference them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;
use super::reference::Reference;

pub const VENDOR_IBM: &str = "ibm";
pub const LOCATION_UNKNOWN: &str = "unknown";

/// Normalized operating system tag.
///
/// Produced from the provider's short OS keys by
/// [`os_tag`](crate::convert::os_tag); keys outside the table have no tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OsTag {
    UnixAix,
    IbmI,
    LinuxRedhat,
    LinuxSuse,
}

/// Boot image, stored as a VM template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub uid_ems: EntityId,
    pub ems_ref: EntityId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: String,
    pub vendor: String,
    pub raw_power_state: String,
    pub template: bool,
    /// Storage class the image lives on, when the image names one.
    pub storage_profile: Option<Reference>,
    pub format: Option<String>,
}

/// Host system type a VM runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flavor {
    pub ems_ref: EntityId,
    pub name: String,
}

/// PVM instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vm {
    pub uid_ems: EntityId,
    pub ems_ref: EntityId,
    pub name: Option<String>,
    pub description: String,
    pub location: String,
    pub vendor: String,
    pub connection_state: String,
    pub raw_power_state: Option<String>,
    /// Storage tier of the instance; matched against volume types.
    pub format: Option<String>,
    /// System type the instance runs on, when the instance names one.
    pub flavor: Option<Reference>,
    pub availability_zone: Reference,
}

/// Hardware profile, one per VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    pub vm: Reference,
    pub cpu_total_cores: Option<u32>,
    /// Architecture of the VM's boot image, when that image was seen.
    pub cpu_type: Option<String>,
    pub memory_mb: u64,
    pub guest_os: Option<OsTag>,
}

/// Disk attached to a VM's hardware, backed by a cloud volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub hardware: Reference,
    pub device_name: Option<String>,
    pub device_type: Option<String>,
    pub controller_type: String,
    pub backing: Reference,
    /// Volume id.
    pub location: String,
    pub size: Option<u64>,
}

/// Operating system of a VM or template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingSystem {
    pub owner: Reference,
    pub product_name: Option<OsTag>,
    pub version: Option<String>,
}

/// Read-only key/value setting shown alongside a VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSetting {
    pub resource: Reference,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub value: Option<String>,
    pub read_only: bool,
}
