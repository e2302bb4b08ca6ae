// ── Committed inventory graph ──

use indexmap::IndexMap;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::model::{
    AdvancedSetting, AuthKeyPair, AvailabilityZone, CloudNetwork, CloudSubnet,
    CloudSubnetNetworkPort, CloudVolume, CloudVolumeType, Disk, EntityKind, Flavor, Hardware,
    NetworkPort, OperatingSystem, RowId, Template, Vm,
};

/// A committed entity with its assigned row id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<T> {
    pub id: RowId,
    pub entity: T,
}

/// Committed entities of one kind, keyed and ordered by registration key.
pub type Table<T> = IndexMap<String, Row<T>>;

/// A reference that named a key nothing was registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub from: EntityKind,
    pub from_key: String,
    pub target: EntityKind,
    pub key: String,
}

/// Per-kind entity counts of a committed graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub counts: IndexMap<EntityKind, usize>,
    pub unresolved: usize,
}

/// The result of a commit: every staged entity with its references bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryGraph {
    pub availability_zones: Table<AvailabilityZone>,
    pub templates: Table<Template>,
    pub flavors: Table<Flavor>,
    pub cloud_volume_types: Table<CloudVolumeType>,
    pub cloud_volumes: Table<CloudVolume>,
    pub vms: Table<Vm>,
    pub hardwares: Table<Hardware>,
    pub disks: Table<Disk>,
    pub operating_systems: Table<OperatingSystem>,
    pub advanced_settings: Table<AdvancedSetting>,
    pub cloud_networks: Table<CloudNetwork>,
    pub cloud_subnets: Table<CloudSubnet>,
    pub network_ports: Table<NetworkPort>,
    pub cloud_subnet_network_ports: Table<CloudSubnetNetworkPort>,
    pub auth_key_pairs: Table<AuthKeyPair>,
    pub(crate) unresolved: Vec<UnresolvedReference>,
}

impl InventoryGraph {
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::AvailabilityZone => self.availability_zones.len(),
            EntityKind::Template => self.templates.len(),
            EntityKind::Flavor => self.flavors.len(),
            EntityKind::CloudVolumeType => self.cloud_volume_types.len(),
            EntityKind::CloudVolume => self.cloud_volumes.len(),
            EntityKind::Vm => self.vms.len(),
            EntityKind::Hardware => self.hardwares.len(),
            EntityKind::Disk => self.disks.len(),
            EntityKind::OperatingSystem => self.operating_systems.len(),
            EntityKind::AdvancedSetting => self.advanced_settings.len(),
            EntityKind::CloudNetwork => self.cloud_networks.len(),
            EntityKind::CloudSubnet => self.cloud_subnets.len(),
            EntityKind::NetworkPort => self.network_ports.len(),
            EntityKind::CloudSubnetNetworkPort => self.cloud_subnet_network_ports.len(),
            EntityKind::AuthKeyPair => self.auth_key_pairs.len(),
        }
    }

    /// Total number of committed entities.
    pub fn len(&self) -> usize {
        EntityKind::iter().map(|kind| self.count(kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// References left unresolved at commit.
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            counts: EntityKind::iter()
                .map(|kind| (kind, self.count(kind)))
                .collect(),
            unresolved: self.unresolved.len(),
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn vm(&self, ems_ref: &str) -> Option<&Row<Vm>> {
        self.vms.get(ems_ref)
    }

    pub fn hardware_for(&self, vm_ref: &str) -> Option<&Row<Hardware>> {
        self.hardwares.get(vm_ref)
    }

    pub fn disks_for(&self, vm_ref: &str) -> Vec<&Row<Disk>> {
        self.disks
            .values()
            .filter(|row| row.entity.hardware.key == vm_ref)
            .collect()
    }

    /// Operating system of a VM or template.
    pub fn operating_system_for(&self, owner: EntityKind, key: &str) -> Option<&Row<OperatingSystem>> {
        self.operating_systems
            .values()
            .find(|row| row.entity.owner.kind == owner && row.entity.owner.key == key)
    }

    pub fn settings_for(&self, vm_ref: &str) -> Vec<&Row<AdvancedSetting>> {
        self.advanced_settings
            .values()
            .filter(|row| row.entity.resource.key == vm_ref)
            .collect()
    }

    pub fn ports_for_vm(&self, vm_ref: &str) -> Vec<&Row<NetworkPort>> {
        self.network_ports
            .values()
            .filter(|row| row.entity.device.as_ref().is_some_and(|d| d.key == vm_ref))
            .collect()
    }

    /// Subnet associations (addresses) of one port.
    pub fn associations_for_port(&self, port_ref: &str) -> Vec<&Row<CloudSubnetNetworkPort>> {
        self.cloud_subnet_network_ports
            .values()
            .filter(|row| {
                row.entity
                    .network_port
                    .as_ref()
                    .is_some_and(|p| p.key == port_ref)
            })
            .collect()
    }

    /// VMs a volume could be attached to: same availability zone, and an
    /// instance storage tier equal to the volume's type.
    pub fn available_vms(&self, volume_ref: &str) -> Vec<&Row<Vm>> {
        let Some(volume) = self.cloud_volumes.get(volume_ref) else {
            return Vec::new();
        };
        let volume = &volume.entity;
        self.vms
            .values()
            .filter(|row| {
                row.entity.availability_zone.key == volume.availability_zone.key
                    && row.entity.format == volume.volume_type
            })
            .collect()
    }
}
