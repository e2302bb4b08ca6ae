// ── Compute passes: images, flavors, instances ──
//
// The image pass fills the image-architecture index; the instance pass
// reads it for hardware profiles and fills the external-port index for
// the network pass.

use tracing::debug;

use pvs_api::{Image, PvmInstance, RecordSource, SystemPool};

use crate::convert::{
    architecture_tag, format_number, gigabytes_to_bytes, memory_gigabytes_to_megabytes, os_tag,
};
use crate::index::{ExternalPortIndex, ImageArchIndex};
use crate::model::compute::{LOCATION_UNKNOWN, VENDOR_IBM};
use crate::model::{
    AdvancedSetting, Disk, EntityId, EntityKind, Flavor, Hardware, OperatingSystem, Reference,
    Template, Vm,
};
use crate::store::StagingStore;

const VM_DESCRIPTION: &str = "PVM Instance";
const CONNECTION_STATE: &str = "connected";
const TEMPLATE_POWER_STATE: &str = "never";
const DISK_CONTROLLER: &str = "ibm";

// ── Images ─────────────────────────────────────────────────────────

pub(crate) fn images(
    source: &dyn RecordSource,
    store: &StagingStore,
    image_arch: &mut ImageArchIndex,
) -> Result<usize, pvs_api::Error> {
    let images = source.images()?;
    for image in &images {
        if let Some(arch) = architecture_tag(&image.specifications) {
            image_arch.record(&image.image_id, arch);
        }

        let template = store.register(build_template(image));
        store.register(OperatingSystem {
            owner: template,
            product_name: os_tag(image.specifications.operating_system.as_deref()),
            version: None,
        });
    }
    Ok(images.len())
}

pub(crate) fn build_template(image: &Image) -> Template {
    let id = EntityId::from(image.image_id.as_str());
    Template {
        uid_ems: id.clone(),
        ems_ref: id,
        name: image.name.clone(),
        description: image.description.clone(),
        location: LOCATION_UNKNOWN.into(),
        vendor: VENDOR_IBM.into(),
        raw_power_state: TEMPLATE_POWER_STATE.into(),
        template: true,
        storage_profile: image
            .storage_type
            .as_deref()
            .map(|tier| Reference::lazy(EntityKind::CloudVolumeType, tier)),
        format: image.storage_type.clone(),
    }
}

// ── Flavors ────────────────────────────────────────────────────────

pub(crate) fn flavors(
    source: &dyn RecordSource,
    store: &StagingStore,
) -> Result<usize, pvs_api::Error> {
    let pools = source.system_pools()?;
    for pool in &pools {
        store.register(build_flavor(pool));
    }
    Ok(pools.len())
}

pub(crate) fn build_flavor(pool: &SystemPool) -> Flavor {
    Flavor {
        ems_ref: EntityId::from(pool.system_type.as_str()),
        name: pool.system_type.clone(),
    }
}

// ── Instances ──────────────────────────────────────────────────────

pub(crate) fn instances(
    source: &dyn RecordSource,
    store: &StagingStore,
    zone: &Reference,
    image_arch: &ImageArchIndex,
    external_ports: &mut ExternalPortIndex,
) -> Result<usize, pvs_api::Error> {
    let instances = source.pvm_instances()?;
    for instance in &instances {
        let vm = store.register(build_vm(instance, zone));
        let hardware = store.register(build_hardware(instance, &vm, image_arch));
        register_disks(source, store, instance, &hardware)?;

        store.register(OperatingSystem {
            owner: vm.clone(),
            product_name: os_tag(instance.os_type.as_deref()),
            version: instance.operating_system.clone(),
        });

        collect_external_ports(instance, external_ports);

        for setting in build_advanced_settings(instance, &vm) {
            store.register(setting);
        }
    }
    Ok(instances.len())
}

pub(crate) fn build_vm(instance: &PvmInstance, zone: &Reference) -> Vm {
    let id = EntityId::from(instance.pvm_instance_id.as_str());
    Vm {
        uid_ems: id.clone(),
        ems_ref: id,
        name: instance.server_name.clone(),
        description: VM_DESCRIPTION.into(),
        location: LOCATION_UNKNOWN.into(),
        vendor: VENDOR_IBM.into(),
        connection_state: CONNECTION_STATE.into(),
        raw_power_state: instance.status.clone(),
        format: instance.storage_type.clone(),
        flavor: instance
            .sys_type
            .as_deref()
            .map(|sys_type| Reference::lazy(EntityKind::Flavor, sys_type)),
        availability_zone: zone.clone(),
    }
}

pub(crate) fn build_hardware(
    instance: &PvmInstance,
    vm: &Reference,
    image_arch: &ImageArchIndex,
) -> Hardware {
    let cpu_type = instance
        .image_id
        .as_deref()
        .and_then(|image_id| image_arch.architecture(image_id))
        .map(str::to_owned);
    if cpu_type.is_none() {
        debug!(
            vm = %instance.pvm_instance_id,
            image = ?instance.image_id,
            "image not seen, cpu type unknown"
        );
    }

    Hardware {
        vm: vm.clone(),
        cpu_total_cores: instance.virtual_cores.assigned,
        cpu_type,
        memory_mb: memory_gigabytes_to_megabytes(instance.memory),
        guest_os: os_tag(instance.os_type.as_deref()),
    }
}

/// One disk per attached volume, described from a point lookup of that volume.
fn register_disks(
    source: &dyn RecordSource,
    store: &StagingStore,
    instance: &PvmInstance,
    hardware: &Reference,
) -> Result<(), pvs_api::Error> {
    for volume_id in instance.volume_ids.iter().flatten() {
        let volume = source.volume(volume_id)?;
        if volume.is_none() {
            debug!(vm = %instance.pvm_instance_id, volume_id = %volume_id, "attached volume not found");
        }
        let volume = volume.as_ref();

        store.register(Disk {
            hardware: hardware.clone(),
            device_name: volume.and_then(|v| v.name.clone()),
            device_type: volume.and_then(|v| v.disk_type.clone()),
            controller_type: DISK_CONTROLLER.into(),
            backing: Reference::lazy(EntityKind::CloudVolume, volume_id.as_str()),
            location: volume_id.clone(),
            size: volume.and_then(|v| v.size).map(gigabytes_to_bytes),
        });
    }
    Ok(())
}

/// Record every attachment with an external IP under its network id.
pub(crate) fn collect_external_ports(instance: &PvmInstance, external_ports: &mut ExternalPortIndex) {
    for attachment in instance.networks.iter().flatten() {
        if attachment.external_ip().is_none() {
            continue;
        }
        let Some(network_id) = attachment.network_id.as_deref() else {
            debug!(vm = %instance.pvm_instance_id, "external IP without network id");
            continue;
        };
        external_ports.push(network_id, attachment.clone());
    }
}

pub(crate) fn build_advanced_settings(instance: &PvmInstance, vm: &Reference) -> [AdvancedSetting; 2] {
    [
        AdvancedSetting {
            resource: vm.clone(),
            name: "entitled_processors".into(),
            display_name: "Entitled Processors".into(),
            description: "The number of entitled processors assigned to the VM".into(),
            value: format_number(instance.processors),
            read_only: true,
        },
        AdvancedSetting {
            resource: vm.clone(),
            name: "processor_type".into(),
            display_name: "Processor type".into(),
            description: "dedicated: Dedicated, shared: Uncapped shared, capped: Capped shared"
                .into(),
            value: instance.proc_type.clone(),
            read_only: true,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instance(raw: serde_json::Value) -> PvmInstance {
        serde_json::from_value(raw).unwrap()
    }

    fn zone() -> Reference {
        Reference::lazy(EntityKind::AvailabilityZone, "ws1")
    }

    #[test]
    fn vm_references_flavor_by_system_type() {
        let vm = build_vm(
            &instance(json!({
                "pvmInstanceID": "vm1",
                "serverName": "web-1",
                "sysType": "s922",
                "status": "ACTIVE",
                "storageType": "tier1",
                "virtualCores": { "assigned": 2 },
                "memory": 4
            })),
            &zone(),
        );
        assert_eq!(vm.flavor, Some(Reference::lazy(EntityKind::Flavor, "s922")));
        assert_eq!(vm.availability_zone, zone());
        assert_eq!(vm.raw_power_state.as_deref(), Some("ACTIVE"));
        assert_eq!(vm.format.as_deref(), Some("tier1"));
        assert_eq!(vm.connection_state, "connected");
    }

    #[test]
    fn hardware_takes_architecture_from_index() {
        let mut arch = ImageArchIndex::new();
        arch.record("img1", "ppc64le");
        let vm = Reference::lazy(EntityKind::Vm, "vm1");

        let hw = build_hardware(
            &instance(json!({
                "pvmInstanceID": "vm1",
                "imageID": "img1",
                "virtualCores": { "assigned": 2 },
                "memory": 4,
                "osType": "redhat"
            })),
            &vm,
            &arch,
        );
        assert_eq!(hw.cpu_total_cores, Some(2));
        assert_eq!(hw.cpu_type.as_deref(), Some("ppc64le"));
        assert_eq!(hw.memory_mb, 4096);
        assert_eq!(hw.guest_os, Some(crate::model::OsTag::LinuxRedhat));
    }

    #[test]
    fn hardware_architecture_absent_for_unseen_image() {
        let hw = build_hardware(
            &instance(json!({
                "pvmInstanceID": "vm1",
                "imageID": "img9",
                "virtualCores": {},
                "memory": 0.5
            })),
            &Reference::lazy(EntityKind::Vm, "vm1"),
            &ImageArchIndex::new(),
        );
        assert_eq!(hw.cpu_type, None);
        assert_eq!(hw.cpu_total_cores, None);
        assert_eq!(hw.memory_mb, 512);
    }

    #[test]
    fn only_attachments_with_external_ip_are_indexed() {
        let mut ports = ExternalPortIndex::new();
        collect_external_ports(
            &instance(json!({
                "pvmInstanceID": "vm1",
                "virtualCores": {},
                "memory": 1,
                "networks": [
                    { "networkID": "n1", "externalIP": "1.2.3.4", "macAddress": "aa:bb" },
                    { "networkID": "n1", "externalIP": "" },
                    { "networkID": "n2" },
                    { "externalIP": "9.9.9.9" }
                ]
            })),
            &mut ports,
        );
        assert_eq!(ports.len(), 1);
        assert_eq!(ports.get("n1")[0].external_ip(), Some("1.2.3.4"));
        assert!(ports.get("n2").is_empty());
    }

    #[test]
    fn advanced_settings_are_fixed_and_read_only() {
        let settings = build_advanced_settings(
            &instance(json!({
                "pvmInstanceID": "vm1",
                "virtualCores": {},
                "memory": 1,
                "processors": 0.5,
                "procType": "shared"
            })),
            &Reference::lazy(EntityKind::Vm, "vm1"),
        );
        assert_eq!(settings[0].name, "entitled_processors");
        assert_eq!(settings[0].value.as_deref(), Some("0.5"));
        assert_eq!(settings[1].name, "processor_type");
        assert_eq!(settings[1].display_name, "Processor type");
        assert_eq!(settings[1].value.as_deref(), Some("shared"));
        assert!(settings.iter().all(|s| s.read_only));
    }

    #[test]
    fn template_defers_storage_profile() {
        let image: Image = serde_json::from_value(json!({
            "imageID": "img1",
            "name": "RHEL 9",
            "storageType": "tier3",
            "specifications": {}
        }))
        .unwrap();
        let t = build_template(&image);
        assert_eq!(
            t.storage_profile,
            Some(Reference::lazy(EntityKind::CloudVolumeType, "tier3"))
        );
        assert!(t.template);
        assert_eq!(t.raw_power_state, "never");
    }
}
