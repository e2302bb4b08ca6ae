#![allow(clippy::unwrap_used)]
// End-to-end refresh tests over a captured workspace snapshot.

use pretty_assertions::assert_eq;
use serde_json::json;

use pvs_api::{
    Error, Image, Network, NetworkPort, PvmInstance, RecordSource, SnapshotSource, SshKey,
    StorageType, SystemPool, Volume,
};
use pvs_core::{
    CoreError, EntityKind, InventoryRefresh, OsTag, Pass, ProviderConnection, Resolution,
    StagingStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

const WORKSPACE: &str = include_str!("fixtures/workspace.json");

fn snapshot() -> SnapshotSource {
    SnapshotSource::from_json("workspace.json", WORKSPACE).unwrap()
}

fn refresh() -> InventoryRefresh {
    InventoryRefresh::new(ProviderConnection::new("dal10", "ws1").unwrap())
}

/// Delegates to a snapshot but fails one listing.
struct FailingSource {
    inner: SnapshotSource,
    fail: Pass,
}

impl FailingSource {
    fn check(&self, pass: Pass) -> Result<(), Error> {
        if pass == self.fail {
            return Err(Error::Request {
                resource: pass.to_string(),
                message: "connection reset".into(),
            });
        }
        Ok(())
    }
}

impl RecordSource for FailingSource {
    fn images(&self) -> Result<Vec<Image>, Error> {
        self.check(Pass::Images)?;
        self.inner.images()
    }
    fn system_pools(&self) -> Result<Vec<SystemPool>, Error> {
        self.check(Pass::Flavors)?;
        self.inner.system_pools()
    }
    fn storage_types(&self) -> Result<Vec<StorageType>, Error> {
        self.check(Pass::StorageClasses)?;
        self.inner.storage_types()
    }
    fn volumes(&self) -> Result<Vec<Volume>, Error> {
        self.check(Pass::Volumes)?;
        self.inner.volumes()
    }
    fn volume(&self, volume_id: &str) -> Result<Option<Volume>, Error> {
        self.inner.volume(volume_id)
    }
    fn pvm_instances(&self) -> Result<Vec<PvmInstance>, Error> {
        self.check(Pass::Instances)?;
        self.inner.pvm_instances()
    }
    fn networks(&self) -> Result<Vec<Network>, Error> {
        self.check(Pass::Networks)?;
        self.inner.networks()
    }
    fn ports(&self, network_id: &str) -> Result<Vec<NetworkPort>, Error> {
        self.inner.ports(network_id)
    }
    fn ssh_keys(&self) -> Result<Vec<SshKey>, Error> {
        self.check(Pass::SshKeys)?;
        self.inner.ssh_keys()
    }
}

// ── Full workspace ──────────────────────────────────────────────────

#[test]
fn test_entity_counts() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let counts: Vec<(EntityKind, usize)> = graph.summary().counts.into_iter().collect();
    assert_eq!(
        counts,
        vec![
            (EntityKind::AvailabilityZone, 1),
            (EntityKind::Template, 2),
            (EntityKind::Flavor, 2),
            (EntityKind::CloudVolumeType, 2),
            (EntityKind::CloudVolume, 2),
            (EntityKind::Vm, 2),
            (EntityKind::Hardware, 2),
            (EntityKind::Disk, 3),
            (EntityKind::OperatingSystem, 4),
            (EntityKind::AdvancedSetting, 4),
            (EntityKind::CloudNetwork, 2),
            (EntityKind::CloudSubnet, 2),
            (EntityKind::NetworkPort, 3),
            (EntityKind::CloudSubnetNetworkPort, 4),
            (EntityKind::AuthKeyPair, 1),
        ]
    );
    assert_eq!(graph.len(), 36);
}

#[test]
fn test_image_architecture_and_os() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let template = &graph.templates["img1"].entity;
    assert!(template.template);
    assert_eq!(template.vendor, "ibm");
    assert!(template.storage_profile.as_ref().unwrap().is_resolved());

    let os = graph
        .operating_system_for(EntityKind::Template, "img1")
        .unwrap();
    assert_eq!(os.entity.product_name, Some(OsTag::LinuxRedhat));

    let hardware = &graph.hardware_for("vm1").unwrap().entity;
    assert_eq!(hardware.cpu_total_cores, Some(2));
    assert_eq!(hardware.cpu_type.as_deref(), Some("ppc64le"));
    assert_eq!(hardware.memory_mb, 4096);
    assert_eq!(hardware.guest_os, Some(OsTag::LinuxRedhat));
}

#[test]
fn test_instance_with_unseen_image_has_no_cpu_type() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let hardware = &graph.hardware_for("vm2").unwrap().entity;
    assert_eq!(hardware.cpu_type, None);
    assert_eq!(hardware.cpu_total_cores, Some(4));
    assert_eq!(hardware.guest_os, Some(OsTag::UnixAix));
}

#[test]
fn test_vm_links() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let vm = graph.vm("vm1").unwrap();
    assert_eq!(vm.entity.name.as_deref(), Some("web-1"));
    assert_eq!(
        vm.entity.flavor.as_ref().unwrap().target,
        Resolution::Resolved(graph.flavors["s922"].id)
    );
    assert_eq!(
        vm.entity.availability_zone.target,
        Resolution::Resolved(graph.availability_zones["ws1"].id)
    );

    let os = graph.operating_system_for(EntityKind::Vm, "vm1").unwrap();
    assert_eq!(os.entity.version.as_deref(), Some("RHEL 9.2"));

    let settings: Vec<(&str, Option<&str>)> = graph
        .settings_for("vm1")
        .iter()
        .map(|row| (row.entity.name.as_str(), row.entity.value.as_deref()))
        .collect();
    assert_eq!(
        settings,
        vec![
            ("entitled_processors", Some("0.5")),
            ("processor_type", Some("shared")),
        ]
    );
}

#[test]
fn test_disks_from_volume_lookups() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let disks = graph.disks_for("vm1");
    assert_eq!(disks.len(), 2);

    let boot = &disks[0].entity;
    assert_eq!(boot.location, "vol1");
    assert_eq!(boot.device_name.as_deref(), Some("web-1-boot"));
    assert_eq!(boot.device_type.as_deref(), Some("tier1"));
    assert_eq!(boot.controller_type, "ibm");
    assert_eq!(boot.size, Some(21_474_836_480));
    assert_eq!(
        boot.backing.target,
        Resolution::Resolved(graph.cloud_volumes["vol1"].id)
    );

    // Attached volume that the provider no longer lists.
    let missing = &disks[1].entity;
    assert_eq!(missing.location, "vol9");
    assert_eq!(missing.device_name, None);
    assert_eq!(missing.size, None);
    assert_eq!(missing.backing.target, Resolution::Unresolved);
}

#[test]
fn test_only_dangling_volume_is_unresolved() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let unresolved = graph.unresolved();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].from, EntityKind::Disk);
    assert_eq!(unresolved[0].from_key, "vm1/vol9");
    assert_eq!(unresolved[0].target, EntityKind::CloudVolume);
    assert_eq!(unresolved[0].key, "vol9");
}

#[test]
fn test_inactive_storage_type_is_dropped() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let names: Vec<&str> = graph.cloud_volume_types.keys().map(String::as_str).collect();
    assert_eq!(names, ["tier1", "tier3"]);
}

#[test]
fn test_volume_conversion() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let volume = &graph.cloud_volumes["vol2"].entity;
    assert_eq!(volume.size, Some(10_737_418_240));
    assert_eq!(volume.volume_type.as_deref(), Some("tier3"));
    assert_eq!(volume.multi_attachment, Some(true));
    assert_eq!(volume.creation_time, None);
    assert!(volume.availability_zone.is_resolved());
}

// ── Networking ──────────────────────────────────────────────────────

#[test]
fn test_port_has_internal_and_external_addresses() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let ports = graph.ports_for_vm("vm1");
    assert_eq!(ports.len(), 1);
    let port = &ports[0].entity;
    assert_eq!(port.name, "p1");
    assert_eq!(port.device_ref.as_deref(), Some("vm1"));
    assert_eq!(
        port.device.as_ref().unwrap().target,
        Resolution::Resolved(graph.vms["vm1"].id)
    );

    let addresses: Vec<&str> = graph
        .associations_for_port("p1")
        .iter()
        .filter_map(|row| row.entity.address.as_deref())
        .collect();
    assert_eq!(addresses, ["1.2.3.4", "10.0.0.5"]);
    assert!(
        graph
            .associations_for_port("p1")
            .iter()
            .all(|row| row.entity.cloud_subnet.key == "n1")
    );
}

#[test]
fn test_blank_external_ip_creates_no_association() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let addresses: Vec<&str> = graph
        .associations_for_port("p2")
        .iter()
        .filter_map(|row| row.entity.address.as_deref())
        .collect();
    assert_eq!(addresses, ["192.168.1.10"]);
}

#[test]
fn test_unattached_port_has_no_device() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let port = &graph.network_ports["p3"].entity;
    assert_eq!(port.device, None);
    assert_eq!(port.device_ref, None);
    assert_eq!(port.mac_address, None);
}

#[test]
fn test_network_and_subnet_identity() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let network = &graph.cloud_networks["n1-pub-vlan"];
    assert_eq!(network.entity.name, "pub-pub-vlan");

    let subnet = &graph.cloud_subnets["n1"].entity;
    assert_eq!(subnet.cloud_network.target, Resolution::Resolved(network.id));
    assert_eq!(subnet.gateway.as_deref(), Some("10.0.0.1"));
    assert_eq!(subnet.network_type.as_deref(), Some("pub-vlan"));
    assert!(graph.cloud_subnets["n2"].entity.dns_nameservers.is_empty());
}

#[test]
fn test_external_ip_on_unlisted_network_is_ignored() {
    let source = SnapshotSource::from_value(
        "orphan",
        json!({
            "pvmInstances": [{
                "pvmInstanceID": "vm1",
                "virtualCores": { "assigned": 1 },
                "memory": 2,
                "networks": [{ "networkID": "gone", "externalIP": "5.6.7.8" }]
            }]
        }),
    )
    .unwrap();

    let graph = refresh().run(&source, &StagingStore::new()).unwrap();
    assert!(graph.cloud_subnet_network_ports.is_empty());
}

#[test]
fn test_missing_storage_type_and_system_type_leave_no_reference() {
    let source = SnapshotSource::from_value(
        "untyped",
        json!({
            "images": [{ "imageID": "img1", "specifications": {} }],
            "pvmInstances": [{ "pvmInstanceID": "vm1", "virtualCores": {}, "memory": 1 }]
        }),
    )
    .unwrap();

    let graph = refresh().run(&source, &StagingStore::new()).unwrap();
    assert_eq!(graph.templates["img1"].entity.storage_profile, None);
    assert_eq!(graph.vm("vm1").unwrap().entity.flavor, None);
    assert!(graph.unresolved().is_empty(), "got {:?}", graph.unresolved());
}

// ── Queries ─────────────────────────────────────────────────────────

#[test]
fn test_available_vms_match_zone_and_tier() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let names = |volume: &str| -> Vec<String> {
        graph
            .available_vms(volume)
            .iter()
            .map(|row| row.entity.ems_ref.to_string())
            .collect()
    };
    assert_eq!(names("vol1"), ["vm1"]);
    assert_eq!(names("vol2"), ["vm2"]);
    assert!(names("vol9").is_empty());
}

#[test]
fn test_ssh_key_keeps_name_only() {
    let graph = refresh().run(&snapshot(), &StagingStore::new()).unwrap();

    let serialized = serde_json::to_string(&graph.auth_key_pairs).unwrap();
    assert!(serialized.contains("\"ops\""));
    assert!(!serialized.contains("ssh-ed25519"));
}

// ── Failure and repeatability ───────────────────────────────────────

#[test]
fn test_failed_refresh_leaves_store_untouched() {
    let store = StagingStore::new();
    let before = refresh().run(&snapshot(), &store).unwrap();

    let source = FailingSource {
        inner: snapshot(),
        fail: Pass::Networks,
    };
    let err = refresh().run(&source, &store).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Source {
            pass: Pass::Networks,
            ..
        }
    ));

    assert_eq!(store.commit(), before);
}

#[test]
fn test_failure_on_first_listing_stages_nothing_but_zone() {
    let staged = StagingStore::new();
    let source = FailingSource {
        inner: snapshot(),
        fail: Pass::Images,
    };
    let err = refresh().stage(&source, &staged).unwrap_err();
    assert_eq!(err.pass(), Some(Pass::Images));
    assert_eq!(staged.count(EntityKind::AvailabilityZone), 1);
    assert_eq!(staged.count(EntityKind::Template), 0);
}

#[test]
fn test_malformed_instance_is_reported() {
    let source = SnapshotSource::from_value(
        "malformed",
        json!({ "pvmInstances": [{ "pvmInstanceID": "vm1", "virtualCores": {} }] }),
    )
    .unwrap();

    let err = refresh().run(&source, &StagingStore::new()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MalformedRecord {
            pass: Pass::Instances,
            ..
        }
    ));
}

#[test]
fn test_refresh_is_repeatable() {
    let store = StagingStore::new();
    let first = refresh().run(&snapshot(), &store).unwrap();
    let second = refresh().run(&snapshot(), &store).unwrap();
    assert_eq!(first, second);

    let fresh = refresh().run(&snapshot(), &StagingStore::new()).unwrap();
    assert_eq!(first, fresh);
}

#[test]
fn test_staging_twice_does_not_duplicate() {
    let store = StagingStore::new();
    refresh().stage(&snapshot(), &store).unwrap();
    refresh().stage(&snapshot(), &store).unwrap();
    assert_eq!(store.commit().len(), 36);
}

#[test]
fn test_refresh_prunes_vanished_entities() {
    let store = StagingStore::new();
    refresh().run(&snapshot(), &store).unwrap();

    let smaller = SnapshotSource::from_value(
        "smaller",
        json!({ "systemPools": [{ "type": "s922" }] }),
    )
    .unwrap();
    let graph = refresh().run(&smaller, &store).unwrap();
    assert_eq!(graph.len(), 2);
    assert!(graph.vms.is_empty());
    assert_eq!(graph.flavors["s922"].id.0, 1);
}
