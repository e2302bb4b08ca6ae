// ── Registration keys ──
//
// Declares, for every entity kind, the unique key it is registered under
// and the deferred references it carries. Owned records (hardware, disks,
// operating systems, settings, subnet associations) are keyed through
// their owner's key so re-registration replaces rather than duplicates.

use super::StagingStore;
use super::collection::EntityCollection;
use crate::model::{
    AdvancedSetting, AuthKeyPair, AvailabilityZone, CloudNetwork, CloudSubnet,
    CloudSubnetNetworkPort, CloudVolume, CloudVolumeType, Disk, EntityKind, Flavor, Hardware,
    NetworkPort, OperatingSystem, Reference, Template, Vm,
};

/// An entity description the staging store can hold.
pub trait Staged: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Unique registration key within `KIND`.
    fn key(&self) -> String;

    /// Every deferred reference this entity carries.
    fn references_mut(&mut self) -> Vec<&mut Reference>;

    /// Read-only view of the same references.
    fn references(&self) -> Vec<&Reference>;

    #[doc(hidden)]
    fn collection(store: &StagingStore) -> &EntityCollection<Self>;
}

/// Implements `Staged` for one kind.
///
/// `refs` lists plain `Reference` fields, `opt_refs` lists `Option<Reference>` fields.
macro_rules! staged {
    (
        $ty:ty, $kind:ident, $field:ident,
        key = |$this:ident| $key:expr,
        refs = [$($r:ident),*],
        opt_refs = [$($o:ident),*] $(,)?
    ) => {
        impl Staged for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn key(&self) -> String {
                let $this = self;
                $key
            }

            #[allow(unused_mut)]
            fn references_mut(&mut self) -> Vec<&mut Reference> {
                let mut refs: Vec<&mut Reference> = vec![$(&mut self.$r),*];
                $(refs.extend(self.$o.as_mut());)*
                refs
            }

            #[allow(unused_mut)]
            fn references(&self) -> Vec<&Reference> {
                let mut refs: Vec<&Reference> = vec![$(&self.$r),*];
                $(refs.extend(self.$o.as_ref());)*
                refs
            }

            fn collection(store: &StagingStore) -> &EntityCollection<Self> {
                &store.$field
            }
        }
    };
}

staged!(AvailabilityZone, AvailabilityZone, availability_zones,
    key = |az| az.ems_ref.to_string(), refs = [], opt_refs = []);

staged!(Template, Template, templates,
    key = |t| t.ems_ref.to_string(), refs = [], opt_refs = [storage_profile]);

staged!(Flavor, Flavor, flavors,
    key = |f| f.ems_ref.to_string(), refs = [], opt_refs = []);

staged!(CloudVolumeType, CloudVolumeType, cloud_volume_types,
    key = |t| t.ems_ref.to_string(), refs = [], opt_refs = []);

staged!(CloudVolume, CloudVolume, cloud_volumes,
    key = |v| v.ems_ref.to_string(), refs = [availability_zone], opt_refs = []);

staged!(Vm, Vm, vms,
    key = |vm| vm.ems_ref.to_string(), refs = [availability_zone], opt_refs = [flavor]);

staged!(Hardware, Hardware, hardwares,
    key = |hw| hw.vm.key.clone(), refs = [vm], opt_refs = []);

staged!(Disk, Disk, disks,
    key = |d| format!("{}/{}", d.hardware.key, d.location),
    refs = [hardware, backing], opt_refs = []);

staged!(OperatingSystem, OperatingSystem, operating_systems,
    key = |os| os.owner.to_string(), refs = [owner], opt_refs = []);

staged!(AdvancedSetting, AdvancedSetting, advanced_settings,
    key = |s| format!("{}/{}", s.resource.key, s.name), refs = [resource], opt_refs = []);

staged!(CloudNetwork, CloudNetwork, cloud_networks,
    key = |n| n.ems_ref.to_string(), refs = [], opt_refs = []);

staged!(CloudSubnet, CloudSubnet, cloud_subnets,
    key = |s| s.ems_ref.to_string(), refs = [cloud_network, availability_zone], opt_refs = []);

staged!(NetworkPort, NetworkPort, network_ports,
    key = |p| p.ems_ref.to_string(), refs = [], opt_refs = [device]);

staged!(CloudSubnetNetworkPort, CloudSubnetNetworkPort, cloud_subnet_network_ports,
    key = |a| format!(
        "{}/{}/{}",
        a.cloud_subnet.key,
        a.address.as_deref().unwrap_or_default(),
        a.network_port.as_ref().map_or("-", |p| p.key.as_str()),
    ),
    refs = [cloud_subnet], opt_refs = [network_port]);

staged!(AuthKeyPair, AuthKeyPair, auth_key_pairs,
    key = |k| k.name.clone(), refs = [], opt_refs = []);
