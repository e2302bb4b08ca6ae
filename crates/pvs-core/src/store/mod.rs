// ── Staging store ──
//
// Keyed registration of entity descriptions, deferred references between
// them, and the commit that turns both into an `InventoryGraph`.

mod collection;
mod commit;
mod graph;
mod staged;

use std::collections::HashSet;

use tracing::debug;

use collection::EntityCollection;
use crate::model::{
    AdvancedSetting, AuthKeyPair, AvailabilityZone, CloudNetwork, CloudSubnet,
    CloudSubnetNetworkPort, CloudVolume, CloudVolumeType, Disk, EntityKind, Flavor, Hardware,
    NetworkPort, OperatingSystem, Reference, Template, Vm,
};

pub use graph::{GraphSummary, InventoryGraph, Row, Table, UnresolvedReference};
pub use staged::Staged;

/// Registration target for the entity builders.
///
/// Thread-safe: every kind is an independent `DashMap`-backed collection,
/// and registration is an idempotent keyed upsert. Nothing is resolved
/// until [`commit`](Self::commit).
pub struct StagingStore {
    pub(crate) availability_zones: EntityCollection<AvailabilityZone>,
    pub(crate) templates: EntityCollection<Template>,
    pub(crate) flavors: EntityCollection<Flavor>,
    pub(crate) cloud_volume_types: EntityCollection<CloudVolumeType>,
    pub(crate) cloud_volumes: EntityCollection<CloudVolume>,
    pub(crate) vms: EntityCollection<Vm>,
    pub(crate) hardwares: EntityCollection<Hardware>,
    pub(crate) disks: EntityCollection<Disk>,
    pub(crate) operating_systems: EntityCollection<OperatingSystem>,
    pub(crate) advanced_settings: EntityCollection<AdvancedSetting>,
    pub(crate) cloud_networks: EntityCollection<CloudNetwork>,
    pub(crate) cloud_subnets: EntityCollection<CloudSubnet>,
    pub(crate) network_ports: EntityCollection<NetworkPort>,
    pub(crate) cloud_subnet_network_ports: EntityCollection<CloudSubnetNetworkPort>,
    pub(crate) auth_key_pairs: EntityCollection<AuthKeyPair>,
}

impl Default for StagingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingStore {
    pub fn new() -> Self {
        Self {
            availability_zones: EntityCollection::new(),
            templates: EntityCollection::new(),
            flavors: EntityCollection::new(),
            cloud_volume_types: EntityCollection::new(),
            cloud_volumes: EntityCollection::new(),
            vms: EntityCollection::new(),
            hardwares: EntityCollection::new(),
            disks: EntityCollection::new(),
            operating_systems: EntityCollection::new(),
            advanced_settings: EntityCollection::new(),
            cloud_networks: EntityCollection::new(),
            cloud_subnets: EntityCollection::new(),
            network_ports: EntityCollection::new(),
            cloud_subnet_network_ports: EntityCollection::new(),
            auth_key_pairs: EntityCollection::new(),
        }
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Register (or replace) an entity under its key.
    ///
    /// Returns a deferred reference to the entity just registered, for
    /// records that point back at it.
    pub fn register<T: Staged>(&self, entity: T) -> Reference {
        let key = entity.key();
        let is_new = T::collection(self).upsert(key.clone(), entity);
        if !is_new {
            debug!(kind = %T::KIND, key = %key, "replaced staged entity");
        }
        Reference::lazy(T::KIND, key)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Staged entity of kind `T` registered under `key`.
    pub fn get<T: Staged>(&self, key: &str) -> Option<T> {
        T::collection(self).get_by_key(key).map(|e| T::clone(&e))
    }

    pub fn contains(&self, kind: EntityKind, key: &str) -> bool {
        match kind {
            EntityKind::AvailabilityZone => self.availability_zones.contains_key(key),
            EntityKind::Template => self.templates.contains_key(key),
            EntityKind::Flavor => self.flavors.contains_key(key),
            EntityKind::CloudVolumeType => self.cloud_volume_types.contains_key(key),
            EntityKind::CloudVolume => self.cloud_volumes.contains_key(key),
            EntityKind::Vm => self.vms.contains_key(key),
            EntityKind::Hardware => self.hardwares.contains_key(key),
            EntityKind::Disk => self.disks.contains_key(key),
            EntityKind::OperatingSystem => self.operating_systems.contains_key(key),
            EntityKind::AdvancedSetting => self.advanced_settings.contains_key(key),
            EntityKind::CloudNetwork => self.cloud_networks.contains_key(key),
            EntityKind::CloudSubnet => self.cloud_subnets.contains_key(key),
            EntityKind::NetworkPort => self.network_ports.contains_key(key),
            EntityKind::CloudSubnetNetworkPort => {
                self.cloud_subnet_network_ports.contains_key(key)
            }
            EntityKind::AuthKeyPair => self.auth_key_pairs.contains_key(key),
        }
    }

    /// Number of staged entities of one kind.
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

    // ── Bulk replacement ─────────────────────────────────────────────

    /// Replace the contents of this store with everything staged in `staged`.
    ///
    /// Upsert-then-prune per kind: incoming entities are upserted first, then
    /// keys absent from `staged` are removed, so the store never passes
    /// through an empty state.
    pub fn apply(&self, staged: &StagingStore) {
        upsert_and_prune(&self.availability_zones, &staged.availability_zones);
        upsert_and_prune(&self.templates, &staged.templates);
        upsert_and_prune(&self.flavors, &staged.flavors);
        upsert_and_prune(&self.cloud_volume_types, &staged.cloud_volume_types);
        upsert_and_prune(&self.cloud_volumes, &staged.cloud_volumes);
        upsert_and_prune(&self.vms, &staged.vms);
        upsert_and_prune(&self.hardwares, &staged.hardwares);
        upsert_and_prune(&self.disks, &staged.disks);
        upsert_and_prune(&self.operating_systems, &staged.operating_systems);
        upsert_and_prune(&self.advanced_settings, &staged.advanced_settings);
        upsert_and_prune(&self.cloud_networks, &staged.cloud_networks);
        upsert_and_prune(&self.cloud_subnets, &staged.cloud_subnets);
        upsert_and_prune(&self.network_ports, &staged.network_ports);
        upsert_and_prune(
            &self.cloud_subnet_network_ports,
            &staged.cloud_subnet_network_ports,
        );
        upsert_and_prune(&self.auth_key_pairs, &staged.auth_key_pairs);
    }

    /// Drop everything staged.
    pub fn clear(&self) {
        self.availability_zones.clear();
        self.templates.clear();
        self.flavors.clear();
        self.cloud_volume_types.clear();
        self.cloud_volumes.clear();
        self.vms.clear();
        self.hardwares.clear();
        self.disks.clear();
        self.operating_systems.clear();
        self.advanced_settings.clear();
        self.cloud_networks.clear();
        self.cloud_subnets.clear();
        self.network_ports.clear();
        self.cloud_subnet_network_ports.clear();
        self.auth_key_pairs.clear();
    }
}

fn upsert_and_prune<T: Clone + Send + Sync + 'static>(
    target: &EntityCollection<T>,
    incoming: &EntityCollection<T>,
) {
    let entries = incoming.snapshot();
    let incoming_keys: HashSet<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    for (key, entity) in &entries {
        target.upsert(key.clone(), T::clone(entity));
    }
    for existing_key in target.keys() {
        if !incoming_keys.contains(existing_key.as_str()) {
            target.remove(&existing_key);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{EntityId, Flavor};

    fn flavor(name: &str) -> Flavor {
        Flavor {
            ems_ref: EntityId::from(name),
            name: name.into(),
        }
    }

    #[test]
    fn register_returns_reference_to_itself() {
        let store = StagingStore::new();
        let r = store.register(flavor("s922"));
        assert_eq!(r, Reference::lazy(EntityKind::Flavor, "s922"));
        assert!(store.contains(EntityKind::Flavor, "s922"));
    }

    #[test]
    fn re_registration_does_not_duplicate() {
        let store = StagingStore::new();
        store.register(flavor("s922"));
        store.register(flavor("s922"));
        assert_eq!(store.count(EntityKind::Flavor), 1);
    }

    #[test]
    fn apply_upserts_and_prunes() {
        let live = StagingStore::new();
        live.register(flavor("s922"));
        live.register(flavor("e980"));

        let staged = StagingStore::new();
        staged.register(flavor("s922"));
        staged.register(flavor("s1022"));

        live.apply(&staged);
        assert!(live.contains(EntityKind::Flavor, "s922"));
        assert!(live.contains(EntityKind::Flavor, "s1022"));
        assert!(!live.contains(EntityKind::Flavor, "e980"));
    }

    #[test]
    fn clear_empties_every_kind() {
        let store = StagingStore::new();
        store.register(flavor("s922"));
        store.register(AuthKeyPair { name: "deploy".into() });
        store.clear();
        assert_eq!(store.count(EntityKind::Flavor), 0);
        assert_eq!(store.count(EntityKind::AuthKeyPair), 0);
    }

    #[test]
    fn get_returns_staged_copy() {
        let store = StagingStore::new();
        store.register(flavor("s922"));
        assert_eq!(store.get::<Flavor>("s922").unwrap().name, "s922");
        assert!(store.get::<Flavor>("e980").is_none());
    }
}
