// ── Commit: deferred reference resolution ──
//
// Phase two of the staging protocol. Every staged entity gets a row id
// (dense per kind, assigned in key order), then every deferred reference
// is looked up in the resulting key space and bound to a row id or marked
// unresolved. Identical staged contents always commit to identical graphs.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::StagingStore;
use super::graph::{InventoryGraph, Row, Table, UnresolvedReference};
use super::staged::Staged;
use crate::model::{EntityKind, Resolution, RowId};

type KeySpace = HashMap<EntityKind, HashMap<String, RowId>>;

impl StagingStore {
    /// Resolve every deferred reference and produce the committed graph.
    ///
    /// Never fails: a reference whose key was never registered is kept as
    /// [`Resolution::Unresolved`] and listed in
    /// [`InventoryGraph::unresolved`].
    pub fn commit(&self) -> InventoryGraph {
        let mut keys = KeySpace::new();

        let mut graph = InventoryGraph {
            availability_zones: number(self, &mut keys),
            templates: number(self, &mut keys),
            flavors: number(self, &mut keys),
            cloud_volume_types: number(self, &mut keys),
            cloud_volumes: number(self, &mut keys),
            vms: number(self, &mut keys),
            hardwares: number(self, &mut keys),
            disks: number(self, &mut keys),
            operating_systems: number(self, &mut keys),
            advanced_settings: number(self, &mut keys),
            cloud_networks: number(self, &mut keys),
            cloud_subnets: number(self, &mut keys),
            network_ports: number(self, &mut keys),
            cloud_subnet_network_ports: number(self, &mut keys),
            auth_key_pairs: number(self, &mut keys),
            unresolved: Vec::new(),
        };

        let mut unresolved = Vec::new();
        resolve(&mut graph.availability_zones, &keys, &mut unresolved);
        resolve(&mut graph.templates, &keys, &mut unresolved);
        resolve(&mut graph.flavors, &keys, &mut unresolved);
        resolve(&mut graph.cloud_volume_types, &keys, &mut unresolved);
        resolve(&mut graph.cloud_volumes, &keys, &mut unresolved);
        resolve(&mut graph.vms, &keys, &mut unresolved);
        resolve(&mut graph.hardwares, &keys, &mut unresolved);
        resolve(&mut graph.disks, &keys, &mut unresolved);
        resolve(&mut graph.operating_systems, &keys, &mut unresolved);
        resolve(&mut graph.advanced_settings, &keys, &mut unresolved);
        resolve(&mut graph.cloud_networks, &keys, &mut unresolved);
        resolve(&mut graph.cloud_subnets, &keys, &mut unresolved);
        resolve(&mut graph.network_ports, &keys, &mut unresolved);
        resolve(&mut graph.cloud_subnet_network_ports, &keys, &mut unresolved);
        resolve(&mut graph.auth_key_pairs, &keys, &mut unresolved);
        graph.unresolved = unresolved;

        if !graph.unresolved.is_empty() {
            warn!(
                count = graph.unresolved.len(),
                "committed with unresolved references"
            );
        }
        info!(
            entities = graph.len(),
            unresolved = graph.unresolved.len(),
            "committed inventory graph"
        );
        graph
    }
}

/// Snapshot one kind, assign row ids and record its keys.
fn number<T: Staged>(store: &StagingStore, keys: &mut KeySpace) -> Table<T> {
    let table: Table<T> = T::collection(store)
        .snapshot()
        .into_iter()
        .zip(1u64..)
        .map(|((key, entity), n)| {
            let row = Row {
                id: RowId(n),
                entity: T::clone(&entity),
            };
            (key, row)
        })
        .collect();

    keys.insert(
        T::KIND,
        table.iter().map(|(key, row)| (key.clone(), row.id)).collect(),
    );
    table
}

/// Bind every reference in one table against the key space.
fn resolve<T: Staged>(
    table: &mut Table<T>,
    keys: &KeySpace,
    unresolved: &mut Vec<UnresolvedReference>,
) {
    for (key, row) in table.iter_mut() {
        for reference in row.entity.references_mut() {
            match keys.get(&reference.kind).and_then(|ids| ids.get(&reference.key)) {
                Some(id) => reference.target = Resolution::Resolved(*id),
                None => {
                    debug!(from = %T::KIND, from_key = %key, to = %reference, "unresolved reference");
                    reference.target = Resolution::Unresolved;
                    unresolved.push(UnresolvedReference {
                        from: T::KIND,
                        from_key: key.clone(),
                        target: reference.kind,
                        key: reference.key.clone(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AvailabilityZone, CloudVolume, EntityId, Flavor, Reference, Vm};
    use pretty_assertions::assert_eq;

    fn vm(id: &str, flavor: &str) -> Vm {
        Vm {
            uid_ems: EntityId::from(id),
            ems_ref: EntityId::from(id),
            name: Some(id.into()),
            description: "PVM Instance".into(),
            location: "unknown".into(),
            vendor: "ibm".into(),
            connection_state: "connected".into(),
            raw_power_state: Some("ACTIVE".into()),
            format: None,
            flavor: Some(Reference::lazy(EntityKind::Flavor, flavor)),
            availability_zone: Reference::lazy(EntityKind::AvailabilityZone, "az1"),
        }
    }

    #[test]
    fn references_resolve_by_key_regardless_of_registration_order() {
        let store = StagingStore::new();
        // Referencing entity first, target second.
        store.register(vm("vm1", "s922"));
        store.register(Flavor {
            ems_ref: EntityId::from("s922"),
            name: "s922".into(),
        });
        store.register(AvailabilityZone {
            ems_ref: EntityId::from("az1"),
            name: "dal10".into(),
        });

        let graph = store.commit();
        let vm = &graph.vms["vm1"].entity;
        assert_eq!(vm.flavor.as_ref().unwrap().target, Resolution::Resolved(RowId(1)));
        assert_eq!(vm.availability_zone.target, Resolution::Resolved(RowId(1)));
        assert!(graph.unresolved().is_empty());
    }

    #[test]
    fn missing_target_is_marked_unresolved() {
        let store = StagingStore::new();
        store.register(vm("vm1", "e980"));

        let graph = store.commit();
        let vm = &graph.vms["vm1"].entity;
        assert_eq!(vm.flavor.as_ref().unwrap().target, Resolution::Unresolved);
        assert_eq!(graph.unresolved().len(), 2);
        assert!(graph.unresolved().contains(&UnresolvedReference {
            from: EntityKind::Vm,
            from_key: "vm1".into(),
            target: EntityKind::Flavor,
            key: "e980".into(),
        }));
    }

    #[test]
    fn row_ids_follow_key_order() {
        let store = StagingStore::new();
        for id in ["v3", "v1", "v2"] {
            store.register(CloudVolume {
                ems_ref: EntityId::from(id),
                name: None,
                status: None,
                bootable: None,
                creation_time: None,
                description: String::new(),
                volume_type: None,
                size: None,
                multi_attachment: None,
                availability_zone: Reference::lazy(EntityKind::AvailabilityZone, "az1"),
            });
        }
        let graph = store.commit();
        let ids: Vec<(String, u64)> = graph
            .cloud_volumes
            .iter()
            .map(|(k, row)| (k.clone(), row.id.0))
            .collect();
        assert_eq!(
            ids,
            vec![("v1".into(), 1), ("v2".into(), 2), ("v3".into(), 3)]
        );
    }

    #[test]
    fn commit_is_repeatable() {
        let store = StagingStore::new();
        store.register(vm("vm1", "s922"));
        assert_eq!(store.commit(), store.commit());
    }
}
