// ── Inventory refresh orchestration ──
//
// Runs the entity passes in a fixed order against one record source. The
// order is load-bearing: images fill the architecture index before
// instances read it, and instances fill the external-port index before
// networks drain it. References between entities are key-based and
// deferred, so no other ordering constraint exists.

mod compute;
mod network;
mod storage;
mod tenant;

use strum::Display;
use tracing::{debug, info, info_span};

use pvs_api::RecordSource;

use crate::config::ProviderConnection;
use crate::error::CoreError;
use crate::index::{ExternalPortIndex, ImageArchIndex};
use crate::store::{InventoryGraph, StagingStore};

/// One entity pass of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Pass {
    AvailabilityZones,
    Images,
    Flavors,
    StorageClasses,
    Volumes,
    Instances,
    Networks,
    SshKeys,
}

impl Pass {
    /// Execution order of a refresh.
    pub const ORDER: [Pass; 8] = [
        Pass::AvailabilityZones,
        Pass::Images,
        Pass::Flavors,
        Pass::StorageClasses,
        Pass::Volumes,
        Pass::Instances,
        Pass::Networks,
        Pass::SshKeys,
    ];
}

/// Builds the inventory graph of one PowerVS workspace.
///
/// ```ignore
/// let refresh = InventoryRefresh::new(connection);
/// let store = StagingStore::new();
/// let graph = refresh.run(&source, &store)?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRefresh {
    connection: ProviderConnection,
}

impl InventoryRefresh {
    pub fn new(connection: ProviderConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &ProviderConnection {
        &self.connection
    }

    /// Run every pass in order, registering into `store`.
    ///
    /// Stops at the first record source failure. Entities staged before
    /// the failure stay in `store`; use [`run`](Self::run) for
    /// all-or-nothing behavior.
    pub fn stage(&self, source: &dyn RecordSource, store: &StagingStore) -> Result<(), CoreError> {
        let span = info_span!("refresh", uid_ems = %self.connection.uid_ems);
        let _enter = span.enter();

        let mut image_arch = ImageArchIndex::new();
        let mut external_ports = ExternalPortIndex::new();
        let zone = tenant::availability_zone(&self.connection, store);

        for pass in Pass::ORDER {
            let records = match pass {
                Pass::AvailabilityZones => Ok(1),
                Pass::Images => compute::images(source, store, &mut image_arch),
                Pass::Flavors => compute::flavors(source, store),
                Pass::StorageClasses => storage::cloud_volume_types(source, store),
                Pass::Volumes => storage::volumes(source, store, &zone),
                Pass::Instances => {
                    compute::instances(source, store, &zone, &image_arch, &mut external_ports)
                }
                Pass::Networks => network::networks(source, store, &zone, &mut external_ports),
                Pass::SshKeys => tenant::ssh_keys(source, store),
            }
            .map_err(|e| CoreError::from_source(pass, e))?;
            debug!(%pass, records, "pass complete");
        }

        if !external_ports.is_empty() {
            debug!(
                networks = ?external_ports.pending_networks(),
                attachments = external_ports.len(),
                "external IPs on networks that were not listed"
            );
        }
        Ok(())
    }

    /// Refresh `store` from `source` and commit it.
    ///
    /// Passes run against a fresh staging store that replaces the contents
    /// of `store` only once every pass has succeeded. On error `store` is
    /// left exactly as it was.
    pub fn run(
        &self,
        source: &dyn RecordSource,
        store: &StagingStore,
    ) -> Result<InventoryGraph, CoreError> {
        info!(connection = %self.connection.name, "starting inventory refresh");

        let staged = StagingStore::new();
        self.stage(source, &staged)?;
        store.apply(&staged);

        Ok(store.commit())
    }
}
