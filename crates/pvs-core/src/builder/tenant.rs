// ── Tenant passes: availability zone, SSH keys ──

use pvs_api::RecordSource;

use crate::config::ProviderConnection;
use crate::model::{AuthKeyPair, AvailabilityZone, Reference};
use crate::store::StagingStore;

/// The workspace's single zone, derived from the connection.
pub(crate) fn availability_zone(connection: &ProviderConnection, store: &StagingStore) -> Reference {
    store.register(AvailabilityZone {
        ems_ref: connection.uid_ems.clone(),
        name: connection.name.clone(),
    })
}

pub(crate) fn ssh_keys(
    source: &dyn RecordSource,
    store: &StagingStore,
) -> Result<usize, pvs_api::Error> {
    let keys = source.ssh_keys()?;
    for key in &keys {
        store.register(AuthKeyPair {
            name: key.name.clone(),
        });
    }
    Ok(keys.len())
}
