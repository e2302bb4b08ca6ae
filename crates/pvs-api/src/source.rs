// Record source boundary
//
// The capability the inventory builder consumes: bulk listings per record
// kind plus the two point lookups the builder performs mid-pass. Fetching
// is synchronous from the builder's point of view; an implementation backed
// by a network client materializes its responses before returning.

use crate::error::Error;
use crate::models::{
    Image, Network, NetworkPort, PvmInstance, SshKey, StorageType, SystemPool, Volume,
};

/// Supplier of raw provider records.
///
/// Any `Err` returned here is treated as a structural fetch failure and
/// aborts the whole refresh. A point lookup that simply finds nothing
/// returns `Ok(None)` / an empty list instead.
pub trait RecordSource {
    fn images(&self) -> Result<Vec<Image>, Error>;

    fn system_pools(&self) -> Result<Vec<SystemPool>, Error>;

    fn storage_types(&self) -> Result<Vec<StorageType>, Error>;

    fn volumes(&self) -> Result<Vec<Volume>, Error>;

    /// Point lookup of a single volume by id.
    fn volume(&self, volume_id: &str) -> Result<Option<Volume>, Error>;

    fn pvm_instances(&self) -> Result<Vec<PvmInstance>, Error>;

    fn networks(&self) -> Result<Vec<Network>, Error>;

    /// Ports belonging to one network.
    fn ports(&self, network_id: &str) -> Result<Vec<NetworkPort>, Error>;

    fn ssh_keys(&self) -> Result<Vec<SshKey>, Error>;
}
