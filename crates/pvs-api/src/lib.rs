// pvs-api: Power Virtual Server inventory records and the record source boundary

pub mod error;
pub mod models;
pub mod snapshot;
pub mod source;

pub use error::Error;
pub use models::{
    Image, ImageSpecifications, InstanceNetwork, Network, NetworkPort, PortInstance, PvmInstance,
    SshKey, StorageType, SystemPool, VirtualCores, Volume,
};
pub use snapshot::SnapshotSource;
pub use source::RecordSource;
