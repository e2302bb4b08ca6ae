// ── Inventory domain model ──
//
// Every type in this module is the normalized description of one inventory
// entity as registered with the staging store. Cross-entity links are
// `Reference`s resolved at commit, never direct pointers.

pub mod entity_id;
pub mod reference;

pub mod compute;
pub mod network;
pub mod storage;
pub mod tenant;

// ── Re-exports ──────────────────────────────────────────────────────

// Core identity
pub use entity_id::{EntityId, MacAddress};

// Deferred references
pub use reference::{EntityKind, Reference, Resolution, RowId};

// Compute
pub use compute::{AdvancedSetting, Disk, Flavor, Hardware, OperatingSystem, OsTag, Template, Vm};

// Storage
pub use storage::{CloudVolume, CloudVolumeType};

// Network
pub use network::{CloudNetwork, CloudSubnet, CloudSubnetNetworkPort, NetworkPort};

// Tenant
pub use tenant::{AuthKeyPair, AvailabilityZone};
