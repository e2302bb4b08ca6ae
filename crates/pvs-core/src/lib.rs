//! Inventory graph builder for IBM Power Virtual Server workspaces.
//!
//! Turns the raw records of one workspace (served by a
//! [`pvs_api::RecordSource`]) into a normalized graph of inventory
//! entities:
//!
//! - **[`InventoryRefresh`]**: Runs the entity passes in a fixed order
//!   (availability zone, images, flavors, storage classes, volumes,
//!   instances, networks, SSH keys) and commits the result.
//!   [`run()`](InventoryRefresh::run) is all-or-nothing: a failing record
//!   source leaves the target store untouched.
//!
//! - **[`StagingStore`]**: Keyed, `DashMap`-backed registration target.
//!   Builders register entity descriptions and receive deferred
//!   [`Reference`]s; [`commit()`](StagingStore::commit) binds every
//!   reference to a row id or reports it unresolved.
//!
//! - **[`InventoryGraph`]**: The committed result, with per-kind tables
//!   and lookups (hardware of a VM, ports of a VM, VMs a volume could be
//!   attached to, ...).
//!
//! - **Domain model** ([`model`]): One normalized type per entity kind,
//!   identified by [`EntityId`] and linked through [`Reference`].

pub mod builder;
pub mod config;
pub mod convert;
pub mod error;
pub mod index;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use builder::{InventoryRefresh, Pass};
pub use config::ProviderConnection;
pub use error::CoreError;
pub use store::{GraphSummary, InventoryGraph, Row, StagingStore, Staged, UnresolvedReference};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Compute
    AdvancedSetting,
    // Tenant
    AuthKeyPair,
    AvailabilityZone,
    // Network
    CloudNetwork,
    CloudSubnet,
    CloudSubnetNetworkPort,
    // Storage
    CloudVolume,
    CloudVolumeType,
    Disk,
    // Core identity
    EntityId,
    EntityKind,
    Flavor,
    Hardware,
    MacAddress,
    NetworkPort,
    OperatingSystem,
    OsTag,
    Reference,
    Resolution,
    RowId,
    Template,
    Vm,
};
