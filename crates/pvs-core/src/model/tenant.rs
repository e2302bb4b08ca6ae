// ── Tenant-level domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// The single availability zone of a PowerVS workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityZone {
    pub ems_ref: EntityId,
    pub name: String,
}

/// SSH key registered in the workspace. Only the name is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthKeyPair {
    pub name: String,
}
