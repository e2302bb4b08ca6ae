// ── Storage domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::reference::Reference;

/// Storage class (tier). Only active tiers are materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudVolumeType {
    pub ems_ref: EntityId,
    pub name: String,
    pub description: Option<String>,
}

/// Block-storage volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudVolume {
    pub ems_ref: EntityId,
    pub name: Option<String>,
    pub status: Option<String>,
    pub bootable: Option<bool>,
    pub creation_time: Option<DateTime<Utc>>,
    pub description: String,
    /// Storage tier name.
    pub volume_type: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
    pub multi_attachment: Option<bool>,
    pub availability_zone: Reference,
}
