// ── Deferred references ──
//
// A `Reference` names its target by (kind, key) at registration time and is
// only bound to a row id when the staging store commits. Builders never
// hold pointers to other entities, so pass order does not constrain which
// entity must exist first.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Every entity kind the staging store knows about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    AvailabilityZone,
    Template,
    Flavor,
    CloudVolumeType,
    CloudVolume,
    Vm,
    Hardware,
    Disk,
    OperatingSystem,
    AdvancedSetting,
    CloudNetwork,
    CloudSubnet,
    NetworkPort,
    CloudSubnetNetworkPort,
    AuthKeyPair,
}

/// Row id assigned to an entity at commit. Ids are dense per kind, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolution state of a deferred reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "id")]
pub enum Resolution {
    /// Registered, not yet committed.
    #[default]
    Pending,
    /// Bound to the target's row id.
    Resolved(RowId),
    /// Committed, but no entity was registered under the key.
    Unresolved,
}

/// Foreign key placeholder: "the `kind` entity registered under `key`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: EntityKind,
    pub key: String,
    #[serde(default)]
    pub target: Resolution,
}

impl Reference {
    /// A lookup-by-key, resolved later at commit.
    pub fn lazy(kind: EntityKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            target: Resolution::Pending,
        }
    }

    /// Row id of the target, once resolved.
    pub fn id(&self) -> Option<RowId> {
        match self.target {
            Resolution::Resolved(id) => Some(id),
            Resolution::Pending | Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.id().is_some()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_reference_starts_pending() {
        let r = Reference::lazy(EntityKind::Flavor, "s922");
        assert_eq!(r.target, Resolution::Pending);
        assert_eq!(r.id(), None);
        assert_eq!(r.to_string(), "flavor:s922");
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(
            EntityKind::CloudSubnetNetworkPort.to_string(),
            "cloud_subnet_network_port"
        );
        assert_eq!("vm".parse::<EntityKind>().ok(), Some(EntityKind::Vm));
    }
}
