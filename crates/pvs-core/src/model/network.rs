// ── Network domain types ──
//
// Each provider network becomes one CloudNetwork owning exactly one
// CloudSubnet. Ports carry their addresses through subnet associations,
// so a port can sit in a subnet at both an internal and an external IP.

use serde::{Deserialize, Serialize};

use super::entity_id::{EntityId, MacAddress};
use super::reference::Reference;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudNetwork {
    /// `{networkID}-{type}`.
    pub ems_ref: EntityId,
    pub name: String,
    /// Always empty; addressing lives on the subnet.
    pub cidr: String,
    pub enabled: bool,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSubnet {
    /// The provider network id.
    pub ems_ref: EntityId,
    pub name: Option<String>,
    pub cloud_network: Reference,
    pub cidr: Option<String>,
    pub gateway: Option<String>,
    pub status: String,
    pub dns_nameservers: Vec<String>,
    pub ip_version: String,
    pub network_protocol: String,
    pub availability_zone: Reference,
    pub network_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPort {
    pub ems_ref: EntityId,
    pub name: String,
    pub status: Option<String>,
    pub mac_address: Option<MacAddress>,
    /// Raw id of the attached instance.
    pub device_ref: Option<String>,
    /// The attached VM; `None` for unattached ports.
    pub device: Option<Reference>,
}

/// A port's address within a subnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSubnetNetworkPort {
    /// `None` when an external address could not be matched to a port.
    pub network_port: Option<Reference>,
    pub cloud_subnet: Reference,
    pub address: Option<String>,
}
