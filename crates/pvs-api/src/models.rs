// PowerVS record types
//
// Models for the records a Power Virtual Server workspace returns. Field
// names follow the provider's camelCase wire format. Fields a builder needs
// structurally (ids, image specifications, instance cores and memory) are
// required so a malformed record fails at deserialization; everything else
// is optional because the provider omits fields freely.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

// ── Image ────────────────────────────────────────────────────────────

/// Boot image available to the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "imageID")]
    pub image_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub storage_type: Option<String>,
    pub specifications: ImageSpecifications,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Hardware/OS description nested inside `Image`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpecifications {
    #[serde(default)]
    pub architecture: Option<String>,
    /// `"big-endian"` or `"little-endian"`.
    #[serde(default)]
    pub endianness: Option<String>,
    #[serde(default)]
    pub operating_system: Option<String>,
}

// ── System pools / storage types ─────────────────────────────────────

/// One entry of the workspace's system pools (a host system type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPool {
    #[serde(rename = "type")]
    pub system_type: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Storage tier offered by the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageType {
    #[serde(rename = "type")]
    pub storage_type: String,
    /// `"active"` or `"inactive"`.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ── Volume ───────────────────────────────────────────────────────────

/// Block-storage volume. Sizes are in gigabytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(rename = "volumeID")]
    pub volume_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub bootable: Option<bool>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub disk_type: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub shareable: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── PVM instance ─────────────────────────────────────────────────────

/// Virtual machine record from the instance listing. Memory is in gigabytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvmInstance {
    #[serde(rename = "pvmInstanceID")]
    pub pvm_instance_id: String,
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(rename = "imageID", default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub sys_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub storage_type: Option<String>,
    pub virtual_cores: VirtualCores,
    pub memory: f64,
    #[serde(default)]
    pub processors: Option<f64>,
    /// `"dedicated"`, `"shared"` or `"capped"`.
    #[serde(default)]
    pub proc_type: Option<String>,
    #[serde(default)]
    pub os_type: Option<String>,
    /// Free-form OS version string.
    #[serde(default)]
    pub operating_system: Option<String>,
    #[serde(rename = "volumeIDs", default)]
    pub volume_ids: Option<Vec<String>>,
    #[serde(default)]
    pub networks: Option<Vec<InstanceNetwork>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtualCores {
    #[serde(default)]
    pub assigned: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub min: Option<u32>,
}

/// Network attachment listed on an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceNetwork {
    #[serde(rename = "networkID", default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub network_name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(rename = "externalIP", default)]
    pub external_ip: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(rename = "type", default)]
    pub network_type: Option<String>,
}

impl InstanceNetwork {
    /// The external IP, or `None` when missing or blank.
    pub fn external_ip(&self) -> Option<&str> {
        self.external_ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }
}

// ── Network / port ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(rename = "networkID")]
    pub network_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `"vlan"` or `"pub-vlan"`.
    #[serde(rename = "type", default)]
    pub network_type: Option<String>,
    #[serde(default)]
    pub cidr: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub dns_servers: Option<Vec<String>>,
    #[serde(rename = "vlanID", default)]
    pub vlan_id: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Port on a network, from the per-network port listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPort {
    #[serde(rename = "portID")]
    pub port_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pvm_instance: Option<PortInstance>,
}

/// Instance reference nested inside a `NetworkPort`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortInstance {
    #[serde(rename = "pvmInstanceID", default)]
    pub pvm_instance_id: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

impl NetworkPort {
    /// Id of the instance this port is attached to, if any.
    pub fn instance_id(&self) -> Option<&str> {
        self.pvm_instance
            .as_ref()
            .and_then(|i| i.pvm_instance_id.as_deref())
    }
}

// ── SSH key ──────────────────────────────────────────────────────────

/// Tenant SSH key. Key material never leaves this struct in clear text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKey {
    pub name: String,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub ssh_key: Option<SecretString>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}
