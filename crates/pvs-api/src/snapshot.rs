// Offline record source
//
// A `RecordSource` over a captured JSON document, one array per record
// kind plus a `ports` object keyed by network id. Record sets are decoded
// on demand so a malformed record surfaces from the call that reads it,
// the same way a live client would report a bad response body.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::models::{
    Image, Network, NetworkPort, PvmInstance, SshKey, StorageType, SystemPool, Volume,
};
use crate::source::RecordSource;

/// Record source backed by a captured snapshot document.
///
/// ```json
/// {
///   "images": [...], "systemPools": [...], "storageTypes": [...],
///   "volumes": [...], "pvmInstances": [...], "networks": [...],
///   "ports": { "<networkID>": [...] }, "sshKeys": [...]
/// }
/// ```
///
/// Missing sections read as empty.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    name: String,
    document: Map<String, Value>,
}

impl SnapshotSource {
    /// Parse a snapshot from a JSON string. `name` is used in error context.
    pub fn from_json(name: impl Into<String>, raw: &str) -> Result<Self, Error> {
        let name = name.into();
        let document: Map<String, Value> =
            serde_json::from_str(raw).map_err(|e| Error::deserialization(&e, name.clone()))?;
        Ok(Self { name, document })
    }

    /// Build a snapshot from an already parsed JSON value.
    pub fn from_value(name: impl Into<String>, value: Value) -> Result<Self, Error> {
        let name = name.into();
        let document: Map<String, Value> =
            serde_json::from_value(value).map_err(|e| Error::deserialization(&e, name.clone()))?;
        Ok(Self { name, document })
    }

    /// Read and parse a snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path.display().to_string(), &raw)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decode one top-level array section.
    fn section<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, Error> {
        let records = decode_array(self.document.get(key), &format!("{}:{key}", self.name))?;
        debug!(section = key, count = records.len(), "read snapshot section");
        Ok(records)
    }
}

fn decode_array<T: DeserializeOwned>(value: Option<&Value>, context: &str) -> Result<Vec<T>, Error> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => Vec::<T>::deserialize(v).map_err(|e| Error::deserialization(&e, context)),
    }
}

impl RecordSource for SnapshotSource {
    fn images(&self) -> Result<Vec<Image>, Error> {
        self.section("images")
    }

    fn system_pools(&self) -> Result<Vec<SystemPool>, Error> {
        self.section("systemPools")
    }

    fn storage_types(&self) -> Result<Vec<StorageType>, Error> {
        self.section("storageTypes")
    }

    fn volumes(&self) -> Result<Vec<Volume>, Error> {
        self.section("volumes")
    }

    fn volume(&self, volume_id: &str) -> Result<Option<Volume>, Error> {
        let found = self
            .volumes()?
            .into_iter()
            .find(|v| v.volume_id == volume_id);
        debug!(volume_id, found = found.is_some(), "volume lookup");
        Ok(found)
    }

    fn pvm_instances(&self) -> Result<Vec<PvmInstance>, Error> {
        self.section("pvmInstances")
    }

    fn networks(&self) -> Result<Vec<Network>, Error> {
        self.section("networks")
    }

    fn ports(&self, network_id: &str) -> Result<Vec<NetworkPort>, Error> {
        let by_network = self.document.get("ports").and_then(Value::as_object);
        let ports = decode_array(
            by_network.and_then(|m| m.get(network_id)),
            &format!("{}:ports[{network_id}]", self.name),
        )?;
        debug!(network_id, count = ports.len(), "read network ports");
        Ok(ports)
    }

    fn ssh_keys(&self) -> Result<Vec<SshKey>, Error> {
        self.section("sshKeys")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> SnapshotSource {
        SnapshotSource::from_value(
            "test",
            json!({
                "volumes": [
                    { "volumeID": "v1", "name": "boot", "size": 20 },
                    { "volumeID": "v2", "name": "data" }
                ],
                "ports": {
                    "n1": [{ "portID": "p1", "macAddress": "aa:bb" }]
                }
            }),
        )
        .unwrap()
    }

    #[test]
    fn missing_sections_are_empty() {
        let src = fixture();
        assert!(src.images().unwrap().is_empty());
        assert!(src.ssh_keys().unwrap().is_empty());
        assert!(src.ports("unknown").unwrap().is_empty());
    }

    #[test]
    fn volume_point_lookup() {
        let src = fixture();
        let v = src.volume("v1").unwrap().unwrap();
        assert_eq!(v.name.as_deref(), Some("boot"));
        assert!(src.volume("nope").unwrap().is_none());
    }

    #[test]
    fn ports_by_network() {
        let src = fixture();
        let ports = src.ports("n1").unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port_id, "p1");
    }

    #[test]
    fn malformed_record_reports_section() {
        let src = SnapshotSource::from_value(
            "bad",
            json!({ "images": [{ "imageID": "img1" }] }),
        )
        .unwrap();
        let err = src.images().unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("bad:images"), "got: {err}");
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(SnapshotSource::from_json("x", "[1, 2]").is_err());
    }
}
