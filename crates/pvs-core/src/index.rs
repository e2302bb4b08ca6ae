// ── Cross-reference indexes ──
//
// Side tables filled while one pass runs and read by a later pass, for
// facts a record set does not carry itself. Both are owned by the
// orchestrator for the duration of one refresh.
//
//   ImageArchIndex     produced by: images    consumed by: instances
//   ExternalPortIndex  produced by: instances consumed by: networks

use std::collections::HashMap;

use pvs_api::InstanceNetwork;

/// Image id → architecture tag (`ppc64le`, `ppc64`, ...).
#[derive(Debug, Default)]
pub struct ImageArchIndex {
    by_image: HashMap<String, String>,
}

impl ImageArchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, image_id: impl Into<String>, architecture: impl Into<String>) {
        self.by_image.insert(image_id.into(), architecture.into());
    }

    /// Architecture of a previously seen image.
    pub fn architecture(&self, image_id: &str) -> Option<&str> {
        self.by_image.get(image_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_image.is_empty()
    }
}

/// Network id → instance attachments that carry an external IP.
///
/// Insertion order is kept per network so associations are registered in
/// the order the instances were listed.
#[derive(Debug, Default)]
pub struct ExternalPortIndex {
    by_network: HashMap<String, Vec<InstanceNetwork>>,
}

impl ExternalPortIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, network_id: impl Into<String>, attachment: InstanceNetwork) {
        self.by_network
            .entry(network_id.into())
            .or_default()
            .push(attachment);
    }

    pub fn get(&self, network_id: &str) -> &[InstanceNetwork] {
        self.by_network
            .get(network_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Remove and return the attachments recorded for a network.
    pub fn take(&mut self, network_id: &str) -> Vec<InstanceNetwork> {
        self.by_network.remove(network_id).unwrap_or_default()
    }

    /// Network ids that still have attachments waiting.
    pub fn pending_networks(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_network.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of recorded attachments across all networks.
    pub fn len(&self) -> usize {
        self.by_network.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_network.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(network: &str, ip: &str) -> InstanceNetwork {
        InstanceNetwork {
            network_id: Some(network.into()),
            network_name: None,
            ip_address: None,
            external_ip: Some(ip.into()),
            mac_address: None,
            network_type: None,
        }
    }

    #[test]
    fn arch_lookup_hit_and_miss() {
        let mut idx = ImageArchIndex::new();
        idx.record("img1", "ppc64le");
        assert_eq!(idx.architecture("img1"), Some("ppc64le"));
        assert_eq!(idx.architecture("img2"), None);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn external_ports_accumulate_in_order() {
        let mut idx = ExternalPortIndex::new();
        idx.push("n1", attachment("n1", "1.2.3.4"));
        idx.push("n1", attachment("n1", "1.2.3.5"));
        idx.push("n2", attachment("n2", "5.6.7.8"));

        let ips: Vec<_> = idx
            .get("n1")
            .iter()
            .filter_map(|a| a.external_ip())
            .collect();
        assert_eq!(ips, ["1.2.3.4", "1.2.3.5"]);
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn take_drains_one_network() {
        let mut idx = ExternalPortIndex::new();
        idx.push("n1", attachment("n1", "1.2.3.4"));
        idx.push("n2", attachment("n2", "5.6.7.8"));

        assert_eq!(idx.take("n1").len(), 1);
        assert!(idx.take("n1").is_empty());
        assert_eq!(idx.pending_networks(), ["n2"]);
    }
}
