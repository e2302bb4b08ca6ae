// ── Network pass: networks, subnets, ports, associations ──
//
// Runs after the instance pass. Each network is drained from the
// external-port index so that every external attachment is associated
// with the subnet it sits in exactly once.

use std::collections::HashMap;

use tracing::debug;

use pvs_api::{InstanceNetwork, Network, RecordSource};

use crate::index::ExternalPortIndex;
use crate::model::{
    CloudNetwork, CloudSubnet, CloudSubnetNetworkPort, EntityId, EntityKind, MacAddress,
    NetworkPort, Reference,
};
use crate::store::StagingStore;

const ACTIVE: &str = "active";
const IP_VERSION: &str = "4";
const NETWORK_PROTOCOL: &str = "IPv4";

pub(crate) fn networks(
    source: &dyn RecordSource,
    store: &StagingStore,
    zone: &Reference,
    external_ports: &mut ExternalPortIndex,
) -> Result<usize, pvs_api::Error> {
    let networks = source.networks()?;
    for network in &networks {
        let cloud_network = store.register(build_cloud_network(network));
        let subnet = store.register(build_cloud_subnet(network, &cloud_network, zone));

        let by_mac = register_ports(source, store, network, &subnet)?;

        for attachment in external_ports.take(&network.network_id) {
            store.register(external_association(&attachment, &subnet, &by_mac));
        }
    }
    Ok(networks.len())
}

pub(crate) fn build_cloud_network(network: &Network) -> CloudNetwork {
    let network_type = network.network_type.as_deref().unwrap_or_default();
    CloudNetwork {
        ems_ref: EntityId::from(format!("{}-{network_type}", network.network_id)),
        name: format!(
            "{}-{network_type}",
            network.name.as_deref().unwrap_or_default()
        ),
        cidr: String::new(),
        enabled: true,
        status: ACTIVE.into(),
    }
}

pub(crate) fn build_cloud_subnet(
    network: &Network,
    cloud_network: &Reference,
    zone: &Reference,
) -> CloudSubnet {
    CloudSubnet {
        ems_ref: EntityId::from(network.network_id.as_str()),
        name: network.name.clone(),
        cloud_network: cloud_network.clone(),
        cidr: network.cidr.clone(),
        gateway: network.gateway.clone(),
        status: ACTIVE.into(),
        dns_nameservers: network.dns_servers.clone().unwrap_or_default(),
        ip_version: IP_VERSION.into(),
        network_protocol: NETWORK_PROTOCOL.into(),
        availability_zone: zone.clone(),
        network_type: network.network_type.clone(),
    }
}

/// Register the ports of one network with their internal addresses.
/// Returns the ports by normalized MAC for external-address matching.
fn register_ports(
    source: &dyn RecordSource,
    store: &StagingStore,
    network: &Network,
    subnet: &Reference,
) -> Result<HashMap<MacAddress, Reference>, pvs_api::Error> {
    let mut by_mac = HashMap::new();
    for port in source.ports(&network.network_id)? {
        let mac_address = port.mac_address.as_deref().map(MacAddress::new);
        let port_ref = store.register(NetworkPort {
            ems_ref: EntityId::from(port.port_id.as_str()),
            name: port.port_id.clone(),
            status: port.status.clone(),
            mac_address: mac_address.clone(),
            device_ref: port.instance_id().map(str::to_owned),
            device: port
                .instance_id()
                .map(|id| Reference::lazy(EntityKind::Vm, id)),
        });

        if let Some(mac) = mac_address {
            by_mac.insert(mac, port_ref.clone());
        }

        store.register(CloudSubnetNetworkPort {
            network_port: Some(port_ref),
            cloud_subnet: subnet.clone(),
            address: port.ip_address.clone(),
        });
    }
    Ok(by_mac)
}

/// Association of an instance's external IP with the subnet, bound to the
/// port sharing the attachment's MAC when one exists.
pub(crate) fn external_association(
    attachment: &InstanceNetwork,
    subnet: &Reference,
    by_mac: &HashMap<MacAddress, Reference>,
) -> CloudSubnetNetworkPort {
    let network_port = attachment
        .mac_address
        .as_deref()
        .map(MacAddress::new)
        .and_then(|mac| by_mac.get(&mac).cloned());
    if network_port.is_none() {
        debug!(
            subnet = %subnet.key,
            mac = ?attachment.mac_address,
            "no port matches external attachment"
        );
    }

    CloudSubnetNetworkPort {
        network_port,
        cloud_subnet: subnet.clone(),
        address: attachment.external_ip().map(str::to_owned),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn network() -> Network {
        serde_json::from_value(json!({
            "networkID": "n1",
            "name": "pub",
            "type": "pub-vlan",
            "cidr": "10.0.0.0/24",
            "gateway": "10.0.0.1",
            "dnsServers": ["9.9.9.9"]
        }))
        .unwrap()
    }

    #[test]
    fn network_identity_combines_id_and_type() {
        let cn = build_cloud_network(&network());
        assert_eq!(cn.ems_ref, EntityId::from("n1-pub-vlan"));
        assert_eq!(cn.name, "pub-pub-vlan");
        assert_eq!(cn.cidr, "");
        assert!(cn.enabled);
    }

    #[test]
    fn subnet_carries_addressing() {
        let cn = Reference::lazy(EntityKind::CloudNetwork, "n1-pub-vlan");
        let zone = Reference::lazy(EntityKind::AvailabilityZone, "ws1");
        let subnet = build_cloud_subnet(&network(), &cn, &zone);
        assert_eq!(subnet.ems_ref, EntityId::from("n1"));
        assert_eq!(subnet.cidr.as_deref(), Some("10.0.0.0/24"));
        assert_eq!(subnet.dns_nameservers, vec!["9.9.9.9".to_owned()]);
        assert_eq!(subnet.ip_version, "4");
        assert_eq!(subnet.network_protocol, "IPv4");
        assert_eq!(subnet.cloud_network, cn);
    }

    #[test]
    fn external_association_matches_port_by_normalized_mac() {
        let subnet = Reference::lazy(EntityKind::CloudSubnet, "n1");
        let port = Reference::lazy(EntityKind::NetworkPort, "p1");
        let by_mac = HashMap::from([(MacAddress::new("aa:bb:cc:dd:ee:ff"), port.clone())]);

        let attachment = InstanceNetwork {
            network_id: Some("n1".into()),
            network_name: None,
            ip_address: Some("10.0.0.5".into()),
            external_ip: Some("1.2.3.4".into()),
            mac_address: Some("AA-BB-CC-DD-EE-FF".into()),
            network_type: None,
        };
        let assoc = external_association(&attachment, &subnet, &by_mac);
        assert_eq!(assoc.network_port, Some(port));
        assert_eq!(assoc.address.as_deref(), Some("1.2.3.4"));

        let unmatched = InstanceNetwork {
            mac_address: Some("00:00:00:00:00:01".into()),
            ..attachment
        };
        let assoc = external_association(&unmatched, &subnet, &by_mac);
        assert_eq!(assoc.network_port, None);
        assert_eq!(assoc.cloud_subnet, subnet);
    }
}
