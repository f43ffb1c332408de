//! Human- and machine-readable breakdown of an overlay address.

use serde::Serialize;
use std::fmt;

use crate::ip::{AddressError, AllocationRequest, OverlayAddress, OverlayIp};

/// Everything that can be read off an address
#[derive(Debug, Clone, Serialize)]
pub struct AddressReport {
    pub address: OverlayIp,
    pub family: String,
    pub node_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<u16>,
    pub endpoint_id: u16,
    pub valid_container: bool,
    pub valid_node: bool,
    pub node_address: OverlayIp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_address: Option<OverlayIp>,
    pub network: String,
    pub allocation_request: AllocationRequest,
}

/// Describe an address, viewing its network with `prefix_len`
pub fn describe(address: &OverlayIp, prefix_len: u8) -> Result<AddressReport, AddressError> {
    let net = address.ip_net(prefix_len)?;
    let wide = address.as_ipv6();

    Ok(AddressReport {
        address: *address,
        family: address.family().to_string(),
        node_id: address.node_id(),
        state: wide.map(|ip| ip.state()),
        endpoint_id: address.endpoint_id(),
        valid_container: address.is_valid_container_address(),
        valid_node: address.is_valid_node_address(),
        node_address: address.node_address(),
        host_address: wide.map(|ip| OverlayIp::V6(ip.host_address())),
        network: format!("{}/{}", net.network(), net.prefix_len()),
        allocation_request: address.allocation_request(),
    })
}

impl fmt::Display for AddressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "address:         {} ({})", self.address, self.family)?;
        writeln!(f, "node id:         {}", self.node_id)?;
        if let Some(state) = self.state {
            writeln!(f, "state:           {}", state)?;
        }
        writeln!(f, "endpoint id:     {}", self.endpoint_id)?;
        writeln!(f, "valid container: {}", self.valid_container)?;
        writeln!(f, "valid node:      {}", self.valid_node)?;
        writeln!(f, "node address:    {}", self.node_address)?;
        if let Some(host) = &self.host_address {
            writeln!(f, "host address:    {}", host)?;
        }
        write!(f, "network:         {}", self.network)
    }
}
