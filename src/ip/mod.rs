//! Structured overlay addresses.
//!
//! Every node and every endpoint in the cluster owns an IP address whose bits
//! carry identity: the owning node's ID and the endpoint's ID on that node.
//! Topology can therefore be read off an address without any lookup.
//!
//! Two families share one contract, [`OverlayAddress`]:
//!
//! - [`OverlayIpv6`]: `prefix(64) | node id(32) | state(16) | endpoint id(16)`
//! - [`OverlayIpv4`]: `node id(16) | endpoint id(16)`
//!
//! [`OverlayIp`] is the family-agnostic sum of both.

pub mod allocator;
pub mod error;
pub mod ipv4;
pub mod ipv6;
pub mod net;
pub mod overlay;

use std::fmt;
use std::net::IpAddr;

// Re-export commonly used types
pub use allocator::AllocationRequest;
pub use error::{AddressError, Family};
pub use ipv4::OverlayIpv4;
pub use ipv6::OverlayIpv6;
pub use net::IpNet;
pub use overlay::OverlayIp;

/// Capabilities shared by both address families.
///
/// Accessors never validate; they read fixed bit ranges and return 0 for
/// unset fields. Validation is the explicit job of the two predicates.
pub trait OverlayAddress: fmt::Display {
    /// Node ID of the owning node, 0 when unset
    fn node_id(&self) -> u32;

    /// Endpoint ID on the owning node
    fn endpoint_id(&self) -> u16;

    /// Whether the address identifies a specific endpoint
    fn is_valid_container_address(&self) -> bool;

    /// Whether the address identifies a node itself
    fn is_valid_node_address(&self) -> bool;

    /// Address of the node owning this endpoint
    fn node_address(&self) -> Self
    where
        Self: Sized;

    /// The plain IP value, `None` for the empty address
    fn ip(&self) -> Option<IpAddr>;

    /// Network view of the address with the given prefix length
    fn ip_net(&self, prefix_len: u8) -> Result<IpNet, AddressError>;

    fn is_empty(&self) -> bool {
        self.ip().is_none()
    }

    /// Package the address for the pool allocator
    fn allocation_request(&self) -> AllocationRequest {
        AllocationRequest::new(self.ip())
    }
}

/// Wire form of an address: a JSON string holding its text form
pub(crate) fn encode_json(text: String) -> Vec<u8> {
    serde_json::Value::String(text).to_string().into_bytes()
}

/// Extract the quoted literal from a JSON address payload
pub(crate) fn decode_json(payload: &[u8]) -> Result<String, AddressError> {
    if payload.len() < 2 {
        return Err(AddressError::TruncatedJson {
            payload: String::from_utf8_lossy(payload).into_owned(),
        });
    }

    let literal: String = serde_json::from_slice(payload).map_err(|source| AddressError::InvalidJson {
        payload: String::from_utf8_lossy(payload).into_owned(),
        source,
    })?;

    if literal.is_empty() {
        log::debug!("Decoded empty address from JSON payload");
    }
    Ok(literal)
}
