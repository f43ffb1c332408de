//! Narrow (32-bit) overlay address: `node id(16) | endpoint id(16)`.
//!
//! Unlike the wide family there is no encoding for "the node itself": a node
//! address looks the same as a container address, and the node address of
//! an endpoint is obtained by setting the last byte to 1.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{AddressError, Family};
use super::net::IpNet;
use super::{decode_json, encode_json, OverlayAddress};
use crate::utils::ip_utils::parse_literal;

const LEN: usize = 4;

/// IPv4 address carrying node ID and endpoint ID.
///
/// The default value is the empty address, rendered as `""`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayIpv4(Option<[u8; LEN]>);

impl OverlayIpv4 {
    /// The empty (absent) address
    pub const fn empty() -> Self {
        OverlayIpv4(None)
    }

    /// Parse an IPv4 literal. The empty string yields the empty address.
    ///
    /// IPv4-mapped IPv6 literals (`::ffff:10.0.0.1`) are not narrowed to
    /// their IPv4 form; they are rejected as `WrongFamily` even though they
    /// carry a 32-bit address.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        if text.is_empty() {
            return Ok(Self::empty());
        }

        match parse_literal(text, Family::Ipv4)? {
            IpAddr::V4(ip) => Ok(Self::derive(ip)),
            IpAddr::V6(_) => Err(AddressError::WrongFamily {
                literal: text.to_string(),
                expected: Family::Ipv4,
            }),
        }
    }

    /// Copy an address already known to be an overlay IPv4 address
    pub fn derive(ip: Ipv4Addr) -> Self {
        OverlayIpv4(Some(ip.octets()))
    }

    /// Build from raw bytes, which must be exactly 4 long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let octets: [u8; LEN] = bytes.try_into().map_err(|_| AddressError::InvalidLength {
            expected: LEN,
            actual: bytes.len(),
        })?;
        Ok(OverlayIpv4(Some(octets)))
    }

    /// Compose an address from its fields
    pub fn from_parts(node_id: u16, endpoint_id: u16) -> Self {
        let mut octets = [0u8; LEN];
        octets[..2].copy_from_slice(&node_id.to_be_bytes());
        octets[2..].copy_from_slice(&endpoint_id.to_be_bytes());
        OverlayIpv4(Some(octets))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Raw bytes; the empty address reads as all zeros
    pub fn octets(&self) -> [u8; LEN] {
        self.0.unwrap_or([0u8; LEN])
    }

    pub fn to_ipv4(&self) -> Option<Ipv4Addr> {
        self.0.map(Ipv4Addr::from)
    }

    /// Node ID from the upper 16 bits, widened
    pub fn node_id(&self) -> u32 {
        let o = self.octets();
        u32::from(u16::from_be_bytes([o[0], o[1]]))
    }

    pub fn endpoint_id(&self) -> u16 {
        let o = self.octets();
        u16::from_be_bytes([o[2], o[3]])
    }

    /// Node ID set and endpoint ID set
    pub fn is_valid_container_address(&self) -> bool {
        self.node_id() != 0 && self.endpoint_id() != 0
    }

    // Same predicate as for containers: the family has no node-only form.
    pub fn is_valid_node_address(&self) -> bool {
        self.is_valid_container_address()
    }

    /// Address of the owning node: the last byte set to 1
    pub fn node_address(&self) -> Self {
        OverlayIpv4(self.0.map(|mut octets| {
            octets[3] = 1;
            octets
        }))
    }

    pub fn ip_net(&self, prefix_len: u8) -> Result<IpNet, AddressError> {
        IpNet::v4(Ipv4Addr::from(self.octets()), prefix_len)
    }

    /// JSON wire form: the text form as a JSON string
    pub fn to_json(&self) -> Vec<u8> {
        encode_json(self.to_string())
    }

    /// Decode the JSON wire form. `""` decodes to the empty address.
    pub fn from_json(payload: &[u8]) -> Result<Self, AddressError> {
        let literal = decode_json(payload)?;
        Self::parse(&literal)
    }
}

impl OverlayAddress for OverlayIpv4 {
    fn node_id(&self) -> u32 {
        OverlayIpv4::node_id(self)
    }

    fn endpoint_id(&self) -> u16 {
        OverlayIpv4::endpoint_id(self)
    }

    fn is_valid_container_address(&self) -> bool {
        OverlayIpv4::is_valid_container_address(self)
    }

    fn is_valid_node_address(&self) -> bool {
        OverlayIpv4::is_valid_node_address(self)
    }

    fn node_address(&self) -> Self {
        OverlayIpv4::node_address(self)
    }

    fn ip(&self) -> Option<IpAddr> {
        self.to_ipv4().map(IpAddr::V4)
    }

    fn ip_net(&self, prefix_len: u8) -> Result<IpNet, AddressError> {
        OverlayIpv4::ip_net(self, prefix_len)
    }
}

impl From<Ipv4Addr> for OverlayIpv4 {
    fn from(ip: Ipv4Addr) -> Self {
        Self::derive(ip)
    }
}

impl FromStr for OverlayIpv4 {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OverlayIpv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_ipv4() {
            Some(ip) => write!(f, "{}", ip),
            None => Ok(()),
        }
    }
}

impl Serialize for OverlayIpv4 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OverlayIpv4 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        Self::parse(&literal).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> OverlayIpv4 {
        OverlayIpv4::parse(s).unwrap()
    }

    #[test]
    fn test_field_accessors() {
        let ip = addr("10.5.0.42");
        assert_eq!(ip.node_id(), 0x0a05);
        assert_eq!(ip.endpoint_id(), 42);

        let ip: OverlayIpv4 = Ipv4Addr::new(0xff, 0xff, 0x12, 0x34).into();
        assert_eq!(ip.node_id(), 0xffff);
        assert_eq!(ip.endpoint_id(), 0x1234);
    }

    #[test]
    fn test_zero_node_id_is_never_valid() {
        for octets in [[0, 0, 0, 42], [0, 0, 1, 0], [0, 0, 0, 0]] {
            let ip = OverlayIpv4::from_slice(&octets).unwrap();
            assert_eq!(ip.node_id(), 0);
            assert!(!ip.is_valid_container_address());
            assert!(!ip.is_valid_node_address());
        }
    }

    #[test]
    fn test_zero_endpoint_id_is_never_valid() {
        let ip = addr("10.5.0.0");
        assert!(!ip.is_valid_container_address());
        assert!(!ip.is_valid_node_address());
    }

    #[test]
    fn test_node_and_container_predicates_coincide() {
        let ip = OverlayIpv4::from_parts(5, 42);
        assert!(ip.is_valid_container_address());
        assert!(ip.is_valid_node_address());
    }

    #[test]
    fn test_node_address_sets_last_byte() {
        let ip = addr("10.5.3.42");
        let node = ip.node_address();
        assert_eq!(node.to_string(), "10.5.3.1");
        assert_eq!(node.node_id(), ip.node_id());
        // Endpoint ID is not zeroed, only its low byte is replaced
        assert_eq!(node.endpoint_id(), 0x0301);
        assert_eq!(ip.to_string(), "10.5.3.42");
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(OverlayIpv4::from_parts(0x0a05, 42), addr("10.5.0.42"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            OverlayIpv4::parse("f00d::1"),
            Err(AddressError::WrongFamily { expected: Family::Ipv4, .. })
        ));
        assert!(matches!(
            OverlayIpv4::parse("::ffff:10.0.0.1"),
            Err(AddressError::WrongFamily { .. })
        ));
        assert!(matches!(
            OverlayIpv4::parse("10.0.0.256"),
            Err(AddressError::MalformedLiteral { .. })
        ));
        assert!(matches!(
            OverlayIpv4::from_slice(&[10, 0, 0]),
            Err(AddressError::InvalidLength { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_empty_address() {
        let empty = OverlayIpv4::default();
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "");
        assert_eq!(addr(""), empty);
        assert!(!empty.is_valid_container_address());
        assert!(empty.node_address().is_empty());
    }

    #[test]
    fn test_json_wire_form() {
        let ip = addr("10.5.0.42");
        assert_eq!(ip.to_json(), br#""10.5.0.42""#.to_vec());
        assert_eq!(OverlayIpv4::from_json(&ip.to_json()).unwrap(), ip);
        assert!(OverlayIpv4::from_json(br#""""#).unwrap().is_empty());
        assert!(matches!(
            OverlayIpv4::from_json(b"x"),
            Err(AddressError::TruncatedJson { .. })
        ));
        assert!(matches!(
            OverlayIpv4::from_json(br#""not-an-ip""#),
            Err(AddressError::MalformedLiteral { .. })
        ));
    }

    #[test]
    fn test_ip_net() {
        let net = addr("10.5.0.42").ip_net(16).unwrap();
        assert_eq!(net.to_string(), "10.5.0.42/16");
        assert_eq!(net.network(), IpAddr::V4(Ipv4Addr::new(10, 5, 0, 0)));
        assert!(addr("10.5.0.42").ip_net(33).is_err());
    }
}
