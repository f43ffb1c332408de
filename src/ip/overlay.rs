//! Family-agnostic overlay address.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{AddressError, Family};
use super::net::IpNet;
use super::{decode_json, encode_json, OverlayAddress, OverlayIpv4, OverlayIpv6};
use crate::utils::ip_utils::parse_any_literal;

/// Either an [`OverlayIpv6`] or an [`OverlayIpv4`], chosen by the literal.
///
/// Wide-only operations (state, host address) are reached through
/// [`OverlayIp::as_ipv6`]. The empty address of either family renders as
/// `""` and decodes back as the empty IPv6 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayIp {
    V6(OverlayIpv6),
    V4(OverlayIpv4),
}

impl OverlayIp {
    /// Parse a literal of either family.
    ///
    /// The empty string is rejected since it names no family. The wire
    /// decoders ([`OverlayIp::from_json`] and serde) accept it instead.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        parse_any_literal(text).map(Self::derive)
    }

    /// The empty address, held by the wide family
    pub const fn empty() -> Self {
        OverlayIp::V6(OverlayIpv6::empty())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OverlayIp::V6(ip) => ip.is_empty(),
            OverlayIp::V4(ip) => ip.is_empty(),
        }
    }

    /// Decode a wire literal, where `""` is the empty address
    fn from_literal(literal: &str) -> Result<Self, AddressError> {
        if literal.is_empty() {
            return Ok(Self::empty());
        }
        Self::parse(literal)
    }

    pub fn derive(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V6(ip) => OverlayIp::V6(OverlayIpv6::derive(ip)),
            IpAddr::V4(ip) => OverlayIp::V4(OverlayIpv4::derive(ip)),
        }
    }

    pub fn family(&self) -> Family {
        match self {
            OverlayIp::V6(_) => Family::Ipv6,
            OverlayIp::V4(_) => Family::Ipv4,
        }
    }

    pub fn as_ipv6(&self) -> Option<&OverlayIpv6> {
        match self {
            OverlayIp::V6(ip) => Some(ip),
            OverlayIp::V4(_) => None,
        }
    }

    pub fn as_ipv4(&self) -> Option<&OverlayIpv4> {
        match self {
            OverlayIp::V4(ip) => Some(ip),
            OverlayIp::V6(_) => None,
        }
    }

    pub fn to_json(&self) -> Vec<u8> {
        encode_json(self.to_string())
    }

    /// Decode the JSON wire form. `""` decodes to [`OverlayIp::empty`].
    pub fn from_json(payload: &[u8]) -> Result<Self, AddressError> {
        let literal = decode_json(payload)?;
        Self::from_literal(&literal)
    }
}

impl OverlayAddress for OverlayIp {
    fn node_id(&self) -> u32 {
        match self {
            OverlayIp::V6(ip) => ip.node_id(),
            OverlayIp::V4(ip) => ip.node_id(),
        }
    }

    fn endpoint_id(&self) -> u16 {
        match self {
            OverlayIp::V6(ip) => ip.endpoint_id(),
            OverlayIp::V4(ip) => ip.endpoint_id(),
        }
    }

    fn is_valid_container_address(&self) -> bool {
        match self {
            OverlayIp::V6(ip) => ip.is_valid_container_address(),
            OverlayIp::V4(ip) => ip.is_valid_container_address(),
        }
    }

    fn is_valid_node_address(&self) -> bool {
        match self {
            OverlayIp::V6(ip) => ip.is_valid_node_address(),
            OverlayIp::V4(ip) => ip.is_valid_node_address(),
        }
    }

    fn node_address(&self) -> Self {
        match self {
            OverlayIp::V6(ip) => OverlayIp::V6(ip.node_address()),
            OverlayIp::V4(ip) => OverlayIp::V4(ip.node_address()),
        }
    }

    fn ip(&self) -> Option<IpAddr> {
        match self {
            OverlayIp::V6(ip) => ip.to_ipv6().map(IpAddr::V6),
            OverlayIp::V4(ip) => ip.to_ipv4().map(IpAddr::V4),
        }
    }

    fn ip_net(&self, prefix_len: u8) -> Result<IpNet, AddressError> {
        match self {
            OverlayIp::V6(ip) => ip.ip_net(prefix_len),
            OverlayIp::V4(ip) => ip.ip_net(prefix_len),
        }
    }
}

impl From<OverlayIpv6> for OverlayIp {
    fn from(ip: OverlayIpv6) -> Self {
        OverlayIp::V6(ip)
    }
}

impl From<OverlayIpv4> for OverlayIp {
    fn from(ip: OverlayIpv4) -> Self {
        OverlayIp::V4(ip)
    }
}

impl From<IpAddr> for OverlayIp {
    fn from(ip: IpAddr) -> Self {
        Self::derive(ip)
    }
}

impl FromStr for OverlayIp {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OverlayIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayIp::V6(ip) => fmt::Display::fmt(ip, f),
            OverlayIp::V4(ip) => fmt::Display::fmt(ip, f),
        }
    }
}

impl Serialize for OverlayIp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OverlayIp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        Self::from_literal(&literal).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_picks_family() {
        let v6 = OverlayIp::parse("f00d::5:0:2a").unwrap();
        assert_eq!(v6.family(), Family::Ipv6);
        assert!(v6.as_ipv6().is_some());
        assert!(v6.as_ipv4().is_none());

        let v4 = OverlayIp::parse("10.5.0.42").unwrap();
        assert_eq!(v4.family(), Family::Ipv4);
        assert!(v4.as_ipv4().is_some());
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(matches!(OverlayIp::parse(""), Err(AddressError::MalformedLiteral { .. })));
        assert!(matches!(
            OverlayIp::parse("not-an-ip"),
            Err(AddressError::MalformedLiteral { .. })
        ));
    }

    #[test]
    fn test_capabilities_dispatch() {
        let v6 = OverlayIp::parse("f00d::5:0:2a").unwrap();
        assert_eq!(v6.node_id(), 5);
        assert_eq!(v6.endpoint_id(), 42);
        assert!(v6.is_valid_container_address());
        assert_eq!(v6.node_address().to_string(), "f00d::5:0:0");
        assert_eq!(v6.as_ipv6().map(|ip| ip.host_address().endpoint_id()), Some(0xffff));

        let v4 = OverlayIp::parse("10.5.0.42").unwrap();
        assert_eq!(v4.node_id(), 0x0a05);
        assert!(v4.is_valid_node_address());
        assert_eq!(v4.node_address().to_string(), "10.5.0.1");
        assert_eq!(v4.ip_net(16).unwrap().to_string(), "10.5.0.42/16");
    }

    #[test]
    fn test_json_and_serde() {
        let v4 = OverlayIp::parse("10.5.0.42").unwrap();
        assert_eq!(OverlayIp::from_json(&v4.to_json()).unwrap(), v4);
        assert_eq!(serde_json::to_string(&v4).unwrap(), r#""10.5.0.42""#);

        let parsed: OverlayIp = serde_json::from_str(r#""f00d::1""#).unwrap();
        assert_eq!(parsed.family(), Family::Ipv6);
        assert!(serde_json::from_str::<OverlayIp>(r#""bogus""#).is_err());
    }

    #[test]
    fn test_empty_address_wire_round_trip() {
        for empty in [OverlayIp::V6(OverlayIpv6::empty()), OverlayIp::V4(OverlayIpv4::empty())] {
            assert!(empty.is_empty());
            assert_eq!(empty.to_json(), br#""""#.to_vec());

            let decoded = OverlayIp::from_json(&empty.to_json()).unwrap();
            assert!(decoded.is_empty());
            assert_eq!(decoded, OverlayIp::empty());

            let json = serde_json::to_string(&empty).unwrap();
            assert_eq!(json, r#""""#);
            let decoded: OverlayIp = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, OverlayIp::empty());
            assert_eq!(decoded.ip(), None);
        }
    }
}
