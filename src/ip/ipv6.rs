//! Wide (128-bit) overlay address.
//!
//! Bit layout, big endian:
//!
//! | bits    | field       |
//! |---------|-------------|
//! | 0-63    | prefix      |
//! | 64-95   | node id     |
//! | 96-111  | state       |
//! | 112-127 | endpoint id |

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{AddressError, Family};
use super::net::IpNet;
use super::{decode_json, encode_json, OverlayAddress};
use crate::utils::ip_utils::parse_literal;

const LEN: usize = 16;

/// Endpoint ID reserved for the node's own network stack
pub const HOST_ENDPOINT_ID: u16 = 0xffff;

/// IPv6 address carrying node ID, state and endpoint ID.
///
/// The default value is the empty address, rendered as `""`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayIpv6(Option<[u8; LEN]>);

impl OverlayIpv6 {
    /// The empty (absent) address
    pub const fn empty() -> Self {
        OverlayIpv6(None)
    }

    /// Parse an IPv6 literal. The empty string yields the empty address.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        if text.is_empty() {
            return Ok(Self::empty());
        }

        match parse_literal(text, Family::Ipv6)? {
            IpAddr::V6(ip) => Ok(Self::derive(ip)),
            IpAddr::V4(_) => Err(AddressError::WrongFamily {
                literal: text.to_string(),
                expected: Family::Ipv6,
            }),
        }
    }

    /// Copy an address already known to be an overlay IPv6 address
    pub fn derive(ip: Ipv6Addr) -> Self {
        OverlayIpv6(Some(ip.octets()))
    }

    /// Build from raw bytes, which must be exactly 16 long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let octets: [u8; LEN] = bytes.try_into().map_err(|_| AddressError::InvalidLength {
            expected: LEN,
            actual: bytes.len(),
        })?;
        Ok(OverlayIpv6(Some(octets)))
    }

    /// Compose an address from its fields. Only the upper 64 bits of
    /// `prefix` are used; the state is zero.
    pub fn from_parts(prefix: Ipv6Addr, node_id: u32, endpoint_id: u16) -> Self {
        let mut octets = [0u8; LEN];
        octets[..8].copy_from_slice(&prefix.octets()[..8]);
        octets[8..12].copy_from_slice(&node_id.to_be_bytes());
        octets[14..].copy_from_slice(&endpoint_id.to_be_bytes());
        OverlayIpv6(Some(octets))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Raw bytes; the empty address reads as all zeros
    pub fn octets(&self) -> [u8; LEN] {
        self.0.unwrap_or([0u8; LEN])
    }

    pub fn to_ipv6(&self) -> Option<Ipv6Addr> {
        self.0.map(Ipv6Addr::from)
    }

    /// The 64-bit cluster prefix
    pub fn prefix(&self) -> u64 {
        let o = self.octets();
        u64::from_be_bytes([o[0], o[1], o[2], o[3], o[4], o[5], o[6], o[7]])
    }

    pub fn node_id(&self) -> u32 {
        let o = self.octets();
        u32::from_be_bytes([o[8], o[9], o[10], o[11]])
    }

    /// Reserved status field, must be 0 for valid addresses
    pub fn state(&self) -> u16 {
        let o = self.octets();
        u16::from_be_bytes([o[12], o[13]])
    }

    pub fn endpoint_id(&self) -> u16 {
        let o = self.octets();
        u16::from_be_bytes([o[14], o[15]])
    }

    /// Node ID set, state clear, endpoint ID set
    pub fn is_valid_container_address(&self) -> bool {
        self.node_id() != 0 && self.state() == 0 && self.endpoint_id() != 0
    }

    /// Node ID set, state clear, endpoint ID clear
    pub fn is_valid_node_address(&self) -> bool {
        self.node_id() != 0 && self.state() == 0 && self.endpoint_id() == 0
    }

    /// Address of the owning node: the endpoint ID zeroed
    pub fn node_address(&self) -> Self {
        self.with_endpoint_id(0)
    }

    /// Address of the node's own network stack: the endpoint ID set to
    /// [`HOST_ENDPOINT_ID`]
    pub fn host_address(&self) -> Self {
        self.with_endpoint_id(HOST_ENDPOINT_ID)
    }

    /// Copy of this address with another endpoint ID. The empty address
    /// stays empty.
    pub fn with_endpoint_id(&self, endpoint_id: u16) -> Self {
        OverlayIpv6(self.0.map(|mut octets| {
            octets[14..].copy_from_slice(&endpoint_id.to_be_bytes());
            octets
        }))
    }

    pub fn ip_net(&self, prefix_len: u8) -> Result<IpNet, AddressError> {
        IpNet::v6(Ipv6Addr::from(self.octets()), prefix_len)
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

impl OverlayAddress for OverlayIpv6 {
    fn node_id(&self) -> u32 {
        OverlayIpv6::node_id(self)
    }

    fn endpoint_id(&self) -> u16 {
        OverlayIpv6::endpoint_id(self)
    }

    fn is_valid_container_address(&self) -> bool {
        OverlayIpv6::is_valid_container_address(self)
    }

    fn is_valid_node_address(&self) -> bool {
        OverlayIpv6::is_valid_node_address(self)
    }

    fn node_address(&self) -> Self {
        OverlayIpv6::node_address(self)
    }

    fn ip(&self) -> Option<IpAddr> {
        self.to_ipv6().map(IpAddr::V6)
    }

    fn ip_net(&self, prefix_len: u8) -> Result<IpNet, AddressError> {
        OverlayIpv6::ip_net(self, prefix_len)
    }
}

impl From<Ipv6Addr> for OverlayIpv6 {
    fn from(ip: Ipv6Addr) -> Self {
        Self::derive(ip)
    }
}

impl FromStr for OverlayIpv6 {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OverlayIpv6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_ipv6() {
            Some(ip) => write!(f, "{}", ip),
            None => Ok(()),
        }
    }
}

impl Serialize for OverlayIpv6 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OverlayIpv6 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        Self::parse(&literal).map_err(serde::de::Error::custom)
    }
}
