//! IP utility functions for literal classification and prefix masks.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::ip::error::{AddressError, Family};

/// Parse a textual IP literal of either family.
///
/// Text that is no IP literal at all yields `MalformedLiteral`.
pub fn parse_any_literal(text: &str) -> Result<IpAddr, AddressError> {
    text.parse::<IpAddr>().map_err(|_| {
        log::debug!("Rejecting malformed IP literal '{}'", text);
        AddressError::MalformedLiteral {
            literal: text.to_string(),
        }
    })
}

/// Family of a parsed IP address
pub fn family_of(ip: &IpAddr) -> Family {
    match ip {
        IpAddr::V4(_) => Family::Ipv4,
        IpAddr::V6(_) => Family::Ipv6,
    }
}

/// Parse a textual IP literal, requiring it to belong to `expected`.
///
/// Text that is no IP literal at all yields `MalformedLiteral`; a literal of
/// the other family yields `WrongFamily`. IPv4-mapped IPv6 literals such as
/// `::ffff:10.0.0.1` are IPv6 literals and are not narrowed.
pub fn parse_literal(text: &str, expected: Family) -> Result<IpAddr, AddressError> {
    let ip = parse_any_literal(text)?;

    let family = family_of(&ip);
    if family != expected {
        log::debug!("Rejecting {} literal '{}' where {} was expected", family, text, expected);
        return Err(AddressError::WrongFamily {
            literal: text.to_string(),
            expected,
        });
    }

    Ok(ip)
}

/// Build the N-byte network mask with the leading `prefix_len` bits set
pub fn prefix_mask<const N: usize>(prefix_len: u8) -> Result<[u8; N], AddressError> {
    let max = u8::try_from(N * 8).unwrap_or(u8::MAX);
    if prefix_len > max {
        return Err(AddressError::InvalidPrefixLength { prefix_len, max });
    }

    let mut mask = [0u8; N];
    let mut remaining = prefix_len;
    for byte in mask.iter_mut() {
        if remaining >= 8 {
            *byte = 0xff;
            remaining -= 8;
        } else {
            // Partial byte, then all zeros
            *byte = !(0xffu8 >> remaining);
            break;
        }
    }
    Ok(mask)
}

/// IPv4 netmask for a prefix length in 0..=32
pub fn ipv4_mask(prefix_len: u8) -> Result<Ipv4Addr, AddressError> {
    prefix_mask::<4>(prefix_len).map(Ipv4Addr::from)
}

/// IPv6 netmask for a prefix length in 0..=128
pub fn ipv6_mask(prefix_len: u8) -> Result<Ipv6Addr, AddressError> {
    prefix_mask::<16>(prefix_len).map(Ipv6Addr::from)
}

/// Apply a mask byte by byte
pub fn apply_mask<const N: usize>(octets: [u8; N], mask: [u8; N]) -> [u8; N] {
    let mut out = octets;
    for (byte, m) in out.iter_mut().zip(mask.iter()) {
        *byte &= m;
    }
    out
}

/// Format an IP address in CIDR notation
pub fn format_with_prefix(ip: IpAddr, prefix_len: u8) -> String {
    format!("{}/{}", ip, prefix_len)
}
