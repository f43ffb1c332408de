//! Network (CIDR) view of an overlay address.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::error::AddressError;
use crate::utils::ip_utils::{apply_mask, format_with_prefix, ipv4_mask, ipv6_mask};

/// An address paired with a network mask, as used in routing contexts.
///
/// The address is kept as given (host bits are not cleared); use
/// [`IpNet::network`] for the masked network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    ip: IpAddr,
    mask: IpAddr,
    prefix_len: u8,
}

impl IpNet {
    /// Build an IPv4 network view
    pub fn v4(ip: Ipv4Addr, prefix_len: u8) -> Result<Self, AddressError> {
        let mask = ipv4_mask(prefix_len)?;
        Ok(IpNet {
            ip: IpAddr::V4(ip),
            mask: IpAddr::V4(mask),
            prefix_len,
        })
    }

    /// Build an IPv6 network view
    pub fn v6(ip: Ipv6Addr, prefix_len: u8) -> Result<Self, AddressError> {
        let mask = ipv6_mask(prefix_len)?;
        Ok(IpNet {
            ip: IpAddr::V6(ip),
            mask: IpAddr::V6(mask),
            prefix_len,
        })
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn mask(&self) -> IpAddr {
        self.mask
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The address with all host bits cleared
    pub fn network(&self) -> IpAddr {
        match (self.ip, self.mask) {
            (IpAddr::V4(ip), IpAddr::V4(mask)) => {
                IpAddr::V4(Ipv4Addr::from(apply_mask(ip.octets(), mask.octets())))
            }
            (IpAddr::V6(ip), IpAddr::V6(mask)) => {
                IpAddr::V6(Ipv6Addr::from(apply_mask(ip.octets(), mask.octets())))
            }
            // Constructors never mix families
            _ => self.ip,
        }
    }

    /// Whether `other` falls inside this network. Addresses of the other
    /// family are never contained.
    pub fn contains(&self, other: IpAddr) -> bool {
        match (other, self.mask, self.network()) {
            (IpAddr::V4(ip), IpAddr::V4(mask), IpAddr::V4(net)) => {
                apply_mask(ip.octets(), mask.octets()) == net.octets()
            }
            (IpAddr::V6(ip), IpAddr::V6(mask), IpAddr::V6(net)) => {
                apply_mask(ip.octets(), mask.octets()) == net.octets()
            }
            _ => false,
        }
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_with_prefix(self.ip, self.prefix_len))
    }
}
