//! Allocation request handed to the external address-pool allocator.
//!
//! The allocator itself lives outside this crate. Addresses only know how
//! to package their IP value into the request shape it consumes.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Request for a specific IP from the address pool.
///
/// `ip` is `None` when built from the empty address, which asks the
/// allocator to pick any free address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpAddr>,
}

impl AllocationRequest {
    pub fn new(ip: Option<IpAddr>) -> Self {
        AllocationRequest { ip }
    }

    /// Request for a specific address
    pub fn for_ip(ip: impl Into<IpAddr>) -> Self {
        AllocationRequest { ip: Some(ip.into()) }
    }

    /// Request letting the allocator choose
    pub fn any() -> Self {
        AllocationRequest { ip: None }
    }
}
