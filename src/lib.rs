//! # overlay-addr - Structured addressing for a container overlay network
//!
//! Every node and every container (endpoint) of a cluster is given an IP
//! address whose bits encode who owns it. The owning node and the endpoint
//! on that node can be read straight off the address, without asking any
//! lookup service.
//!
//! ## Address Layouts
//!
//! IPv6 (wide family):
//!
//! ```text
//! | prefix (64) | node id (32) | state (16) | endpoint id (16) |
//! ```
//!
//! IPv4 (narrow family):
//!
//! ```text
//! | node id (16) | endpoint id (16) |
//! ```
//!
//! An endpoint ID of 0 in the wide family denotes the node itself, and
//! `0xffff` its host stack. The state field must be zero for an address to
//! be valid.
//!
//! ## Architecture
//!
//! - `ip`: address types, the shared [`ip::OverlayAddress`] contract, network
//!   views and allocation requests
//! - `inspect`: full breakdown of an address for tooling
//! - `config`: YAML addressing plan (cluster prefix, network view lengths)
//! - `config_loader`: configuration file loading
//! - `utils`: literal classification and prefix masks
//!
//! ## Example Usage
//!
//! ```rust
//! use overlay_addr::ip::{OverlayAddress, OverlayIpv6};
//!
//! let ip = OverlayIpv6::parse("f00d::5:0:2a")?;
//! assert_eq!(ip.node_id(), 5);
//! assert_eq!(ip.endpoint_id(), 42);
//! assert!(ip.is_valid_container_address());
//!
//! assert_eq!(ip.node_address().to_string(), "f00d::5:0:0");
//! assert_eq!(ip.host_address().to_string(), "f00d::5:0:ffff");
//!
//! // JSON wire form
//! assert_eq!(ip.to_json(), br#""f00d::5:0:2a""#.to_vec());
//! assert!(OverlayIpv6::from_json(br#""""#)?.is_empty());
//! # Ok::<(), overlay_addr::ip::AddressError>(())
//! ```
//!
//! ## Error Handling
//!
//! Address operations return [`ip::AddressError`]. The command-line tool and
//! the configuration loader use `color_eyre` for reporting with context.

pub mod config;
pub mod config_loader;
pub mod inspect;
pub mod ip;
pub mod utils;

pub use ip::{AddressError, OverlayAddress, OverlayIp, OverlayIpv4, OverlayIpv6};
