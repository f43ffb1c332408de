//! Shared utilities: IP literal classification and prefix masks.

pub mod ip_utils;

pub use ip_utils::{
    apply_mask, family_of, format_with_prefix, ipv4_mask, ipv6_mask, parse_any_literal, parse_literal, prefix_mask,
};
