//! Errors raised while constructing or decoding overlay addresses.

/// Address family expected by a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Ipv4 => write!(f, "IPv4"),
            Family::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// Errors that can occur while parsing, decoding or deriving an address
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Unable to parse IP address: '{literal}'")]
    MalformedLiteral { literal: String },

    #[error("Not an {expected} address: '{literal}'")]
    WrongFamily { literal: String, expected: Family },

    #[error("Truncated JSON address payload: '{payload}'")]
    TruncatedJson { payload: String },

    #[error("Invalid JSON address payload '{payload}': {source}")]
    InvalidJson {
        payload: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid address length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid prefix length /{prefix_len}: must be at most {max}")]
    InvalidPrefixLength { prefix_len: u8, max: u8 },
}

impl AddressError {
    /// The literal or payload that caused the error, if any
    pub fn literal(&self) -> Option<&str> {
        match self {
            AddressError::MalformedLiteral { literal } | AddressError::WrongFamily { literal, .. } => {
                Some(literal)
            }
            AddressError::TruncatedJson { payload } | AddressError::InvalidJson { payload, .. } => {
                Some(payload)
            }
            AddressError::InvalidLength { .. } | AddressError::InvalidPrefixLength { .. } => None,
        }
    }
}
