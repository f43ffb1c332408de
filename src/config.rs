use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv6Addr};

/// Cluster addressing plan used by the command-line tool
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ipv6: Ipv6Plan,
    #[serde(default)]
    pub ipv4: Ipv4Plan,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.general.level_filter()?;

        let prefix = self.ipv6.prefix()?;
        if prefix.octets()[8..].iter().any(|b| *b != 0) {
            return Err(ValidationError::InvalidIpv6(format!(
                "prefix {} has bits set below /64",
                prefix
            )));
        }
        if self.ipv6.prefix_len > 128 {
            return Err(ValidationError::InvalidIpv6(format!(
                "prefix_len {} exceeds 128",
                self.ipv6.prefix_len
            )));
        }
        if self.ipv4.prefix_len > 32 {
            return Err(ValidationError::InvalidIpv4(format!(
                "prefix_len {} exceeds 32",
                self.ipv4.prefix_len
            )));
        }
        Ok(())
    }

    /// Get the general configuration
    pub fn general(&self) -> &GeneralConfig {
        &self.general
    }
}

/// Shared general configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl GeneralConfig {
    /// Parse the configured log level, if any
    pub fn level_filter(&self) -> Result<Option<LevelFilter>, ValidationError> {
        match &self.log_level {
            None => Ok(None),
            Some(level) => level.parse::<LevelFilter>().map(Some).map_err(|_| {
                ValidationError::InvalidGeneral(format!("unknown log_level '{}'", level))
            }),
        }
    }
}

/// Wide-family plan: the cluster prefix placed in the upper 64 bits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ipv6Plan {
    #[serde(default = "default_ipv6_prefix")]
    pub prefix: String,
    #[serde(default = "default_ipv6_prefix_len")]
    pub prefix_len: u8,
}

impl Ipv6Plan {
    /// Parse the configured prefix
    pub fn prefix(&self) -> Result<Ipv6Addr, ValidationError> {
        match self.prefix.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => Ok(ip),
            Ok(IpAddr::V4(_)) => Err(ValidationError::InvalidIpv6(format!(
                "prefix '{}' is not an IPv6 address",
                self.prefix
            ))),
            Err(_) => Err(ValidationError::InvalidIpv6(format!(
                "prefix '{}' is not an IP address",
                self.prefix
            ))),
        }
    }
}

/// Narrow-family plan. The node ID occupies the upper 16 bits, so only the
/// network view length is configurable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ipv4Plan {
    #[serde(default = "default_ipv4_prefix_len")]
    pub prefix_len: u8,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid IPv6 configuration: {0}")]
    InvalidIpv6(String),
    #[error("Invalid IPv4 configuration: {0}")]
    InvalidIpv4(String),
}

fn default_ipv6_prefix() -> String {
    "f00d::".to_string()
}

fn default_ipv6_prefix_len() -> u8 {
    64
}

fn default_ipv4_prefix_len() -> u8 {
    16
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
        }
    }
}

impl Default for Ipv6Plan {
    fn default() -> Self {
        Self {
            prefix: default_ipv6_prefix(),
            prefix_len: default_ipv6_prefix_len(),
        }
    }
}

impl Default for Ipv4Plan {
    fn default() -> Self {
        Self {
            prefix_len: default_ipv4_prefix_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let yaml = r#"
general:
  log_level: debug
ipv6:
  prefix: "beef:1::"
  prefix_len: 48
ipv4:
  prefix_len: 24
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general().log_level.as_deref(), Some("debug"));
        assert_eq!(config.ipv6.prefix().unwrap(), "beef:1::".parse::<Ipv6Addr>().unwrap());
        assert_eq!(config.ipv6.prefix_len, 48);
        assert_eq!(config.ipv4.prefix_len, 24);
    }

    #[test]
    fn test_defaults_for_missing_sections() {
        let config: Config = serde_yaml::from_str("ipv4:\n  prefix_len: 20\n").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.ipv6, Ipv6Plan::default());
        assert_eq!(config.ipv6.prefix, "f00d::");
        assert_eq!(config.ipv6.prefix_len, 64);
        assert_eq!(config.ipv4.prefix_len, 20);

        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_bad_ipv6_prefix() {
        let mut config = Config::default();

        config.ipv6.prefix = "10.0.0.0".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidIpv6(_))));

        config.ipv6.prefix = "garbage".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidIpv6(_))));

        config.ipv6.prefix = "f00d::5:0:2a".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidIpv6(_))));
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = Config::default();
        assert_eq!(config.general().level_filter().unwrap(), Some(LevelFilter::Info));

        config.general.log_level = Some("DEBUG".to_string());
        assert_eq!(config.general().level_filter().unwrap(), Some(LevelFilter::Debug));
        assert!(config.validate().is_ok());

        config.general.log_level = None;
        assert_eq!(config.general().level_filter().unwrap(), None);

        config.general.log_level = Some("loud".to_string());
        assert!(matches!(config.validate(), Err(ValidationError::InvalidGeneral(_))));
    }

    #[test]
    fn test_rejects_oversized_prefix_lengths() {
        let mut config = Config::default();
        config.ipv6.prefix_len = 129;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidIpv6(_))));

        let mut config = Config::default();
        config.ipv4.prefix_len = 33;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidIpv4(_))));
    }
}
