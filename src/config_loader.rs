use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse the addressing plan from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    info!(
        "Using IPv6 prefix {}/{} and IPv4 prefix length /{}",
        config.ipv6.prefix, config.ipv6.prefix_len, config.ipv4.prefix_len
    );
    Ok(config)
}

/// Load the configuration if a path is given, otherwise use defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using default addressing plan");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ipv6:\n  prefix: \"beef::\"\n  prefix_len: 56").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.ipv6.prefix, "beef::");
        assert_eq!(config.ipv6.prefix_len, 56);
        assert_eq!(config.ipv4.prefix_len, 16);
    }

    #[test]
    fn test_load_config_rejects_invalid_plan() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ipv6:\n  prefix: \"10.0.0.0\"").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid IPv6 configuration"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/overlay-addr.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to open configuration"));
    }

    #[test]
    fn test_load_or_default() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config, Config::default());
    }
}
