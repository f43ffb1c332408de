use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{debug, info, LevelFilter};
use std::path::PathBuf;

use overlay_addr::config::Config;
use overlay_addr::config_loader;
use overlay_addr::inspect::describe;
use overlay_addr::ip::{Family, OverlayIp, OverlayIpv4, OverlayIpv6};

/// Inspect and build structured overlay addresses
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the addressing plan YAML file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the node ID, endpoint ID and derived addresses of an address
    Inspect {
        address: String,

        /// Network view prefix length (defaults to the configured one)
        #[arg(long)]
        prefix_len: Option<u8>,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an address from a node ID and an endpoint ID
    Compose {
        #[arg(long)]
        node_id: u32,

        #[arg(long, default_value_t = 0)]
        endpoint_id: u16,

        /// Build a narrow (IPv4) address instead of IPv6
        #[arg(long)]
        ipv4: bool,
    },

    /// Convert between text and the JSON wire form
    #[command(subcommand)]
    Json(JsonCommand),
}

#[derive(Subcommand, Debug)]
enum JsonCommand {
    /// Render an address literal as JSON
    Encode { address: String },
    /// Decode a JSON payload into an address literal
    Decode {
        payload: String,

        /// Expected family of the payload
        #[arg(long)]
        ipv4: bool,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging before loading the configuration
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    init_logging(rust_log_set);
    debug!("Parsed arguments: {:?}", args);

    let config = config_loader::load_or_default(args.config.as_deref())?;
    apply_config_log_level(&config, rust_log_set)?;

    run(args.command, &config)
}

/// Install env_logger. Without RUST_LOG the logger accepts every record and
/// the global max level does the filtering, starting at info, so the
/// configured level can later raise or lower it.
fn init_logging(rust_log_set: bool) {
    if rust_log_set {
        env_logger::Builder::from_env(Env::default()).init();
    } else {
        env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
        log::set_max_level(LevelFilter::Info);
    }
}

/// Apply `general.log_level` unless RUST_LOG is set
fn apply_config_log_level(config: &Config, rust_log_set: bool) -> Result<()> {
    if rust_log_set {
        return Ok(());
    }
    if let Some(level) = config.general().level_filter()? {
        log::set_max_level(level);
        debug!("Log level set to {} from configuration", level);
    }
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Inspect { address, prefix_len, json } => {
            let ip = OverlayIp::parse(&address)?;
            let prefix_len = prefix_len.unwrap_or(match ip.family() {
                Family::Ipv6 => config.ipv6.prefix_len,
                Family::Ipv4 => config.ipv4.prefix_len,
            });
            let report = describe(&ip, prefix_len)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Command::Compose { node_id, endpoint_id, ipv4 } => {
            let ip = if ipv4 {
                let Ok(node_id) = u16::try_from(node_id) else {
                    bail!("Node ID {} does not fit the 16-bit IPv4 node field", node_id);
                };
                OverlayIp::V4(OverlayIpv4::from_parts(node_id, endpoint_id))
            } else {
                let prefix = config.ipv6.prefix().wrap_err("Invalid IPv6 prefix in configuration")?;
                OverlayIp::V6(OverlayIpv6::from_parts(prefix, node_id, endpoint_id))
            };
            info!("Composed address for node {} endpoint {}", node_id, endpoint_id);
            println!("{}", ip);
        }
        Command::Json(JsonCommand::Encode { address }) => {
            let ip = OverlayIp::parse(&address)?;
            println!("{}", String::from_utf8_lossy(&ip.to_json()));
        }
        Command::Json(JsonCommand::Decode { payload, ipv4 }) => {
            let literal = if ipv4 {
                OverlayIpv4::from_json(payload.as_bytes())?.to_string()
            } else {
                OverlayIpv6::from_json(payload.as_bytes())?.to_string()
            };
            if literal.is_empty() {
                info!("Payload holds the empty address");
            }
            println!("{}", literal);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["overlay-addr", "inspect", "f00d::5:0:2a"]);

        assert!(args.config.is_none());
        match args.command {
            Command::Inspect { address, prefix_len, json } => {
                assert_eq!(address, "f00d::5:0:2a");
                assert_eq!(prefix_len, None);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_compose_args() {
        let args = Args::parse_from([
            "overlay-addr",
            "--config", "plan.yaml",
            "compose",
            "--node-id", "5",
            "--endpoint-id", "42",
            "--ipv4",
        ]);

        assert_eq!(args.config, Some(PathBuf::from("plan.yaml")));
        match args.command {
            Command::Compose { node_id, endpoint_id, ipv4 } => {
                assert_eq!(node_id, 5);
                assert_eq!(endpoint_id, 42);
                assert!(ipv4);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_json_decode_args() {
        let args = Args::parse_from(["overlay-addr", "json", "decode", "\"10.0.0.1\"", "--ipv4"]);
        assert!(matches!(args.command, Command::Json(JsonCommand::Decode { ipv4: true, .. })));
    }

    #[test]
    fn test_rust_log_keeps_precedence_over_config() {
        let mut config = Config::default();
        config.general.log_level = Some("not-a-level".to_string());
        // Never consulted while RUST_LOG is set
        assert!(apply_config_log_level(&config, true).is_ok());
    }

    #[test]
    fn test_run_rejects_wide_node_id_for_ipv4() {
        let command = Command::Compose { node_id: 70_000, endpoint_id: 1, ipv4: true };
        assert!(run(command, &Config::default()).is_err());
    }

    #[test]
    fn test_run_rejects_malformed_literal() {
        let command = Command::Inspect { address: "bogus".to_string(), prefix_len: None, json: false };
        assert!(run(command, &Config::default()).is_err());
    }
}
