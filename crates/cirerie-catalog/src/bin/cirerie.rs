//! # cirerie
//!
//! Command line front end for the cost engine.
//!
//! ## Usage
//! ```bash
//! # Snapshot every product of a catalog
//! cirerie snapshot --catalog ./catalog.toml
//!
//! # Snapshot one product with an explicit pricing config
//! cirerie snapshot --catalog ./catalog.toml --config ./pricing.toml --product vanille
//!
//! # Simulate an order
//! cirerie simulate --catalog ./catalog.toml --request ./order.toml
//!
//! # Print the effective pricing config
//! cirerie config
//! ```
//!
//! Results are printed as JSON on stdout; logs go to stderr
//! (`RUST_LOG=cirerie=trace` for more detail).

use std::env;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cirerie_catalog::{
    simulate, snapshot_all, snapshot_product, Catalog, PricingConfig, ShipmentRequest,
};

#[derive(Debug, Default)]
struct Options {
    command: Option<String>,
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
    product: Option<String>,
    request: Option<PathBuf>,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args(env::args().skip(1).collect());

    if options.help || options.command.is_none() {
        print_usage();
        return Ok(());
    }

    init_tracing();

    match options.command.as_deref() {
        Some("snapshot") => {
            let catalog = load_catalog(&options)?;
            let config = PricingConfig::load(options.config.clone())?;

            let output = match &options.product {
                Some(product_id) => {
                    serde_json::to_string_pretty(&snapshot_product(&catalog, &config, product_id)?)?
                }
                None => serde_json::to_string_pretty(&snapshot_all(&catalog, &config)?)?,
            };
            println!("{}", output);
        }
        Some("simulate") => {
            let catalog = load_catalog(&options)?;
            let config = PricingConfig::load(options.config.clone())?;
            let request_path = options
                .request
                .as_ref()
                .ok_or("--request <PATH> is required for simulate")?;
            let request = ShipmentRequest::load(request_path)?;

            let result = simulate(&catalog, &config, &request)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some("config") => {
            let config = PricingConfig::load(options.config.clone())?;
            print!("{}", config.to_toml_string()?);
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
        None => {}
    }

    Ok(())
}

/// Parses arguments by hand; the tool has three commands and five flags.
fn parse_args(args: Vec<String>) -> Options {
    let mut options = Options::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" | "-c" => {
                if i + 1 < args.len() {
                    options.catalog = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    options.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--product" | "-p" => {
                if i + 1 < args.len() {
                    options.product = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--request" | "-r" => {
                if i + 1 < args.len() {
                    options.request = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => options.help = true,
            command if options.command.is_none() && !command.starts_with('-') => {
                options.command = Some(command.to_string());
            }
            _ => {}
        }
        i += 1;
    }

    options
}

fn load_catalog(options: &Options) -> Result<Catalog, Box<dyn std::error::Error>> {
    let path = options
        .catalog
        .as_ref()
        .ok_or("--catalog <PATH> is required")?;
    let catalog = Catalog::load(path)?;
    catalog.validate()?;
    info!(?path, "Catalog ready");
    Ok(catalog)
}

fn print_usage() {
    println!("Cirerie cost engine");
    println!();
    println!("Usage: cirerie <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  snapshot    Compute and print product snapshots (JSON)");
    println!("  simulate    Simulate a whole order (JSON)");
    println!("  config      Print the effective pricing config (TOML)");
    println!();
    println!("Options:");
    println!("  -c, --catalog <PATH>   Catalog file (.toml or .json)");
    println!("      --config <PATH>    Pricing config (default: platform config dir)");
    println!("  -p, --product <ID>     Snapshot a single product");
    println!("  -r, --request <PATH>   Order request file (.toml or .json)");
    println!("  -h, --help             Show this help message");
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show all debug logs
/// - `RUST_LOG=cirerie=trace` - Trace for cirerie crates only
/// - Default: `info,cirerie=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cirerie=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_snapshot_args() {
        let options = parse_args(args(&["snapshot", "--catalog", "c.toml", "-p", "vanille"]));
        assert_eq!(options.command.as_deref(), Some("snapshot"));
        assert_eq!(options.catalog, Some(PathBuf::from("c.toml")));
        assert_eq!(options.product.as_deref(), Some("vanille"));
        assert!(!options.help);
    }

    #[test]
    fn test_parse_help_and_missing_values() {
        let options = parse_args(args(&["--help"]));
        assert!(options.help);
        assert!(options.command.is_none());

        let options = parse_args(args(&["simulate", "--request"]));
        assert_eq!(options.command.as_deref(), Some("simulate"));
        assert!(options.request.is_none());
    }
}
