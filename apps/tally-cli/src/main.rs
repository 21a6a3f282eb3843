//! # Tally Terminal Front End
//!
//! Entry point for the `tally` binary.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Parse arguments
//! 3. Load `TallyConfig` (file, env, then `--server`)
//! 4. Run the chosen command against a fresh `Store`

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

mod commands;
mod idle;
mod observer;
mod view;

use tally_sync::{SyncError, TallyConfig};

#[derive(Parser)]
#[command(name = "tally")]
#[command(version)]
#[command(about = "Shop against a Tally inventory server", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Inventory server URL (overrides the config file)
    #[arg(long, short, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync once and print the product list
    Catalog,

    /// Put items in the cart and check out
    Checkout {
        /// Product key to add, one unit per occurrence
        #[arg(long = "item", value_name = "KEY", required = true)]
        items: Vec<String>,
    },

    /// Start an interactive shopping session
    Shop,
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        if is_config_problem(&e) {
            eprintln!("Check the config file (--config) or the server URL (--server).");
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config, cli.server)?;

    match cli.command {
        Commands::Catalog => commands::catalog::run(&config).await,
        Commands::Checkout { items } => commands::checkout::run(&config, &items).await,
        Commands::Shop => commands::shop::run(&config).await,
    }
}

/// Loads the config and applies the `--server` override.
fn load_config(path: Option<PathBuf>, server: Option<String>) -> anyhow::Result<TallyConfig> {
    let mut config = TallyConfig::load(path)?;
    if let Some(url) = server {
        config.server.url = url;
        config.validate()?;
    }
    debug!(
        server = %config.server_url(),
        policy = %config.change_policy(),
        "Configuration loaded"
    );
    Ok(config)
}

fn is_config_problem(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<SyncError>())
        .any(SyncError::is_config_error)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_sync=trace` - Show trace for the sync layer only
/// - Default: `info,tally=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_checkout_items() {
        let cli = Cli::parse_from([
            "tally",
            "--server",
            "http://localhost:9000",
            "checkout",
            "--item",
            "Box1",
            "--item",
            "Box1",
            "--item",
            "Tent",
        ]);
        assert_eq!(cli.server.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Commands::Checkout { items } => assert_eq!(items, ["Box1", "Box1", "Tent"]),
            _ => panic!("expected checkout"),
        }
    }

    #[test]
    fn test_checkout_requires_items() {
        assert!(Cli::try_parse_from(["tally", "checkout"]).is_err());
    }

    #[test]
    fn test_server_override_is_validated() {
        let path = std::env::temp_dir().join("tally-cli-test-missing.toml");
        let err = load_config(Some(path.clone()), Some("ftp://example.com".into())).unwrap_err();
        assert!(is_config_problem(&err));

        let config = load_config(Some(path), Some("http://localhost:9000".into())).unwrap();
        assert_eq!(config.server_url(), "http://localhost:9000");
    }
}
