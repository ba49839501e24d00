//! Liquidity Depositor - Main Application Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, ConfigLoader, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use types::utils::sanitize_for_logging;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "depositor", version, about = "Simulate-then-submit ERC20 deposits")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "depositor.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulate-then-submit deposit flow
    Deposit {
        /// Deposit amount in whole token units
        #[arg(long, default_value_t = 20)]
        amount: u64,
    },
    /// Seed the virtual network with balances and a pool approval
    Seed,
    /// Write an example configuration file
    InitConfig {
        /// Where to write the example file
        #[arg(long, default_value = "depositor.yaml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    if let Err(e) = dotenv::dotenv() {
        // Only warn if the error is not "file not found"
        if !e.to_string().contains("No such file or directory") {
            eprintln!("Warning: could not load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    match cli.command {
        Command::InitConfig { path } => {
            init_logging(&LoggingConfig::default())?;
            ConfigLoader::create_example(&path)
                .context("Failed to write example configuration")?;
            info!("Wrote example configuration to {}", path.display());
            Ok(())
        }
        Command::Deposit { amount } => {
            let config = setup(&cli.config)?;
            commands::run_deposit(&config, amount).await
        }
        Command::Seed => {
            let config = setup(&cli.config)?;
            commands::run_seed(&config).await
        }
    }
}

/// Load configuration and bring up logging
fn setup(config_path: &Path) -> Result<Config> {
    let config = ConfigLoader::load(config_path).context("Failed to load configuration")?;

    init_logging(&config.logging)?;

    info!("Starting Liquidity Depositor v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path.display());
    // Virtual testnet RPC URLs embed an access token, keep them out of logs
    info!("Network RPC: {}", sanitize_for_logging(&config.network.rpc_url));

    Ok(config)
}

/// Initialize logging from the configuration, with RUST_LOG taking precedence
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    if logging.level == "trace" || logging.level == "debug" {
        warn!("Debug/trace logging enabled - may impact performance");
    }

    Ok(())
}
