//! Configuration loader implementation

use crate::schema::Config;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use std::path::Path;
use types::utils::is_valid_address;
use types::DepositorError;

/// Configuration loader that handles YAML files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(DepositorError::Config(format!(
                "Configuration file not found: {}",
                config_path.display()
            ))
            .into());
        }

        // Load configuration using Figment
        let config: Config = Figment::new()
            // Start with YAML file
            .merge(Yaml::file(config_path))
            // Override with environment variables (prefixed with DEPOSITOR_)
            .merge(Env::prefixed("DEPOSITOR_").split("__"))
            .extract()
            .context("Failed to parse configuration")?;

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Yaml::string(yaml_content))
            .extract()
            .context("Failed to parse configuration from string")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration
    fn validate(config: &Config) -> Result<()> {
        if config.network.rpc_url.is_empty() {
            return Err(DepositorError::Config(
                "network.rpc_url cannot be empty".to_string(),
            )
            .into());
        }

        if !config.network.rpc_url.starts_with("http://")
            && !config.network.rpc_url.starts_with("https://")
        {
            return Err(DepositorError::Config(format!(
                "Invalid network.rpc_url format: {}",
                config.network.rpc_url
            ))
            .into());
        }

        for (field, value) in [
            ("contracts.liquidity_manager", &config.contracts.liquidity_manager),
            ("contracts.token", &config.contracts.token),
            ("contracts.pool", &config.contracts.pool),
        ] {
            if !is_valid_address(value) {
                return Err(DepositorError::Config(format!(
                    "Invalid address for {}: {}",
                    field, value
                ))
                .into());
            }
        }

        if config.signer.private_key.is_empty() {
            return Err(DepositorError::Config(
                "signer.private_key cannot be empty".to_string(),
            )
            .into());
        }

        if config.deposit.flow_timeout_seconds == 0 {
            return Err(DepositorError::Config(
                "deposit.flow_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if config.deposit.approval_ceiling_units == 0 {
            return Err(DepositorError::Config(
                "deposit.approval_ceiling_units must be greater than 0".to_string(),
            )
            .into());
        }

        config
            .parse_contracts()
            .map_err(DepositorError::Config)?;

        config
            .parse_seed_amounts()
            .map_err(DepositorError::Config)?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(DepositorError::Config(format!(
                "Invalid log level: {}. Valid levels: {:?}",
                config.logging.level, valid_log_levels
            ))
            .into());
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(DepositorError::Config(format!(
                "Invalid log format: {}. Valid formats: {:?}",
                config.logging.format, valid_log_formats
            ))
            .into());
        }

        Ok(())
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Config::example();
        let yaml_content = serde_yaml::to_string(&config)
            .context("Failed to serialize example configuration")?;

        std::fs::write(path.as_ref(), yaml_content)
            .context("Failed to write example configuration file")?;

        Ok(())
    }
}

impl Config {
    /// Example configuration pointing at a Tenderly-style virtual testnet
    pub fn example() -> Self {
        Self {
            network: crate::schema::NetworkConfig {
                rpc_url: "https://virtual.mainnet.rpc.example.org/your-testnet-id".to_string(),
                explorer_base_url: Some(
                    "https://virtual.mainnet.rpc.example.org/your-testnet-id/explorer".to_string(),
                ),
                chain_id: Some(1),
            },
            contracts: crate::schema::ContractsConfig {
                liquidity_manager: "0x0000000000000000000000000000000000000001".to_string(),
                token: "0x0000000000000000000000000000000000000002".to_string(),
                pool: "0x0000000000000000000000000000000000000003".to_string(),
            },
            signer: crate::schema::SignerConfig {
                private_key: "0x0000000000000000000000000000000000000000000000000000000000000001"
                    .to_string(),
            },
            deposit: Default::default(),
            seed: Default::default(),
            logging: Default::default(),
        }
    }
}
