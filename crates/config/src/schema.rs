//! Configuration schema definitions

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network endpoint configuration
    pub network: NetworkConfig,
    /// Contract addresses the pipeline talks to
    pub contracts: ContractsConfig,
    /// Signing identity
    pub signer: SignerConfig,
    /// Deposit flow configuration
    #[serde(default)]
    pub deposit: DepositConfig,
    /// Virtual network seeding configuration
    #[serde(default)]
    pub seed: SeedConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of the (virtual) network
    pub rpc_url: String,
    /// Block explorer base URL, used for transaction links in logs
    pub explorer_base_url: Option<String>,
    /// Chain ID
    pub chain_id: Option<u64>,
}

/// Contract addresses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Liquidity manager contract receiving deposits
    pub liquidity_manager: String,
    /// ERC20 token being deposited
    pub token: String,
    /// Pool contract approved during seeding
    pub pool: String,
}

/// Signing identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Hex-encoded private key; never logged
    pub private_key: String,
}

/// Deposit flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositConfig {
    /// Approval ceiling in whole token units, approved when allowance is zero
    #[serde(default = "default_approval_ceiling_units")]
    pub approval_ceiling_units: u64,
    /// Decimals of the deposited token
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,
    /// Wall-clock bound on one deposit flow, in seconds
    #[serde(default = "default_flow_timeout_seconds")]
    pub flow_timeout_seconds: u64,
}

/// Virtual network seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Target native balance in wei
    #[serde(default = "default_seed_balance")]
    pub native_balance_wei: String,
    /// Target token balance in minor units
    #[serde(default = "default_seed_balance")]
    pub token_balance: String,
    /// Pool approval ceiling in minor units
    #[serde(default = "default_seed_approval_ceiling")]
    pub approval_ceiling: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_approval_ceiling_units() -> u64 {
    100_000
}

fn default_token_decimals() -> u8 {
    6
}

fn default_flow_timeout_seconds() -> u64 {
    30
}

fn default_seed_balance() -> String {
    // 1 ETH in wei; also used verbatim for the token balance override
    "0xDE0B6B3A7640000".to_string()
}

fn default_seed_approval_ceiling() -> String {
    "1000000000000000000000000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Parse the contract addresses into alloy types
    pub fn parse_contracts(&self) -> Result<ParsedContracts, String> {
        let liquidity_manager = self
            .contracts
            .liquidity_manager
            .parse::<Address>()
            .map_err(|e| format!("Invalid liquidity_manager address: {}", e))?;

        let token = self
            .contracts
            .token
            .parse::<Address>()
            .map_err(|e| format!("Invalid token address: {}", e))?;

        let pool = self
            .contracts
            .pool
            .parse::<Address>()
            .map_err(|e| format!("Invalid pool address: {}", e))?;

        Ok(ParsedContracts {
            liquidity_manager,
            token,
            pool,
        })
    }

    /// Parse the seeding amounts into U256 values
    pub fn parse_seed_amounts(&self) -> Result<ParsedSeedAmounts, String> {
        let native_balance_wei = parse_amount(&self.seed.native_balance_wei)
            .map_err(|e| format!("Invalid native_balance_wei: {}", e))?;

        let token_balance = parse_amount(&self.seed.token_balance)
            .map_err(|e| format!("Invalid token_balance: {}", e))?;

        let approval_ceiling = parse_amount(&self.seed.approval_ceiling)
            .map_err(|e| format!("Invalid approval_ceiling: {}", e))?;

        Ok(ParsedSeedAmounts {
            native_balance_wei,
            token_balance,
            approval_ceiling,
        })
    }
}

/// Decimal or 0x-prefixed hex amount
fn parse_amount(s: &str) -> Result<U256, String> {
    let result = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        U256::from_str_radix(hex, 16)
    } else {
        U256::from_str_radix(s, 10)
    };
    result.map_err(|e| e.to_string())
}

/// Contract addresses parsed into alloy types
#[derive(Debug, Clone, Copy)]
pub struct ParsedContracts {
    pub liquidity_manager: Address,
    pub token: Address,
    pub pool: Address,
}

/// Seeding amounts parsed into U256 values
#[derive(Debug, Clone, Copy)]
pub struct ParsedSeedAmounts {
    pub native_balance_wei: U256,
    pub token_balance: U256,
    pub approval_ceiling: U256,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            approval_ceiling_units: default_approval_ceiling_units(),
            token_decimals: default_token_decimals(),
            flow_timeout_seconds: default_flow_timeout_seconds(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            native_balance_wei: default_seed_balance(),
            token_balance: default_seed_balance(),
            approval_ceiling: default_seed_approval_ceiling(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
