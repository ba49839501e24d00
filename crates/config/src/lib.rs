//! Configuration management for the Liquidity Depositor
//!
//! Loads configuration from a YAML file with environment variable
//! overrides, validates it, and exposes the parsed values the other
//! crates consume at construction time.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, LoggingConfig, ParsedContracts, ParsedSeedAmounts};
