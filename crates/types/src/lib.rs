//! Shared types for the Liquidity Depositor pipeline
//!
//! This crate contains the domain types and the error taxonomy used across
//! the depositor components.

pub mod deposit;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use deposit::*;
pub use error::{DepositorError, FlowPhase, Result, RpcFailure, SeedStep};
