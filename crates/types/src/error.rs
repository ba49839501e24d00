//! Error taxonomy for the depositor pipeline

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for the depositor pipeline
#[derive(Error, Debug)]
pub enum DepositorError {
    /// A required configuration value is missing or invalid; fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Approval transaction reverted or failed to confirm
    #[error("Allowance error: {0}")]
    Allowance(String),

    /// Dry run reported failure; the real submission was never attempted
    #[error("Simulation rejected: {reason}")]
    Simulation {
        reason: String,
        data: Option<String>,
    },

    /// Real transaction reverted or its confirmation wait failed
    #[error("Submission failed for {tx_hash}: {message}")]
    Submission { tx_hash: TxHash, message: String },

    /// A virtual network seeding step failed; later steps were not attempted
    #[error("Seeding failed during {step}: {message}")]
    Seeding { step: SeedStep, message: String },

    /// Remote call failed at the RPC boundary
    #[error("RPC error: {0}")]
    Rpc(RpcFailure),

    /// The flow deadline elapsed before the current phase completed
    #[error("Deposit flow timed out while {phase}")]
    Timeout { phase: FlowPhase },

    /// The request violates a local invariant; nothing was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for depositor operations
pub type Result<T> = std::result::Result<T, DepositorError>;

/// Phases of the deposit flow, used for timeout attribution and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    EnsuringAllowance,
    Simulating,
    Submitting,
    Confirming,
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowPhase::EnsuringAllowance => write!(f, "ensuring allowance"),
            FlowPhase::Simulating => write!(f, "simulating"),
            FlowPhase::Submitting => write!(f, "submitting"),
            FlowPhase::Confirming => write!(f, "awaiting confirmation"),
        }
    }
}

/// Steps of the virtual network seeding flow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStep {
    NativeBalance,
    TokenBalance,
    PoolApproval,
}

impl fmt::Display for SeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedStep::NativeBalance => write!(f, "native balance override"),
            SeedStep::TokenBalance => write!(f, "token balance override"),
            SeedStep::PoolApproval => write!(f, "pool approval"),
        }
    }
}

/// A remote call failure, tagged once at the RPC-adapter boundary.
///
/// JSON-RPC error responses carry the node's structured message and any
/// ABI-encoded revert data; transport-level failures carry only the
/// top-level message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcFailure {
    /// Top-level error text from the client library or transport
    pub message: String,
    /// Structured message returned by the remote node, when present
    #[serde(rename = "nodeMessage")]
    pub node_message: Option<String>,
    /// Structured payload (e.g. ABI-encoded revert data), when present
    pub data: Option<String>,
}

impl RpcFailure {
    /// Failure with only a top-level message
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node_message: None,
            data: None,
        }
    }

    /// Single diagnostic reason for this failure.
    ///
    /// The node's structured message wins over the top-level text; this
    /// never fails and allocates nothing.
    pub fn classify(&self) -> &str {
        self.node_message.as_deref().unwrap_or(&self.message)
    }
}

impl fmt::Display for RpcFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.classify())
    }
}

impl From<RpcFailure> for DepositorError {
    fn from(failure: RpcFailure) -> Self {
        DepositorError::Rpc(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefers_node_message() {
        let failure = RpcFailure {
            message: "Y".to_string(),
            node_message: Some("X".to_string()),
            data: None,
        };
        assert_eq!(failure.classify(), "X");
    }

    #[test]
    fn test_classify_falls_back_to_top_level_message() {
        let failure = RpcFailure::from_message("Y");
        assert_eq!(failure.classify(), "Y");
    }

    #[test]
    fn test_timeout_display_names_phase() {
        let err = DepositorError::Timeout {
            phase: FlowPhase::Simulating,
        };
        assert_eq!(err.to_string(), "Deposit flow timed out while simulating");
    }
}
