//! Pre-flight simulation gate

use chain::ChainClient;
use std::sync::Arc;
use tracing::{info, warn};
use types::{DepositorError, Result, TxDescriptor};

/// Proof that a descriptor passed the pre-flight dry run.
///
/// [`crate::TransactionSubmitter`] accepts only this type, so a failed
/// simulation cannot reach submission.
#[derive(Debug, Clone)]
pub struct SimulatedTx {
    descriptor: TxDescriptor,
    trace: serde_json::Value,
}

impl SimulatedTx {
    /// The descriptor exactly as it was dry-run
    pub fn descriptor(&self) -> &TxDescriptor {
        &self.descriptor
    }

    /// Whatever trace the node returned for the dry run
    pub fn trace(&self) -> &serde_json::Value {
        &self.trace
    }
}

/// Dry-runs the exact transaction payload before it is committed
pub struct SimulationGate {
    chain: Arc<dyn ChainClient>,
}

impl SimulationGate {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Simulate the descriptor against the latest block.
    ///
    /// A simulated revert or RPC-level rejection becomes a
    /// [`DepositorError::Simulation`] carrying the classified reason and
    /// any structured revert data.
    pub async fn simulate(&self, descriptor: TxDescriptor) -> Result<SimulatedTx> {
        match self.chain.simulate(&descriptor).await {
            Ok(trace) => {
                info!("Simulation successful");
                Ok(SimulatedTx { descriptor, trace })
            }
            Err(DepositorError::Rpc(failure)) => {
                let reason = failure.classify().to_string();
                warn!(reason = %reason, "Simulation failed");
                Err(DepositorError::Simulation {
                    reason,
                    data: failure.data,
                })
            }
            Err(other) => Err(other),
        }
    }
}
