//! Real transaction submission and confirmation wait

use crate::gate::SimulatedTx;
use alloy::primitives::TxHash;
use chain::ChainClient;
use std::sync::Arc;
use tracing::info;
use types::{DepositorError, Result, TransactionRecord};

/// Sends a simulated transaction for real execution and waits for it to
/// be included.
pub struct TransactionSubmitter {
    chain: Arc<dyn ChainClient>,
    explorer_base_url: Option<String>,
}

impl TransactionSubmitter {
    pub fn new(chain: Arc<dyn ChainClient>, explorer_base_url: Option<String>) -> Self {
        Self {
            chain,
            explorer_base_url,
        }
    }

    /// Send the transaction; the hash is known as soon as this returns
    pub async fn send(&self, simulated: &SimulatedTx) -> Result<TxHash> {
        let hash = self.chain.send(simulated.descriptor()).await?;

        match &self.explorer_base_url {
            Some(base) => info!("Transaction sent! View on explorer: {}/tx/{}", base, hash),
            None => info!(tx_hash = %hash, "Transaction sent"),
        }

        Ok(hash)
    }

    /// Wait for inclusion and return the finalized record.
    ///
    /// An on-chain revert or a failed confirmation wait surfaces as a
    /// [`DepositorError::Submission`] carrying the hash, so the caller can
    /// still look the transaction up out of band.
    pub async fn confirm(&self, hash: TxHash) -> Result<TransactionRecord> {
        let record = self
            .chain
            .confirm(hash)
            .await
            .map_err(|e| DepositorError::Submission {
                tx_hash: hash,
                message: e.to_string(),
            })?;

        if !record.is_confirmed() {
            return Err(DepositorError::Submission {
                tx_hash: hash,
                message: "transaction reverted on-chain".to_string(),
            });
        }

        info!(tx_hash = %hash, "Transaction mined successfully");
        Ok(record)
    }

    /// Send and wait for confirmation in one step
    pub async fn submit(&self, simulated: SimulatedTx) -> Result<TransactionRecord> {
        let hash = self.send(&simulated).await?;
        self.confirm(hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::SimulationGate;
    use alloy::primitives::{Address, Bytes};
    use chain::testing::ScriptedChain;
    use types::TxDescriptor;

    async fn simulated_against(chain: Arc<ScriptedChain>) -> SimulatedTx {
        SimulationGate::new(chain)
            .simulate(TxDescriptor::call(
                Address::repeat_byte(0x01),
                Address::repeat_byte(0x02),
                Bytes::from(vec![0x01]),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_sends_exactly_once_and_returns_hash() {
        let chain = Arc::new(ScriptedChain::new(Address::repeat_byte(0x01)));
        let simulated = simulated_against(chain.clone()).await;

        let submitter = TransactionSubmitter::new(chain.clone(), None);
        let record = submitter.submit(simulated).await.unwrap();

        assert!(record.is_confirmed());
        assert_eq!(chain.sent_to(Address::repeat_byte(0x02)), 1);
    }

    #[tokio::test]
    async fn test_revert_surfaces_submission_error_with_hash() {
        let chain = Arc::new(ScriptedChain::new(Address::repeat_byte(0x01)).fail_confirmations());
        let simulated = simulated_against(chain.clone()).await;

        let submitter = TransactionSubmitter::new(chain, None);
        let err = submitter.submit(simulated).await.unwrap_err();

        match err {
            DepositorError::Submission { tx_hash, message } => {
                assert_ne!(tx_hash, TxHash::ZERO);
                assert!(message.contains("reverted"));
            }
            other => panic!("expected Submission error, got {other:?}"),
        }
    }
}
