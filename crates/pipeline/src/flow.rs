//! Deposit flow sequencing and deadline handling

use crate::{AllowanceManager, SimulationGate, TransactionSubmitter};
use alloy::primitives::{Address, U256};
use chain::{abi, ChainClient};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use types::utils::format_units;
use types::{DepositRequest, DepositorError, FlowPhase, Result, TransactionRecord, TxDescriptor};

/// Resolved configuration for one deposit flow
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Liquidity manager contract receiving the deposit
    pub liquidity_manager: Address,
    /// ERC20 token being deposited
    pub token: Address,
    /// Approval ceiling in minor units, used when the allowance is zero
    pub approval_ceiling: U256,
    /// Decimals of the deposited token, for log formatting
    pub token_decimals: u8,
    /// Wall-clock bound on the whole flow
    pub timeout: Duration,
    /// Explorer base URL for transaction links in logs
    pub explorer_base_url: Option<String>,
}

/// Drives one deposit attempt through its phases:
/// allowance check, dry run, submission, confirmation.
///
/// Failures at any phase are terminal for the attempt; nothing is retried.
pub struct DepositFlow {
    allowance: AllowanceManager,
    gate: SimulationGate,
    submitter: TransactionSubmitter,
    liquidity_manager: Address,
    token_decimals: u8,
    timeout: Duration,
}

impl DepositFlow {
    pub fn new(chain: Arc<dyn ChainClient>, config: FlowConfig) -> Self {
        let allowance = AllowanceManager::new(
            chain.clone(),
            config.token,
            config.liquidity_manager,
            config.approval_ceiling,
            config.token_decimals,
        );
        let gate = SimulationGate::new(chain.clone());
        let submitter = TransactionSubmitter::new(chain, config.explorer_base_url);

        Self {
            allowance,
            gate,
            submitter,
            liquidity_manager: config.liquidity_manager,
            token_decimals: config.token_decimals,
            timeout: config.timeout,
        }
    }

    /// Run one deposit attempt, bounded by the configured deadline.
    ///
    /// When the deadline fires, the in-flight remote call is dropped at the
    /// current suspension point and its eventual result is never observed.
    pub async fn run(&self, request: &DepositRequest) -> Result<TransactionRecord> {
        let cancel = CancellationToken::new();

        let deadline = cancel.clone();
        let timeout = self.timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            deadline.cancel();
        });

        let result = self.phases(request, &cancel).await;
        timer.abort();
        result
    }

    async fn phases(
        &self,
        request: &DepositRequest,
        cancel: &CancellationToken,
    ) -> Result<TransactionRecord> {
        info!(
            deposit_id = %request.deposit_id,
            amount = %format_units(request.amount, self.token_decimals),
            "Starting deposit flow"
        );

        bounded(
            cancel,
            FlowPhase::EnsuringAllowance,
            self.allowance
                .ensure_allowance(request.depositor, request.amount),
        )
        .await?;

        let descriptor = TxDescriptor::call(
            request.depositor,
            self.liquidity_manager,
            abi::deposit_calldata(request.deposit_id, request.amount),
        );

        let simulated = bounded(cancel, FlowPhase::Simulating, self.gate.simulate(descriptor)).await?;

        let hash = bounded(cancel, FlowPhase::Submitting, self.submitter.send(&simulated)).await?;

        let record = bounded(cancel, FlowPhase::Confirming, self.submitter.confirm(hash)).await?;

        info!(tx_hash = %record.hash, "Deposit flow complete");
        Ok(record)
    }
}

/// Race a phase against the flow deadline
async fn bounded<T>(
    cancel: &CancellationToken,
    phase: FlowPhase,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(DepositorError::Timeout { phase }),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::testing::ScriptedChain;
    use types::RpcFailure;

    const TOKEN: Address = Address::repeat_byte(0x10);
    const MANAGER: Address = Address::repeat_byte(0x20);
    const DEPOSITOR: Address = Address::repeat_byte(0x01);

    fn flow_over(chain: Arc<ScriptedChain>, timeout: Duration) -> DepositFlow {
        DepositFlow::new(
            chain,
            FlowConfig {
                liquidity_manager: MANAGER,
                token: TOKEN,
                approval_ceiling: U256::from(100_000_000_000u64),
                token_decimals: 6,
                timeout,
                explorer_base_url: Some("https://explorer.example.org".to_string()),
            },
        )
    }

    fn twenty_units_request() -> DepositRequest {
        DepositRequest::new(DEPOSITOR, U256::from(20_000_000u64)).unwrap()
    }

    #[tokio::test]
    async fn test_zero_allowance_flow_approves_then_deposits() {
        let chain = Arc::new(ScriptedChain::new(DEPOSITOR));
        let flow = flow_over(chain.clone(), Duration::from_secs(30));
        let request = twenty_units_request();

        let record = flow.run(&request).await.unwrap();

        assert!(record.is_confirmed());

        let sent = chain.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, TOKEN);
        assert_eq!(sent[1].to, MANAGER);
        assert_eq!(
            sent[1].data,
            abi::deposit_calldata(request.deposit_id, request.amount)
        );

        let allowance = chain.allowance(TOKEN, DEPOSITOR, MANAGER).await.unwrap();
        assert!(allowance > U256::ZERO);
    }

    #[tokio::test]
    async fn test_rejected_simulation_never_reaches_submission() {
        let chain = Arc::new(
            ScriptedChain::new(DEPOSITOR)
                .with_allowance(TOKEN, DEPOSITOR, MANAGER, U256::from(100_000_000u64))
                .reject_simulations_with(RpcFailure {
                    message: "error code 3: insufficient balance".to_string(),
                    node_message: Some("insufficient balance".to_string()),
                    data: None,
                }),
        );
        let flow = flow_over(chain.clone(), Duration::from_secs(30));

        let err = flow.run(&twenty_units_request()).await.unwrap_err();

        match err {
            DepositorError::Simulation { reason, .. } => {
                assert_eq!(reason, "insufficient balance")
            }
            other => panic!("expected Simulation error, got {other:?}"),
        }
        assert_eq!(chain.simulated_count(), 1);
        assert_eq!(chain.sent_to(MANAGER), 0);
    }

    #[tokio::test]
    async fn test_successful_simulation_submits_exactly_once() {
        let chain = Arc::new(ScriptedChain::new(DEPOSITOR).with_allowance(
            TOKEN,
            DEPOSITOR,
            MANAGER,
            U256::from(100_000_000u64),
        ));
        let flow = flow_over(chain.clone(), Duration::from_secs(30));

        flow.run(&twenty_units_request()).await.unwrap();

        assert_eq!(chain.simulated_count(), 1);
        assert_eq!(chain.sent_to(MANAGER), 1);
        // No approval was needed
        assert_eq!(chain.sent_to(TOKEN), 0);
    }

    #[tokio::test]
    async fn test_deadline_cancels_the_confirmation_wait() {
        let chain = Arc::new(
            ScriptedChain::new(DEPOSITOR)
                .with_allowance(TOKEN, DEPOSITOR, MANAGER, U256::from(100_000_000u64))
                .delay_confirmations(Duration::from_millis(250)),
        );
        let flow = flow_over(chain.clone(), Duration::from_millis(50));

        let err = flow.run(&twenty_units_request()).await.unwrap_err();

        match err {
            DepositorError::Timeout { phase } => assert_eq!(phase, FlowPhase::Confirming),
            other => panic!("expected Timeout error, got {other:?}"),
        }
    }
}
