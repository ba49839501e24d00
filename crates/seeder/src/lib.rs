//! Virtual network seeding
//!
//! One-shot bootstrap of a disposable test network: gives the signer a
//! native balance and a token balance via balance-override RPC extensions,
//! then approves the pool to pull tokens on the signer's behalf. Runs once
//! before a test session, not per deposit.

use alloy::primitives::{Address, TxHash, U256};
use chain::{abi, ChainClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use types::utils::to_hex_amount;
use types::{
    AllowanceState, DepositorError, Result, SeedAsset, SeedStep, TxDescriptor, VirtualBalanceSeed,
};

/// Bound on the approval confirmation wait during seeding
const APPROVAL_WAIT: Duration = Duration::from_secs(30);

/// What to seed the virtual network with
#[derive(Debug, Clone)]
pub struct SeedPlan {
    /// ERC20 token whose balance is overridden and approved
    pub token: Address,
    /// Pool contract granted the approval
    pub pool: Address,
    /// Target native balance in wei
    pub native_balance_wei: U256,
    /// Target token balance in minor units
    pub token_balance: U256,
    /// Approval ceiling in minor units
    pub approval_ceiling: U256,
}

/// What a completed seeding run applied, read back from the network
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// Balance overrides that were applied
    pub seeds: Vec<VirtualBalanceSeed>,
    /// The pool allowance after the approval step
    pub approval: AllowanceState,
    /// Hash of the approval transaction
    pub approval_tx: TxHash,
}

/// Seeds a virtual network so deposit flows have fixtures to act on
pub struct VirtualNetworkSeeder {
    chain: Arc<dyn ChainClient>,
    plan: SeedPlan,
}

impl VirtualNetworkSeeder {
    pub fn new(chain: Arc<dyn ChainClient>, plan: SeedPlan) -> Self {
        Self { chain, plan }
    }

    /// Apply the seed plan in strict order, fail-fast.
    ///
    /// Balance overrides take effect synchronously on the virtual network;
    /// the approval is a real transaction and is awaited. Any failure
    /// aborts the remaining steps.
    pub async fn seed(&self) -> Result<SeedReport> {
        let signer = self.chain.signer_address();
        info!(signer = %signer, "Setting virtual network state");

        self.chain
            .set_native_balance(signer, self.plan.native_balance_wei)
            .await
            .map_err(|e| seeding_error(SeedStep::NativeBalance, e))?;
        info!(
            amount = %to_hex_amount(self.plan.native_balance_wei),
            "Set native balance of {}", signer
        );

        self.chain
            .set_erc20_balance(self.plan.token, signer, self.plan.token_balance)
            .await
            .map_err(|e| seeding_error(SeedStep::TokenBalance, e))?;
        info!(
            token = %self.plan.token,
            amount = %to_hex_amount(self.plan.token_balance),
            "Set token balance of {}", signer
        );

        let approval_tx = self.approve_pool(signer).await?;
        info!(
            pool = %self.plan.pool,
            ceiling = %self.plan.approval_ceiling,
            "Approved pool to spend the token"
        );

        self.report(signer, approval_tx).await
    }

    async fn approve_pool(&self, signer: Address) -> Result<TxHash> {
        let approve = TxDescriptor::call(
            signer,
            self.plan.token,
            abi::approve_calldata(self.plan.pool, self.plan.approval_ceiling),
        );

        let hash = self
            .chain
            .send(&approve)
            .await
            .map_err(|e| seeding_error(SeedStep::PoolApproval, e))?;

        let record = tokio::time::timeout(APPROVAL_WAIT, self.chain.confirm(hash))
            .await
            .map_err(|_| DepositorError::Seeding {
                step: SeedStep::PoolApproval,
                message: format!("confirmation wait for {} timed out", hash),
            })?
            .map_err(|e| seeding_error(SeedStep::PoolApproval, e))?;

        if !record.is_confirmed() {
            return Err(DepositorError::Seeding {
                step: SeedStep::PoolApproval,
                message: format!("approval transaction {} reverted", hash),
            });
        }

        Ok(hash)
    }

    async fn report(&self, signer: Address, approval_tx: TxHash) -> Result<SeedReport> {
        let native = self.chain.native_balance(signer).await?;
        let token = self
            .chain
            .erc20_balance(self.plan.token, signer)
            .await?;
        let allowance = self
            .chain
            .allowance(self.plan.token, signer, self.plan.pool)
            .await?;

        Ok(SeedReport {
            seeds: vec![
                VirtualBalanceSeed {
                    address: signer,
                    asset: SeedAsset::Native,
                    amount: native,
                },
                VirtualBalanceSeed {
                    address: signer,
                    asset: SeedAsset::Token(self.plan.token),
                    amount: token,
                },
            ],
            approval: AllowanceState {
                owner: signer,
                spender: self.plan.pool,
                token: self.plan.token,
                amount: allowance,
            },
            approval_tx,
        })
    }
}

fn seeding_error(step: SeedStep, source: DepositorError) -> DepositorError {
    DepositorError::Seeding {
        step,
        message: source.to_string(),
    }
}
