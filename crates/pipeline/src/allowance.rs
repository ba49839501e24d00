//! Conditional allowance management

use alloy::primitives::{Address, U256};
use chain::{abi, ChainClient};
use std::sync::Arc;
use tracing::{info, warn};
use types::utils::format_units;
use types::{AllowanceState, DepositorError, Result, TxDescriptor};

/// Ensures the deposit target may pull the required token amount from the
/// depositor before a deposit is attempted.
pub struct AllowanceManager {
    chain: Arc<dyn ChainClient>,
    token: Address,
    spender: Address,
    ceiling: U256,
    token_decimals: u8,
}

impl AllowanceManager {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        token: Address,
        spender: Address,
        ceiling: U256,
        token_decimals: u8,
    ) -> Self {
        Self {
            chain,
            token,
            spender,
            ceiling,
            token_decimals,
        }
    }

    /// Make sure the spender is approved before a deposit of `required`.
    ///
    /// Any nonzero existing allowance is accepted unchanged, even one below
    /// `required`; the pool follows the one-time ceiling-approval pattern,
    /// so a nonzero allowance means the ceiling approval already happened.
    /// Only a zero allowance triggers an approval, which is submitted for
    /// the configured ceiling and awaited before returning.
    pub async fn ensure_allowance(&self, owner: Address, required: U256) -> Result<AllowanceState> {
        let current = self
            .chain
            .allowance(self.token, owner, self.spender)
            .await?;

        info!(
            allowance = %format_units(current, self.token_decimals),
            "Current allowance"
        );

        if !current.is_zero() {
            if current < required {
                warn!(
                    allowance = %format_units(current, self.token_decimals),
                    required = %format_units(required, self.token_decimals),
                    "Existing allowance is below the required amount; not re-approving"
                );
            }
            return Ok(AllowanceState {
                owner,
                spender: self.spender,
                token: self.token,
                amount: current,
            });
        }

        info!(
            ceiling = %format_units(self.ceiling, self.token_decimals),
            "Allowance is zero, approving spender"
        );

        let approve = TxDescriptor::call(
            owner,
            self.token,
            abi::approve_calldata(self.spender, self.ceiling),
        );

        let hash = self
            .chain
            .send(&approve)
            .await
            .map_err(|e| DepositorError::Allowance(e.to_string()))?;

        let record = self
            .chain
            .confirm(hash)
            .await
            .map_err(|e| DepositorError::Allowance(e.to_string()))?;

        if !record.is_confirmed() {
            return Err(DepositorError::Allowance(format!(
                "approval transaction {} reverted",
                record.hash
            )));
        }

        info!("Approval transaction mined successfully");

        let updated = self
            .chain
            .allowance(self.token, owner, self.spender)
            .await?;

        Ok(AllowanceState {
            owner,
            spender: self.spender,
            token: self.token,
            amount: updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::testing::ScriptedChain;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn manager_over(chain: Arc<ScriptedChain>) -> AllowanceManager {
        AllowanceManager::new(
            chain,
            addr(0x10),
            addr(0x20),
            U256::from(100_000_000_000u64),
            6,
        )
    }

    #[tokio::test]
    async fn test_zero_allowance_triggers_exactly_one_approval() {
        let chain = Arc::new(ScriptedChain::new(addr(0x01)));
        let manager = manager_over(chain.clone());

        let state = manager
            .ensure_allowance(addr(0x01), U256::from(20_000_000u64))
            .await
            .unwrap();

        assert_eq!(chain.sent_to(addr(0x10)), 1);
        assert_eq!(state.amount, U256::from(100_000_000_000u64));
    }

    #[tokio::test]
    async fn test_nonzero_allowance_is_a_no_op_even_when_insufficient() {
        let chain = Arc::new(
            ScriptedChain::new(addr(0x01)).with_allowance(
                addr(0x10),
                addr(0x01),
                addr(0x20),
                U256::from(5u64),
            ),
        );
        let manager = manager_over(chain.clone());

        let state = manager
            .ensure_allowance(addr(0x01), U256::from(20_000_000u64))
            .await
            .unwrap();

        assert_eq!(chain.sent(), vec![]);
        assert_eq!(state.amount, U256::from(5u64));
    }

    #[tokio::test]
    async fn test_reverted_approval_is_an_allowance_error() {
        let chain = Arc::new(ScriptedChain::new(addr(0x01)).fail_confirmations());
        let manager = manager_over(chain.clone());

        let result = manager
            .ensure_allowance(addr(0x01), U256::from(20_000_000u64))
            .await;

        assert!(matches!(result, Err(DepositorError::Allowance(_))));
    }
}
