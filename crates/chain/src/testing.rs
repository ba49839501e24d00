//! Scripted in-memory chain client for tests
//!
//! Plays the role Anvil or a virtual testnet would play in an integration
//! environment: allowances, balances and confirmations are tracked in
//! memory, and failure modes are scripted per test.

use crate::abi::IERC20;
use crate::client::ChainClient;
use alloy::primitives::{Address, TxHash, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use types::{
    DepositorError, Result, RpcFailure, TransactionRecord, TxDescriptor, TxStatus,
};

/// In-memory chain state with scripted failure modes
pub struct ScriptedChain {
    signer: Address,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    allowances: HashMap<(Address, Address, Address), U256>,
    native: HashMap<Address, U256>,
    erc20: HashMap<(Address, Address), U256>,
    in_flight: HashMap<TxHash, TxDescriptor>,
    sent: Vec<TxDescriptor>,
    simulated: Vec<TxDescriptor>,
    simulate_rejection: Option<RpcFailure>,
    balance_overrides_fail: bool,
    confirmations_fail: bool,
    confirm_delay: Option<Duration>,
    next_tx: u64,
}

impl ScriptedChain {
    pub fn new(signer: Address) -> Self {
        Self {
            signer,
            state: Mutex::new(State::default()),
        }
    }

    /// Pre-set an allowance for (token, owner, spender)
    pub fn with_allowance(
        self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
        self
    }

    /// Script every simulation to be rejected with the given failure
    pub fn reject_simulations_with(self, failure: RpcFailure) -> Self {
        self.state.lock().unwrap().simulate_rejection = Some(failure);
        self
    }

    /// Script every balance-override call to fail at the RPC level
    pub fn fail_balance_overrides(self) -> Self {
        self.state.lock().unwrap().balance_overrides_fail = true;
        self
    }

    /// Script every confirmation to report an on-chain revert
    pub fn fail_confirmations(self) -> Self {
        self.state.lock().unwrap().confirmations_fail = true;
        self
    }

    /// Delay every confirmation, for deadline tests
    pub fn delay_confirmations(self, delay: Duration) -> Self {
        self.state.lock().unwrap().confirm_delay = Some(delay);
        self
    }

    /// All descriptors submitted for real execution, in order
    pub fn sent(&self) -> Vec<TxDescriptor> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Count of real submissions targeting the given contract
    pub fn sent_to(&self, to: Address) -> usize {
        self.state
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|tx| tx.to == to)
            .count()
    }

    /// Count of dry runs performed
    pub fn simulated_count(&self) -> usize {
        self.state.lock().unwrap().simulated.len()
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let state = self.state.lock().unwrap();
        Ok(state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        let state = self.state.lock().unwrap();
        Ok(state.native.get(&address).copied().unwrap_or(U256::ZERO))
    }

    async fn erc20_balance(&self, token: Address, address: Address) -> Result<U256> {
        let state = self.state.lock().unwrap();
        Ok(state
            .erc20
            .get(&(token, address))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn simulate(&self, tx: &TxDescriptor) -> Result<serde_json::Value> {
        let mut state = self.state.lock().unwrap();
        state.simulated.push(tx.clone());

        match &state.simulate_rejection {
            Some(failure) => Err(DepositorError::Rpc(failure.clone())),
            None => Ok(serde_json::json!({ "status": true })),
        }
    }

    async fn send(&self, tx: &TxDescriptor) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        state.next_tx += 1;
        let hash = TxHash::from(U256::from(state.next_tx).to_be_bytes::<32>());

        state.sent.push(tx.clone());
        state.in_flight.insert(hash, tx.clone());
        Ok(hash)
    }

    async fn confirm(&self, hash: TxHash) -> Result<TransactionRecord> {
        let delay = self.state.lock().unwrap().confirm_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        let tx = state.in_flight.remove(&hash).ok_or_else(|| {
            DepositorError::Rpc(RpcFailure::from_message("unknown transaction hash"))
        })?;

        let success = !state.confirmations_fail;
        if success {
            // A confirmed approve updates the tracked allowance
            if let Ok(call) = IERC20::approveCall::abi_decode(&tx.data, true) {
                state
                    .allowances
                    .insert((tx.to, tx.from, call.spender), call.amount);
            }
        }

        Ok(TransactionRecord {
            hash,
            status: if success {
                TxStatus::Confirmed
            } else {
                TxStatus::Failed
            },
            receipt: None,
            submitted_at: Utc::now(),
            confirmed_at: Some(Utc::now()),
        })
    }

    async fn set_native_balance(&self, address: Address, amount: U256) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.balance_overrides_fail {
            return Err(DepositorError::Rpc(RpcFailure::from_message(
                "balance override unsupported",
            )));
        }
        state.native.insert(address, amount);
        Ok(())
    }

    async fn set_erc20_balance(
        &self,
        token: Address,
        address: Address,
        amount: U256,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.balance_overrides_fail {
            return Err(DepositorError::Rpc(RpcFailure::from_message(
                "balance override unsupported",
            )));
        }
        state.erc20.insert((token, address), amount);
        Ok(())
    }
}
