//! The chain client seam

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use types::{Result, TransactionRecord, TxDescriptor};

/// Every remote operation the pipeline and the seeder perform.
///
/// The live implementation is [`crate::HttpChain`]; tests substitute a
/// scripted in-memory implementation.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing identity used for writes
    fn signer_address(&self) -> Address;

    /// Read the current `allowance(owner, spender)` of an ERC20 token
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Read an account's native-currency balance
    async fn native_balance(&self, address: Address) -> Result<U256>;

    /// Read an account's ERC20 token balance
    async fn erc20_balance(&self, token: Address, address: Address) -> Result<U256>;

    /// Dry-run the exact transaction payload against the latest block.
    ///
    /// Returns the node's simulation trace on success; a simulated revert
    /// or RPC-level rejection surfaces as a tagged RPC failure.
    async fn simulate(&self, tx: &TxDescriptor) -> Result<serde_json::Value>;

    /// Send a transaction for real execution.
    ///
    /// Resolves as soon as the network accepts the transaction and a hash
    /// is known; inclusion is observed separately via [`Self::confirm`].
    async fn send(&self, tx: &TxDescriptor) -> Result<TxHash>;

    /// Wait until the transaction is included and return the finalized
    /// record.
    ///
    /// Polls for the receipt indefinitely; callers bound the wait with
    /// their own deadline.
    async fn confirm(&self, hash: TxHash) -> Result<TransactionRecord>;

    /// Override an account's native balance on a virtual network
    async fn set_native_balance(&self, address: Address, amount: U256) -> Result<()>;

    /// Override an account's ERC20 balance on a virtual network
    async fn set_erc20_balance(&self, token: Address, address: Address, amount: U256)
        -> Result<()>;
}
