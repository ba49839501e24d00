//! Deposit-related types and structures

use alloy::{
    primitives::{Address, Bytes, FixedBytes, TxHash, U256},
    rpc::types::TransactionReceipt,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DepositorError, Result};

/// Unique identifier for a deposit, 16 caller-generated random bytes
pub type DepositId = FixedBytes<16>;

/// A single deposit attempt against the liquidity manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Deposit identifier, unique per semantic deposit
    #[serde(rename = "depositId")]
    pub deposit_id: DepositId,
    /// Deposit amount in the token's minor units
    pub amount: U256,
    /// Account the tokens are pulled from
    pub depositor: Address,
}

impl DepositRequest {
    /// Create a new request with a freshly generated deposit id
    pub fn new(depositor: Address, amount: U256) -> Result<Self> {
        Self::with_id(DepositId::from(Uuid::new_v4().into_bytes()), depositor, amount)
    }

    /// Create a request with an explicit deposit id
    pub fn with_id(deposit_id: DepositId, depositor: Address, amount: U256) -> Result<Self> {
        if amount.is_zero() {
            return Err(DepositorError::InvalidRequest(
                "deposit amount must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            deposit_id,
            amount,
            depositor,
        })
    }
}

/// Current on-chain approval for a (owner, spender, token) triple
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllowanceState {
    /// Token owner
    pub owner: Address,
    /// Authorized spender
    pub spender: Address,
    /// ERC20 token the approval applies to
    pub token: Address,
    /// Approved amount in minor units
    pub amount: U256,
}

/// Transaction payload as it would be sent to the network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxDescriptor {
    /// Sending account
    pub from: Address,
    /// Target contract
    pub to: Address,
    /// ABI-encoded call data
    pub data: Bytes,
    /// Native value attached to the call
    pub value: U256,
    /// Gas limit, zero for a cost-free dry run
    pub gas: U256,
    /// Gas price, zero for a cost-free dry run
    #[serde(rename = "gasPrice")]
    pub gas_price: U256,
}

impl TxDescriptor {
    /// Build a plain contract-call descriptor with value, gas and gas price
    /// all zeroed: cost-free when dry-run, estimated at send time when
    /// submitted for real.
    pub fn call(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from,
            to,
            data,
            value: U256::ZERO,
            gas: U256::ZERO,
            gas_price: U256::ZERO,
        }
    }
}

/// Lifecycle state of a submitted transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Sent, hash known, not yet included
    Pending,
    /// Included with a successful execution outcome
    Confirmed,
    /// Included but reverted, or the confirmation wait failed
    Failed,
}

/// Record of a transaction submitted by this pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash, known as soon as the send is accepted
    pub hash: TxHash,
    /// Current lifecycle state
    pub status: TxStatus,
    /// Inclusion receipt, present once confirmed or failed
    pub receipt: Option<TransactionReceipt>,
    /// When the transaction was handed to the network
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
    /// When the confirmation was observed
    #[serde(rename = "confirmedAt")]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl TransactionRecord {
    /// Record for a transaction that has been sent but not yet included
    pub fn pending(hash: TxHash) -> Self {
        Self {
            hash,
            status: TxStatus::Pending,
            receipt: None,
            submitted_at: Utc::now(),
            confirmed_at: None,
        }
    }

    /// Finalize the record from an inclusion receipt
    pub fn finalized(mut self, receipt: TransactionReceipt, success: bool) -> Self {
        self.status = if success {
            TxStatus::Confirmed
        } else {
            TxStatus::Failed
        };
        self.receipt = Some(receipt);
        self.confirmed_at = Some(Utc::now());
        self
    }

    /// Whether the transaction landed successfully
    pub fn is_confirmed(&self) -> bool {
        self.status == TxStatus::Confirmed
    }
}

/// Asset targeted by a virtual network balance override
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeedAsset {
    /// The network's native currency
    Native,
    /// An ERC20 token at the given address
    Token(Address),
}

/// A single balance override applied while seeding a virtual network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VirtualBalanceSeed {
    /// Account whose balance is overridden
    pub address: Address,
    /// Asset being overridden
    pub asset: SeedAsset,
    /// Target balance in the asset's minor units
    pub amount: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_request_rejects_zero_amount() {
        let result = DepositRequest::new(Address::ZERO, U256::ZERO);
        assert!(matches!(result, Err(DepositorError::InvalidRequest(_))));
    }

    #[test]
    fn test_deposit_ids_are_unique() {
        let a = DepositRequest::new(Address::ZERO, U256::from(1)).unwrap();
        let b = DepositRequest::new(Address::ZERO, U256::from(1)).unwrap();
        assert_ne!(a.deposit_id, b.deposit_id);
    }

    #[test]
    fn test_call_descriptor_is_cost_free() {
        let tx = TxDescriptor::call(Address::ZERO, Address::ZERO, Bytes::new());
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(tx.gas, U256::ZERO);
        assert_eq!(tx.gas_price, U256::ZERO);
    }
}
