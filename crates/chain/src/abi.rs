//! Contract bindings and calldata helpers

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use types::DepositId;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }

    #[sol(rpc)]
    interface ILiquidityManager {
        function deposit(bytes16 depositId, uint256 amount) external;
    }
}

/// ABI-encoded `approve(spender, amount)` calldata
pub fn approve_calldata(spender: Address, amount: U256) -> Bytes {
    IERC20::approveCall { spender, amount }.abi_encode().into()
}

/// ABI-encoded `deposit(depositId, amount)` calldata.
///
/// This is the exact payload used for both the dry run and the real
/// submission.
pub fn deposit_calldata(deposit_id: DepositId, amount: U256) -> Bytes {
    ILiquidityManager::depositCall {
        depositId: deposit_id,
        amount,
    }
    .abi_encode()
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_calldata_layout() {
        let id = DepositId::from([0xabu8; 16]);
        let data = deposit_calldata(id, U256::from(20_000_000u64));

        // 4-byte selector + two 32-byte words
        assert_eq!(data.len(), 68);
        // bytes16 argument is left-aligned in its word
        assert_eq!(&data[4..20], &[0xabu8; 16]);
        assert_eq!(&data[20..36], &[0u8; 16]);
    }

    #[test]
    fn test_approve_calldata_selector() {
        let data = approve_calldata(Address::ZERO, U256::MAX);
        // approve(address,uint256) selector
        assert_eq!(&data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
    }
}
