//! Live chain client over an alloy HTTP provider

use crate::abi::IERC20;
use crate::client::ChainClient;
use crate::failure;
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;
use std::time::Duration;
use types::utils::to_hex_amount;
use types::{DepositorError, Result, TransactionRecord, TxDescriptor};

/// How often the confirmation wait polls for a receipt
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// HTTP chain client with a local signing identity.
///
/// The provider carries the recommended fillers plus a wallet filler, so
/// nonce, gas and chain id are resolved at send time.
#[derive(Debug, Clone)]
pub struct HttpChain<P> {
    provider: P,
    signer: Address,
}

impl HttpChain<()> {
    /// Connect to an HTTP JSON-RPC endpoint with a hex-encoded private key
    pub fn connect(
        rpc_url: &str,
        private_key: &str,
    ) -> Result<HttpChain<impl Provider<Http<Client>> + Clone>> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| DepositorError::Config(format!("Invalid private key: {}", e)))?;
        let signer_address = signer.address();

        let url = rpc_url
            .parse()
            .map_err(|_| DepositorError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::from(signer))
            .on_http(url);

        Ok(HttpChain {
            provider,
            signer: signer_address,
        })
    }
}

#[async_trait]
impl<P> ChainClient for HttpChain<P>
where
    P: Provider<Http<Client>> + Clone + 'static,
{
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let current = IERC20::new(token, &self.provider)
            .allowance(owner, spender)
            .call()
            .await
            .map_err(failure::from_contract)?;
        Ok(current._0)
    }

    async fn native_balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| failure::from_transport(e).into())
    }

    async fn erc20_balance(&self, token: Address, address: Address) -> Result<U256> {
        let balance = IERC20::new(token, &self.provider)
            .balanceOf(address)
            .call()
            .await
            .map_err(failure::from_contract)?;
        Ok(balance._0)
    }

    async fn simulate(&self, tx: &TxDescriptor) -> Result<serde_json::Value> {
        let tx_object = serde_json::to_value(tx)
            .map_err(|e| DepositorError::InvalidRequest(e.to_string()))?;

        self.provider
            .raw_request("tenderly_simulateTransaction".into(), (tx_object, "latest"))
            .await
            .map_err(|e| failure::from_transport(e).into())
    }

    async fn send(&self, tx: &TxDescriptor) -> Result<TxHash> {
        let mut req = TransactionRequest::default()
            .to(tx.to)
            .input(TransactionInput::from(tx.data.clone()));
        req.from = Some(tx.from);

        if !tx.value.is_zero() {
            req = req.value(tx.value);
        }
        // Zero gas fields in the descriptor mean "estimate at send time"
        if !tx.gas.is_zero() {
            req.gas = Some(tx.gas.saturating_to());
        }
        if !tx.gas_price.is_zero() {
            req.gas_price = Some(tx.gas_price.saturating_to());
        }

        let pending = self
            .provider
            .send_transaction(req)
            .await
            .map_err(failure::from_transport)?;

        tracing::debug!(tx_hash = %pending.tx_hash(), "Transaction accepted by the network");
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, hash: TxHash) -> Result<TransactionRecord> {
        let record = TransactionRecord::pending(hash);

        loop {
            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    let success = receipt.status();
                    tracing::debug!(tx_hash = %hash, success, "Receipt observed");
                    return Ok(record.finalized(receipt, success));
                }
                Ok(None) => tokio::time::sleep(RECEIPT_POLL_INTERVAL).await,
                Err(e) => return Err(failure::from_transport(e).into()),
            }
        }
    }

    async fn set_native_balance(&self, address: Address, amount: U256) -> Result<()> {
        let _: serde_json::Value = self
            .provider
            .raw_request("tenderly_setBalance".into(), (address, to_hex_amount(amount)))
            .await
            .map_err(failure::from_transport)?;
        Ok(())
    }

    async fn set_erc20_balance(
        &self,
        token: Address,
        address: Address,
        amount: U256,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .provider
            .raw_request(
                "tenderly_setErc20Balance".into(),
                (token, address, to_hex_amount(amount)),
            )
            .await
            .map_err(failure::from_transport)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Bytes;
    use serde_json::json;
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    const TEST_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    /// Echoes the request id back, as a real JSON-RPC server would.
    /// Pass `{"error": {..}}` to script a failure, anything else is the result.
    struct Rpc(serde_json::Value);

    impl Respond for Rpc {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: serde_json::Value =
                serde_json::from_slice(&request.body).unwrap_or_default();
            let id = body.get("id").cloned().unwrap_or(json!(1));

            let mut response = json!({"jsonrpc": "2.0", "id": id});
            match self.0.get("error") {
                Some(error) => response["error"] = error.clone(),
                None => response["result"] = self.0.clone(),
            }
            ResponseTemplate::new(200).set_body_json(response)
        }
    }

    fn chain_against(server: &MockServer) -> HttpChain<impl Provider<Http<Client>> + Clone> {
        HttpChain::connect(&server.uri(), TEST_KEY).unwrap()
    }

    fn dry_run_tx() -> TxDescriptor {
        TxDescriptor::call(Address::ZERO, Address::ZERO, Bytes::from(vec![0x01, 0x02]))
    }

    #[tokio::test]
    async fn test_simulate_returns_trace_on_success() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::method("POST"))
            .respond_with(Rpc(json!({"status": true, "trace": []})))
            .mount(&server)
            .await;

        let chain = chain_against(&server);
        let trace = chain.simulate(&dry_run_tx()).await.unwrap();
        assert_eq!(trace["status"], json!(true));
    }

    #[tokio::test]
    async fn test_simulate_rejection_is_tagged_once() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::method("POST"))
            .respond_with(Rpc(json!({
                "error": {
                    "code": 3,
                    "message": "insufficient balance",
                    "data": "0x08c379a0"
                }
            })))
            .mount(&server)
            .await;

        let chain = chain_against(&server);
        let err = chain.simulate(&dry_run_tx()).await.unwrap_err();

        match err {
            DepositorError::Rpc(failure) => {
                assert_eq!(failure.classify(), "insufficient balance");
                assert_eq!(failure.data.as_deref(), Some("0x08c379a0"));
            }
            other => panic!("expected Rpc failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_allowance_read_decodes_amount() {
        let server = MockServer::start().await;
        // 20 units of a 6-decimal token
        Mock::given(wiremock::matchers::method("POST"))
            .respond_with(Rpc(json!(
                "0x0000000000000000000000000000000000000000000000000000000001312d00"
            )))
            .mount(&server)
            .await;

        let chain = chain_against(&server);
        let allowance = chain
            .allowance(Address::ZERO, Address::ZERO, Address::ZERO)
            .await
            .unwrap();
        assert_eq!(allowance, U256::from(20_000_000u64));
    }

    #[tokio::test]
    async fn test_balance_overrides_succeed_on_null_result() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::method("POST"))
            .respond_with(Rpc(json!(null)))
            .mount(&server)
            .await;

        let chain = chain_against(&server);
        let one_eth = U256::from(1_000_000_000_000_000_000u64);

        chain
            .set_native_balance(Address::ZERO, one_eth)
            .await
            .unwrap();
        chain
            .set_erc20_balance(Address::ZERO, Address::ZERO, one_eth)
            .await
            .unwrap();
    }
}
