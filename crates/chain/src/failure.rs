//! Conversion of transport errors into the tagged failure type
//!
//! Every alloy error enters the system through this module exactly once,
//! so downstream code only ever matches on [`RpcFailure`].

use alloy::transports::{RpcError, TransportErrorKind};
use types::RpcFailure;

/// Convert a raw transport error into a tagged failure.
///
/// A JSON-RPC error response contributes the node's structured message and
/// any `data` payload (typically ABI-encoded revert data); everything else
/// contributes only its top-level message.
pub fn from_transport(err: RpcError<TransportErrorKind>) -> RpcFailure {
    match err {
        RpcError::ErrorResp(payload) => {
            let data = payload
                .data
                .as_ref()
                .map(|raw| raw.get().trim_matches('"').to_string());
            RpcFailure {
                message: format!("error code {}: {}", payload.code, payload.message),
                node_message: Some(payload.message.to_string()),
                data,
            }
        }
        other => RpcFailure::from_message(other.to_string()),
    }
}

/// Convert a contract-call error into a tagged failure
pub fn from_contract(err: alloy::contract::Error) -> RpcFailure {
    match err {
        alloy::contract::Error::TransportError(transport) => from_transport(transport),
        other => RpcFailure::from_message(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;
    use serde_json::value::RawValue;

    fn revert_payload() -> ErrorPayload {
        ErrorPayload {
            code: 3,
            message: "execution reverted: insufficient balance".into(),
            data: Some(
                RawValue::from_string("\"0x08c379a0\"".to_string()).unwrap(),
            ),
        }
    }

    #[test]
    fn test_error_response_keeps_node_message_and_data() {
        let failure = from_transport(RpcError::ErrorResp(revert_payload()));

        assert_eq!(
            failure.node_message.as_deref(),
            Some("execution reverted: insufficient balance")
        );
        assert_eq!(failure.data.as_deref(), Some("0x08c379a0"));
        assert_eq!(failure.classify(), "execution reverted: insufficient balance");
    }

    #[test]
    fn test_transport_error_has_only_top_level_message() {
        let failure = from_transport(RpcError::Transport(TransportErrorKind::BackendGone));

        assert!(failure.node_message.is_none());
        assert!(failure.data.is_none());
        assert_eq!(failure.classify(), failure.message);
    }
}
