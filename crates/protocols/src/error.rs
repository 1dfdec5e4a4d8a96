use alloy_transport::TransportError;
use thiserror::Error;

/// Failure of an external capability call.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The request did not reach the node or its answer was unusable.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
    /// The node answered with a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The external state owner rejected the call (revert, expired deadline,
    /// slippage floor, insufficient balance).
    #[error("call rejected: {0}")]
    Rejected(String),
    /// The response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProtocolError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }
}

impl From<TransportError> for ProtocolError {
    fn from(err: TransportError) -> Self {
        if let Some(payload) = err.as_error_resp() {
            return Self::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            };
        }
        Self::Transport(err)
    }
}
