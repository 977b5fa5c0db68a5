use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_rpc_client_api::request::RpcError;
use solana_sdk::{signer::SignerError, transaction::TransactionError};
use thiserror::Error;

/// Errors surfaced by a [`Ledger`](super::Ledger) implementation
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Transport-level errors (network, connection)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// Request did not complete in time
    #[error("Timeout (endpoint: {endpoint})")]
    Timeout { endpoint: String },

    /// RPC response errors (from the RPC server)
    #[error("RPC response error: {message} (endpoint: {endpoint}, code: {code:?})")]
    RpcResponse {
        endpoint: String,
        message: String,
        code: Option<i64>,
    },

    /// The cluster processed the transaction and refused it
    #[error("Transaction rejected: {reason}")]
    TransactionRejected {
        reason: String,
        error: Option<TransactionError>,
    },

    /// The transaction could not be signed locally
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Classify a JSON-RPC client error.
    ///
    /// Preflight and confirmation failures carry a `TransactionError`; those
    /// become [`LedgerError::TransactionRejected`] regardless of how the RPC
    /// server wrapped them.
    pub fn from_client_error(endpoint: &str, err: ClientError) -> Self {
        if let Some(tx_err) = err.get_transaction_error() {
            return Self::rejected(tx_err);
        }

        match err.kind() {
            ClientErrorKind::Reqwest(e) if e.is_timeout() => Self::Timeout {
                endpoint: endpoint.to_string(),
            },
            ClientErrorKind::Reqwest(e) => Self::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            },
            ClientErrorKind::Io(e) => Self::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            },
            ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => {
                Self::RpcResponse {
                    endpoint: endpoint.to_string(),
                    message: message.clone(),
                    code: Some(*code),
                }
            }
            ClientErrorKind::RpcError(other) => Self::RpcResponse {
                endpoint: endpoint.to_string(),
                message: other.to_string(),
                code: None,
            },
            ClientErrorKind::SigningError(e) => Self::Signing(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }

    /// Wrap a transaction error returned by the cluster
    pub fn rejected(error: TransactionError) -> Self {
        Self::TransactionRejected {
            reason: error.to_string(),
            error: Some(error),
        }
    }

    /// True when the cluster itself refused the transaction, as opposed to
    /// the request never reaching it
    pub fn is_on_chain_rejection(&self) -> bool {
        matches!(self, Self::TransactionRejected { .. })
    }

    /// Get the error category for structured logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
            Self::RpcResponse { .. } => "rpc_response",
            Self::TransactionRejected { .. } => "rejected",
            Self::Signing(_) => "signing",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<SignerError> for LedgerError {
    fn from(err: SignerError) -> Self {
        Self::Signing(err.to_string())
    }
}
