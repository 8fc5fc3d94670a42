//! RPC error taxonomy.
//!
//! Transient transport and server failures are retried inside the
//! client; everything surfaced here is terminal for the calling query
//! or builder — nothing above the transport layer retries.

use thiserror::Error;

/// Failure of a JSON-RPC call after retries.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection, TLS, or timeout failure from the HTTP stack.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status that is not retryable.
    #[error("node returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The node accepted the request and returned an RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response body did not match the JSON-RPC envelope.
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),

    /// Transient failures persisted past the retry budget.
    #[error("retries exhausted calling {method}")]
    RetriesExhausted { method: String },
}
