//! Fullnode JSON-RPC Adapter
//!
//! Implements the `ChainClient` port against the node's JSON-RPC 2.0
//! API over HTTP. Handles the transport envelope, retry/backoff,
//! cursor pagination, and transaction submission encoding.
//!
//! Sub-modules:
//! - `client`: HTTP transport with bounded concurrency and retries
//! - `chain`: `ChainClient` port implementation
//! - `error`: RPC error taxonomy
//! - `types`: envelope and payload type definitions

pub mod chain;
pub mod client;
pub mod error;
pub mod types;

pub use chain::FullnodeClient;
pub use client::{RpcClient, RpcClientConfig};
pub use error::RpcError;
