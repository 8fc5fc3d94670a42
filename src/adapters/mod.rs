//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Hosts that bring their own chain access
//! (an embedded wallet SDK, a test double) implement the ports
//! themselves and skip this layer entirely.
//!
//! Adapter categories:
//! - `rpc`: fullnode JSON-RPC client over HTTP

pub mod rpc;
