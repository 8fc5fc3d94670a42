//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ChainClient`: object reads, dynamic-field index reads, and
//!   transaction submission/finalization against the node
//! - `WalletContext`: read-only view of the active account identity

pub mod chain_client;
pub mod wallet;
