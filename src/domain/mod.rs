//! Domain layer - Core marketplace models and derivation logic.
//!
//! Pure types and total functions only: raw chain payloads in,
//! view-models and transactions out. No I/O and no clocks here
//! (hexagonal architecture inner ring); everything is testable in
//! isolation.

pub mod denom;
pub mod market;
pub mod object;
pub mod tx;

// Re-export core types for convenience
pub use market::{Address, Bid, Listing, Nft, ObjectId, TxDigest};
pub use object::{Fields, ObjectContent, ObjectResponse};
pub use tx::{Argument, Command, Input, TransactionBuilder, TransactionData};
