//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain derivation with the port interfaces to implement
//! the marketplace's client-side workflows. Each use case is a
//! self-contained operation the presentation layer calls directly.
//!
//! Use cases:
//! - `MarketActions`: transaction builders for the seven marketplace
//!   actions, behind one build-and-submit primitive
//! - `ListingsQuery` / `BidsQuery` / `NftQuery` / `AccountNftsQuery`:
//!   composed multi-stage reads with a pending/error surface and
//!   manual refetch

pub mod actions;
pub mod queries;

pub use actions::{MarketActions, MarketplaceRefs};
pub use queries::{
    AccountNftsQuery, BidsQuery, ListingsQuery, NftDetails, NftQuery, QueryState,
};
