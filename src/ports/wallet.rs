//! Wallet Context Port - Active Account Identity
//!
//! The wallet session is owned by the surrounding host (browser wallet,
//! CLI keystore, test harness). This layer only ever reads the active
//! address: mutating actions are gated on its presence, and result
//! routing targets it. No key material crosses this boundary.

use crate::domain::market::Address;

/// Read-only view of the connected account.
pub trait WalletContext: Send + Sync {
  /// The active account address, or `None` while disconnected.
  fn active_address(&self) -> Option<Address>;
}

/// A fixed wallet context for hosts without a live wallet session
/// (tests, one-shot tools).
#[derive(Debug, Clone, Default)]
pub struct StaticWallet {
  address: Option<Address>,
}

impl StaticWallet {
  /// A context with a connected account.
  pub fn connected(address: impl Into<Address>) -> Self {
    Self {
      address: Some(address.into()),
    }
  }

  /// A context with no account; every mutating action becomes a no-op.
  pub fn disconnected() -> Self {
    Self { address: None }
  }
}

impl WalletContext for StaticWallet {
  fn active_address(&self) -> Option<Address> {
    self.address.clone()
  }
}
