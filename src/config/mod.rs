//! Configuration Module - TOML-based Network Configuration
//!
//! Loads and validates the marketplace deployment coordinates from
//! `config.toml`: one entry per network (fullnode URL, contract package
//! id, marketplace root object id) plus client-side transport limits.
//! All object ids and endpoints are externalized here - nothing is
//! hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Client transport and selection settings.
  pub client: ClientConfig,
  /// Known marketplace deployments, one per network.
  pub networks: Vec<NetworkConfig>,
}

/// Client-side settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
  /// Which `[[networks]]` entry to use by default.
  pub default_network: String,
  /// Request timeout in seconds.
  #[serde(default = "default_timeout")]
  pub timeout_seconds: u64,
  /// Maximum concurrent node requests.
  #[serde(default = "default_max_concurrent")]
  pub max_concurrent_requests: usize,
  /// Maximum retries on transient node errors.
  #[serde(default = "default_max_retries")]
  pub max_retries: u32,
}

/// One marketplace deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
  /// Network name, e.g. `testnet`.
  pub name: String,
  /// Fullnode JSON-RPC endpoint.
  pub rpc_url: String,
  /// Package holding the marketplace entry points.
  pub package_id: String,
  /// The shared marketplace root object.
  pub marketplace_object_id: String,
}

impl AppConfig {
  /// Look up a network by name.
  pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
    self.networks.iter().find(|n| n.name == name)
  }

  /// The configured default network.
  pub fn default_network(&self) -> Option<&NetworkConfig> {
    self.network(&self.client.default_network)
  }
}

fn default_timeout() -> u64 {
  30
}

fn default_max_concurrent() -> usize {
  8
}

fn default_max_retries() -> u32 {
  3
}
