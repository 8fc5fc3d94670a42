//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.
//! The RPC endpoint of the selected network can be overridden with
//! the `MARKETPLACE_RPC_URL` environment variable.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let mut config: AppConfig =
    toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

  apply_env_overrides(&mut config);
  validate_config(&config)?;

  info!(
    networks = config.networks.len(),
    default_network = %config.client.default_network,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Override the selected network's RPC endpoint from the environment.
fn apply_env_overrides(config: &mut AppConfig) {
  if let Ok(url) = std::env::var("MARKETPLACE_RPC_URL") {
    let name = config.client.default_network.clone();
    if let Some(network) = config.networks.iter_mut().find(|n| n.name == name) {
      network.rpc_url = url;
    }
  }
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - At least one network, with unique names
/// - The default network actually configured
/// - Hex-prefixed object ids and non-empty endpoints
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.networks.is_empty(),
    "At least one network must be configured"
  );

  for (i, network) in config.networks.iter().enumerate() {
    anyhow::ensure!(
      !network.name.is_empty(),
      "Network {} has an empty name",
      i
    );
    anyhow::ensure!(
      !network.rpc_url.is_empty(),
      "Network {} ({}) has an empty rpc_url",
      i,
      network.name
    );
    anyhow::ensure!(
      network.package_id.starts_with("0x"),
      "Network {} ({}) package_id must be 0x-prefixed, got {:?}",
      i,
      network.name,
      network.package_id
    );
    anyhow::ensure!(
      network.marketplace_object_id.starts_with("0x"),
      "Network {} ({}) marketplace_object_id must be 0x-prefixed, got {:?}",
      i,
      network.name,
      network.marketplace_object_id
    );
  }

  let mut names: Vec<&str> = config.networks.iter().map(|n| n.name.as_str()).collect();
  names.sort_unstable();
  names.dedup();
  anyhow::ensure!(
    names.len() == config.networks.len(),
    "Network names must be unique"
  );

  anyhow::ensure!(
    config.default_network().is_some(),
    "default_network {:?} is not among the configured networks",
    config.client.default_network
  );

  anyhow::ensure!(
    config.client.max_retries <= 10,
    "max_retries must be at most 10, got {}",
    config.client.max_retries
  );
  anyhow::ensure!(
    config.client.max_concurrent_requests > 0,
    "max_concurrent_requests must be positive"
  );

  Ok(())
}
