//! Fullnode HTTP Client - Retrying JSON-RPC Transport
//!
//! Wraps reqwest with bounded concurrency and retries for all JSON-RPC
//! interactions with the fullnode. Transient failures (transport
//! errors, HTTP 429/5xx) are retried with exponential backoff; RPC-level
//! errors are terminal and surface immediately.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::error::RpcError;
use super::types::{JsonRpcRequest, JsonRpcResponse};

/// Configuration for the fullnode JSON-RPC client.
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
  /// Node endpoint URL.
  pub url: String,
  /// Request timeout.
  pub timeout: Duration,
  /// Maximum concurrent in-flight requests.
  pub max_concurrent: usize,
  /// Maximum retries on transient errors.
  pub max_retries: u32,
  /// Base delay between retries (exponential backoff).
  pub retry_base_delay: Duration,
}

impl Default for RpcClientConfig {
  fn default() -> Self {
    Self {
      url: "http://127.0.0.1:9000".to_string(),
      timeout: Duration::from_secs(30),
      max_concurrent: 8,
      max_retries: 3,
      retry_base_delay: Duration::from_millis(200),
    }
  }
}

/// Concurrency-bounded JSON-RPC client for the fullnode.
pub struct RpcClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: RpcClientConfig,
  /// Concurrency limiter.
  semaphore: Arc<Semaphore>,
}

impl RpcClient {
  /// Create a new client against the configured endpoint.
  pub fn new(config: RpcClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(4)
      .build()
      .context("Failed to build HTTP client")?;

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent));

    Ok(Self {
      http,
      config,
      semaphore,
    })
  }

  /// The endpoint this client talks to.
  pub fn url(&self) -> &str {
    &self.config.url
  }

  /// Execute one JSON-RPC call, retrying transient failures.
  ///
  /// Returns the response's `result` member. An RPC error object from
  /// the node is terminal (the request was understood and rejected);
  /// only transport failures and HTTP 429/5xx are retried.
  pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
    let _permit = self
      .semaphore
      .acquire()
      .await
      .map_err(|_| RpcError::MalformedResponse("client is shutting down".to_string()))?;

    let mut last_error = None;

    for attempt in 0..=self.config.max_retries {
      if attempt > 0 {
        let delay = self.config.retry_base_delay * 2u32.pow(attempt - 1);
        debug!(method, attempt, delay_ms = delay.as_millis(), "Retrying rpc call");
        sleep(delay).await;
      }

      let request = JsonRpcRequest::new(method, params.clone());

      let response = match self.http.post(&self.config.url).json(&request).send().await {
        Ok(response) => response,
        Err(e) => {
          warn!(method, error = %e, attempt, "Rpc transport failure");
          last_error = Some(RpcError::Transport(e));
          continue;
        }
      };

      match response.status() {
        StatusCode::OK => {
          let envelope: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::MalformedResponse(e.to_string()))?;

          if let Some(err) = envelope.error {
            return Err(RpcError::Rpc {
              code: err.code,
              message: err.message,
            });
          }

          return Ok(envelope.result.unwrap_or(Value::Null));
        }
        StatusCode::TOO_MANY_REQUESTS => {
          warn!(method, "Rate limited by node, backing off");
          last_error = Some(RpcError::Status(StatusCode::TOO_MANY_REQUESTS));
          sleep(Duration::from_secs(1)).await;
          continue;
        }
        status if status.is_server_error() => {
          warn!(method, status = %status, "Node server error, retrying");
          last_error = Some(RpcError::Status(status));
          continue;
        }
        status => return Err(RpcError::Status(status)),
      }
    }

    Err(last_error.unwrap_or(RpcError::RetriesExhausted {
      method: method.to_string(),
    }))
  }
}
