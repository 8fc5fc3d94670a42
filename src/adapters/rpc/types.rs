//! JSON-RPC Envelope and Node Payload Types
//!
//! Defines the serialization types for the fullnode's JSON-RPC 2.0
//! surface: the request/response envelope plus the payload shapes of
//! the read and submission methods. All types derive
//! Serialize/Deserialize for JSON transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::object::ObjectResponse;

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
  /// Always `"2.0"`.
  pub jsonrpc: &'static str,
  /// Client-generated request id (UUID v4).
  pub id: String,
  /// Method name, e.g. `getObject`.
  pub method: String,
  /// Positional parameters.
  pub params: Value,
}

impl JsonRpcRequest {
  pub fn new(method: impl Into<String>, params: Value) -> Self {
    Self {
      jsonrpc: "2.0",
      id: uuid::Uuid::new_v4().to_string(),
      method: method.into(),
      params,
    }
  }
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
  #[serde(default)]
  pub result: Option<Value>,
  #[serde(default)]
  pub error: Option<JsonRpcErrorBody>,
}

/// The `error` member of a failed JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorBody {
  pub code: i64,
  pub message: String,
}

/// Result wrapper of a single object read.
///
/// The node reports per-object failures (not found, deleted) in-band
/// rather than failing the whole call.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectResult {
  #[serde(default)]
  pub data: Option<ObjectResponse>,
  #[serde(default)]
  pub error: Option<Value>,
}

/// A cursor-paginated result page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub data: Vec<T>,
  #[serde(default)]
  pub has_next_page: bool,
  #[serde(default)]
  pub next_cursor: Option<Value>,
}

/// One dynamic-field index entry as the node reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDynamicField {
  pub object_id: String,
  #[serde(default)]
  pub name: Option<Value>,
  #[serde(default)]
  pub object_type: Option<String>,
}

/// Response of a transaction submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
  pub digest: String,
  #[serde(default)]
  pub effects: Option<TxEffects>,
  #[serde(default)]
  pub timestamp_ms: Option<u64>,
}

/// Execution effects attached to a submission response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEffects {
  #[serde(default)]
  pub status: Option<TxStatus>,
  #[serde(default)]
  pub created: Vec<CreatedObject>,
}

/// Execution status reported by the node.
#[derive(Debug, Clone, Deserialize)]
pub struct TxStatus {
  pub status: String,
  #[serde(default)]
  pub error: Option<String>,
}

impl TxStatus {
  pub fn is_success(&self) -> bool {
    self.status == "success"
  }
}

/// A created-object entry inside transaction effects.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
  pub reference: ObjectRef,
}

/// Minimal object reference (id only is load-bearing here).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
  pub object_id: String,
}
