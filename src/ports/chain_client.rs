//! Chain Client Port - Node Interaction Interface
//!
//! Defines the trait for everything this layer asks of the chain: object
//! reads, dynamic-field index reads, owned-object reads, and transaction
//! submission plus the finalization wait. The adapter behind it is a
//! black box; signing happens inside the submission call (wallet-side),
//! never in this crate.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::market::{Address, ObjectId, TxDigest};
use crate::domain::object::ObjectResponse;
use crate::domain::tx::TransactionData;

/// One entry of a dynamic-field index read.
///
/// The index lists child pointers only; child content is a separate
/// multi-object read.
#[derive(Debug, Clone)]
pub struct DynamicFieldInfo {
  /// Id of the child object holding the field's value.
  pub object_id: ObjectId,
  /// The field's key, kept raw (shape differs per collection).
  pub name: Option<Value>,
  /// Child object type tag, when the node reports it.
  pub object_type: Option<String>,
}

/// Result of a submitted transaction.
#[derive(Debug, Clone)]
pub struct TxResponse {
  /// Digest identifying the transaction from submission onward.
  pub digest: TxDigest,
  /// Whether execution reported success at submission time.
  pub confirmed: bool,
  /// Ids of objects the transaction created (e.g. a new listing).
  pub created: Vec<ObjectId>,
  /// Server-side timestamp of the submission response (Unix ms).
  pub timestamp_ms: u64,
}

/// Trait for chain interactions.
///
/// All methods are asynchronous and non-blocking; callers observe
/// progress through their own pending flags. Errors are terminal at the
/// call site; no retries happen above the transport layer.
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
  /// Read a single object with its content.
  async fn get_object(&self, id: &str) -> anyhow::Result<ObjectResponse>;

  /// Read several objects in one round trip. Unknown ids are skipped.
  async fn multi_get_objects(&self, ids: &[ObjectId]) -> anyhow::Result<Vec<ObjectResponse>>;

  /// List the dynamic-field children attached to a parent object.
  async fn get_dynamic_fields(&self, parent: &str) -> anyhow::Result<Vec<DynamicFieldInfo>>;

  /// List the objects owned by an address, with content.
  async fn get_owned_objects(&self, owner: &Address) -> anyhow::Result<Vec<ObjectResponse>>;

  /// Submit a transaction for signing and execution.
  ///
  /// Acceptance is not finality; pair with [`wait_for_transaction`]
  /// before treating effects as durable.
  ///
  /// [`wait_for_transaction`]: ChainClient::wait_for_transaction
  async fn execute_transaction(&self, tx: &TransactionData) -> anyhow::Result<TxResponse>;

  /// Block until the chain reports the transaction's effects durable.
  async fn wait_for_transaction(&self, digest: &str) -> anyhow::Result<()>;

  /// Check whether the node connection is healthy.
  async fn is_healthy(&self) -> bool;
}
