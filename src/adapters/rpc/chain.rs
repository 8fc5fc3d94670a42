//! Fullnode Chain Adapter — ChainClient Port Implementation
//!
//! Implements the `ChainClient` port over the shared `RpcClient`.
//! Object and index reads request content + owner so derivation has
//! everything in one pass; index and owned-object reads follow the
//! node's cursor pagination to completion. Submission ships the
//! serialized transaction base64-encoded; the node-side wallet session
//! signs it (this crate never touches key material).

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::client::RpcClient;
use super::types::{ExecuteResponse, ObjectResult, Page, RawDynamicField};
use crate::domain::market::{Address, ObjectId};
use crate::domain::object::ObjectResponse;
use crate::domain::tx::TransactionData;
use crate::ports::chain_client::{ChainClient, DynamicFieldInfo, TxResponse};

/// Content options sent with every read: derivation needs the field bag
/// and the owner descriptor.
fn read_options() -> Value {
    json!({ "showContent": true, "showOwner": true })
}

/// `ChainClient` implementation backed by the fullnode JSON-RPC API.
pub struct FullnodeClient {
    /// Shared JSON-RPC transport with retry + concurrency bounds.
    rpc: Arc<RpcClient>,
}

impl FullnodeClient {
    /// Create an adapter over an existing transport.
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
        serde_json::from_value(value).with_context(|| format!("Malformed {what} payload"))
    }
}

#[async_trait]
impl ChainClient for FullnodeClient {
    #[instrument(skip(self))]
    async fn get_object(&self, id: &str) -> Result<ObjectResponse> {
        let raw = self
            .rpc
            .call("getObject", json!([id, read_options()]))
            .await
            .context("Object read failed")?;

        let result: ObjectResult = Self::decode(raw, "object read")?;

        // Per-object failures (not found, deleted) come back in-band;
        // surface them as content-less responses so derivation treats
        // the object as not loaded.
        Ok(result.data.unwrap_or(ObjectResponse {
            object_id: id.to_string(),
            ..ObjectResponse::default()
        }))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn multi_get_objects(&self, ids: &[ObjectId]) -> Result<Vec<ObjectResponse>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw = self
            .rpc
            .call("multiGetObjects", json!([ids, read_options()]))
            .await
            .context("Multi-object read failed")?;

        let results: Vec<ObjectResult> = Self::decode(raw, "multi-object read")?;
        Ok(results.into_iter().filter_map(|r| r.data).collect())
    }

    #[instrument(skip(self))]
    async fn get_dynamic_fields(&self, parent: &str) -> Result<Vec<DynamicFieldInfo>> {
        let mut fields = Vec::new();
        let mut cursor = Value::Null;

        loop {
            let raw = self
                .rpc
                .call("getDynamicFields", json!([parent, cursor]))
                .await
                .context("Dynamic-field index read failed")?;

            let page: Page<RawDynamicField> = Self::decode(raw, "dynamic-field index")?;
            fields.extend(page.data.into_iter().map(|f| DynamicFieldInfo {
                object_id: f.object_id,
                name: f.name,
                object_type: f.object_type,
            }));

            if !page.has_next_page {
                break;
            }
            cursor = page.next_cursor.unwrap_or(Value::Null);
        }

        debug!(parent, count = fields.len(), "Dynamic-field index resolved");
        Ok(fields)
    }

    #[instrument(skip(self))]
    async fn get_owned_objects(&self, owner: &Address) -> Result<Vec<ObjectResponse>> {
        let mut objects = Vec::new();
        let mut cursor = Value::Null;

        loop {
            let raw = self
                .rpc
                .call(
                    "getOwnedObjects",
                    json!([owner, { "options": read_options() }, cursor]),
                )
                .await
                .context("Owned-object read failed")?;

            let page: Page<ObjectResult> = Self::decode(raw, "owned-object read")?;
            objects.extend(page.data.into_iter().filter_map(|r| r.data));

            if !page.has_next_page {
                break;
            }
            cursor = page.next_cursor.unwrap_or(Value::Null);
        }

        Ok(objects)
    }

    #[instrument(skip(self, tx), fields(entry_point = tx.entry_point()))]
    async fn execute_transaction(&self, tx: &TransactionData) -> Result<TxResponse> {
        let bytes = serde_json::to_vec(tx).context("Failed to serialize transaction")?;
        let encoded = BASE64.encode(bytes);

        let raw = self
            .rpc
            .call(
                "executeTransaction",
                json!([encoded, { "showEffects": true, "showObjectChanges": true }]),
            )
            .await
            .context("Transaction submission failed")?;

        let response: ExecuteResponse = Self::decode(raw, "submission")?;

        let (confirmed, created) = match &response.effects {
            Some(effects) => {
                if let Some(status) = &effects.status {
                    if !status.is_success() {
                        bail!(
                            "Transaction execution failed: {}",
                            status.error.as_deref().unwrap_or("unknown abort")
                        );
                    }
                }
                (
                    true,
                    effects
                        .created
                        .iter()
                        .map(|c| c.reference.object_id.clone())
                        .collect(),
                )
            }
            None => (false, Vec::new()),
        };

        Ok(TxResponse {
            digest: response.digest,
            confirmed,
            created,
            timestamp_ms: response.timestamp_ms.unwrap_or_default(),
        })
    }

    #[instrument(skip(self))]
    async fn wait_for_transaction(&self, digest: &str) -> Result<()> {
        self.rpc
            .call("waitForTransaction", json!([digest]))
            .await
            .context("Finalization wait failed")?;

        debug!(digest, "Transaction finalized");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        self.rpc.call("getChainIdentifier", json!([])).await.is_ok()
    }
}
