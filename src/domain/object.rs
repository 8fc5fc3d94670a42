//! Chain object read-model.
//!
//! Raw object payloads arrive from the node as weakly-typed JSON field
//! bags, nested to a depth that varies per entity (a table handle wraps
//! its id, a dynamic-field value wraps its struct fields, and so on).
//! This module models the payload as a tagged content enum plus a
//! defensive accessor layer, so that everything above it works with
//! `Option`s instead of raw JSON indexing.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::market::ObjectId;

/// A chain object as returned by an object read.
///
/// `content` is absent when the read succeeded but the object carries no
/// displayable content (deleted, pruned, or requested without content).
/// Derivation treats that the same as a malformed payload: not loaded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectResponse {
    /// Unique on-chain address of the object.
    pub object_id: ObjectId,
    /// Object version at read time.
    #[serde(default)]
    pub version: u64,
    /// Owner descriptor, kept raw (address-owned, shared, immutable).
    #[serde(default)]
    pub owner: Option<Value>,
    /// Typed content payload, when present.
    #[serde(default)]
    pub content: Option<ObjectContent>,
}

/// Tagged content variants of a chain object.
///
/// Only `MoveObject` carries a field bag; every other variant derives to
/// a null view-model.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "dataType")]
pub enum ObjectContent {
    /// A struct instance with a type tag and its field bag.
    #[serde(rename = "moveObject")]
    MoveObject {
        #[serde(rename = "type")]
        type_tag: String,
        fields: Fields,
    },
    /// A published package. Never derivable to a view-model.
    #[serde(rename = "package")]
    Package,
}

impl ObjectResponse {
    /// The content's field bag, if this is a struct instance.
    pub fn move_fields(&self) -> Option<&Fields> {
        match &self.content {
            Some(ObjectContent::MoveObject { fields, .. }) => Some(fields),
            _ => None,
        }
    }

    /// The content's type tag, if this is a struct instance.
    pub fn type_tag(&self) -> Option<&str> {
        match &self.content {
            Some(ObjectContent::MoveObject { type_tag, .. }) => Some(type_tag),
            _ => None,
        }
    }

    /// The owning address, when the object is address-owned.
    pub fn owner_address(&self) -> Option<&str> {
        self.owner.as_ref()?.get("AddressOwner")?.as_str()
    }
}

/// A weakly-typed struct field bag.
///
/// Every accessor is total: a missing field, a wrong JSON type, or an
/// unexpected nesting shape yields `None`. Callers unwrap exactly the
/// nesting depth their entity uses and nothing more.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fields(pub Value);

impl Fields {
    /// Raw access to a field's JSON value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A field holding a JSON string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    /// A field holding an integer amount.
    ///
    /// The node encodes `u64` values as JSON strings to dodge IEEE-754
    /// truncation; older payloads use plain numbers. Both are accepted,
    /// floats are not.
    pub fn u64_field(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// Unwraps one `{"fields": ...}` wrapper around a nested struct.
    pub fn nested(&self, name: &str) -> Option<Fields> {
        Some(Fields(self.get(name)?.get("fields")?.clone()))
    }

    /// The type tag of a nested struct wrapper.
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.get(name)?.get("type")?.as_str()
    }

    /// Unwraps a `{"id": "0x.."}` unique-id wrapper into the object id.
    pub fn uid(&self, name: &str) -> Option<ObjectId> {
        Some(self.get(name)?.get("id")?.as_str()?.to_string())
    }

    /// A field holding a JSON array.
    pub fn array(&self, name: &str) -> Option<&Vec<Value>> {
        self.get(name)?.as_array()
    }
}
