//! Marketplace view-models and their derivation from chain objects.
//!
//! Everything here is a fresh, ephemeral reconstruction: view-models are
//! rebuilt on every query and never cached beyond the query's own result.
//! All derivation functions are total — a payload missing the expected
//! content variant or nesting shape yields `None` (or an empty list),
//! never a panic. Raw field bags stop at this boundary; nothing above it
//! sees JSON.

use serde::{Deserialize, Serialize};

use crate::domain::object::ObjectResponse;

// ────────────────────────────────────────────
// Identifier aliases used across ports and usecases
// ────────────────────────────────────────────

/// On-chain object address, `0x`-prefixed hex.
pub type ObjectId = String;

/// Account address, `0x`-prefixed hex.
pub type Address = String;

/// Transaction digest returned by submission.
pub type TxDigest = String;

// ────────────────────────────────────────────
// View-models
// ────────────────────────────────────────────

/// A minted NFT as displayed by the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nft {
    /// Chain object id, the NFT's identity.
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    /// Image URL stored on-chain.
    pub url: String,
    /// Minting address.
    pub creator: Address,
    /// Full on-chain type tag, passed back to type-generic entry points.
    pub type_tag: String,
}

/// An NFT offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Id of the listing's dynamic-field child object.
    pub object_id: ObjectId,
    /// The listed NFT, embedded in the listing entry.
    pub nft: Nft,
    /// Asking price in base units. Opaque integer until display.
    pub price: u64,
    /// Address entitled to cancel the listing or accept bids against it.
    pub owner: Address,
}

/// An escrow-backed offer against a listed NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub bid_id: ObjectId,
    /// The listed NFT this bid targets. Valid only while that NFT is listed.
    pub nft_id: ObjectId,
    /// Escrowed amount backing the bid, in base units.
    pub balance: u64,
    /// Bidding address.
    pub owner: Address,
}

// ────────────────────────────────────────────
// Derivation
// ────────────────────────────────────────────

impl Nft {
    /// Derive an NFT view-model from an object read.
    ///
    /// Requires struct content and a resolvable id; display strings
    /// default to empty when absent, matching how the marketplace
    /// renders partially-populated mints.
    pub fn from_object(obj: &ObjectResponse) -> Option<Self> {
        let fields = obj.move_fields()?;
        let type_tag = obj.type_tag()?.to_string();
        let id = fields.uid("id").unwrap_or_else(|| obj.object_id.clone());
        Some(Self {
            id,
            name: fields.str_field("name").unwrap_or_default().to_string(),
            description: fields
                .str_field("description")
                .unwrap_or_default()
                .to_string(),
            url: fields.str_field("url").unwrap_or_default().to_string(),
            creator: fields.str_field("creator").unwrap_or_default().to_string(),
            type_tag,
        })
    }

    /// Whether this object is one of the marketplace's own NFTs.
    ///
    /// Owned-object reads return every object under an address; the
    /// account view keeps only structs declared by the marketplace
    /// package/module prefix.
    pub fn is_marketplace_nft(obj: &ObjectResponse, type_prefix: &str) -> bool {
        obj.type_tag().is_some_and(|t| t.starts_with(type_prefix))
    }
}

impl Listing {
    /// Derive a listing from a listings-table dynamic-field child.
    ///
    /// Entry shape: the child's `name` is the listed NFT's id and its
    /// `value` wraps the listing struct: price, seller, and the NFT
    /// itself one wrapper deeper. Price and owner are load-bearing: a
    /// child missing either is not surfaced at all.
    pub fn from_dynamic_field_entry(obj: &ObjectResponse) -> Option<Self> {
        let fields = obj.move_fields()?;
        let value = fields.nested("value")?;
        let price = value.u64_field("price")?;
        let owner = value.str_field("owner")?.to_string();

        let nft_fields = value.nested("nft")?;
        let nft = Nft {
            id: nft_fields.uid("id")?,
            name: nft_fields.str_field("name").unwrap_or_default().to_string(),
            description: nft_fields
                .str_field("description")
                .unwrap_or_default()
                .to_string(),
            url: nft_fields.str_field("url").unwrap_or_default().to_string(),
            creator: nft_fields
                .str_field("creator")
                .unwrap_or_default()
                .to_string(),
            type_tag: value.type_of("nft").unwrap_or_default().to_string(),
        };

        Some(Self {
            object_id: obj.object_id.clone(),
            nft,
            price,
            owner,
        })
    }
}

impl Bid {
    /// Extract the bids a bids-table entry holds against one NFT.
    ///
    /// Entries are keyed by the listed NFT's id (the entry's `name`); an
    /// entry keyed to any other NFT contributes nothing, so bids can
    /// never leak across listings. Malformed bid records inside a
    /// matching entry are skipped individually.
    pub fn from_table_entry(obj: &ObjectResponse, nft_id: &str) -> Vec<Self> {
        let Some(fields) = obj.move_fields() else {
            return Vec::new();
        };
        if fields.str_field("name") != Some(nft_id) {
            return Vec::new();
        }
        let Some(items) = fields.array("value") else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let f = crate::domain::object::Fields(item.get("fields")?.clone());
                Some(Self {
                    bid_id: f.uid("id")?,
                    nft_id: f.str_field("nft_id")?.to_string(),
                    balance: f.u64_field("balance")?,
                    owner: f.str_field("owner")?.to_string(),
                })
            })
            .collect()
    }
}

/// Resolve the marketplace root's listings-table id.
///
/// The root holds its collections behind nested table handles
/// (`fields.listings.fields.id.id`); this unwraps exactly that depth.
pub fn listings_table_id(root: &ObjectResponse) -> Option<ObjectId> {
    root.move_fields()?.nested("listings")?.uid("id")
}

/// Resolve the marketplace root's bids-table id.
pub fn bids_table_id(root: &ObjectResponse) -> Option<ObjectId> {
    root.move_fields()?.nested("bids")?.uid("id")
}
