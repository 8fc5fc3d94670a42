//! Composed Queries - Staged Chain Reads With a Pending/Error Surface
//!
//! Each query stitches a chain of dependent reads (root → table id →
//! dynamic-field index → children) into one derived read-model. The
//! combined state is published through a watch channel: pending while
//! any stage is outstanding, the first stage error otherwise, data only
//! once every stage has resolved. Dependency edges are explicit:
//! a stage never fires before its prerequisite exists, and nothing
//! re-triggers implicitly: `refetch()` is the only trigger, which the
//! caller fires after a builder's completion callback.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures_util::future::try_join;
use tokio::sync::watch;
use tracing::{debug, instrument};

use super::actions::MarketplaceRefs;
use crate::domain::market::{self, Bid, Listing, Nft, ObjectId};
use crate::ports::chain_client::ChainClient;
use crate::ports::wallet::WalletContext;

/// Snapshot of a composed query's progress.
///
/// `data` survives a refetch (stale value with `pending` raised) so the
/// caller can keep rendering the previous result; it is only replaced
/// once every stage of the new run has resolved.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub data: Option<T>,
    /// True while any stage of the current run is outstanding.
    pub pending: bool,
    /// First stage error of the current run, rendered for display.
    pub error: Option<String>,
    /// Completion time of the last successful run.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> QueryState<T> {
    /// Initial state: nothing loaded, nothing running.
    pub fn idle() -> Self {
        Self {
            data: None,
            pending: false,
            error: None,
            fetched_at: None,
        }
    }

    /// Whether the query has a usable result.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some() && !self.pending && self.error.is_none()
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

/// Shared watch-channel plumbing behind every composed query.
struct QueryCell<T> {
    state: watch::Sender<QueryState<T>>,
}

impl<T: Clone + Send + Sync + 'static> QueryCell<T> {
    fn new() -> Self {
        let (state, _) = watch::channel(QueryState::idle());
        Self { state }
    }

    fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    fn snapshot(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// Raise the pending flag, keeping the previous data visible.
    fn begin(&self) {
        self.state.send_modify(|s| {
            s.pending = true;
            s.error = None;
        });
    }

    /// Publish a finished run.
    fn finish(&self, result: Result<Option<T>>) {
        match result {
            Ok(data) => self.state.send_modify(|s| {
                s.data = data;
                s.pending = false;
                s.error = None;
                s.fetched_at = Some(Utc::now());
            }),
            Err(e) => self.state.send_modify(|s| {
                s.pending = false;
                s.error = Some(format!("{e:#}"));
            }),
        }
    }

    /// Publish an idle state for a disabled query (zero chain calls).
    fn disable(&self) {
        self.state.send_replace(QueryState::idle());
    }
}

/// Staged listings read shared by [`ListingsQuery`] and [`NftQuery`]:
/// marketplace root → listings table id → dynamic-field index →
/// children → view-models.
///
/// Returns `Ok(None)` when the root's content is absent or malformed:
/// not loaded rather than an error, matching how derivation treats bad
/// payloads. Malformed children are skipped individually.
async fn fetch_listings<C: ChainClient>(
    chain: &C,
    refs: &MarketplaceRefs,
) -> Result<Option<Vec<Listing>>> {
    let root = chain
        .get_object(&refs.marketplace_id)
        .await
        .context("Could not read the marketplace object")?;

    let Some(table_id) = market::listings_table_id(&root) else {
        debug!(marketplace = %refs.marketplace_id, "Marketplace root not derivable yet");
        return Ok(None);
    };

    let index = chain
        .get_dynamic_fields(&table_id)
        .await
        .context("Could not read the listings index")?;

    let ids: Vec<ObjectId> = index.into_iter().map(|f| f.object_id).collect();
    if ids.is_empty() {
        return Ok(Some(Vec::new()));
    }

    let children = chain
        .multi_get_objects(&ids)
        .await
        .context("Could not read the listed NFTs")?;

    Ok(Some(
        children
            .iter()
            .filter_map(Listing::from_dynamic_field_entry)
            .collect(),
    ))
}

// ────────────────────────────────────────────
// ListingsQuery
// ────────────────────────────────────────────

/// All NFTs currently listed on the marketplace.
pub struct ListingsQuery<C: ChainClient> {
    chain: Arc<C>,
    refs: MarketplaceRefs,
    cell: QueryCell<Vec<Listing>>,
}

impl<C: ChainClient> ListingsQuery<C> {
    pub fn new(chain: Arc<C>, refs: MarketplaceRefs) -> Self {
        Self {
            chain,
            refs,
            cell: QueryCell::new(),
        }
    }

    /// Watch the query's pending/error/data surface.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<Vec<Listing>>> {
        self.cell.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> QueryState<Vec<Listing>> {
        self.cell.snapshot()
    }

    /// Run (or re-run) the staged read.
    #[instrument(skip(self), fields(marketplace = %self.refs.marketplace_id))]
    pub async fn refetch(&self) {
        self.cell.begin();
        let result = fetch_listings(self.chain.as_ref(), &self.refs).await;
        self.cell.finish(result);
    }
}

// ────────────────────────────────────────────
// BidsQuery
// ────────────────────────────────────────────

/// The bids placed against one listed NFT.
///
/// Disabled until the viewed NFT is known: with no target id, `refetch`
/// publishes an idle state and performs zero chain calls.
pub struct BidsQuery<C: ChainClient> {
    chain: Arc<C>,
    refs: MarketplaceRefs,
    nft_id: Option<ObjectId>,
    cell: QueryCell<Vec<Bid>>,
}

impl<C: ChainClient> BidsQuery<C> {
    pub fn new(chain: Arc<C>, refs: MarketplaceRefs, nft_id: Option<ObjectId>) -> Self {
        Self {
            chain,
            refs,
            nft_id,
            cell: QueryCell::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<Vec<Bid>>> {
        self.cell.subscribe()
    }

    pub fn state(&self) -> QueryState<Vec<Bid>> {
        self.cell.snapshot()
    }

    #[instrument(skip(self), fields(nft = self.nft_id.as_deref()))]
    pub async fn refetch(&self) {
        let Some(nft_id) = &self.nft_id else {
            self.cell.disable();
            return;
        };

        self.cell.begin();
        let result = self.fetch(nft_id).await;
        self.cell.finish(result.map(Some));
    }

    async fn fetch(&self, nft_id: &str) -> Result<Vec<Bid>> {
        let root = self
            .chain
            .get_object(&self.refs.marketplace_id)
            .await
            .context("Could not read the marketplace object")?;

        let Some(table_id) = market::bids_table_id(&root) else {
            return Ok(Vec::new());
        };

        let index = self
            .chain
            .get_dynamic_fields(&table_id)
            .await
            .context("Could not read the bids index")?;

        let ids: Vec<ObjectId> = index.into_iter().map(|f| f.object_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self
            .chain
            .multi_get_objects(&ids)
            .await
            .context("Could not read the bid entries")?;

        // Strict linking: entries keyed to any other NFT contribute
        // nothing, so no foreign bid can leak into the result.
        Ok(entries
            .iter()
            .flat_map(|entry| Bid::from_table_entry(entry, nft_id))
            .collect())
    }
}

// ────────────────────────────────────────────
// NftQuery
// ────────────────────────────────────────────

/// An NFT's detail view: the object itself plus its listing, when listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftDetails {
    pub nft: Nft,
    /// Present while the NFT is listed; carries the asking price.
    pub listing: Option<Listing>,
}

/// Detail read for a single NFT.
///
/// The object read and the listing lookup run concurrently and are
/// joined before anything is published; a partially resolved detail
/// view is never rendered as complete.
pub struct NftQuery<C: ChainClient> {
    chain: Arc<C>,
    refs: MarketplaceRefs,
    object_id: ObjectId,
    cell: QueryCell<NftDetails>,
}

impl<C: ChainClient> NftQuery<C> {
    pub fn new(chain: Arc<C>, refs: MarketplaceRefs, object_id: ObjectId) -> Self {
        Self {
            chain,
            refs,
            object_id,
            cell: QueryCell::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<NftDetails>> {
        self.cell.subscribe()
    }

    pub fn state(&self) -> QueryState<NftDetails> {
        self.cell.snapshot()
    }

    #[instrument(skip(self), fields(object = %self.object_id))]
    pub async fn refetch(&self) {
        self.cell.begin();
        let result = self.fetch().await;
        self.cell.finish(result);
    }

    async fn fetch(&self) -> Result<Option<NftDetails>> {
        let (object, listings) = try_join(
            self.chain.get_object(&self.object_id),
            fetch_listings(self.chain.as_ref(), &self.refs),
        )
        .await
        .context("Could not read the NFT details")?;

        // The NFT itself may be held inside its listing entry rather
        // than at its own address; fall back to the listing's embedded
        // view before giving up.
        let listing = listings
            .unwrap_or_default()
            .into_iter()
            .find(|l| l.nft.id == self.object_id || l.object_id == self.object_id);

        let nft = match Nft::from_object(&object) {
            Some(nft) => nft,
            None => match &listing {
                Some(l) => l.nft.clone(),
                None => return Ok(None),
            },
        };

        Ok(Some(NftDetails { nft, listing }))
    }
}

// ────────────────────────────────────────────
// AccountNftsQuery
// ────────────────────────────────────────────

/// The marketplace NFTs owned by the active account.
///
/// Disabled while no wallet is connected: zero chain calls, idle state.
pub struct AccountNftsQuery<C: ChainClient> {
    chain: Arc<C>,
    wallet: Arc<dyn WalletContext>,
    refs: MarketplaceRefs,
    cell: QueryCell<Vec<Nft>>,
}

impl<C: ChainClient> AccountNftsQuery<C> {
    pub fn new(chain: Arc<C>, wallet: Arc<dyn WalletContext>, refs: MarketplaceRefs) -> Self {
        Self {
            chain,
            wallet,
            refs,
            cell: QueryCell::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<Vec<Nft>>> {
        self.cell.subscribe()
    }

    pub fn state(&self) -> QueryState<Vec<Nft>> {
        self.cell.snapshot()
    }

    #[instrument(skip(self))]
    pub async fn refetch(&self) {
        let Some(address) = self.wallet.active_address() else {
            self.cell.disable();
            return;
        };

        self.cell.begin();
        let result = self.fetch(&address).await;
        self.cell.finish(result.map(Some));
    }

    async fn fetch(&self, address: &str) -> Result<Vec<Nft>> {
        let owned = self
            .chain
            .get_owned_objects(&address.to_string())
            .await
            .context("Could not read account objects")?;

        let prefix = self.refs.type_prefix();
        Ok(owned
            .iter()
            .filter(|obj| Nft::is_marketplace_nft(obj, &prefix))
            .filter_map(Nft::from_object)
            .collect())
    }
}
