//! Market Actions - Marketplace Transaction Builders
//!
//! One builder per marketplace action (mint, list, cancel-listing, bid,
//! cancel-bid, accept-bid, buy), all funneled through a single
//! build-and-submit primitive. Every builder:
//! - is a silent no-op without a connected account (zero chain calls)
//! - carries a fixed execution budget, never an estimate
//! - awaits finalization before invoking the success callback — the
//!   callback is the only completion signal the caller gets
//! - logs submission/execution failures and invokes nothing
//!
//! Concurrent actions are not serialized against each other; each
//! targets a distinct object or is rejected by the contract on conflict.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::config::NetworkConfig;
use crate::domain::denom;
use crate::domain::market::ObjectId;
use crate::domain::tx::{Argument, TransactionBuilder};
use crate::ports::chain_client::{ChainClient, TxResponse};
use crate::ports::wallet::WalletContext;

/// Contract module exposing the marketplace entry points.
pub const MARKET_MODULE: &str = "nft_marketplace";

/// Fixed execution budget attached to every marketplace transaction.
const GAS_BUDGET: u64 = 100_000_000;

/// Resolved addresses of the marketplace deployment on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceRefs {
    /// Package the entry points live in.
    pub package_id: ObjectId,
    /// The shared marketplace root object.
    pub marketplace_id: ObjectId,
}

impl MarketplaceRefs {
    pub fn from_network(network: &NetworkConfig) -> Self {
        Self {
            package_id: network.package_id.clone(),
            marketplace_id: network.marketplace_object_id.clone(),
        }
    }

    /// Type-tag prefix of structs declared by the marketplace package.
    pub fn type_prefix(&self) -> String {
        format!("{}::{MARKET_MODULE}::", self.package_id)
    }
}

/// A positional entry-point argument before it is lowered into the
/// transaction's input list.
enum CallArg {
    /// Object reference resolved by the node.
    Object(ObjectId),
    /// Inline literal.
    Pure(Value),
}

/// One contract call, declaratively: the seven public actions differ
/// only in these fields.
struct EntryCall {
    function: &'static str,
    type_args: Vec<String>,
    args: Vec<CallArg>,
    /// Amount to split off the gas coin and append as the final argument.
    payment: Option<u64>,
    /// Route the entry point's returned value to the acting address.
    transfer_result: bool,
}

/// Marketplace transaction builders over a chain client and the active
/// wallet identity.
pub struct MarketActions<C: ChainClient> {
    chain: Arc<C>,
    wallet: Arc<dyn WalletContext>,
    refs: MarketplaceRefs,
}

impl<C: ChainClient> MarketActions<C> {
    pub fn new(chain: Arc<C>, wallet: Arc<dyn WalletContext>, refs: MarketplaceRefs) -> Self {
        Self { chain, wallet, refs }
    }

    /// Mint a new NFT and transfer it to the acting address.
    #[instrument(skip(self, on_success))]
    pub async fn mint(
        &self,
        name: &str,
        description: &str,
        url: &str,
        on_success: impl FnOnce(&TxResponse) + Send,
    ) {
        self.submit_call(
            EntryCall {
                function: "mint_to_sender",
                type_args: Vec::new(),
                args: vec![
                    CallArg::Pure(Value::from(name)),
                    CallArg::Pure(Value::from(description)),
                    CallArg::Pure(Value::from(url)),
                ],
                payment: None,
                transfer_result: true,
            },
            on_success,
        )
        .await;
    }

    /// List an NFT for sale at a display-denominated asking price.
    ///
    /// The price is converted to base units here; a price that does not
    /// land on a whole base unit is rejected before anything is built.
    #[instrument(skip(self, on_success, price), fields(price = %price))]
    pub async fn place_listing(
        &self,
        nft_id: &str,
        price: Decimal,
        nft_type: &str,
        on_success: impl FnOnce(&TxResponse) + Send,
    ) {
        let Some(base_price) = denom::to_base(price) else {
            error!(%price, "Listing price is not representable in base units");
            return;
        };

        self.submit_call(
            EntryCall {
                function: "place_listing",
                type_args: vec![nft_type.to_string()],
                args: vec![
                    CallArg::Object(self.refs.marketplace_id.clone()),
                    CallArg::Pure(Value::from(nft_id)),
                    CallArg::Pure(Value::from(base_price)),
                ],
                payment: None,
                transfer_result: false,
            },
            on_success,
        )
        .await;
    }

    /// Take a listing down; the NFT comes back to the acting address.
    #[instrument(skip(self, on_success))]
    pub async fn cancel_listing(
        &self,
        nft_id: &str,
        nft_type: &str,
        on_success: impl FnOnce(&TxResponse) + Send,
    ) {
        self.submit_call(
            EntryCall {
                function: "cancel_listing",
                type_args: vec![nft_type.to_string()],
                args: vec![
                    CallArg::Object(self.refs.marketplace_id.clone()),
                    CallArg::Pure(Value::from(nft_id)),
                ],
                payment: None,
                transfer_result: true,
            },
            on_success,
        )
        .await;
    }

    /// Place an escrowed bid against a listed NFT.
    ///
    /// `amount` is in base units, lifted straight from listing data.
    #[instrument(skip(self, on_success))]
    pub async fn place_bid(
        &self,
        nft_id: &str,
        amount: u64,
        on_success: impl FnOnce(&TxResponse) + Send,
    ) {
        self.submit_call(
            EntryCall {
                function: "place_bid",
                type_args: Vec::new(),
                args: vec![
                    CallArg::Object(self.refs.marketplace_id.clone()),
                    CallArg::Pure(Value::from(nft_id)),
                ],
                payment: Some(amount),
                transfer_result: false,
            },
            on_success,
        )
        .await;
    }

    /// Withdraw a bid; the escrowed coin comes back to the acting address.
    #[instrument(skip(self, on_success))]
    pub async fn cancel_bid(
        &self,
        bid_id: &str,
        nft_id: &str,
        on_success: impl FnOnce(&TxResponse) + Send,
    ) {
        self.submit_call(
            EntryCall {
                function: "cancel_bid",
                type_args: Vec::new(),
                args: vec![
                    CallArg::Object(self.refs.marketplace_id.clone()),
                    CallArg::Pure(Value::from(bid_id)),
                    CallArg::Pure(Value::from(nft_id)),
                ],
                payment: None,
                transfer_result: true,
            },
            on_success,
        )
        .await;
    }

    /// Accept a bid on an owned listing; the escrowed payment routes to
    /// the acting address.
    #[instrument(skip(self, on_success))]
    pub async fn accept_bid(
        &self,
        bid_id: &str,
        nft_id: &str,
        nft_type: &str,
        on_success: impl FnOnce(&TxResponse) + Send,
    ) {
        self.submit_call(
            EntryCall {
                function: "accept_bid",
                type_args: vec![nft_type.to_string()],
                args: vec![
                    CallArg::Object(self.refs.marketplace_id.clone()),
                    CallArg::Pure(Value::from(bid_id)),
                    CallArg::Pure(Value::from(nft_id)),
                ],
                payment: None,
                transfer_result: true,
            },
            on_success,
        )
        .await;
    }

    /// Buy a listed NFT outright at its asking price (base units).
    #[instrument(skip(self, on_success))]
    pub async fn buy(
        &self,
        nft_id: &str,
        price: u64,
        nft_type: &str,
        on_success: impl FnOnce(&TxResponse) + Send,
    ) {
        self.submit_call(
            EntryCall {
                function: "buy",
                type_args: vec![nft_type.to_string()],
                args: vec![
                    CallArg::Object(self.refs.marketplace_id.clone()),
                    CallArg::Pure(Value::from(nft_id)),
                ],
                payment: Some(price),
                transfer_result: true,
            },
            on_success,
        )
        .await;
    }

    /// The shared build-and-submit path behind every action.
    ///
    /// Ordering within one call: build → submit → finalization wait →
    /// success callback. Nothing is ordered across calls.
    async fn submit_call(&self, call: EntryCall, on_success: impl FnOnce(&TxResponse) + Send) {
        // Absent actor: caller-contract violation, not a reportable fault.
        let Some(sender) = self.wallet.active_address() else {
            debug!(function = call.function, "No active account, skipping action");
            return;
        };

        let mut tx = TransactionBuilder::new();

        let mut args: Vec<Argument> = call
            .args
            .into_iter()
            .map(|arg| match arg {
                CallArg::Object(id) => tx.object(id),
                CallArg::Pure(value) => tx.pure(value),
            })
            .collect();

        // The payment coin is always the entry point's final argument.
        if let Some(amount) = call.payment {
            let amount = tx.pure(amount);
            let coin = tx.split_coins(Argument::GasCoin, vec![amount]);
            args.push(coin);
        }

        let result = tx.move_call(
            self.refs.package_id.clone(),
            MARKET_MODULE,
            call.function,
            call.type_args,
            args,
        );

        if call.transfer_result {
            let recipient = tx.pure(sender.clone());
            tx.transfer_objects(vec![result], recipient);
        }

        tx.set_gas_budget(GAS_BUDGET);

        let tx_data = match tx.finish(sender) {
            Ok(data) => data,
            Err(e) => {
                error!(function = call.function, error = %e, "Transaction construction failed");
                return;
            }
        };

        let response = match self.chain.execute_transaction(&tx_data).await {
            Ok(response) => response,
            Err(e) => {
                error!(function = call.function, error = %e, "Transaction submission failed");
                return;
            }
        };

        // Acceptance is not finality: a second round trip confirms the
        // effects are durable before the caller is told to refetch.
        if let Err(e) = self.chain.wait_for_transaction(&response.digest).await {
            error!(
                function = call.function,
                digest = %response.digest,
                error = %e,
                "Finalization wait failed"
            );
            return;
        }

        info!(
            function = call.function,
            digest = %response.digest,
            "Transaction finalized"
        );
        on_success(&response);
    }
}
