//! Integration Tests - End-to-end Client Component Testing
//!
//! Tests the interaction between usecases, ports, and mock adapters.
//! Uses mockall for trait mocking and tokio::test for async tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mockall::mock;
use mockall::predicate::*;
use serde_json::json;
use tokio::sync::Notify;

use nft_marketplace_client::domain::market::{Address, ObjectId};
use nft_marketplace_client::domain::object::ObjectResponse;
use nft_marketplace_client::domain::tx::{Argument, Command, Input, TransactionData};
use nft_marketplace_client::ports::chain_client::{ChainClient, DynamicFieldInfo, TxResponse};
use nft_marketplace_client::ports::wallet::StaticWallet;
use nft_marketplace_client::usecases::actions::{MarketActions, MarketplaceRefs};
use nft_marketplace_client::usecases::queries::{BidsQuery, ListingsQuery};

// ---- Mock Definitions ----

mock! {
    pub Chain {}

    #[async_trait::async_trait]
    impl ChainClient for Chain {
        async fn get_object(&self, id: &str) -> anyhow::Result<ObjectResponse>;

        async fn multi_get_objects(
            &self,
            ids: &[ObjectId],
        ) -> anyhow::Result<Vec<ObjectResponse>>;

        async fn get_dynamic_fields(
            &self,
            parent: &str,
        ) -> anyhow::Result<Vec<DynamicFieldInfo>>;

        async fn get_owned_objects(
            &self,
            owner: &Address,
        ) -> anyhow::Result<Vec<ObjectResponse>>;

        async fn execute_transaction(
            &self,
            tx: &TransactionData,
        ) -> anyhow::Result<TxResponse>;

        async fn wait_for_transaction(&self, digest: &str) -> anyhow::Result<()>;

        async fn is_healthy(&self) -> bool;
    }
}

// ---- Helpers ----

/// Opt-in log output for debugging: `RUST_LOG=debug cargo test`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn refs() -> MarketplaceRefs {
    MarketplaceRefs {
        package_id: "0xpkg".to_string(),
        marketplace_id: "0xmarket".to_string(),
    }
}

fn tx_response(digest: &str) -> TxResponse {
    TxResponse {
        digest: digest.to_string(),
        confirmed: true,
        created: vec!["0xnew".to_string()],
        timestamp_ms: 1_700_000_000_000,
    }
}

fn marketplace_root() -> ObjectResponse {
    serde_json::from_value(json!({
        "objectId": "0xmarket",
        "content": {
            "dataType": "moveObject",
            "type": "0xpkg::nft_marketplace::Marketplace",
            "fields": {
                "id": { "id": "0xmarket" },
                "listings": { "type": "0x2::table::Table", "fields": { "id": { "id": "0xltable" } } },
                "bids": { "type": "0x2::table::Table", "fields": { "id": { "id": "0xbtable" } } },
            },
        },
    }))
    .unwrap()
}

fn listing_entry(child_id: &str, nft_id: &str, price: &str) -> ObjectResponse {
    serde_json::from_value(json!({
        "objectId": child_id,
        "content": {
            "dataType": "moveObject",
            "type": "0x2::dynamic_field::Field",
            "fields": {
                "name": nft_id,
                "value": {
                    "fields": {
                        "price": price,
                        "owner": "0xseller",
                        "nft": {
                            "type": "0xpkg::nft_marketplace::MarketNft",
                            "fields": {
                                "id": { "id": nft_id },
                                "name": "pepe",
                                "description": "d",
                                "url": "https://img.example/p.png",
                                "creator": "0xcreator",
                            },
                        },
                    },
                },
            },
        },
    }))
    .unwrap()
}

fn bid_entry(child_id: &str, nft_id: &str, bids: &[(&str, &str)]) -> ObjectResponse {
    let values: Vec<_> = bids
        .iter()
        .map(|(bid_id, balance)| {
            json!({
                "fields": {
                    "id": { "id": bid_id },
                    "nft_id": nft_id,
                    "balance": balance,
                    "owner": "0xbidder",
                },
            })
        })
        .collect();

    serde_json::from_value(json!({
        "objectId": child_id,
        "content": {
            "dataType": "moveObject",
            "type": "0x2::dynamic_field::Field",
            "fields": { "name": nft_id, "value": values },
        },
    }))
    .unwrap()
}

fn dynamic_field(object_id: &str) -> DynamicFieldInfo {
    DynamicFieldInfo {
        object_id: object_id.to_string(),
        name: None,
        object_type: None,
    }
}

/// Chain stub whose multi-object read blocks until released, so tests
/// can observe the composed pending flag while the last stage is
/// outstanding.
struct GatedChain {
    reached_last_stage: Notify,
    release: Notify,
    children: Vec<ObjectResponse>,
}

#[async_trait::async_trait]
impl ChainClient for GatedChain {
    async fn get_object(&self, _id: &str) -> anyhow::Result<ObjectResponse> {
        Ok(marketplace_root())
    }

    async fn multi_get_objects(&self, _ids: &[ObjectId]) -> anyhow::Result<Vec<ObjectResponse>> {
        self.reached_last_stage.notify_one();
        self.release.notified().await;
        Ok(self.children.clone())
    }

    async fn get_dynamic_fields(&self, _parent: &str) -> anyhow::Result<Vec<DynamicFieldInfo>> {
        Ok(vec![dynamic_field("0xc1"), dynamic_field("0xc2")])
    }

    async fn get_owned_objects(&self, _owner: &Address) -> anyhow::Result<Vec<ObjectResponse>> {
        Ok(Vec::new())
    }

    async fn execute_transaction(&self, _tx: &TransactionData) -> anyhow::Result<TxResponse> {
        unreachable!("read-only test")
    }

    async fn wait_for_transaction(&self, _digest: &str) -> anyhow::Result<()> {
        unreachable!("read-only test")
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

// ---- Transaction Builder Tests ----

#[tokio::test]
async fn test_buy_builds_exact_transaction_and_awaits_finalization() {
    init_tracing();
    let mut mock_chain = MockChain::new();

    // The buy transaction must split exactly the asking price off gas,
    // call buy with [marketplace, nft, coin] + the NFT's type tag, and
    // route the bought NFT back to the actor.
    mock_chain
        .expect_execute_transaction()
        .withf(|tx: &TransactionData| {
            let split_ok = matches!(
                &tx.commands[0],
                Command::SplitCoins { coin: Argument::GasCoin, amounts }
                    if amounts.len() == 1
                        && tx.inputs.iter().any(|i| matches!(
                            i, Input::Pure { value } if value == &json!(500_000_000u64)))
            );
            let call_ok = matches!(
                &tx.commands[1],
                Command::MoveCall { module, function, type_args, args, .. }
                    if module == "nft_marketplace"
                        && function == "buy"
                        && type_args == &vec!["pkg::Foo".to_string()]
                        && args.last() == Some(&Argument::Result(0))
            );
            let transfer_ok = matches!(&tx.commands[2], Command::TransferObjects { .. });
            tx.sender == "0xme"
                && tx.gas_budget == 100_000_000
                && tx.inputs.contains(&Input::Object { object_id: "0xmarket".to_string() })
                && tx.inputs.contains(&Input::Pure { value: json!("0xaa") })
                && split_ok
                && call_ok
                && transfer_ok
        })
        .times(1)
        .returning(|_| Ok(tx_response("DigestBuy")));

    mock_chain
        .expect_wait_for_transaction()
        .with(eq("DigestBuy"))
        .times(1)
        .returning(|_| Ok(()));

    let actions = MarketActions::new(
        Arc::new(mock_chain),
        Arc::new(StaticWallet::connected("0xme")),
        refs(),
    );

    let called = AtomicBool::new(false);
    actions
        .buy("0xaa", 500_000_000, "pkg::Foo", |response| {
            assert_eq!(response.digest, "DigestBuy");
            called.store(true, Ordering::SeqCst);
        })
        .await;

    assert!(called.load(Ordering::SeqCst), "success callback must fire");
}

#[tokio::test]
async fn test_place_listing_converts_display_price_to_base_units() {
    let mut mock_chain = MockChain::new();

    mock_chain
        .expect_execute_transaction()
        .withf(|tx: &TransactionData| {
            tx.entry_point() == Some("place_listing")
                && tx.inputs.iter().any(|i| matches!(
                    i, Input::Pure { value } if value == &json!(12_000_000_000u64)))
        })
        .times(1)
        .returning(|_| Ok(tx_response("DigestList")));

    mock_chain
        .expect_wait_for_transaction()
        .times(1)
        .returning(|_| Ok(()));

    let actions = MarketActions::new(
        Arc::new(mock_chain),
        Arc::new(StaticWallet::connected("0xme")),
        refs(),
    );

    let created = std::sync::Mutex::new(None);
    actions
        .place_listing(
            "0xnft1",
            rust_decimal_macros::dec!(12),
            "0xpkg::nft_marketplace::MarketNft",
            |response| {
                *created.lock().unwrap() = response.created.first().cloned();
            },
        )
        .await;

    // The completion callback surfaces the created listing id so the
    // caller can navigate to it.
    assert_eq!(*created.lock().unwrap(), Some("0xnew".to_string()));
}

#[tokio::test]
async fn test_mutations_without_account_touch_nothing() {
    let mut mock_chain = MockChain::new();
    mock_chain.expect_execute_transaction().times(0);
    mock_chain.expect_wait_for_transaction().times(0);
    mock_chain.expect_get_object().times(0);

    let actions = MarketActions::new(
        Arc::new(mock_chain),
        Arc::new(StaticWallet::disconnected()),
        refs(),
    );

    let called = AtomicBool::new(false);
    let mark = |_: &TxResponse| called.store(true, Ordering::SeqCst);

    actions.mint("n", "d", "u", mark).await;
    actions
        .place_listing("0xnft1", rust_decimal_macros::dec!(1), "t", mark)
        .await;
    actions.cancel_listing("0xnft1", "t", mark).await;
    actions.place_bid("0xnft1", 100, mark).await;
    actions.cancel_bid("0xbid1", "0xnft1", mark).await;
    actions.accept_bid("0xbid1", "0xnft1", "t", mark).await;
    actions.buy("0xnft1", 100, "t", mark).await;

    assert!(!called.load(Ordering::SeqCst), "no callback without an account");
}

#[tokio::test]
async fn test_rejected_cancel_bid_skips_callback() {
    let mut mock_chain = MockChain::new();

    // Contract-level rejection (non-owning actor) surfaces as a
    // submission error; the error path must not reach the callback.
    mock_chain
        .expect_execute_transaction()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("Transaction execution failed: MoveAbort(2)")));
    mock_chain.expect_wait_for_transaction().times(0);

    let actions = MarketActions::new(
        Arc::new(mock_chain),
        Arc::new(StaticWallet::connected("0xintruder")),
        refs(),
    );

    let called = AtomicBool::new(false);
    actions
        .cancel_bid("0xbb", "0xcc", |_| called.store(true, Ordering::SeqCst))
        .await;

    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_failed_finalization_skips_callback() {
    let mut mock_chain = MockChain::new();

    mock_chain
        .expect_execute_transaction()
        .times(1)
        .returning(|_| Ok(tx_response("DigestMint")));
    mock_chain
        .expect_wait_for_transaction()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("node timed out")));

    let actions = MarketActions::new(
        Arc::new(mock_chain),
        Arc::new(StaticWallet::connected("0xme")),
        refs(),
    );

    let called = AtomicBool::new(false);
    actions
        .mint("n", "d", "u", |_| called.store(true, Ordering::SeqCst))
        .await;

    assert!(!called.load(Ordering::SeqCst));
}

// ---- Composed Query Tests ----

#[tokio::test]
async fn test_listings_query_pending_until_all_stages_resolve() {
    init_tracing();
    let chain = Arc::new(GatedChain {
        reached_last_stage: Notify::new(),
        release: Notify::new(),
        children: vec![
            listing_entry("0xc1", "0xnft1", "500000000"),
            listing_entry("0xc2", "0xnft2", "1500000000"),
        ],
    });

    let query = Arc::new(ListingsQuery::new(Arc::clone(&chain), refs()));
    let rx = query.subscribe();

    let runner = Arc::clone(&query);
    let task = tokio::spawn(async move { runner.refetch().await });

    // Stages one and two are done, stage three is outstanding: the
    // combined flag must still read pending with no data.
    chain.reached_last_stage.notified().await;
    {
        let state = rx.borrow();
        assert!(state.pending);
        assert!(state.data.is_none());
        assert!(state.error.is_none());
    }

    chain.release.notify_one();
    task.await.unwrap();

    let state = query.state();
    assert!(!state.pending);
    assert!(state.error.is_none());
    let listings = state.data.expect("listings resolved");
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].price, 500_000_000);
    assert_eq!(listings[1].nft.id, "0xnft2");
}

#[tokio::test]
async fn test_listings_query_surfaces_first_stage_error() {
    let mut mock_chain = MockChain::new();
    mock_chain
        .expect_get_object()
        .with(eq("0xmarket"))
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("node unreachable")));
    // Later stages must not fire once the first errored.
    mock_chain.expect_get_dynamic_fields().times(0);
    mock_chain.expect_multi_get_objects().times(0);

    let query = ListingsQuery::new(Arc::new(mock_chain), refs());
    query.refetch().await;

    let state = query.state();
    assert!(!state.pending);
    assert!(state.data.is_none());
    let error = state.error.expect("error surfaced");
    assert!(error.contains("marketplace object"), "got: {error}");
}

#[tokio::test]
async fn test_bids_query_filters_to_viewed_nft() {
    let mut mock_chain = MockChain::new();

    mock_chain
        .expect_get_object()
        .returning(|_| Ok(marketplace_root()));
    mock_chain
        .expect_get_dynamic_fields()
        .with(eq("0xbtable"))
        .returning(|_| Ok(vec![dynamic_field("0xe1"), dynamic_field("0xe2")]));
    mock_chain.expect_multi_get_objects().returning(|_| {
        Ok(vec![
            bid_entry("0xe1", "0xnft1", &[("0xb1", "100"), ("0xb2", "250")]),
            bid_entry("0xe2", "0xother", &[("0xb3", "999")]),
        ])
    });

    let query = BidsQuery::new(
        Arc::new(mock_chain),
        refs(),
        Some("0xnft1".to_string()),
    );
    query.refetch().await;

    let bids = query.state().data.expect("bids resolved");
    assert_eq!(bids.len(), 2);
    assert!(bids.iter().all(|b| b.nft_id == "0xnft1"));
    assert!(bids.iter().all(|b| b.bid_id != "0xb3"), "foreign bid leaked");
}

#[tokio::test]
async fn test_bids_query_disabled_without_target() {
    let mut mock_chain = MockChain::new();
    mock_chain.expect_get_object().times(0);
    mock_chain.expect_get_dynamic_fields().times(0);
    mock_chain.expect_multi_get_objects().times(0);

    let query = BidsQuery::new(Arc::new(mock_chain), refs(), None);
    query.refetch().await;

    let state = query.state();
    assert!(!state.pending);
    assert!(state.data.is_none());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_refetch_rereads_every_stage() {
    let mut mock_chain = MockChain::new();
    mock_chain
        .expect_get_object()
        .times(2)
        .returning(|_| Ok(marketplace_root()));
    mock_chain
        .expect_get_dynamic_fields()
        .times(2)
        .returning(|_| Ok(vec![dynamic_field("0xc1")]));
    mock_chain
        .expect_multi_get_objects()
        .times(2)
        .returning(|_| Ok(vec![listing_entry("0xc1", "0xnft1", "500000000")]));

    let query = ListingsQuery::new(Arc::new(mock_chain), refs());
    query.refetch().await;
    // A completed action's callback triggers a manual re-run; nothing
    // is served from a cache.
    query.refetch().await;

    assert_eq!(query.state().data.unwrap().len(), 1);
}
