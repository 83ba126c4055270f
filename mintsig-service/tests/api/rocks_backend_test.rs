//! Router over the RocksDB backend: rows written through the HTTP surface
//! survive a store reopen.

use std::sync::Arc;

use axum::http::StatusCode;
use mintsig_core::application::MintLifecycle;
use mintsig_core::domain::{MintSigner, RequestStatus};
use mintsig_core::infrastructure::chain::MockChainReader;
use mintsig_core::infrastructure::storage::{RequestStore, RocksRequestStore};
use mintsig_service::api::{build_router, ApiState};
use serde_json::json;

use super::{post_json, TEST_ADDRESS_HEX, TEST_HASH_HEX, TEST_SIGNING_KEY_HEX, TEST_TX_HEX};

#[tokio::test]
async fn test_mint_flow_when_rocks_backed_then_rows_survive_reopen() {
    let dir = tempfile::tempdir().expect("create temp dir");

    {
        let store: Arc<dyn RequestStore> =
            Arc::new(RocksRequestStore::open_in_dir(dir.path()).expect("open store"));
        let signer = MintSigner::from_key_hex(TEST_SIGNING_KEY_HEX).expect("fixture key parses");
        let lifecycle = Arc::new(MintLifecycle::new(store.clone(), signer));
        let chain = Arc::new(MockChainReader::new());
        let state = Arc::new(ApiState { lifecycle, store, chain, admin_token: None });
        let router = build_router(state);

        let (status, _) = post_json(
            &router,
            "/api/admin/requests",
            None,
            json!({ "hash": TEST_HASH_HEX }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = post_json(
            &router,
            "/api/mint",
            None,
            json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = post_json(
            &router,
            "/api/mint/tx",
            None,
            json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX, "txHash": TEST_TX_HEX }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let reopened = RocksRequestStore::open_in_dir(dir.path()).expect("reopen store");
    let hash = TEST_HASH_HEX.parse().expect("hash parses");
    let row = reopened.get_request(&hash).expect("read row").expect("row survived");
    assert_eq!(row.status, RequestStatus::Pending);

    let tx = TEST_TX_HEX.parse().expect("tx hash parses");
    let by_tx = reopened.get_request_by_tx_hash(&tx).expect("index lookup").expect("index survived");
    assert_eq!(by_tx.hash, hash);
}
