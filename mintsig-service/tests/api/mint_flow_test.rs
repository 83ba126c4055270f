//! Mint endpoints: signature issuance, transaction binding and status lookup,
//! including the uniform 400 error shape.

use axum::http::StatusCode;
use mintsig_core::infrastructure::chain::{ReceiptStatus, TxReceipt};
use serde_json::json;

use super::{
    get_path, harness, post_json, post_raw, provision, TEST_ADDRESS_HEX, TEST_HASH_HEX,
    TEST_OTHER_TX_HEX, TEST_TX_HEX,
};

#[tokio::test]
async fn test_issue_when_hash_provisioned_then_returns_flat_vrs_reply() {
    let harness = harness();
    provision(&harness, TEST_HASH_HEX).await;

    let (status, body) = post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hash"], TEST_HASH_HEX);
    assert_eq!(body["address"], TEST_ADDRESS_HEX);
    let v = body["v"].as_u64().expect("v is a number");
    assert!(v == 27 || v == 28);
    for field in ["r", "s"] {
        let rendered = body[field].as_str().expect("signature part is a string");
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 66);
    }
    // The reply is flat; there is no nested signature object.
    assert!(body.get("signature").is_none());
}

#[tokio::test]
async fn test_issue_when_replayed_then_400_already_used() {
    let harness = harness();
    provision(&harness, TEST_HASH_HEX).await;
    let issue = json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX });

    let (first, _) = post_json(&harness.router, "/api/mint", None, issue.clone()).await;
    assert_eq!(first, StatusCode::OK);

    let (second, body) = post_json(&harness.router, "/api/mint", None, issue).await;
    assert_eq!(second, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().expect("error is a string");
    assert!(error.contains("already used"));
    assert!(error.contains("signed"));
}

#[tokio::test]
async fn test_issue_when_hash_unknown_then_400_not_found() {
    let harness = harness();

    let (status, body) = post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error is a string").contains("not found"));
}

#[tokio::test]
async fn test_issue_when_hash_malformed_then_400_names_expected_width() {
    let harness = harness();

    let (status, body) = post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": "0x1234", "address": TEST_ADDRESS_HEX }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error is a string").contains("32"));
}

#[tokio::test]
async fn test_issue_when_body_is_not_json_then_400_with_error_body() {
    let harness = harness();

    let (status, body) = post_raw(&harness.router, "/api/mint", "{oops").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().expect("error is a string").is_empty());
}

#[tokio::test]
async fn test_bind_when_request_signed_then_200_pending_with_camel_case_fields() {
    let harness = harness();
    provision(&harness, TEST_HASH_HEX).await;
    post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;

    let (status, body) = post_json(
        &harness.router,
        "/api/mint/tx",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX, "txHash": TEST_TX_HEX }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hash"], TEST_HASH_HEX);
    assert_eq!(body["address"], TEST_ADDRESS_HEX);
    assert_eq!(body["txHash"], TEST_TX_HEX);
    assert_eq!(body["status"], "pending");
    assert!(body.get("tx_hash").is_none());
}

#[tokio::test]
async fn test_bind_when_same_tx_repeated_then_idempotent_but_new_tx_rejected() {
    let harness = harness();
    provision(&harness, TEST_HASH_HEX).await;
    post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;
    let bind = json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX, "txHash": TEST_TX_HEX });

    let (first, _) = post_json(&harness.router, "/api/mint/tx", None, bind.clone()).await;
    let (again, body) = post_json(&harness.router, "/api/mint/tx", None, bind).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(again, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let (conflict, body) = post_json(
        &harness.router,
        "/api/mint/tx",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX, "txHash": TEST_OTHER_TX_HEX }),
    )
    .await;
    assert_eq!(conflict, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error is a string").contains("invalid state transition"));
}

#[tokio::test]
async fn test_bind_when_address_foreign_then_400_address_mismatch() {
    let harness = harness();
    provision(&harness, TEST_HASH_HEX).await;
    post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;

    let (status, body) = post_json(
        &harness.router,
        "/api/mint/tx",
        None,
        json!({
            "hash": TEST_HASH_HEX,
            "address": "0xffffffffffffffffffffffffffffffffffffffff",
            "txHash": TEST_TX_HEX,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error is a string").contains("address mismatch"));
}

#[tokio::test]
async fn test_status_when_tx_bound_then_200_with_camel_case_reply() {
    let harness = harness();
    provision(&harness, TEST_HASH_HEX).await;
    post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;
    post_json(
        &harness.router,
        "/api/mint/tx",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX, "txHash": TEST_TX_HEX }),
    )
    .await;

    let (status, body) =
        get_path(&harness.router, &format!("/api/mint/status?txHash={TEST_TX_HEX}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hash"], TEST_HASH_HEX);
    assert_eq!(body["address"], TEST_ADDRESS_HEX);
    assert_eq!(body["txHash"], TEST_TX_HEX);
    assert_eq!(body["status"], "pending");
    assert!(body["updatedAt"].as_u64().expect("updatedAt is a number") > 0);
}

#[tokio::test]
async fn test_status_when_tx_unknown_then_400_not_found() {
    let harness = harness();

    let (status, body) =
        get_path(&harness.router, &format!("/api/mint/status?txHash={TEST_TX_HEX}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error is a string").contains("not found"));
}

#[tokio::test]
async fn test_status_when_query_param_missing_then_400() {
    let harness = harness();

    let (status, body) = get_path(&harness.router, "/api/mint/status").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().expect("error is a string").is_empty());
}

#[tokio::test]
async fn test_full_flow_over_http_when_receipt_lands_then_status_becomes_success() {
    let harness = harness();
    provision(&harness, TEST_HASH_HEX).await;
    post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;
    post_json(
        &harness.router,
        "/api/mint/tx",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX, "txHash": TEST_TX_HEX }),
    )
    .await;

    let tx = TEST_TX_HEX.parse().expect("tx hash parses");
    harness.chain.set_receipt(tx, TxReceipt { status: ReceiptStatus::Success, block_number: Some(7) });
    let summary = harness.reconciler.reconcile_once().await;
    assert_eq!(summary.resolved_success, 1);

    let (status, body) =
        get_path(&harness.router, &format!("/api/mint/status?txHash={TEST_TX_HEX}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    // The settled hash stays consumed at the HTTP surface too.
    let (replay, body) = post_json(
        &harness.router,
        "/api/mint",
        None,
        json!({ "hash": TEST_HASH_HEX, "address": TEST_ADDRESS_HEX }),
    )
    .await;
    assert_eq!(replay, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error is a string").contains("already used"));
}
