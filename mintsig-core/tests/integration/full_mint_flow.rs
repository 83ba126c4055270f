//! End-to-end lifecycle runs: provision, sign, bind, reconcile against a
//! scripted chain, and settle. Persistence-backed variants reopen the store
//! mid-flow to mimic a service restart.

use std::sync::Arc;

use mintsig_core::application::{MintLifecycle, ReconcileSummary, Reconciler};
use mintsig_core::domain::signing::VrsSignature;
use mintsig_core::domain::{mint_digest, recover_signer, RequestStatus};
use mintsig_core::foundation::util::parse_hex_32bytes;
use mintsig_core::foundation::MintError;
use mintsig_core::infrastructure::chain::{MockChainReader, ReceiptStatus, TxReceipt};
use mintsig_core::infrastructure::storage::{RequestStore, RocksRequestStore};

use crate::fixtures::{
    memory_lifecycle, recipient, reconciler_with_mock_chain, request_hash, test_signer, tx_hash,
};

fn success_receipt() -> TxReceipt {
    TxReceipt { status: ReceiptStatus::Success, block_number: Some(123) }
}

fn failed_receipt() -> TxReceipt {
    TxReceipt { status: ReceiptStatus::Failed, block_number: Some(124) }
}

#[tokio::test]
async fn test_full_flow_when_receipt_succeeds_then_request_settles_as_success() {
    let (store, lifecycle) = memory_lifecycle();
    let (chain, reconciler) = reconciler_with_mock_chain(store.clone());
    let hash = request_hash(0x51);
    let address = recipient();
    let tx = tx_hash(0x52);

    assert!(lifecycle.provision_request(&hash).expect("provision"));

    let issued = lifecycle.issue_signature(&hash, &address).expect("first issuance succeeds");
    assert!(issued.v == 27 || issued.v == 28);
    let signature = VrsSignature {
        v: issued.v,
        r: parse_hex_32bytes(&issued.r).expect("r decodes"),
        s: parse_hex_32bytes(&issued.s).expect("s decodes"),
    };
    let recovered = recover_signer(&mint_digest(&address, &hash), &signature).expect("recovery");
    assert_eq!(recovered, test_signer().address());

    let replay = lifecycle.issue_signature(&hash, &address).unwrap_err();
    assert!(matches!(replay, MintError::AlreadyUsed { .. }));

    let bound = lifecycle.bind_transaction(&hash, &address, &tx).expect("bind succeeds");
    assert_eq!(bound.status, RequestStatus::Pending);

    chain.set_receipt(tx, success_receipt());
    let summary = reconciler.reconcile_once().await;
    assert_eq!(
        summary,
        ReconcileSummary { scanned: 1, resolved_success: 1, resolved_failed: 0, skipped: 0 }
    );

    let settled = lifecycle.query_by_tx_hash(&tx).expect("query by tx hash");
    assert_eq!(settled.status, RequestStatus::Success);
    assert_eq!(settled.address, Some(address));

    // Terminal rows drop out of later passes and stay consumed.
    assert_eq!(reconciler.reconcile_once().await, ReconcileSummary::default());
    let after_settle = lifecycle.issue_signature(&hash, &address).unwrap_err();
    assert!(after_settle.to_string().contains("success"));
}

#[tokio::test]
async fn test_full_flow_when_receipt_fails_then_request_settles_as_failed() {
    let (store, lifecycle) = memory_lifecycle();
    let (chain, reconciler) = reconciler_with_mock_chain(store.clone());
    let hash = request_hash(0x61);
    let tx = tx_hash(0x62);

    lifecycle.provision_request(&hash).expect("provision");
    lifecycle.issue_signature(&hash, &recipient()).expect("issue");
    lifecycle.bind_transaction(&hash, &recipient(), &tx).expect("bind");

    chain.set_receipt(tx, failed_receipt());
    let summary = reconciler.reconcile_once().await;
    assert_eq!(summary.resolved_failed, 1);
    assert_eq!(summary.resolved_success, 0);

    let settled = lifecycle.query_by_tx_hash(&tx).expect("query by tx hash");
    assert_eq!(settled.status, RequestStatus::Failed);

    // A failed settlement still consumes the hash.
    assert!(lifecycle.issue_signature(&hash, &recipient()).is_err());
}

#[tokio::test]
async fn test_pending_row_when_store_reopens_then_reconciliation_resumes() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let hash = request_hash(0x71);
    let tx = tx_hash(0x72);

    {
        let store: Arc<dyn RequestStore> =
            Arc::new(RocksRequestStore::open_in_dir(dir.path()).expect("open store"));
        let lifecycle = MintLifecycle::new(store, test_signer());
        lifecycle.provision_request(&hash).expect("provision");
        lifecycle.issue_signature(&hash, &recipient()).expect("issue");
        lifecycle.bind_transaction(&hash, &recipient(), &tx).expect("bind");
    }

    let store: Arc<dyn RequestStore> =
        Arc::new(RocksRequestStore::open_in_dir(dir.path()).expect("reopen store"));
    let chain = Arc::new(MockChainReader::new());
    chain.set_receipt(tx, success_receipt());
    let reconciler = Reconciler::new(store.clone(), chain, None);

    let summary = reconciler.reconcile_once().await;
    assert_eq!(summary.resolved_success, 1);

    let settled = store.get_request_by_tx_hash(&tx).expect("index lookup").expect("row survived");
    assert_eq!(settled.status, RequestStatus::Success);
}
