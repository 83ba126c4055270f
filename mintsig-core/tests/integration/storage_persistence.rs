//! RocksDB-backed store behavior across process restarts, exercised by
//! dropping and reopening the database directory.

use mintsig_core::domain::{MintRequest, RequestStatus};
use mintsig_core::foundation::MintError;
use mintsig_core::infrastructure::storage::{RequestStore, RocksRequestStore, StatusUpdate};

use crate::fixtures::{recipient, request_hash, request_in_status, tx_hash};

#[test]
fn test_rocks_rows_when_store_reopens_then_rows_and_tx_index_survive() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let hash = request_hash(1);
    let tx = tx_hash(0xA1);

    {
        let store = RocksRequestStore::open_in_dir(dir.path()).expect("open store");
        store.insert_request_if_absent(request_in_status(1, RequestStatus::Signed)).expect("seed row");
        let outcome = store
            .update_request_if_status(&hash, &[RequestStatus::Signed], &|row| {
                row.status = RequestStatus::Pending;
                row.tx_hash = Some(tx);
                Ok(())
            })
            .expect("conditional update");
        assert!(matches!(outcome, StatusUpdate::Applied(_)));
    }

    let reopened = RocksRequestStore::open_in_dir(dir.path()).expect("reopen store");
    reopened.health_check().expect("schema intact after reopen");

    let row = reopened.get_request(&hash).expect("read row").expect("row survived");
    assert_eq!(row.status, RequestStatus::Pending);
    assert_eq!(row.address, Some(recipient()));
    assert_eq!(row.tx_hash, Some(tx));

    let by_tx = reopened.get_request_by_tx_hash(&tx).expect("index lookup").expect("index survived");
    assert_eq!(by_tx.hash, hash);
    assert_eq!(reopened.request_count().expect("count"), 1);
}

#[test]
fn test_rocks_insert_when_hash_already_persisted_then_reinsert_reports_absent_false() {
    let dir = tempfile::tempdir().expect("create temp dir");

    {
        let store = RocksRequestStore::open_in_dir(dir.path()).expect("open store");
        assert!(store.insert_request_if_absent(request_in_status(2, RequestStatus::Unused)).expect("insert"));
    }

    let reopened = RocksRequestStore::open_in_dir(dir.path()).expect("reopen store");
    assert!(!reopened
        .insert_request_if_absent(request_in_status(2, RequestStatus::Unused))
        .expect("insert against persisted row"));
}

#[test]
fn test_rocks_list_when_multiple_pending_then_ordered_by_creation_time() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = RocksRequestStore::open_in_dir(dir.path()).expect("open store");

    for (seed, created_at) in [(0x31u8, 300u64), (0x11, 100), (0x21, 200)] {
        let mut row = MintRequest::new(request_hash(seed), created_at);
        row.status = RequestStatus::Pending;
        row.address = Some(recipient());
        row.tx_hash = Some(tx_hash(seed));
        store.insert_request_if_absent(row).expect("seed row");
    }

    let listed = store.list_requests_in_status(RequestStatus::Pending).expect("list pending");
    let created: Vec<u64> = listed.iter().map(|row| row.created_at_secs).collect();
    assert_eq!(created, vec![100, 200, 300]);
}

#[test]
fn test_rocks_conditional_update_when_closure_rejects_then_nothing_is_written() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = RocksRequestStore::open_in_dir(dir.path()).expect("open store");
    let hash = request_hash(3);
    store.insert_request_if_absent(request_in_status(3, RequestStatus::Signed)).expect("seed row");

    let result = store.update_request_if_status(&hash, &[RequestStatus::Signed], &|row| {
        row.status = RequestStatus::Pending;
        row.tx_hash = Some(tx_hash(0xB3));
        Err(MintError::invalid_input("rejected inside the update"))
    });
    assert!(result.is_err());

    let row = store.get_request(&hash).expect("read row").expect("row exists");
    assert_eq!(row.status, RequestStatus::Signed);
    assert!(row.tx_hash.is_none());
    assert!(store.get_request_by_tx_hash(&tx_hash(0xB3)).expect("index lookup").is_none());
}
