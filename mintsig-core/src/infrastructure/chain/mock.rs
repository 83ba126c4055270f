//! Scriptable chain reader for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::foundation::{MintError, Result, TxHash};
use crate::infrastructure::chain::{ChainReader, TxReceipt};

/// In-memory `ChainReader` with per-hash scripted receipts. Hashes without a
/// scripted receipt read as not-yet-mined; hashes scripted as failing return
/// a chain read error.
pub struct MockChainReader {
    receipts: Mutex<HashMap<TxHash, TxReceipt>>,
    erroring: Mutex<HashSet<TxHash>>,
    calls: AtomicU64,
}

impl MockChainReader {
    pub fn new() -> Self {
        Self { receipts: Mutex::new(HashMap::new()), erroring: Mutex::new(HashSet::new()), calls: AtomicU64::new(0) }
    }

    /// Scripts a receipt for `tx_hash` and clears any scripted error for it.
    pub fn set_receipt(&self, tx_hash: TxHash, receipt: TxReceipt) {
        if let Ok(mut receipts) = self.receipts.lock() {
            receipts.insert(tx_hash, receipt);
        }
        if let Ok(mut erroring) = self.erroring.lock() {
            erroring.remove(&tx_hash);
        }
    }

    /// Makes receipt fetches for `tx_hash` fail with a chain read error.
    pub fn set_error(&self, tx_hash: TxHash) {
        if let Ok(mut erroring) = self.erroring.lock() {
            erroring.insert(tx_hash);
        }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for MockChainReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn transaction_receipt(&self, tx_hash: &TxHash) -> Result<Option<TxReceipt>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let erroring = self.erroring.lock().map_err(|_| MintError::StorageError {
            operation: "mock chain reader lock".to_string(),
            details: "poisoned".to_string(),
        })?;
        if erroring.contains(tx_hash) {
            return Err(MintError::ChainReadError {
                operation: "eth_getTransactionReceipt".to_string(),
                details: "scripted failure".to_string(),
            });
        }
        drop(erroring);
        let receipts = self.receipts.lock().map_err(|_| MintError::StorageError {
            operation: "mock chain reader lock".to_string(),
            details: "poisoned".to_string(),
        })?;
        Ok(receipts.get(tx_hash).copied())
    }
}
