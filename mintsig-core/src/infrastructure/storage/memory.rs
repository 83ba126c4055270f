use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{MintRequest, RequestStatus};
use crate::foundation::{MintError, RequestHash, Result, TxHash};
use crate::infrastructure::storage::{RequestStore, StatusUpdate};

struct MemoryInner {
    requests: HashMap<RequestHash, MintRequest>,
    tx_index: HashMap<TxHash, RequestHash>,
}

impl MemoryInner {
    fn new() -> Self {
        Self { requests: HashMap::new(), tx_index: HashMap::new() }
    }
}

/// In-memory request store. One mutex covers both maps, so every trait call
/// is atomic; used by tests and the `memory` storage backend.
pub struct MemoryRequestStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(MemoryInner::new())) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, MemoryInner>> {
        self.inner.lock().map_err(|_| MintError::StorageError {
            operation: "memory store lock".to_string(),
            details: "poisoned".to_string(),
        })
    }
}

impl Default for MemoryRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore for MemoryRequestStore {
    fn insert_request_if_absent(&self, request: MintRequest) -> Result<bool> {
        let mut inner = self.lock_inner()?;
        if inner.requests.contains_key(&request.hash) {
            return Ok(false);
        }
        if let Some(tx_hash) = request.tx_hash {
            inner.tx_index.insert(tx_hash, request.hash);
        }
        inner.requests.insert(request.hash, request);
        Ok(true)
    }

    fn get_request(&self, hash: &RequestHash) -> Result<Option<MintRequest>> {
        Ok(self.lock_inner()?.requests.get(hash).cloned())
    }

    fn get_request_by_tx_hash(&self, tx_hash: &TxHash) -> Result<Option<MintRequest>> {
        let inner = self.lock_inner()?;
        Ok(inner.tx_index.get(tx_hash).and_then(|hash| inner.requests.get(hash)).cloned())
    }

    fn list_requests_in_status(&self, status: RequestStatus) -> Result<Vec<MintRequest>> {
        let inner = self.lock_inner()?;
        let mut out: Vec<MintRequest> =
            inner.requests.values().filter(|request| request.status == status).cloned().collect();
        out.sort_by_key(|request| (request.created_at_secs, request.hash));
        Ok(out)
    }

    fn update_request_if_status(
        &self,
        hash: &RequestHash,
        expected: &[RequestStatus],
        change: &dyn Fn(&mut MintRequest) -> Result<()>,
    ) -> Result<StatusUpdate> {
        let mut inner = self.lock_inner()?;
        let existing = match inner.requests.get(hash) {
            Some(found) => found.clone(),
            None => return Ok(StatusUpdate::Missing),
        };
        if !expected.contains(&existing.status) {
            return Ok(StatusUpdate::Conflict { actual: existing.status });
        }

        let mut updated = existing.clone();
        change(&mut updated)?;
        // Primary key is immutable under change.
        updated.hash = existing.hash;

        if existing.tx_hash != updated.tx_hash {
            if let Some(old_tx) = existing.tx_hash {
                inner.tx_index.remove(&old_tx);
            }
        }
        if let Some(new_tx) = updated.tx_hash {
            inner.tx_index.insert(new_tx, updated.hash);
        }
        inner.requests.insert(updated.hash, updated.clone());
        Ok(StatusUpdate::Applied(updated))
    }

    fn request_count(&self) -> Result<u64> {
        Ok(self.lock_inner()?.requests.len() as u64)
    }
}
