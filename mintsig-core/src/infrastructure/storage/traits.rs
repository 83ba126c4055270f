use crate::domain::{MintRequest, RequestStatus};
use crate::foundation::{RequestHash, Result, TxHash};

/// Outcome of a conditional request update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Status was in the expected set; the change is persisted.
    Applied(MintRequest),
    /// Row exists but its status was outside the expected set. Nothing written.
    Conflict { actual: RequestStatus },
    /// No row under that hash.
    Missing,
}

/// Durable store for mint requests. Primary key is the request hash; the
/// transaction hash is a secondary lookup index.
///
/// `update_request_if_status` is the serialization point for concurrent
/// callers: implementations must make the read-check-write of a single row
/// atomic, so two racing updates of one hash observe each other.
pub trait RequestStore: Send + Sync {
    /// Provisions a row. Returns `Ok(false)` when the hash already exists.
    fn insert_request_if_absent(&self, request: MintRequest) -> Result<bool>;

    fn get_request(&self, hash: &RequestHash) -> Result<Option<MintRequest>>;

    fn get_request_by_tx_hash(&self, tx_hash: &TxHash) -> Result<Option<MintRequest>>;

    /// Rows currently in `status`, ordered by creation time then hash.
    fn list_requests_in_status(&self, status: RequestStatus) -> Result<Vec<MintRequest>>;

    /// Applies `change` to the row iff its status is in `expected`. The
    /// closure runs inside the serialization point and may reject the update
    /// by returning an error, in which case nothing is written. The row's
    /// hash is immutable; the tx-hash index follows any `tx_hash` change.
    fn update_request_if_status(
        &self,
        hash: &RequestHash,
        expected: &[RequestStatus],
        change: &dyn Fn(&mut MintRequest) -> Result<()>,
    ) -> Result<StatusUpdate>;

    fn request_count(&self) -> Result<u64>;

    fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
