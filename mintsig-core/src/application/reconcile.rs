//! Receipt reconciliation: resolves `Pending` requests to `Success` or
//! `Failed` from on-chain transaction receipts.
//!
//! A single pass is best-effort per row. Chain errors, absent receipts and
//! lost update races leave the row `Pending` for the next pass; nothing here
//! is fatal to the caller.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::domain::{MintRequest, RequestStatus};
use crate::foundation::{unix_now_secs, RequestHash, Result};
use crate::infrastructure::chain::{ChainReader, ReceiptStatus};
use crate::infrastructure::storage::{RequestStore, StatusUpdate};

/// Counters for one reconciliation pass. `scanned` always equals
/// `resolved_success + resolved_failed + skipped`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub scanned: usize,
    pub resolved_success: usize,
    pub resolved_failed: usize,
    pub skipped: usize,
}

pub struct Reconciler {
    store: Arc<dyn RequestStore>,
    chain: Arc<dyn ChainReader>,
    /// When set, a `Pending` row whose `updated_at_secs` is older than this
    /// is marked `Failed` without consulting the chain. `None` retries
    /// forever.
    pending_timeout_secs: Option<u64>,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn RequestStore>,
        chain: Arc<dyn ChainReader>,
        pending_timeout_secs: Option<u64>,
    ) -> Self {
        Self { store, chain, pending_timeout_secs }
    }

    /// Runs one reconciliation pass over every `Pending` row.
    pub async fn reconcile_once(&self) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let pending = match self.store.list_requests_in_status(RequestStatus::Pending) {
            Ok(rows) => rows,
            Err(err) => {
                warn!("reconcile scan failed err={err}");
                return summary;
            }
        };

        let now_secs = unix_now_secs();
        for request in pending {
            summary.scanned += 1;
            self.reconcile_row(&request, now_secs, &mut summary).await;
        }

        if summary.scanned > 0 {
            info!(
                "reconcile pass complete scanned={} success={} failed={} skipped={}",
                summary.scanned, summary.resolved_success, summary.resolved_failed, summary.skipped
            );
        } else {
            debug!("reconcile pass complete, nothing pending");
        }
        summary
    }

    async fn reconcile_row(&self, request: &MintRequest, now_secs: u64, summary: &mut ReconcileSummary) {
        let hash = request.hash;
        let Some(tx_hash) = request.tx_hash else {
            debug!("pending row has no txHash, leaving for binder hash={hash}");
            summary.skipped += 1;
            return;
        };

        if let Some(timeout_secs) = self.pending_timeout_secs {
            let age_secs = now_secs.saturating_sub(request.updated_at_secs);
            if age_secs > timeout_secs {
                warn!("pending request timed out hash={hash} tx_hash={tx_hash} age_secs={age_secs}");
                self.resolve(&hash, RequestStatus::Failed, now_secs, summary);
                return;
            }
        }

        match self.chain.transaction_receipt(&tx_hash).await {
            Err(err) => {
                warn!("receipt fetch failed hash={hash} tx_hash={tx_hash} err={err}");
                summary.skipped += 1;
            }
            Ok(None) => {
                debug!("receipt not yet available hash={hash} tx_hash={tx_hash}");
                summary.skipped += 1;
            }
            Ok(Some(receipt)) => {
                let target = match receipt.status {
                    ReceiptStatus::Success => RequestStatus::Success,
                    ReceiptStatus::Failed => RequestStatus::Failed,
                };
                info!(
                    "receipt found hash={hash} tx_hash={tx_hash} receipt_status={} block={:?}",
                    receipt.status, receipt.block_number
                );
                self.resolve(&hash, target, now_secs, summary);
            }
        }
    }

    /// Conditional `Pending -> target` update. Rows that moved or vanished
    /// under us are counted as skipped, never overwritten.
    fn resolve(&self, hash: &RequestHash, target: RequestStatus, now_secs: u64, summary: &mut ReconcileSummary) {
        match self.try_resolve(hash, target, now_secs) {
            Ok(true) => match target {
                RequestStatus::Failed => summary.resolved_failed += 1,
                _ => summary.resolved_success += 1,
            },
            Ok(false) => summary.skipped += 1,
            Err(err) => {
                warn!("resolution write failed hash={hash} target={target} err={err}");
                summary.skipped += 1;
            }
        }
    }

    fn try_resolve(&self, hash: &RequestHash, target: RequestStatus, now_secs: u64) -> Result<bool> {
        let outcome = self.store.update_request_if_status(hash, &[RequestStatus::Pending], &|request| {
            request.status = target;
            request.touch(now_secs);
            Ok(())
        })?;
        match outcome {
            StatusUpdate::Applied(_) => Ok(true),
            StatusUpdate::Conflict { actual } => {
                debug!("resolution skipped, status moved hash={hash} status={actual}");
                Ok(false)
            }
            StatusUpdate::Missing => {
                warn!("pending row vanished during resolution hash={hash}");
                Ok(false)
            }
        }
    }
}
