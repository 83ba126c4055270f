//! Mint request lifecycle: one-shot signature issuance, transaction binding
//! and tx-hash lookups, driving every request along
//! `Unused -> Signed -> Pending -> Success | Failed`.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::request::{BINDABLE_STATUSES, SIGNABLE_STATUSES};
use crate::domain::{MintRequest, MintSigner, RequestStatus};
use crate::foundation::{unix_now_secs, EthAddress, MintError, RequestHash, Result, TxHash};
use crate::infrastructure::storage::{RequestStore, StatusUpdate};

/// Signature issued for a provisioned hash. `r` and `s` are 0x-prefixed
/// 32-byte hex, `v` is 27 or 28.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintSignature {
    pub hash: RequestHash,
    pub address: EthAddress,
    pub v: u8,
    pub r: String,
    pub s: String,
}

/// Drives mint requests through their lifecycle on top of a [`RequestStore`].
///
/// A hash is consumed the moment `issue_signature` succeeds; replays report
/// [`MintError::AlreadyUsed`] from then on, whatever later states the request
/// reaches.
pub struct MintLifecycle {
    store: Arc<dyn RequestStore>,
    signer: MintSigner,
}

impl MintLifecycle {
    pub fn new(store: Arc<dyn RequestStore>, signer: MintSigner) -> Self {
        Self { store, signer }
    }

    /// Address recovered signatures will resolve to.
    pub fn signer_address(&self) -> EthAddress {
        self.signer.address()
    }

    /// Provisions a request row in `Unused`. Returns `Ok(false)` when the
    /// hash is already known; existing rows are never touched.
    pub fn provision_request(&self, hash: &RequestHash) -> Result<bool> {
        let created = self.store.insert_request_if_absent(MintRequest::new(*hash, unix_now_secs()))?;
        if created {
            info!("mint request provisioned hash={hash}");
        } else {
            debug!("provisioning skipped, hash already known hash={hash}");
        }
        Ok(created)
    }

    /// Issues the mint authorization for `(address, hash)` and consumes the
    /// hash. The write and the signature are one unit: no signature is
    /// reported unless the store acknowledged the `Unused -> Signed` update.
    pub fn issue_signature(&self, hash: &RequestHash, address: &EthAddress) -> Result<MintSignature> {
        let current = self
            .store
            .get_request(hash)?
            .ok_or_else(|| MintError::not_found("mint request", hash.to_string()))?;
        if !SIGNABLE_STATUSES.contains(&current.status) {
            warn!("signature replay rejected hash={hash} status={}", current.status);
            return Err(MintError::already_used(hash.to_string(), current.status.to_string()));
        }

        let signature = self.signer.sign(address, hash)?;
        let now_secs = unix_now_secs();
        let outcome = self.store.update_request_if_status(hash, SIGNABLE_STATUSES, &|request| {
            request.address = Some(*address);
            request.status = RequestStatus::Signed;
            request.touch(now_secs);
            Ok(())
        })?;
        match outcome {
            StatusUpdate::Applied(_) => {
                info!("mint signature issued hash={hash} address={address} v={}", signature.v);
                Ok(MintSignature {
                    hash: *hash,
                    address: *address,
                    v: signature.v,
                    r: signature.r_hex(),
                    s: signature.s_hex(),
                })
            }
            StatusUpdate::Conflict { actual } => {
                warn!("signature issue lost a race hash={hash} status={actual}");
                Err(MintError::already_used(hash.to_string(), actual.to_string()))
            }
            StatusUpdate::Missing => Err(MintError::not_found("mint request", hash.to_string())),
        }
    }

    /// Records the submitted transaction hash and moves the request to
    /// `Pending`. Re-binding the same `tx_hash` is an idempotent success;
    /// a different `tx_hash`, a foreign address or a terminal status is
    /// rejected.
    pub fn bind_transaction(
        &self,
        hash: &RequestHash,
        address: &EthAddress,
        tx_hash: &TxHash,
    ) -> Result<MintRequest> {
        let current = self
            .store
            .get_request(hash)?
            .ok_or_else(|| MintError::not_found("mint request", hash.to_string()))?;
        // Probe on a copy for precise errors; the checks run again inside the
        // conditional update, which is where racing binders are serialized.
        let mut probe = current;
        let now_secs = unix_now_secs();
        check_and_apply_bind(&mut probe, address, tx_hash, now_secs)?;

        let outcome = self.store.update_request_if_status(hash, BINDABLE_STATUSES, &|request| {
            check_and_apply_bind(request, address, tx_hash, now_secs)
        })?;
        match outcome {
            StatusUpdate::Applied(request) => {
                info!("transaction bound hash={hash} tx_hash={tx_hash} status={}", request.status);
                Ok(request)
            }
            StatusUpdate::Conflict { actual } => Err(MintError::InvalidState {
                from: actual.to_string(),
                to: RequestStatus::Pending.to_string(),
            }),
            StatusUpdate::Missing => Err(MintError::not_found("mint request", hash.to_string())),
        }
    }

    /// Looks a request up by its bound transaction hash.
    pub fn query_by_tx_hash(&self, tx_hash: &TxHash) -> Result<MintRequest> {
        self.store
            .get_request_by_tx_hash(tx_hash)?
            .ok_or_else(|| MintError::not_found("mint request", format!("txHash {tx_hash}")))
    }
}

/// Bind checks in rejection order: foreign address, unbindable status,
/// conflicting tx hash. Mutates the row only when every check passes.
fn check_and_apply_bind(
    request: &mut MintRequest,
    address: &EthAddress,
    tx_hash: &TxHash,
    now_secs: u64,
) -> Result<()> {
    if let Some(stored) = request.address {
        if stored != *address {
            return Err(MintError::address_mismatch(
                request.hash.to_string(),
                stored.to_string(),
                address.to_string(),
            ));
        }
    }
    if !BINDABLE_STATUSES.contains(&request.status) {
        return Err(MintError::InvalidState {
            from: request.status.to_string(),
            to: RequestStatus::Pending.to_string(),
        });
    }
    if let Some(existing) = request.tx_hash {
        if existing != *tx_hash {
            return Err(MintError::InvalidState {
                from: format!("{} (txHash {existing})", request.status),
                to: format!("{} (txHash {tx_hash})", request.status),
            });
        }
    }
    request.address = Some(*address);
    request.tx_hash = Some(*tx_hash);
    request.status = RequestStatus::Pending;
    request.touch(now_secs);
    Ok(())
}
