//! Request status transition rules. Pure checks, no logging; callers decide
//! how to report violations.

use crate::domain::request::types::RequestStatus;
use crate::foundation::{MintError, Result};

/// Allowed status transitions. Anything not listed (other than a same-state
/// no-op) is a violation.
const VALID_TRANSITIONS: &[(RequestStatus, RequestStatus)] = &[
    (RequestStatus::Unused, RequestStatus::Signed),
    (RequestStatus::Signed, RequestStatus::Pending),
    (RequestStatus::Pending, RequestStatus::Success),
    (RequestStatus::Pending, RequestStatus::Failed),
];

/// Statuses from which a signature may be issued.
pub const SIGNABLE_STATUSES: &[RequestStatus] = &[RequestStatus::Unused];

/// Statuses from which a transaction hash may be bound.
pub const BINDABLE_STATUSES: &[RequestStatus] = &[RequestStatus::Signed, RequestStatus::Pending];

/// Same-state transitions are valid no-ops (idempotent re-assertion).
pub fn validate_transition(from: RequestStatus, to: RequestStatus) -> bool {
    from == to || VALID_TRANSITIONS.contains(&(from, to))
}

pub fn ensure_valid_transition(from: RequestStatus, to: RequestStatus) -> Result<()> {
    if validate_transition(from, to) {
        Ok(())
    } else {
        Err(MintError::InvalidState { from: from.to_string(), to: to.to_string() })
    }
}

/// Terminal statuses are never left, not even by reconciliation.
pub fn is_terminal(status: RequestStatus) -> bool {
    matches!(status, RequestStatus::Success | RequestStatus::Failed)
}
