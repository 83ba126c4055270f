use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::{EthAddress, MintError, RequestHash, TxHash};

/// Lifecycle status of a mint request.
///
/// Stored as a lowercase string in human-readable encodings; older dumps with
/// an empty status field decode as `Unused` (both mean "not yet consumed").
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    #[serde(alias = "")]
    Unused,
    Signed,
    Pending,
    Success,
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Unused => "unused",
            RequestStatus::Signed => "signed",
            RequestStatus::Pending => "pending",
            RequestStatus::Success => "success",
            RequestStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = MintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unused" => Ok(RequestStatus::Unused),
            "signed" => Ok(RequestStatus::Signed),
            "pending" => Ok(RequestStatus::Pending),
            "success" => Ok(RequestStatus::Success),
            "failed" => Ok(RequestStatus::Failed),
            other => Err(MintError::invalid_input(format!("unknown request status: {other}"))),
        }
    }
}

/// Stored mint request record. Primary key is `hash`; `tx_hash` is indexed
/// for the status lookup path.
///
/// This struct is the persisted encoding (bincode in RocksDB, JSON elsewhere)
/// and must remain stable; breaking changes require a schema version bump.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct MintRequest {
    /// Application-defined 32-byte identifier, unique per mint.
    pub hash: RequestHash,
    /// Recipient bound at signing time; absent until the first signature.
    #[serde(default)]
    pub address: Option<EthAddress>,
    #[serde(default)]
    pub status: RequestStatus,
    /// Submitted transaction hash, set by the bind operation.
    #[serde(default)]
    pub tx_hash: Option<TxHash>,
    /// Local receipt timestamp (unix seconds).
    pub created_at_secs: u64,
    /// Bumped on every accepted mutation (unix seconds).
    pub updated_at_secs: u64,
}

impl MintRequest {
    pub fn new(hash: RequestHash, now_secs: u64) -> Self {
        Self {
            hash,
            address: None,
            status: RequestStatus::Unused,
            tx_hash: None,
            created_at_secs: now_secs,
            updated_at_secs: now_secs,
        }
    }

    pub fn touch(&mut self, now_secs: u64) {
        self.updated_at_secs = now_secs;
    }
}
