use std::fmt;

use serde::{Deserialize, Serialize};

/// Base configuration for the service. All sections have compiled defaults;
/// a TOML file and `MINTSIG_*` env vars override them (see `loader`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the chain node.
    #[serde(default)]
    pub rpc_url: String,
    /// Expected chain id; verified against `eth_chainId` at startup.
    #[serde(default)]
    pub chain_id: u64,
    /// Mint contract address. Informational for operators; signatures issued
    /// by this service are verified by that contract.
    #[serde(default)]
    pub contract_address: String,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignerConfig {
    /// 32-byte signing key as hex (optional `0x` prefix). Supply via
    /// `MINTSIG_SIGNER__SIGNING_KEY_HEX` in production deployments.
    #[serde(default)]
    pub signing_key_hex: String,
}

// The key must never reach logs, including via `{:?}` on AppConfig.
impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig").field("signing_key_hex", &"<redacted>").finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Rocks,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Rocks => f.write_str("rocks"),
            StorageBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub data_dir: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub listen_addr: String,
    /// Bearer token required by the admin provisioning endpoint. When unset
    /// or blank the check is skipped and the endpoint is open.
    #[serde(default)]
    pub admin_token: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Interval between reconciliation passes.
    #[serde(default)]
    pub poll_secs: u64,
    /// When set, `Pending` rows older than this are resolved as `Failed`
    /// instead of being retried forever.
    #[serde(default)]
    pub pending_timeout_secs: Option<u64>,
}
