use async_trait::async_trait;

use crate::foundation::{Result, TxHash};

pub mod eth_rpc;
pub mod mock;

pub use eth_rpc::EthRpcReader;
pub use mock::MockChainReader;

/// Execution outcome reported by a transaction receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failed,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Success => "success",
            ReceiptStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub status: ReceiptStatus,
    pub block_number: Option<u64>,
}

/// Read-only view of the chain. `Ok(None)` means not yet mined.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn transaction_receipt(&self, tx_hash: &TxHash) -> Result<Option<TxReceipt>>;

    /// Cheap connectivity probe for readiness reporting.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
