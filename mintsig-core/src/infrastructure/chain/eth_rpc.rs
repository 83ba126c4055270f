//! Ethereum JSON-RPC chain reader backed by `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::chain_err;
use crate::foundation::{MintError, Result, TxHash};
use crate::infrastructure::chain::{ChainReader, ReceiptStatus, TxReceipt};

const RPC_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptResponse {
    status: Option<String>,
    block_number: Option<String>,
}

pub struct EthRpcReader {
    client: reqwest::Client,
    rpc_url: String,
    request_id: AtomicU64,
}

impl EthRpcReader {
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RPC_TIMEOUT_SECS))
            .build()
            .map_err(|err| chain_err!("http client build", err))?;
        Ok(Self { client, rpc_url: rpc_url.into(), request_id: AtomicU64::new(1) })
    }

    /// Builds a reader and verifies the endpoint serves the expected chain.
    /// A mismatched chain id fails fast; signatures would target the wrong
    /// network otherwise.
    pub async fn connect(rpc_url: impl Into<String>, expected_chain_id: u64) -> Result<Self> {
        let reader = Self::new(rpc_url)?;
        let actual = reader.chain_id().await?;
        if actual != expected_chain_id {
            return Err(MintError::ChainReadError {
                operation: "eth_chainId".to_string(),
                details: format!("chain id mismatch: expected {expected_chain_id}, got {actual}"),
            });
        }
        info!("chain rpc connected chain_id={actual}");
        Ok(reader)
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let raw: String = self.call("eth_chainId", Vec::<()>::new()).await?.ok_or_else(|| MintError::ChainReadError {
            operation: "eth_chainId".to_string(),
            details: "missing result".to_string(),
        })?;
        parse_hex_u64(&raw).ok_or_else(|| MintError::ChainReadError {
            operation: "eth_chainId".to_string(),
            details: format!("invalid chain id: {raw}"),
        })
    }

    /// A `None` result means the node answered `null` (valid for a receipt
    /// that does not exist yet); RPC-level errors are returned as errors.
    async fn call<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: P) -> Result<Option<R>> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest { jsonrpc: "2.0", method, params, id };
        debug!("chain rpc call method={method} id={id}");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|err| chain_err!(method, err))?;
        let decoded: JsonRpcResponse<R> = response.json().await.map_err(|err| chain_err!(method, err))?;

        if let Some(error) = decoded.error {
            return Err(MintError::ChainReadError {
                operation: method.to_string(),
                details: format!("rpc error {}: {}", error.code, error.message),
            });
        }
        Ok(decoded.result)
    }
}

#[async_trait]
impl ChainReader for EthRpcReader {
    async fn transaction_receipt(&self, tx_hash: &TxHash) -> Result<Option<TxReceipt>> {
        let params = (format!("{tx_hash:#x}"),);
        let response: Option<ReceiptResponse> = self.call("eth_getTransactionReceipt", params).await?;
        response.map(receipt_from_response).transpose()
    }

    async fn health_check(&self) -> Result<()> {
        self.chain_id().await.map(|_| ())
    }
}

fn receipt_from_response(response: ReceiptResponse) -> Result<TxReceipt> {
    let status = match response.status.as_deref() {
        Some("0x1") => ReceiptStatus::Success,
        Some("0x0") => ReceiptStatus::Failed,
        other => {
            return Err(MintError::ChainReadError {
                operation: "eth_getTransactionReceipt".to_string(),
                details: format!("unsupported receipt status: {other:?}"),
            });
        }
    };
    let block_number = response.block_number.as_deref().and_then(parse_hex_u64);
    Ok(TxReceipt { status, block_number })
}

fn parse_hex_u64(s: &str) -> Option<u64> {
    u64::from_str_radix(s.trim().trim_start_matches("0x"), 16).ok()
}
