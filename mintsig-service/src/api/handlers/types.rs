//! Wire types for the mint API. JSON field names are camelCase; hashes and
//! addresses go out 0x-prefixed and are accepted with or without the prefix.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mintsig_core::application::MintSignature;
use mintsig_core::domain::MintRequest;
use mintsig_core::MintError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct IssueSignatureBody {
    pub hash: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindTransactionBody {
    pub hash: String,
    pub address: String,
    pub tx_hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub tx_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct ProvisionBody {
    pub hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignatureReply {
    pub hash: String,
    pub address: String,
    pub v: u8,
    pub r: String,
    pub s: String,
}

impl From<MintSignature> for SignatureReply {
    fn from(signature: MintSignature) -> Self {
        Self {
            hash: format!("{:#x}", signature.hash),
            address: format!("{:#x}", signature.address),
            v: signature.v,
            r: signature.r,
            s: signature.s,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindReply {
    pub hash: String,
    pub address: String,
    pub tx_hash: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    pub hash: String,
    pub address: Option<String>,
    pub tx_hash: Option<String>,
    pub status: String,
    pub updated_at: u64,
}

impl From<&MintRequest> for StatusReply {
    fn from(request: &MintRequest) -> Self {
        Self {
            hash: format!("{:#x}", request.hash),
            address: request.address.map(|address| format!("{address:#x}")),
            tx_hash: request.tx_hash.map(|tx_hash| format!("{tx_hash:#x}")),
            status: request.status.to_string(),
            updated_at: request.updated_at_secs,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProvisionReply {
    pub hash: String,
    pub created: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Uniform failure shape: every rejected operation is a 400 with the error
/// message, nothing more.
pub fn bad_request(err: &MintError) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: err.to_string() })).into_response()
}

pub fn bad_request_message(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message.into() })).into_response()
}

pub fn unauthorized(message: impl Into<String>) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorBody { error: message.into() })).into_response()
}
