use super::types::{
    bad_request, bad_request_message, BindReply, BindTransactionBody, IssueSignatureBody, SignatureReply, StatusQuery,
    StatusReply,
};
use crate::api::state::ApiState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::debug;
use mintsig_core::foundation::{EthAddress, RequestHash, TxHash};
use std::sync::Arc;

/// POST /api/mint. Issues the one-shot mint signature for a provisioned hash.
pub async fn handle_issue_signature(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<IssueSignatureBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request_message(rejection.body_text()),
    };
    let hash = match body.hash.parse::<RequestHash>() {
        Ok(hash) => hash,
        Err(err) => return bad_request(&err),
    };
    let address = match body.address.parse::<EthAddress>() {
        Ok(address) => address,
        Err(err) => return bad_request(&err),
    };
    debug!("issue signature requested hash={hash} address={address}");

    match state.lifecycle.issue_signature(&hash, &address) {
        Ok(signature) => Json(SignatureReply::from(signature)).into_response(),
        Err(err) => bad_request(&err),
    }
}

/// POST /api/mint/tx. Binds the submitted transaction hash to a request.
pub async fn handle_bind_transaction(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<BindTransactionBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request_message(rejection.body_text()),
    };
    let hash = match body.hash.parse::<RequestHash>() {
        Ok(hash) => hash,
        Err(err) => return bad_request(&err),
    };
    let address = match body.address.parse::<EthAddress>() {
        Ok(address) => address,
        Err(err) => return bad_request(&err),
    };
    let tx_hash = match body.tx_hash.parse::<TxHash>() {
        Ok(tx_hash) => tx_hash,
        Err(err) => return bad_request(&err),
    };
    debug!("bind transaction requested hash={hash} tx_hash={tx_hash}");

    match state.lifecycle.bind_transaction(&hash, &address, &tx_hash) {
        Ok(request) => Json(BindReply {
            hash: format!("{hash:#x}"),
            address: format!("{address:#x}"),
            tx_hash: format!("{tx_hash:#x}"),
            status: request.status.to_string(),
        })
        .into_response(),
        Err(err) => bad_request(&err),
    }
}

/// GET /api/mint/status?txHash=… . Looks a request up by its bound tx hash.
pub async fn handle_mint_status(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request_message(rejection.body_text()),
    };
    let tx_hash = match query.tx_hash.parse::<TxHash>() {
        Ok(tx_hash) => tx_hash,
        Err(err) => return bad_request(&err),
    };

    match state.lifecycle.query_by_tx_hash(&tx_hash) {
        Ok(request) => Json(StatusReply::from(&request)).into_response(),
        Err(err) => bad_request(&err),
    }
}
