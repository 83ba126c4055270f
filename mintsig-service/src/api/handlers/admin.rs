use super::types::{bad_request, bad_request_message, unauthorized, ProvisionBody, ProvisionReply};
use crate::api::middleware::auth::authorize_admin;
use crate::api::state::ApiState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::info;
use mintsig_core::foundation::RequestHash;
use std::sync::Arc;

/// POST /api/admin/requests. Provisions a mint request hash so it can later
/// be signed. Idempotent per hash; protected by the configured bearer token.
pub async fn handle_provision_request(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Result<Json<ProvisionBody>, JsonRejection>,
) -> Response {
    if let Err(message) = authorize_admin(&headers, state.admin_token.as_deref()) {
        return unauthorized(message);
    }
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request_message(rejection.body_text()),
    };
    let hash = match body.hash.parse::<RequestHash>() {
        Ok(hash) => hash,
        Err(err) => return bad_request(&err),
    };

    match state.lifecycle.provision_request(&hash) {
        Ok(created) => {
            info!("admin provisioning hash={hash} created={created}");
            Json(ProvisionReply { hash: format!("{hash:#x}"), created }).into_response()
        }
        Err(err) => bad_request(&err),
    }
}
