use crate::api::state::ApiState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, trace};
use std::sync::Arc;

pub async fn handle_health() -> impl IntoResponse {
    trace!("health check: ok");
    Json(serde_json::json!({
        "status": "healthy",
    }))
}

pub async fn handle_ready(State(state): State<Arc<ApiState>>) -> Response {
    let storage_ok = state.store.health_check().is_ok();
    let chain_ok = state.chain.health_check().await.is_ok();
    let status = if storage_ok && chain_ok { "ready" } else { "degraded" };
    if storage_ok && chain_ok {
        trace!("ready check: ok storage_ok={storage_ok} chain_ok={chain_ok}");
    } else {
        debug!("ready check: degraded storage_ok={storage_ok} chain_ok={chain_ok}");
    }
    Json(serde_json::json!({
        "status": status,
        "storage_ok": storage_ok,
        "chain_ok": chain_ok,
    }))
    .into_response()
}
