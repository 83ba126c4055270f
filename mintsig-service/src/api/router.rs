use super::handlers::admin::handle_provision_request;
use super::handlers::health::{handle_health, handle_ready};
use super::handlers::mint::{handle_bind_transaction, handle_issue_signature, handle_mint_status};
use super::middleware::logging::request_logging;
use super::state::ApiState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::{error, info};
use mintsig_core::MintError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/mint", post(handle_issue_signature))
        .route("/api/mint/tx", post(handle_bind_transaction))
        .route("/api/mint/status", get(handle_mint_status))
        .route("/api/admin/requests", post(handle_provision_request))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(axum::middleware::from_fn(request_logging))
        .with_state(state)
}

pub async fn run_http_server(
    addr: SocketAddr,
    state: Arc<ApiState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), MintError> {
    info!("binding http server addr={addr}");
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server ready and accepting connections addr={addr}");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| {
            error!("HTTP server terminated unexpectedly addr={addr} error={err}");
            MintError::Message(err.to_string())
        })
}
