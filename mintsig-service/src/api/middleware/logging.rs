use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, trace, warn};
use std::time::Instant;

/// Per-request log line. Probe endpoints stay at trace so idle deployments
/// do not flood the log.
pub async fn request_logging(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis();
    if matches!(path.as_str(), "/health" | "/ready") {
        trace!(target: "http", "probe client_ip={client_ip} method={method} path={path} status={status} duration_ms={duration_ms}");
    } else if status >= 400 {
        warn!(target: "http", "request rejected client_ip={client_ip} method={method} path={path} status={status} duration_ms={duration_ms}");
    } else {
        debug!(target: "http", "request client_ip={client_ip} method={method} path={path} status={status} duration_ms={duration_ms}");
    }
    response
}
