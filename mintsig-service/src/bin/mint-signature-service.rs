#[path = "mint-signature-service/cli.rs"]
mod cli;
#[path = "mint-signature-service/setup.rs"]
mod setup;

use crate::cli::Cli;
use log::{info, warn};
use mintsig_core::application::{MintLifecycle, Reconciler};
use mintsig_core::infrastructure::chain::{ChainReader, EthRpcReader};
use mintsig_service::api::{run_http_server, ApiState};
use mintsig_service::service::ReconciliationTask;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse_args();
    setup::init_logging(&args.log_level)?;
    info!("mint-signature-service starting log_level={}", args.log_level);

    let config = setup::load_config(&args)?;
    let listen_addr: SocketAddr = config.http.listen_addr.parse().map_err(|err| format!("invalid http.listen_addr: {err}"))?;
    if !config.chain.contract_address.trim().is_empty() {
        info!("verifying contract configured contract_address={}", config.chain.contract_address);
    }

    let store = setup::init_storage(&config.storage)?;
    let signer = setup::init_signer(&config.signer)?;
    let chain: Arc<dyn ChainReader> = Arc::new(EthRpcReader::connect(config.chain.rpc_url.clone(), config.chain.chain_id).await?);

    let lifecycle = Arc::new(MintLifecycle::new(store.clone(), signer));
    let reconciler = Arc::new(Reconciler::new(store.clone(), chain.clone(), config.reconciler.pending_timeout_secs));
    info!(
        "starting reconciliation poll_secs={} pending_timeout_secs={:?}",
        config.reconciler.poll_secs, config.reconciler.pending_timeout_secs
    );
    let reconciliation = ReconciliationTask::spawn(reconciler, config.reconciler.poll_secs);

    let state = Arc::new(ApiState { lifecycle, store, chain, admin_token: config.http.admin_token.clone() });
    run_http_server(listen_addr, state, shutdown_signal()).await?;

    info!("http server stopped; stopping reconciliation");
    reconciliation.shutdown().await;
    info!("mint-signature-service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("ctrl-c handler failed err={err}");
        return;
    }
    info!("shutdown signal received");
}
