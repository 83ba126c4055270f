use crate::cli::Cli;
use log::{info, warn};
use mintsig_core::domain::MintSigner;
use mintsig_core::foundation::MintError;
use mintsig_core::infrastructure::config::{AppConfig, SignerConfig, StorageBackend, StorageConfig};
use mintsig_core::infrastructure::storage::{MemoryRequestStore, RequestStore, RocksRequestStore};
use std::sync::Arc;

pub fn init_logging(level: &str) -> Result<(), MintError> {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .map_err(|err| MintError::Message(err.to_string()))?;
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_thread_ids(true).try_init();
    Ok(())
}

/// Loads and validates the configuration. Validation failures are fatal at
/// startup; a misconfigured signer must never begin serving.
pub fn load_config(args: &Cli) -> Result<AppConfig, MintError> {
    let config = match &args.config {
        Some(path) => mintsig_core::infrastructure::config::load_config_from_file(path, &args.data_dir)?,
        None => mintsig_core::infrastructure::config::load_config(&args.data_dir)?,
    };
    if let Err(errors) = config.validate() {
        for err in &errors {
            warn!("config validation error: {err}");
        }
        return Err(MintError::ConfigError(format!("{} validation error(s), refusing to start", errors.len())));
    }
    Ok(config)
}

pub fn init_storage(config: &StorageConfig) -> Result<Arc<dyn RequestStore>, MintError> {
    match config.backend {
        StorageBackend::Rocks => {
            let store = RocksRequestStore::open_in_dir(&config.data_dir)?;
            info!("rocks storage initialized data_dir={}", config.data_dir);
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            warn!("memory storage backend selected; requests will not survive a restart");
            Ok(Arc::new(MemoryRequestStore::new()))
        }
    }
}

/// Builds the signer from config. Logs the derived address, never the key.
pub fn init_signer(config: &SignerConfig) -> Result<MintSigner, MintError> {
    let signer = MintSigner::from_key_hex(&config.signing_key_hex)?;
    info!("signer initialized address={:#x}", signer.address());
    Ok(signer)
}
