use mintsig_core::application::MintLifecycle;
use mintsig_core::infrastructure::chain::ChainReader;
use mintsig_core::infrastructure::storage::RequestStore;
use std::sync::Arc;

/// Shared handler state. `store` and `chain` back the readiness probe; all
/// mint operations go through `lifecycle`.
pub struct ApiState {
    pub lifecycle: Arc<MintLifecycle>,
    pub store: Arc<dyn RequestStore>,
    pub chain: Arc<dyn ChainReader>,
    pub admin_token: Option<String>,
}
