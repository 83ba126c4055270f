use std::net::SocketAddr;

use crate::domain::MintSigner;
use crate::foundation::EthAddress;
use crate::infrastructure::config::types::AppConfig;

impl AppConfig {
    /// Startup validation. Returns all problems at once so operators can fix
    /// a config in one pass.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.chain.rpc_url.trim().is_empty() {
            errors.push("chain.rpc_url must be set".to_string());
        }
        if !self.chain.contract_address.trim().is_empty()
            && self.chain.contract_address.parse::<EthAddress>().is_err()
        {
            errors.push(format!("invalid chain.contract_address: {}", self.chain.contract_address));
        }

        // Parse-check only; the key itself never appears in an error.
        if MintSigner::from_key_hex(&self.signer.signing_key_hex).is_err() {
            errors.push("signer.signing_key_hex must be 32 bytes of hex".to_string());
        }

        if self.http.listen_addr.parse::<SocketAddr>().is_err() {
            errors.push(format!("invalid http.listen_addr: {}", self.http.listen_addr));
        }
        if let Some(token) = self.http.admin_token.as_deref() {
            if token.trim().is_empty() {
                errors.push("http.admin_token must not be blank when set".to_string());
            }
        }

        if self.reconciler.poll_secs == 0 {
            errors.push("reconciler.poll_secs must be > 0".to_string());
        }
        if self.reconciler.pending_timeout_secs == Some(0) {
            errors.push("reconciler.pending_timeout_secs must be > 0 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
