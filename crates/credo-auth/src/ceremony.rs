//! Authentication ceremony capability.
//!
//! The browser (or platform) mediates the actual biometric/PIN
//! interaction; this wallet only consumes the structured extension
//! outputs. An abandoned or rejected ceremony yields a single terminal
//! error for that attempt; retries are always new user-initiated calls.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ExtensionOutputs, ExtensionRequest};

#[derive(Debug, Error)]
pub enum CeremonyError {
    #[error("Authentication ceremony cancelled by the user")]
    Cancelled,

    #[error("Authentication ceremony timed out")]
    Timeout,

    #[error("No compatible authenticator available")]
    NoAuthenticator,

    #[error("Authentication ceremony failed: {0}")]
    Failed(String),
}

/// Result of a registration (create) ceremony.
#[derive(Debug, Clone)]
pub struct CeremonyAttestation {
    /// Authenticator-bound credential identifier.
    pub credential_id: Vec<u8>,
    pub outputs: ExtensionOutputs,
}

/// Result of a login (get) ceremony.
#[derive(Debug, Clone)]
pub struct CeremonyAssertion {
    pub outputs: ExtensionOutputs,
}

/// External authentication ceremony, suspended on user interaction.
///
/// `create` registers a new resident credential for `user_name` and
/// always probes large-blob and PRF support. `get` asserts an existing
/// credential with exactly one extension request.
#[async_trait]
pub trait AuthCeremony: Send + Sync {
    async fn create(&self, user_name: &str) -> Result<CeremonyAttestation, CeremonyError>;

    async fn get(
        &self,
        credential_id: &[u8],
        extension: ExtensionRequest,
    ) -> Result<CeremonyAssertion, CeremonyError>;
}
