use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use credo_auth::{AuthError, CeremonyError};
use credo_store::StoreError;

/// Top-level error taxonomy.
///
/// Every cryptographic or ceremony failure is converted here at the
/// orchestration boundary; there are no automatic retries, each retry is
/// a new user-initiated operation.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Authentication ceremony error: {0}")]
    Ceremony(#[from] CeremonyError),

    #[error("No master key available")]
    NoMasterKey(#[from] AuthError),

    #[error("Signing failure: {0}")]
    Signing(String),

    #[error("Encryption failure: {0}")]
    Encryption(String),

    #[error("Decryption failure: {0}")]
    Decryption(String),

    #[error("Proof derivation error: {0}")]
    ProofDerivation(String),

    #[error("Identity resolution error: {0}")]
    Resolution(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Credential {0} not found")]
    CredentialNotFound(Uuid),
}

impl WalletError {
    pub(crate) fn encryption(err: impl fmt::Display) -> Self {
        WalletError::Encryption(err.to_string())
    }

    pub(crate) fn decryption(err: impl fmt::Display) -> Self {
        WalletError::Decryption(err.to_string())
    }
}
