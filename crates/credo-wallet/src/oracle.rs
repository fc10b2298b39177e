//! Signing and derivation oracle capability.
//!
//! The BBS+ signature math and JSON-LD context resolution live outside
//! this wallet; they are consumed through this trait. Integration tests
//! substitute a deterministic fake.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use credo_crypto::IdentityKeyPair;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Proof derivation failed: {0}")]
    Derivation(String),

    #[error("Resolution failed: {0}")]
    Resolution(String),
}

/// External signing, selective-disclosure, and resolution oracle.
#[async_trait]
pub trait SigningOracle: Send + Sync {
    /// Produce an integrity proof over `unsigned` and return the signed
    /// document (with `proof` attached).
    async fn sign(
        &self,
        unsigned: &Value,
        key_pair: &IdentityKeyPair,
    ) -> Result<Value, OracleError>;

    /// Reduce a signed document to a proof revealing only the pointed
    /// fields.
    async fn derive(&self, signed: &Value, pointers: &[String]) -> Result<Value, OracleError>;

    /// Resolve a did:key identifier to its DID document.
    async fn resolve(&self, identifier: &str) -> Result<Value, OracleError>;
}
