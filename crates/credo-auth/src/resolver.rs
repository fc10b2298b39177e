//! Strategy resolution and master-key materialization.
//!
//! Resolution happens once, at registration: large-blob if the
//! authenticator advertises it, else PRF, else the persisted fallback.
//! Every login then builds one extension request from the stored factor
//! and turns the ceremony's outputs back into the master key.

use crate::error::AuthError;
use crate::types::{
    AuthFactor, AuthStrategy, AuthenticatorCapabilities, ExtensionOutputs, ExtensionRequest,
    MasterKey,
};

/// Fixed PRF evaluation input. Domain-separates this wallet's master-key
/// derivation from any other PRF use of the same credential.
pub const PRF_CONTEXT: &[u8] = b"credo:master-key:v1";

/// Pick the authentication strategy from registration capabilities.
///
/// Decided exactly once per user and stored on the record; logins never
/// re-probe.
pub fn resolve_strategy(capabilities: &AuthenticatorCapabilities) -> AuthStrategy {
    if capabilities.large_blob_supported {
        AuthStrategy::LargeBlob
    } else if capabilities.prf_enabled {
        AuthStrategy::Prf
    } else {
        AuthStrategy::None
    }
}

/// A two-phase master-key materialization.
///
/// Phase one ([`MasterKeyRequest::for_factor`]) runs before the ceremony:
/// it builds the extension request and, on a first large-blob login,
/// generates the key material the ceremony is asked to write. Phase two
/// ([`MasterKeyRequest::materialize`]) runs after the ceremony and
/// extracts the master key from its outputs.
#[derive(Debug)]
pub struct MasterKeyRequest {
    /// Extension request to attach to the login ceremony.
    pub extension: ExtensionRequest,
    /// Key generated before the ceremony (first large-blob login only).
    pending: Option<MasterKey>,
}

impl MasterKeyRequest {
    pub fn for_factor(
        factor: &AuthFactor,
        identity_established: bool,
    ) -> Result<Self, AuthError> {
        match factor {
            AuthFactor::LargeBlob if !identity_established => {
                let master = MasterKey::generate()?;
                Ok(Self {
                    extension: ExtensionRequest::LargeBlobWrite {
                        blob: master.clone(),
                    },
                    pending: Some(master),
                })
            }
            AuthFactor::LargeBlob => Ok(Self {
                extension: ExtensionRequest::LargeBlobRead,
                pending: None,
            }),
            AuthFactor::Prf => Ok(Self {
                extension: ExtensionRequest::PrfEval {
                    input: PRF_CONTEXT.to_vec(),
                },
                pending: None,
            }),
            AuthFactor::None { .. } => Ok(Self {
                extension: ExtensionRequest::None,
                pending: None,
            }),
        }
    }

    /// Extract the master key from the ceremony's extension outputs.
    ///
    /// Branches on the stored factor:
    /// - large blob, first login: the pre-generated bytes the ceremony
    ///   was asked to write
    /// - large blob, later logins: the blob read back, or
    ///   [`AuthError::NoMasterKeyAvailable`]
    /// - PRF: the evaluation result (re-derived every login, never stored)
    /// - fallback: the persisted secret, verbatim
    pub fn materialize(
        self,
        factor: &AuthFactor,
        outputs: &ExtensionOutputs,
    ) -> Result<MasterKey, AuthError> {
        match factor {
            AuthFactor::LargeBlob => {
                if let Some(pending) = self.pending {
                    return Ok(pending);
                }
                let blob = outputs
                    .large_blob
                    .as_ref()
                    .and_then(|lb| lb.blob.as_deref())
                    .ok_or(AuthError::NoMasterKeyAvailable)?;
                MasterKey::from_bytes(blob)
            }
            AuthFactor::Prf => {
                let first = outputs
                    .prf
                    .as_ref()
                    .and_then(|prf| prf.first.as_deref())
                    .ok_or(AuthError::NoMasterKeyAvailable)?;
                MasterKey::from_bytes(first)
            }
            AuthFactor::None { fallback_secret } => Ok(fallback_secret.clone()),
        }
    }
}
