use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use credo_crypto::{base64url_decode, base64url_encode, MASTER_KEY_LENGTH};

use crate::error::AuthError;

/// The raw 32-byte master secret every other key descends from.
///
/// Zeroized on drop; `Debug` never prints the bytes. Serialized as
/// base64url, but the only place a master key is ever persisted is the
/// fallback secret inside [`AuthFactor::None`].
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; MASTER_KEY_LENGTH]);

impl MasterKey {
    /// Generate a fresh random master key.
    pub fn generate() -> Result<Self, AuthError> {
        let mut bytes = [0u8; MASTER_KEY_LENGTH];
        getrandom::getrandom(&mut bytes).map_err(|e| AuthError::RngFailed(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Wrap existing key material; must be exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        let bytes: [u8; MASTER_KEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| AuthError::InvalidMasterKeyLength {
                    expected: MASTER_KEY_LENGTH,
                    got: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; MASTER_KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

impl Serialize for MasterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64url_encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for MasterKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = base64url_decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Which authenticator extension supplies the master secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
    LargeBlob,
    Prf,
    None,
}

/// The user's authentication factor, keyed by strategy.
///
/// Only the degraded `None` strategy carries a persisted secret: with no
/// hardware-bound storage or PRF available there is nothing else to anchor
/// the identity to. The other variants make a stored secret
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum AuthFactor {
    LargeBlob,
    Prf,
    None { fallback_secret: MasterKey },
}

impl AuthFactor {
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            AuthFactor::LargeBlob => AuthStrategy::LargeBlob,
            AuthFactor::Prf => AuthStrategy::Prf,
            AuthFactor::None { .. } => AuthStrategy::None,
        }
    }
}

/// What the authenticator advertised during registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthenticatorCapabilities {
    pub large_blob_supported: bool,
    pub prf_enabled: bool,
}

impl AuthenticatorCapabilities {
    /// Read capabilities out of a registration ceremony's extension outputs.
    pub fn from_outputs(outputs: &ExtensionOutputs) -> Self {
        Self {
            large_blob_supported: outputs
                .large_blob
                .as_ref()
                .is_some_and(|lb| lb.supported),
            prf_enabled: outputs.prf.as_ref().is_some_and(|prf| prf.enabled),
        }
    }
}

/// Extension request attached to a ceremony invocation.
///
/// Closed set of the shapes this wallet ever sends; one is chosen per
/// call, never combined.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionRequest {
    /// Registration: probe large-blob support ("preferred") and PRF.
    CapabilityProbe,
    /// First large-blob login: write the freshly generated master key.
    LargeBlobWrite { blob: MasterKey },
    /// Subsequent large-blob logins: read the stored blob back.
    LargeBlobRead,
    /// PRF logins: evaluate the authenticator PRF over a fixed input.
    PrfEval { input: Vec<u8> },
    /// Fallback strategy: no extension.
    None,
}

/// Large-blob extension outputs from a ceremony.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeBlobOutputs {
    /// Registration only: whether the authenticator supports large blobs.
    #[serde(default)]
    pub supported: bool,
    /// Read result, when a read was requested and succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<Vec<u8>>,
    /// Write acknowledgement, when a write was requested.
    #[serde(default)]
    pub written: bool,
}

/// PRF extension outputs from a ceremony.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrfOutputs {
    /// Registration only: whether the authenticator PRF is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Evaluation result for the first PRF input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Vec<u8>>,
}

/// Structured extension outputs of one ceremony invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionOutputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_blob: Option<LargeBlobOutputs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<PrfOutputs>,
}
