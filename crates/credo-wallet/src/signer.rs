//! Document signing.
//!
//! Signing always runs before envelope encryption: the proof is produced
//! over plaintext content and then protected as an opaque field like any
//! other.

use serde_json::Value;

use credo_crypto::IdentityKeyPair;

use crate::error::WalletError;
use crate::oracle::SigningOracle;

/// Attach a fresh integrity proof to a credential document.
///
/// Any existing `proof` is stripped first so re-signing never signs over
/// a stale proof.
pub async fn sign_document<O: SigningOracle + ?Sized>(
    oracle: &O,
    key_pair: &IdentityKeyPair,
    document: &Value,
) -> Result<Value, WalletError> {
    let unsigned = strip_proof(document);
    oracle
        .sign(&unsigned, key_pair)
        .await
        .map_err(|e| WalletError::Signing(e.to_string()))
}

fn strip_proof(document: &Value) -> Value {
    let mut unsigned = document.clone();
    if let Some(obj) = unsigned.as_object_mut() {
        obj.remove("proof");
    }
    unsigned
}
