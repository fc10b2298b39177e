//! Deterministic signing identity derived from the master secret.
//!
//! The same master secret always yields the same P-256 keypair and the
//! same did:key strings, so the wallet never has to persist private key
//! material; identity continuity rests entirely on the authenticator.
//!
//! did:key format: `did:key:z<base58btc(varint(0x1200) || compressed SEC1 point)>`
//! where 0x1200 is the multicodec for a P-256 public key.

use ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use serde_json::Value;
use zeroize::Zeroize;

use crate::base64url::base64url_encode;
use crate::error::CryptoError;
use crate::hkdf::derive_key_32;

/// Domain tag for deriving the signing seed from the master secret.
///
/// Keeps the signing path separated from the `encryption_key` derivation;
/// the two scoped keys share nothing but the master secret.
const SIGNING_KEY_TAG: &str = "signing_key";

/// Multicodec prefix for a P-256 public key.
const P256_MULTICODEC: u32 = 0x1200;

/// A deterministic signing identity: keypair plus its public did:key strings.
///
/// Never persisted; recomputed from the master secret at every login.
/// Only `identifier` and `controller` are written to the user record.
#[derive(Debug)]
pub struct IdentityKeyPair {
    signing_key: SigningKey,
    /// Verification-method reference: `{controller}#{fragment}`.
    pub identifier: String,
    /// The holder's stable public identity: `did:key:z…`.
    pub controller: String,
}

impl IdentityKeyPair {
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Public key as a JWK value, for resolver implementations.
    pub fn public_key_jwk(&self) -> Value {
        export_public_key_jwk(self.verifying_key())
    }
}

/// Derive the signing identity from a master secret.
///
/// Deterministic: the same master secret yields the same keypair,
/// controller, and identifier. Called at most once per user per login;
/// the wallet gates persistence of the result to a single invocation.
pub fn establish_identity(master_key: &[u8]) -> Result<IdentityKeyPair, CryptoError> {
    let mut seed = derive_key_32(master_key, SIGNING_KEY_TAG);
    let signing_key = SigningKey::from_slice(&seed)
        .map_err(|e| CryptoError::InvalidSigningSeed(e.to_string()))?;
    seed.zeroize();

    let multibase = multibase_p256(signing_key.verifying_key());
    let controller = format!("did:key:{}", multibase);
    let identifier = format!("{}#{}", controller, multibase);

    Ok(IdentityKeyPair {
        signing_key,
        identifier,
        controller,
    })
}

/// Encode a P-256 public key as a did:key string.
pub fn encode_did_key(key: &VerifyingKey) -> String {
    format!("did:key:{}", multibase_p256(key))
}

/// Multibase (base58btc) encoding of varint(0x1200) || compressed point.
fn multibase_p256(key: &VerifyingKey) -> String {
    let compressed = key.to_encoded_point(true);
    let varint = varint_encode(P256_MULTICODEC);
    let mut payload = Vec::with_capacity(varint.len() + compressed.as_bytes().len());
    payload.extend_from_slice(&varint);
    payload.extend_from_slice(compressed.as_bytes());
    format!("z{}", bs58::encode(&payload).into_string())
}

/// Decode a `did:key:z…` string back to a P-256 public key.
pub fn decode_did_key(did: &str) -> Result<VerifyingKey, CryptoError> {
    let encoded = did
        .strip_prefix("did:key:z")
        .ok_or_else(|| CryptoError::InvalidDidKey("expected did:key:z prefix".to_string()))?;

    let payload = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| CryptoError::InvalidDidKey(format!("base58 decode: {}", e)))?;

    let (codec, varint_len) = varint_decode(&payload)?;
    if codec != P256_MULTICODEC {
        return Err(CryptoError::InvalidDidKey(format!(
            "expected P-256 multicodec 0x{:04x}, got 0x{:04x}",
            P256_MULTICODEC, codec
        )));
    }

    let compressed = &payload[varint_len..];
    if compressed.len() != 33 {
        return Err(CryptoError::InvalidDidKey(format!(
            "expected 33-byte compressed point, got {}",
            compressed.len()
        )));
    }

    VerifyingKey::from_sec1_bytes(compressed)
        .map_err(|e| CryptoError::InvalidDidKey(format!("P-256 point: {}", e)))
}

/// Export a P-256 verifying key to public JWK format.
pub fn export_public_key_jwk(key: &VerifyingKey) -> Value {
    let point = key.to_encoded_point(false);
    let x = base64url_encode(point.x().expect("uncompressed point has x").as_slice());
    let y = base64url_encode(point.y().expect("uncompressed point has y").as_slice());

    serde_json::json!({
        "kty": "EC",
        "crv": "P-256",
        "x": x,
        "y": y,
    })
}

/// Sign a message with ECDSA P-256 + SHA-256.
///
/// # Returns
/// 64-byte IEEE P1363 signature (r || s)
pub fn sign(key: &SigningKey, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let signature: Signature = key
        .try_sign(message)
        .map_err(|e| CryptoError::InvalidSigningSeed(e.to_string()))?;
    Ok(signature.to_bytes().to_vec())
}

/// Verify an ECDSA P-256 + SHA-256 signature.
///
/// Returns false on any invalid input; never errors.
pub fn verify(key: &VerifyingKey, message: &[u8], signature_bytes: &[u8]) -> bool {
    match Signature::from_slice(signature_bytes) {
        Ok(signature) => key.verify(message, &signature).is_ok(),
        Err(_) => false,
    }
}

/// Encode an unsigned integer as a varint (unsigned LEB128).
fn varint_encode(mut n: u32) -> Vec<u8> {
    if n == 0 {
        return vec![0];
    }
    let mut bytes = Vec::new();
    while n > 0 {
        let mut byte = (n & 0x7f) as u8;
        n >>= 7;
        if n > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
    bytes
}

/// Decode an unsigned varint (LEB128). Returns (value, bytes_consumed).
fn varint_decode(bytes: &[u8]) -> Result<(u32, usize), CryptoError> {
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if shift >= 32 {
            return Err(CryptoError::InvalidDidKey("varint overflow".to_string()));
        }
        value |= ((byte & 0x7f) as u32) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(CryptoError::InvalidDidKey("truncated varint".to_string()))
}
