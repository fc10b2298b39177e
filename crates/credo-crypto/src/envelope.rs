//! Field-level envelope encryption for credential documents.
//!
//! Envelope wire shape:
//! `{"type": "EncryptedData", "encryptionAlgorithm": "AES-GCM",
//!   "ciphertext": base64url([IV:12][ciphertext+tag])}`
//!
//! Only the top-level `proof`, `credentialSubject`, and `issuer` fields are
//! ever enveloped; a field can be toggled between protected and plaintext
//! without changing the document schema.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base64url::{base64url_decode, base64url_encode};
use crate::error::CryptoError;
use crate::hkdf::derive_key_32;
use crate::types::{
    AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH, ENCRYPTED_FIELD_KIND,
    ENCRYPTION_ALGORITHM, PROTECTED_FIELDS,
};

/// Domain tag for deriving the symmetric envelope key from the master secret.
const ENCRYPTION_KEY_TAG: &str = "encryption_key";

/// An encrypted credential field as persisted inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    /// Envelope tag, always `"EncryptedData"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// AEAD algorithm identifier, always `"AES-GCM"`.
    #[serde(rename = "encryptionAlgorithm")]
    pub algorithm: String,
    /// base64url of IV || ciphertext || tag.
    pub ciphertext: String,
}

/// Derive the symmetric envelope key from the master secret.
///
/// Recomputed on every operation; never persisted.
pub fn derive_encryption_key(master_key: &[u8]) -> [u8; AES_KEY_LENGTH] {
    derive_key_32(master_key, ENCRYPTION_KEY_TAG)
}

/// Generate a random 96-bit IV. Fresh per encryption call.
fn generate_iv() -> Result<[u8; AES_GCM_IV_LENGTH], CryptoError> {
    let mut iv = [0u8; AES_GCM_IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// Encrypt a single JSON value into an envelope.
pub fn encrypt_field(value: &Value, key: &[u8]) -> Result<EncryptedField, CryptoError> {
    if key.len() != AES_KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength {
            expected: AES_KEY_LENGTH,
            got: key.len(),
        });
    }
    let plaintext =
        serde_json::to_vec(value).map_err(|e| CryptoError::SerializationError(e.to_string()))?;

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let iv = generate_iv()?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_slice())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut envelope = Vec::with_capacity(iv.len() + ciphertext.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&ciphertext);

    Ok(EncryptedField {
        kind: ENCRYPTED_FIELD_KIND.to_string(),
        algorithm: ENCRYPTION_ALGORITHM.to_string(),
        ciphertext: base64url_encode(&envelope),
    })
}

/// Decrypt an envelope back to the original JSON value.
///
/// Fails on tag mismatch, truncated payloads, or a malformed envelope.
pub fn decrypt_field(field: &EncryptedField, key: &[u8]) -> Result<Value, CryptoError> {
    if field.kind != ENCRYPTED_FIELD_KIND {
        return Err(CryptoError::NotAnEnvelope);
    }
    if field.algorithm != ENCRYPTION_ALGORITHM {
        return Err(CryptoError::UnsupportedAlgorithm(field.algorithm.clone()));
    }
    if key.len() != AES_KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength {
            expected: AES_KEY_LENGTH,
            got: key.len(),
        });
    }

    let envelope =
        base64url_decode(&field.ciphertext).map_err(|e| CryptoError::Base64Decode(e.to_string()))?;
    if envelope.len() < AES_GCM_IV_LENGTH + AES_GCM_TAG_LENGTH {
        return Err(CryptoError::EnvelopeTooShort);
    }

    let iv = &envelope[..AES_GCM_IV_LENGTH];
    let ciphertext = &envelope[AES_GCM_IV_LENGTH..];

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    serde_json::from_slice(&plaintext)
        .map_err(|e| CryptoError::DecryptionFailed(format!("plaintext is not JSON: {}", e)))
}

/// True if a JSON value carries the encrypted envelope tag.
pub fn is_encrypted_field(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(ENCRYPTED_FIELD_KIND)
}

/// Envelope the protected fields of a credential document.
///
/// `proof`, `credentialSubject`, and `issuer` are encrypted when present;
/// every other field is returned untouched.
pub fn encrypt_document(document: &Value, master_key: &[u8]) -> Result<Value, CryptoError> {
    let key = derive_encryption_key(master_key);
    let mut doc = document.clone();
    if let Some(obj) = doc.as_object_mut() {
        for field in PROTECTED_FIELDS {
            let Some(value) = obj.get(*field).cloned() else {
                continue;
            };
            let envelope = encrypt_field(&value, &key)?;
            let wrapped = serde_json::to_value(envelope)
                .map_err(|e| CryptoError::SerializationError(e.to_string()))?;
            obj.insert((*field).to_string(), wrapped);
        }
    }
    Ok(doc)
}

/// Exact inverse of [`encrypt_document`]; idempotent.
///
/// A protected field without the envelope tag is already plaintext and
/// passes through unchanged.
pub fn decrypt_document(document: &Value, master_key: &[u8]) -> Result<Value, CryptoError> {
    let key = derive_encryption_key(master_key);
    let mut doc = document.clone();
    if let Some(obj) = doc.as_object_mut() {
        for field in PROTECTED_FIELDS {
            let Some(value) = obj.get(*field).cloned() else {
                continue;
            };
            if !is_encrypted_field(&value) {
                continue;
            }
            let envelope: EncryptedField = serde_json::from_value(value)
                .map_err(|e| CryptoError::DecryptionFailed(format!("malformed envelope: {}", e)))?;
            let plain = decrypt_field(&envelope, &key)?;
            obj.insert((*field).to_string(), plain);
        }
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn random_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        getrandom::getrandom(&mut key).unwrap();
        key
    }

    fn sample_document() -> Value {
        json!({
            "id": "urn:uuid:0b1f5e2c",
            "type": ["VerifiableCredential"],
            "name": "Employment Credential",
            "issuanceDate": "2024-05-01T00:00:00Z",
            "issuer": {
                "id": "did:key:zExample",
                "type": "Profile",
                "name": "Example Corp"
            },
            "credentialSubject": {
                "id": "did:key:zHolder",
                "jobTitle": "Engineer"
            },
            "proof": {
                "type": "DataIntegrityProof",
                "proofValue": "u3q2-7w"
            }
        })
    }

    // ------------------------------------------------------------------
    // encrypt_field / decrypt_field
    // ------------------------------------------------------------------

    #[test]
    fn field_round_trip() {
        let key = random_key();
        let value = json!({"name": "Alice", "over18": true});
        let envelope = encrypt_field(&value, &key).unwrap();
        assert_eq!(envelope.kind, ENCRYPTED_FIELD_KIND);
        assert_eq!(envelope.algorithm, ENCRYPTION_ALGORITHM);
        assert_eq!(decrypt_field(&envelope, &key).unwrap(), value);
    }

    #[test]
    fn fresh_iv_each_call() {
        let key = random_key();
        let value = json!("same plaintext");
        let a = encrypt_field(&value, &key).unwrap();
        let b = encrypt_field(&value, &key).unwrap();
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_eq!(decrypt_field(&a, &key).unwrap(), value);
        assert_eq!(decrypt_field(&b, &key).unwrap(), value);
    }

    #[test]
    fn wrong_key_fails() {
        let envelope = encrypt_field(&json!("secret"), &random_key()).unwrap();
        assert!(decrypt_field(&envelope, &random_key()).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = random_key();
        let mut envelope = encrypt_field(&json!("secret"), &key).unwrap();
        let mut bytes = base64url_decode(&envelope.ciphertext).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        envelope.ciphertext = base64url_encode(&bytes);
        assert!(decrypt_field(&envelope, &key).is_err());
    }

    #[test]
    fn truncated_envelope_fails() {
        let key = random_key();
        let envelope = EncryptedField {
            kind: ENCRYPTED_FIELD_KIND.to_string(),
            algorithm: ENCRYPTION_ALGORITHM.to_string(),
            ciphertext: base64url_encode(&[0u8; 10]),
        };
        let err = decrypt_field(&envelope, &key).unwrap_err();
        assert!(matches!(err, CryptoError::EnvelopeTooShort));
    }

    #[test]
    fn bad_base64_fails() {
        let key = random_key();
        let envelope = EncryptedField {
            kind: ENCRYPTED_FIELD_KIND.to_string(),
            algorithm: ENCRYPTION_ALGORITHM.to_string(),
            ciphertext: "!!!not-base64!!!".to_string(),
        };
        assert!(decrypt_field(&envelope, &key).is_err());
    }

    #[test]
    fn unknown_algorithm_fails() {
        let key = random_key();
        let mut envelope = encrypt_field(&json!("x"), &key).unwrap();
        envelope.algorithm = "AES-CBC".to_string();
        let err = decrypt_field(&envelope, &key).unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedAlgorithm(_)));
    }

    #[test]
    fn wrong_key_length_rejected() {
        assert!(encrypt_field(&json!("x"), &[0u8; 16]).is_err());
    }

    // ------------------------------------------------------------------
    // encrypt_document / decrypt_document
    // ------------------------------------------------------------------

    #[test]
    fn document_round_trip() {
        let master = random_key();
        let doc = sample_document();
        let encrypted = encrypt_document(&doc, &master).unwrap();
        assert!(is_encrypted_field(&encrypted["proof"]));
        assert!(is_encrypted_field(&encrypted["credentialSubject"]));
        assert!(is_encrypted_field(&encrypted["issuer"]));
        let decrypted = decrypt_document(&encrypted, &master).unwrap();
        assert_eq!(decrypted, doc);
    }

    #[test]
    fn unprotected_fields_untouched() {
        let master = random_key();
        let doc = sample_document();
        let encrypted = encrypt_document(&doc, &master).unwrap();
        assert_eq!(encrypted["id"], doc["id"]);
        assert_eq!(encrypted["type"], doc["type"]);
        assert_eq!(encrypted["name"], doc["name"]);
        assert_eq!(encrypted["issuanceDate"], doc["issuanceDate"]);
    }

    #[test]
    fn partial_protected_set_round_trips() {
        let master = random_key();
        // No proof and no issuer, so only credentialSubject gets enveloped
        let doc = json!({
            "id": "urn:uuid:1",
            "credentialSubject": {"id": "did:key:zHolder"}
        });
        let encrypted = encrypt_document(&doc, &master).unwrap();
        assert!(is_encrypted_field(&encrypted["credentialSubject"]));
        assert!(encrypted.get("proof").is_none());
        assert_eq!(decrypt_document(&encrypted, &master).unwrap(), doc);
    }

    #[test]
    fn decrypt_is_idempotent_on_plaintext() {
        let master = random_key();
        let doc = sample_document();
        // Never encrypted, so decryption is a no-op
        let once = decrypt_document(&doc, &master).unwrap();
        assert_eq!(once, doc);
        // Decrypting twice is also a no-op
        let encrypted = encrypt_document(&doc, &master).unwrap();
        let decrypted = decrypt_document(&encrypted, &master).unwrap();
        let twice = decrypt_document(&decrypted, &master).unwrap();
        assert_eq!(twice, doc);
    }

    #[test]
    fn field_order_preserved() {
        let master = random_key();
        let doc = sample_document();
        let round_tripped = decrypt_document(&encrypt_document(&doc, &master).unwrap(), &master)
            .unwrap();
        let original_keys: Vec<_> = doc.as_object().unwrap().keys().collect();
        let result_keys: Vec<_> = round_tripped.as_object().unwrap().keys().collect();
        assert_eq!(original_keys, result_keys);
    }

    #[test]
    fn derived_key_is_deterministic_and_tagged() {
        let master = random_key();
        assert_eq!(derive_encryption_key(&master), derive_encryption_key(&master));
        // The envelope key is not the master key itself
        assert_ne!(derive_encryption_key(&master), master);
    }

    #[test]
    fn wrong_master_key_fails_document_decrypt() {
        let doc = sample_document();
        let encrypted = encrypt_document(&doc, &random_key()).unwrap();
        assert!(decrypt_document(&encrypted, &random_key()).is_err());
    }
}
