//! Selective disclosure.
//!
//! Reduces a signed, fully decrypted credential to a proof revealing only
//! the selected fields. The issuer's `id`, `type`, and `name` are always
//! revealed when present, a fixed policy the caller cannot override, so
//! a derived proof is never anonymous about who issued it.

use serde_json::Value;

use credo_crypto::is_encrypted_field;

use crate::error::WalletError;
use crate::oracle::SigningOracle;

/// Issuer fields always added to the revealed pointer set when present.
pub const MANDATORY_ISSUER_FIELDS: &[&str] = &["id", "type", "name"];

/// Derive a reduced proof revealing only the pointed fields.
///
/// Precondition: the document must be fully decrypted. A field still
/// carrying the `EncryptedData` tag is an [`WalletError::InvalidState`],
/// never silently tolerated.
pub async fn derive_disclosure<O: SigningOracle + ?Sized>(
    oracle: &O,
    document: &Value,
    pointers: &[String],
) -> Result<Value, WalletError> {
    ensure_decrypted(document)?;
    let pointers = with_mandatory_issuer_pointers(document, pointers);
    oracle
        .derive(document, &pointers)
        .await
        .map_err(|e| WalletError::ProofDerivation(e.to_string()))
}

fn ensure_decrypted(document: &Value) -> Result<(), WalletError> {
    if let Some(obj) = document.as_object() {
        for (field, value) in obj {
            if is_encrypted_field(value) {
                return Err(WalletError::InvalidState(format!(
                    "cannot derive a proof: field `{}` is still encrypted",
                    field
                )));
            }
        }
    }
    Ok(())
}

fn with_mandatory_issuer_pointers(document: &Value, pointers: &[String]) -> Vec<String> {
    let mut all = pointers.to_vec();
    if let Some(issuer) = document.get("issuer") {
        for field in MANDATORY_ISSUER_FIELDS {
            if issuer.get(*field).is_some() {
                let pointer = format!("/issuer/{}", field);
                if !all.contains(&pointer) {
                    all.push(pointer);
                }
            }
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mandatory_issuer_pointers_added() {
        let doc = json!({
            "issuer": {"id": "did:key:z1", "type": "Profile", "name": "Corp"}
        });
        let pointers = with_mandatory_issuer_pointers(&doc, &[]);
        assert_eq!(pointers, ["/issuer/id", "/issuer/type", "/issuer/name"]);
    }

    #[test]
    fn only_present_issuer_fields_added() {
        let doc = json!({"issuer": {"id": "did:key:z1"}});
        let pointers =
            with_mandatory_issuer_pointers(&doc, &["/credentialSubject/name".to_string()]);
        assert_eq!(pointers, ["/credentialSubject/name", "/issuer/id"]);
    }

    #[test]
    fn caller_supplied_issuer_pointer_not_duplicated() {
        let doc = json!({"issuer": {"id": "did:key:z1", "name": "Corp"}});
        let pointers = with_mandatory_issuer_pointers(&doc, &["/issuer/id".to_string()]);
        assert_eq!(pointers, ["/issuer/id", "/issuer/name"]);
    }

    #[test]
    fn string_issuer_adds_nothing() {
        // An issuer given as a bare identifier string has no sub-fields
        let doc = json!({"issuer": "did:key:z1"});
        assert!(with_mandatory_issuer_pointers(&doc, &[]).is_empty());
    }

    #[test]
    fn encrypted_field_is_invalid_state() {
        let doc = json!({
            "id": "urn:uuid:1",
            "credentialSubject": {
                "type": "EncryptedData",
                "encryptionAlgorithm": "AES-GCM",
                "ciphertext": "AAAA"
            }
        });
        let err = ensure_decrypted(&doc).unwrap_err();
        assert!(matches!(err, WalletError::InvalidState(_)));
    }

    #[test]
    fn plaintext_document_passes_precondition() {
        let doc = json!({
            "id": "urn:uuid:1",
            "credentialSubject": {"name": "Alice"},
            "proof": {"type": "DataIntegrityProof"}
        });
        assert!(ensure_decrypted(&doc).is_ok());
    }
}
