//! Cryptographic core for the credo wallet.
//!
//! Everything here descends from one 32-byte master secret held by the
//! user's authenticator:
//! - `kdf` stretches it into independent scoped keys by domain tag
//! - `envelope` protects individual credential fields with AES-256-GCM
//! - `identity` turns it into a deterministic P-256 signing identity
//!   with a stable did:key controller

pub mod base64url;
pub mod envelope;
pub mod error;
pub mod hkdf;
pub mod identity;
pub mod types;

pub use base64url::{base64url_decode, base64url_encode};
pub use envelope::{
    decrypt_document, decrypt_field, derive_encryption_key, encrypt_document, encrypt_field,
    is_encrypted_field, EncryptedField,
};
pub use error::CryptoError;
pub use hkdf::{derive_key, derive_key_32};
pub use identity::{
    decode_did_key, encode_did_key, establish_identity, export_public_key_jwk, IdentityKeyPair,
};
pub use types::{
    AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH, ENCRYPTED_FIELD_KIND,
    ENCRYPTION_ALGORITHM, MASTER_KEY_LENGTH, PROTECTED_FIELDS,
};
