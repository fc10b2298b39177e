//! HKDF-SHA256 key derivation with domain-tag separation.
//!
//! Every key in the wallet descends from the authenticator-held master
//! secret through this module. The salt is a fixed 32-byte zero block;
//! independence between derived keys comes from the domain tag alone, so
//! identical (secret, tag, length) inputs always yield identical output.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::CryptoError;
use crate::types::AES_KEY_LENGTH;

/// Fixed all-zero extract salt.
const ZERO_SALT: [u8; 32] = [0u8; 32];

/// Derive `length` bytes from a secret under a domain tag.
///
/// # Arguments
/// * `secret` - Input keying material (typically the 32-byte master secret)
/// * `domain_tag` - Fixed string distinguishing this key's use
/// * `length` - Output length in bytes
///
/// # Returns
/// `length` bytes of derived key material
pub fn derive_key(secret: &[u8], domain_tag: &str, length: usize) -> Result<Vec<u8>, CryptoError> {
    let hk = Hkdf::<Sha256>::new(Some(&ZERO_SALT), secret);
    let mut okm = vec![0u8; length];
    hk.expand(domain_tag.as_bytes(), &mut okm)
        .map_err(|_| CryptoError::InvalidOutputLength(length))?;
    Ok(okm)
}

/// Derive a 256-bit key from a secret under a domain tag.
pub fn derive_key_32(secret: &[u8], domain_tag: &str) -> [u8; AES_KEY_LENGTH] {
    let hk = Hkdf::<Sha256>::new(Some(&ZERO_SALT), secret);
    let mut okm = [0u8; AES_KEY_LENGTH];
    hk.expand(domain_tag.as_bytes(), &mut okm)
        .expect("32-byte output is a valid HKDF length");
    okm
}
