/// AES-GCM IV length in bytes (96 bits per NIST recommendation).
pub const AES_GCM_IV_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;

/// Master secret length in bytes.
pub const MASTER_KEY_LENGTH: usize = 32;

/// Tag marking a JSON value as an encrypted field envelope.
pub const ENCRYPTED_FIELD_KIND: &str = "EncryptedData";

/// Algorithm identifier written into encrypted field envelopes.
pub const ENCRYPTION_ALGORITHM: &str = "AES-GCM";

/// Top-level credential fields that may be toggled between plaintext and
/// an encrypted envelope. Everything else stays plaintext.
pub const PROTECTED_FIELDS: &[&str] = &["proof", "credentialSubject", "issuer"];
