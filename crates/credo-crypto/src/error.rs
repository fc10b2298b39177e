use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Encrypted envelope too short")]
    EnvelopeTooShort,

    #[error("Not an encrypted field envelope")]
    NotAnEnvelope,

    #[error("Unsupported encryption algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Requested key length {0} exceeds HKDF output limit")]
    InvalidOutputLength(usize),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid signing seed: {0}")]
    InvalidSigningSeed(String),

    #[error("Invalid did:key: {0}")]
    InvalidDidKey(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}
