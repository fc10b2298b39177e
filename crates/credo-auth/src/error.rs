use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No master key available from the ceremony's extension results")]
    NoMasterKeyAvailable,

    #[error("Invalid master key length: expected {expected} bytes, got {got}")]
    InvalidMasterKeyLength { expected: usize, got: usize },

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}
