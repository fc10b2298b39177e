//! Wallet orchestration for credo.
//!
//! Ties the capability seams together: the authentication ceremony
//! (credo-auth), the record store (credo-store), and the external
//! signing/derivation oracle. Every operation flows through an explicit
//! [`Session`] created at login; no ambient state.
//!
//! Ordering guarantee: identity establishment completes before any
//! credential signing or encryption is attempted, enforced by the
//! identity gate at login and by [`Session`] construction, never by
//! timing.

mod disclosure;
mod error;
mod oracle;
mod session;
mod signer;
mod wallet;

pub use disclosure::{derive_disclosure, MANDATORY_ISSUER_FIELDS};
pub use error::WalletError;
pub use oracle::{OracleError, SigningOracle};
pub use session::Session;
pub use signer::sign_document;
pub use wallet::Wallet;

// Oracle implementors sign with the session's identity keypair.
pub use credo_crypto::IdentityKeyPair;
