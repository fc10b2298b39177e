//! Authentication-factor handling for the credo wallet.
//!
//! One authenticator-held secret backs the whole wallet. This crate
//! decides *which* authenticator extension supplies that secret
//! (large-blob storage, PRF evaluation, or a persisted fallback), builds
//! the per-login ceremony extension request, and turns the ceremony's
//! extension outputs back into the 32-byte master key.
//!
//! The browser-mediated ceremony itself (biometric/PIN interaction) is an
//! external collaborator behind the [`AuthCeremony`] trait.

mod ceremony;
mod error;
mod resolver;
mod types;

pub use ceremony::{AuthCeremony, CeremonyAssertion, CeremonyAttestation, CeremonyError};
pub use error::AuthError;
pub use resolver::{resolve_strategy, MasterKeyRequest, PRF_CONTEXT};
pub use types::{
    AuthFactor, AuthStrategy, AuthenticatorCapabilities, ExtensionRequest, ExtensionOutputs,
    LargeBlobOutputs, MasterKey, PrfOutputs,
};
