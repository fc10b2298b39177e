//! Store capability for the credo wallet.
//!
//! The wallet consumes a keyed record store for users and credentials
//! with one secondary index (credentials by owner) and a single
//! multi-record atomic operation: cascading user deletion. The real
//! persistent backend is an external collaborator; [`MemoryStore`] is the
//! in-memory reference implementation used by tests and local-first
//! defaults.

mod error;
mod memory;
mod traits;
mod types;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::WalletStore;
pub use types::{CredentialRecord, IdentityRef, UserRecord};
