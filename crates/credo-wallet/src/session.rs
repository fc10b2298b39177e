//! Explicit session handle.
//!
//! Created by a successful login, passed into every credential
//! operation, torn down on drop. There is no ambient authentication
//! state. The master key inside is zeroized when the session ends.

use uuid::Uuid;

use credo_auth::MasterKey;
use credo_crypto::IdentityKeyPair;
use credo_store::IdentityRef;

/// One authenticated session for one user.
///
/// Holding a `Session` proves identity establishment already completed:
/// login never constructs one before the identity gate has passed, which
/// is what orders identity establishment before any signing/encryption.
#[derive(Debug)]
pub struct Session {
    user_id: Uuid,
    master_key: MasterKey,
    identity: IdentityRef,
    key_pair: IdentityKeyPair,
}

impl Session {
    pub(crate) fn new(
        user_id: Uuid,
        master_key: MasterKey,
        identity: IdentityRef,
        key_pair: IdentityKeyPair,
    ) -> Self {
        Self {
            user_id,
            master_key,
            identity,
            key_pair,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn identity(&self) -> &IdentityRef {
        &self.identity
    }

    pub(crate) fn master_key(&self) -> &MasterKey {
        &self.master_key
    }

    pub(crate) fn key_pair(&self) -> &IdentityKeyPair {
        &self.key_pair
    }
}
