//! The orchestrating wallet service.
//!
//! Generic over the three capability seams (store, ceremony, oracle) so
//! each can be substituted with a test double. Writes happen only after
//! the full derivation/signing/encryption chain succeeds: a failed
//! operation commits no partial user or credential mutation.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use credo_auth::{
    resolve_strategy, AuthCeremony, AuthFactor, AuthStrategy, AuthenticatorCapabilities,
    MasterKey, MasterKeyRequest,
};
use credo_crypto::{decrypt_document, encrypt_document, establish_identity};
use credo_store::{CredentialRecord, IdentityRef, UserRecord, WalletStore};

use crate::disclosure::derive_disclosure;
use crate::error::WalletError;
use crate::oracle::SigningOracle;
use crate::session::Session;
use crate::signer::sign_document;

/// The wallet service: registration, login, and credential operations.
pub struct Wallet<S, C, O> {
    store: S,
    ceremony: C,
    oracle: O,
}

impl<S, C, O> Wallet<S, C, O>
where
    S: WalletStore,
    C: AuthCeremony,
    O: SigningOracle,
{
    pub fn new(store: S, ceremony: C, oracle: O) -> Self {
        Self {
            store,
            ceremony,
            oracle,
        }
    }

    /// Register a new user.
    ///
    /// Runs the create ceremony, resolves the authentication strategy
    /// from the probed capabilities (decided once, stored forever), and
    /// persists the user with no identity yet. With neither large-blob
    /// nor PRF available a fresh random fallback secret is generated and
    /// persisted. No other strategy's secret ever touches the store.
    pub async fn register(&self, name: &str) -> Result<UserRecord, WalletError> {
        let attestation = self.ceremony.create(name).await.map_err(|e| {
            warn!(name, error = %e, "registration ceremony failed");
            e
        })?;

        let capabilities = AuthenticatorCapabilities::from_outputs(&attestation.outputs);
        let strategy = resolve_strategy(&capabilities);
        let factor = match strategy {
            AuthStrategy::LargeBlob => AuthFactor::LargeBlob,
            AuthStrategy::Prf => AuthFactor::Prf,
            AuthStrategy::None => AuthFactor::None {
                fallback_secret: MasterKey::generate()?,
            },
        };

        let user = UserRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            credential_id: attestation.credential_id,
            factor,
            identity: None,
            last_seen: Utc::now(),
        };
        self.store.add_user(&user).await?;

        info!(user = %user.id, ?strategy, "registered user");
        Ok(user)
    }

    /// Authenticate a user and open a session.
    ///
    /// Re-materializes the master key through the get ceremony, derives
    /// the signing identity from it, and persists the minted identity on
    /// the first successful login only. The user record is written
    /// once, after everything succeeded.
    pub async fn login(&self, user_id: Uuid) -> Result<Session, WalletError> {
        let mut user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(WalletError::UserNotFound(user_id))?;

        let request = MasterKeyRequest::for_factor(&user.factor, user.identity_established())?;
        let assertion = self
            .ceremony
            .get(&user.credential_id, request.extension.clone())
            .await
            .map_err(|e| {
                warn!(user = %user.id, error = %e, "login ceremony failed");
                e
            })?;
        let master_key = request.materialize(&user.factor, &assertion.outputs)?;

        let key_pair = establish_identity(master_key.as_bytes())
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        let identity = match user.identity.clone() {
            Some(existing) => {
                // The controller, once set, is immutable; a mismatch means
                // the authenticator produced a different master secret
                if existing.controller != key_pair.controller {
                    return Err(WalletError::InvalidState(format!(
                        "derived controller {} does not match established controller {}",
                        key_pair.controller, existing.controller
                    )));
                }
                existing
            }
            None => {
                let minted = IdentityRef {
                    identifier: key_pair.identifier.clone(),
                    controller: key_pair.controller.clone(),
                };
                user.identity = Some(minted.clone());
                info!(user = %user.id, controller = %minted.controller, "identity established");
                minted
            }
        };

        user.last_seen = Utc::now();
        self.store.put_user(&user).await?;

        debug!(user = %user.id, "session opened");
        Ok(Session::new(user.id, master_key, identity, key_pair))
    }

    /// Sign, encrypt, and persist a credential document.
    ///
    /// The record is written only after both signing and encryption
    /// succeed.
    pub async fn issue_credential(
        &self,
        session: &Session,
        document: &Value,
    ) -> Result<CredentialRecord, WalletError> {
        let signed = sign_document(&self.oracle, session.key_pair(), document).await?;
        let encrypted = encrypt_document(&signed, session.master_key().as_bytes())
            .map_err(WalletError::encryption)?;

        let record = CredentialRecord {
            id: Uuid::new_v4(),
            owner_id: session.user_id(),
            document: encrypted,
        };
        self.store.add_credential(&record).await?;

        info!(user = %session.user_id(), credential = %record.id, "issued credential");
        Ok(record)
    }

    /// Decrypt a stored credential to a transient in-memory copy.
    ///
    /// The decrypted document is never written back; every view
    /// re-derives it from the persisted encrypted state.
    pub async fn view_credential(
        &self,
        session: &Session,
        credential_id: Uuid,
    ) -> Result<Value, WalletError> {
        let record = self.load_owned_credential(session, credential_id).await?;
        decrypt_document(&record.document, session.master_key().as_bytes())
            .map_err(WalletError::decryption)
    }

    /// Derive a selective-disclosure proof for a stored credential.
    ///
    /// Decrypts to a transient copy, then reduces it to the pointed
    /// fields (plus the mandatory issuer fields). Nothing is persisted.
    pub async fn share_credential(
        &self,
        session: &Session,
        credential_id: Uuid,
        pointers: &[String],
    ) -> Result<Value, WalletError> {
        let decrypted = self.view_credential(session, credential_id).await?;
        let revealed = derive_disclosure(&self.oracle, &decrypted, pointers).await?;
        info!(user = %session.user_id(), credential = %credential_id, "derived disclosure proof");
        Ok(revealed)
    }

    /// Resolve a did:key identifier through the oracle.
    pub async fn resolve_identity(&self, identifier: &str) -> Result<Value, WalletError> {
        self.oracle
            .resolve(identifier)
            .await
            .map_err(|e| WalletError::Resolution(e.to_string()))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, WalletError> {
        Ok(self.store.get_user(user_id).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>, WalletError> {
        Ok(self.store.list_users().await?)
    }

    pub async fn list_credentials(
        &self,
        session: &Session,
    ) -> Result<Vec<CredentialRecord>, WalletError> {
        Ok(self
            .store
            .list_credentials_by_owner(session.user_id())
            .await?)
    }

    pub async fn delete_credential(
        &self,
        session: &Session,
        credential_id: Uuid,
    ) -> Result<(), WalletError> {
        self.load_owned_credential(session, credential_id).await?;
        self.store.delete_credential(credential_id).await?;
        info!(user = %session.user_id(), credential = %credential_id, "deleted credential");
        Ok(())
    }

    /// Delete a user and all of its credentials, all-or-nothing.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), WalletError> {
        self.store.delete_user_cascade(user_id).await?;
        info!(user = %user_id, "deleted user and owned credentials");
        Ok(())
    }

    async fn load_owned_credential(
        &self,
        session: &Session,
        credential_id: Uuid,
    ) -> Result<CredentialRecord, WalletError> {
        let record = self
            .store
            .get_credential(credential_id)
            .await?
            .ok_or(WalletError::CredentialNotFound(credential_id))?;
        // A credential belonging to another user is indistinguishable
        // from a missing one
        if record.owner_id != session.user_id() {
            return Err(WalletError::CredentialNotFound(credential_id));
        }
        Ok(record)
    }
}
