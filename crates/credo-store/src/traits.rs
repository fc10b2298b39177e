use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{CredentialRecord, UserRecord};

/// Keyed record store for users and credentials.
///
/// One secondary index (credentials by owner) and one multi-record atomic
/// operation: [`delete_user_cascade`](WalletStore::delete_user_cascade).
/// Everything else is single-record; concurrent multi-process access to
/// the same record is out of scope.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn add_user(&self, user: &UserRecord) -> Result<(), StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn put_user(&self, user: &UserRecord) -> Result<(), StoreError>;

    /// Delete a user and every credential it owns, all-or-nothing.
    async fn delete_user_cascade(&self, id: Uuid) -> Result<(), StoreError>;

    async fn add_credential(&self, credential: &CredentialRecord) -> Result<(), StoreError>;

    async fn get_credential(&self, id: Uuid) -> Result<Option<CredentialRecord>, StoreError>;

    /// All credentials owned by `owner_id`, via the secondary index.
    async fn list_credentials_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<CredentialRecord>, StoreError>;

    async fn put_credential(&self, credential: &CredentialRecord) -> Result<(), StoreError>;

    async fn delete_credential(&self, id: Uuid) -> Result<(), StoreError>;
}

// A shared store handle is itself a store, so the wallet and other
// components can hold the same backend.
#[async_trait]
impl<T: WalletStore + ?Sized> WalletStore for std::sync::Arc<T> {
    async fn add_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        (**self).add_user(user).await
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        (**self).get_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        (**self).list_users().await
    }

    async fn put_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        (**self).put_user(user).await
    }

    async fn delete_user_cascade(&self, id: Uuid) -> Result<(), StoreError> {
        (**self).delete_user_cascade(id).await
    }

    async fn add_credential(&self, credential: &CredentialRecord) -> Result<(), StoreError> {
        (**self).add_credential(credential).await
    }

    async fn get_credential(&self, id: Uuid) -> Result<Option<CredentialRecord>, StoreError> {
        (**self).get_credential(id).await
    }

    async fn list_credentials_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<CredentialRecord>, StoreError> {
        (**self).list_credentials_by_owner(owner_id).await
    }

    async fn put_credential(&self, credential: &CredentialRecord) -> Result<(), StoreError> {
        (**self).put_credential(credential).await
    }

    async fn delete_credential(&self, id: Uuid) -> Result<(), StoreError> {
        (**self).delete_credential(id).await
    }
}
