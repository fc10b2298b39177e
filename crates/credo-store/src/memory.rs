//! In-memory reference backend.
//!
//! All records live in `HashMap`s behind a single `parking_lot::Mutex`,
//! so the cascading user delete is trivially atomic: both tables mutate
//! under one lock or not at all. Uncontended locks are near-zero overhead
//! in the wallet's single-session model.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::traits::WalletStore;
use crate::types::{CredentialRecord, UserRecord};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserRecord>,
    credentials: HashMap<Uuid, CredentialRecord>,
}

/// In-memory [`WalletStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn add_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.users.contains_key(&user.id) {
            return Err(StoreError::DuplicateKey {
                collection: "users",
                id: user.id,
            });
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.state.lock().users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let state = self.state.lock();
        let mut users: Vec<_> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn put_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&user.id) {
            return Err(StoreError::NotFound {
                collection: "users",
                id: user.id,
            });
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user_cascade(&self, id: Uuid) -> Result<(), StoreError> {
        // One lock covers both tables, so the cascade is all-or-nothing.
        let mut state = self.state.lock();
        if state.users.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                collection: "users",
                id,
            });
        }
        state.credentials.retain(|_, cred| cred.owner_id != id);
        Ok(())
    }

    async fn add_credential(&self, credential: &CredentialRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.credentials.contains_key(&credential.id) {
            return Err(StoreError::DuplicateKey {
                collection: "credentials",
                id: credential.id,
            });
        }
        state.credentials.insert(credential.id, credential.clone());
        Ok(())
    }

    async fn get_credential(&self, id: Uuid) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.state.lock().credentials.get(&id).cloned())
    }

    async fn list_credentials_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<CredentialRecord>, StoreError> {
        let state = self.state.lock();
        let mut credentials: Vec<_> = state
            .credentials
            .values()
            .filter(|cred| cred.owner_id == owner_id)
            .cloned()
            .collect();
        credentials.sort_by_key(|cred| cred.id);
        Ok(credentials)
    }

    async fn put_credential(&self, credential: &CredentialRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if !state.credentials.contains_key(&credential.id) {
            return Err(StoreError::NotFound {
                collection: "credentials",
                id: credential.id,
            });
        }
        state.credentials.insert(credential.id, credential.clone());
        Ok(())
    }

    async fn delete_credential(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.credentials.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                collection: "credentials",
                id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use credo_auth::AuthFactor;
    use serde_json::json;

    fn user(name: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            credential_id: vec![1, 2, 3],
            factor: AuthFactor::Prf,
            identity: None,
            last_seen: Utc::now(),
        }
    }

    fn credential(owner_id: Uuid) -> CredentialRecord {
        CredentialRecord {
            id: Uuid::new_v4(),
            owner_id,
            document: json!({"id": "urn:uuid:1", "name": "Test Credential"}),
        }
    }

    #[tokio::test]
    async fn user_round_trip() {
        let store = MemoryStore::new();
        let u = user("alice");
        store.add_user(&u).await.unwrap();
        let loaded = store.get_user(u.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "alice");
        assert!(store.get_user(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_rejected() {
        let store = MemoryStore::new();
        let u = user("alice");
        store.add_user(&u).await.unwrap();
        assert!(matches!(
            store.add_user(&u).await.unwrap_err(),
            StoreError::DuplicateKey { .. }
        ));
    }

    #[tokio::test]
    async fn put_requires_existing_user() {
        let store = MemoryStore::new();
        let u = user("alice");
        assert!(matches!(
            store.put_user(&u).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        store.add_user(&u).await.unwrap();
        let mut updated = u.clone();
        updated.name = "alice2".to_string();
        store.put_user(&updated).await.unwrap();
        assert_eq!(store.get_user(u.id).await.unwrap().unwrap().name, "alice2");
    }

    #[tokio::test]
    async fn list_users_sorted_by_name() {
        let store = MemoryStore::new();
        store.add_user(&user("carol")).await.unwrap();
        store.add_user(&user("alice")).await.unwrap();
        store.add_user(&user("bob")).await.unwrap();
        let names: Vec<_> = store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn owner_index_filters() {
        let store = MemoryStore::new();
        let alice = user("alice");
        let bob = user("bob");
        store.add_user(&alice).await.unwrap();
        store.add_user(&bob).await.unwrap();
        store.add_credential(&credential(alice.id)).await.unwrap();
        store.add_credential(&credential(alice.id)).await.unwrap();
        store.add_credential(&credential(bob.id)).await.unwrap();

        assert_eq!(
            store.list_credentials_by_owner(alice.id).await.unwrap().len(),
            2
        );
        assert_eq!(
            store.list_credentials_by_owner(bob.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn cascade_delete_removes_only_owned_credentials() {
        let store = MemoryStore::new();
        let alice = user("alice");
        let bob = user("bob");
        store.add_user(&alice).await.unwrap();
        store.add_user(&bob).await.unwrap();
        store.add_credential(&credential(alice.id)).await.unwrap();
        store.add_credential(&credential(alice.id)).await.unwrap();
        let bobs = credential(bob.id);
        store.add_credential(&bobs).await.unwrap();

        store.delete_user_cascade(alice.id).await.unwrap();

        assert!(store.get_user(alice.id).await.unwrap().is_none());
        assert!(store
            .list_credentials_by_owner(alice.id)
            .await
            .unwrap()
            .is_empty());
        // Bob's record and credential survive
        assert!(store.get_user(bob.id).await.unwrap().is_some());
        assert!(store.get_credential(bobs.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn cascade_delete_missing_user_leaves_state_intact() {
        let store = MemoryStore::new();
        let alice = user("alice");
        store.add_user(&alice).await.unwrap();
        let cred = credential(alice.id);
        store.add_credential(&cred).await.unwrap();

        assert!(matches!(
            store.delete_user_cascade(Uuid::new_v4()).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(store.get_user(alice.id).await.unwrap().is_some());
        assert!(store.get_credential(cred.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_credential() {
        let store = MemoryStore::new();
        let alice = user("alice");
        store.add_user(&alice).await.unwrap();
        let cred = credential(alice.id);
        store.add_credential(&cred).await.unwrap();
        store.delete_credential(cred.id).await.unwrap();
        assert!(store.get_credential(cred.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_credential(cred.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
