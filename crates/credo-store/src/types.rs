use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use credo_auth::AuthFactor;

/// The public identity strings minted at first login.
///
/// Written exactly once per user; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRef {
    /// Verification-method reference (`did:key:z…#z…`).
    pub identifier: String,
    /// The holder's stable controller (`did:key:z…`).
    pub controller: String,
}

/// A wallet user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    /// Authenticator-bound credential identifier from registration.
    pub credential_id: Vec<u8>,
    /// Strategy-keyed authentication factor; only the degraded fallback
    /// variant carries a persisted secret.
    pub factor: AuthFactor,
    /// Set at first successful login, never changed after.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityRef>,
    pub last_seen: DateTime<Utc>,
}

impl UserRecord {
    pub fn identity_established(&self) -> bool {
        self.identity.is_some()
    }
}

/// A stored credential document, always signed and envelope-encrypted
/// before first persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: Uuid,
    /// Secondary index key: the owning user.
    pub owner_id: Uuid,
    pub document: Value,
}
