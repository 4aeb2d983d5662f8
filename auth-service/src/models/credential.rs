//! Credential model - password material for a user account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Password credential. One active credential per user; replaced in
/// place on password change, soft-deleted rather than removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub credential_id: Uuid,
    pub user_id: Uuid,
    pub login: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub deleted_utc: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(user_id: Uuid, login: String, password_hash: String, password_salt: String) -> Self {
        let now = Utc::now();
        Self {
            credential_id: Uuid::new_v4(),
            user_id,
            login,
            password_hash,
            password_salt,
            created_utc: now,
            updated_utc: now,
            deleted_utc: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_utc.is_some()
    }

    /// Replace the password material in place, returning the append-only
    /// history entry for the change.
    pub fn rotate_password(
        &mut self,
        new_hash: String,
        new_salt: String,
        changed_by: Uuid,
        reason: Option<String>,
    ) -> CredentialHistory {
        self.password_hash = new_hash;
        self.password_salt = new_salt;
        self.updated_utc = Utc::now();
        CredentialHistory::new(self.credential_id, changed_by, reason)
    }
}

/// Immutable log entry for a password-hash change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialHistory {
    pub history_id: Uuid,
    pub credential_id: Uuid,
    pub changed_by_user_id: Uuid,
    pub reason: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl CredentialHistory {
    pub fn new(credential_id: Uuid, changed_by_user_id: Uuid, reason: Option<String>) -> Self {
        Self {
            history_id: Uuid::new_v4(),
            credential_id,
            changed_by_user_id,
            reason,
            created_utc: Utc::now(),
        }
    }
}
