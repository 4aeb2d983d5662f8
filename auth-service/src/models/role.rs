//! Role and permission models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named bundle of permissions, assignable via Membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub deleted_utc: Option<DateTime<Utc>>,
}

impl Role {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            role_id: Uuid::new_v4(),
            name,
            description,
            created_utc: Utc::now(),
            deleted_utc: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_utc.is_some()
    }

    /// Owner and Admin hold every permission implicitly. The check is
    /// name-based; renaming either role breaks the bypass.
    pub fn is_super_role(&self) -> bool {
        self.name.eq_ignore_ascii_case("owner") || self.name.eq_ignore_ascii_case("admin")
    }
}

/// Fine-grained capability, named `Resource.Action` (e.g.
/// `Company.Create`). Name checks are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub permission_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub deleted_utc: Option<DateTime<Utc>>,
}

impl Permission {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            permission_id: Uuid::new_v4(),
            name,
            description,
            created_utc: Utc::now(),
            deleted_utc: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_utc.is_some()
    }
}

/// Role↔Permission join row, soft-deletable independently of either
/// side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolePermission {
    pub role_id: Uuid,
    pub permission_id: Uuid,
    pub created_utc: DateTime<Utc>,
    pub deleted_utc: Option<DateTime<Utc>>,
}

impl RolePermission {
    pub fn new(role_id: Uuid, permission_id: Uuid) -> Self {
        Self {
            role_id,
            permission_id,
            created_utc: Utc::now(),
            deleted_utc: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_utc.is_some()
    }
}
