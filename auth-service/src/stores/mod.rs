//! Store contracts consumed by the core services.
//!
//! The relational persistence layer and the key-value cache are owned
//! by the host process; services reach them only through these seams.
//! In-memory implementations back the test suite, and
//! [`RedisCacheStore`] backs the permission cache in deployment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Credential, CredentialHistory, Membership, Permission, ResourceType, Role, VerificationRecord,
};
use crate::services::ServiceError;

mod memory;
mod redis;

pub use self::memory::{
    MemoryCacheStore, MemoryCredentialStore, MemoryMembershipStore, MemoryRolePermissionStore,
    MemoryRoleStore, MemoryVerificationStore,
};
pub use self::redis::RedisCacheStore;

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// A user holds at most one role per (resource, resource type); the
    /// store returns the authoritative row.
    async fn find_membership(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        resource_type: ResourceType,
    ) -> Result<Option<Membership>, ServiceError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Returns the role including its soft-delete flag; filtering
    /// deleted roles is the caller's decision.
    async fn find_by_id(&self, role_id: Uuid) -> Result<Option<Role>, ServiceError>;
}

#[async_trait]
pub trait RolePermissionStore: Send + Sync {
    /// Permissions linked to a role through non-deleted join rows. The
    /// permissions themselves may still carry a soft-delete flag.
    async fn permissions_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, ServiceError>;
}

#[async_trait]
pub trait VerificationStore: Send + Sync {
    async fn insert(&self, record: &VerificationRecord) -> Result<(), ServiceError>;

    async fn find_by_id(
        &self,
        verification_id: Uuid,
    ) -> Result<Option<VerificationRecord>, ServiceError>;

    /// Conditionally flip the used flag (compare-and-set). Returns
    /// false when the record is missing or already used, so concurrent
    /// confirmations cannot both succeed.
    async fn mark_used(
        &self,
        verification_id: Uuid,
        confirmed_utc: DateTime<Utc>,
    ) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert(&self, credential: &Credential) -> Result<(), ServiceError>;

    /// Active (non-deleted) credential for a login, matched
    /// case-insensitively.
    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, ServiceError>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Credential>, ServiceError>;

    async fn update(&self, credential: &Credential) -> Result<(), ServiceError>;

    async fn insert_history(&self, entry: &CredentialHistory) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), ServiceError>;

    async fn remove(&self, key: &str) -> Result<(), ServiceError>;

    async fn exists(&self, key: &str) -> Result<bool, ServiceError>;
}
