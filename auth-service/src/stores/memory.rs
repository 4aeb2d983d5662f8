//! In-memory store implementations.
//!
//! Back the test suite and single-process embedding; state lives behind
//! plain mutexes since every operation is a short lock-and-copy.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Credential, CredentialHistory, Membership, Permission, ResourceType, Role, RolePermission,
    VerificationRecord,
};
use crate::services::ServiceError;

use super::{
    CacheStore, CredentialStore, MembershipStore, RolePermissionStore, RoleStore,
    VerificationStore,
};

fn poisoned(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Store(anyhow::anyhow!("Store mutex poisoned: {}", e))
}

#[derive(Default)]
pub struct MemoryMembershipStore {
    rows: Mutex<Vec<Membership>>,
}

impl MemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, membership: Membership) {
        self.rows.lock().expect("membership store poisoned").push(membership);
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn find_membership(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        resource_type: ResourceType,
    ) -> Result<Option<Membership>, ServiceError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        let mut matches = rows.iter().filter(|m| {
            m.user_id == user_id
                && m.resource_id == resource_id
                && m.resource_type == resource_type
        });

        let first = matches.next().cloned();
        if first.is_some() && matches.next().is_some() {
            tracing::warn!(
                user_id = %user_id,
                resource_id = %resource_id,
                resource_type = resource_type.as_str(),
                "Duplicate membership rows for resource, using first match"
            );
        }
        Ok(first)
    }
}

#[derive(Default)]
pub struct MemoryRoleStore {
    roles: Mutex<HashMap<Uuid, Role>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, role: Role) {
        self.roles
            .lock()
            .expect("role store poisoned")
            .insert(role.role_id, role);
    }

    pub fn soft_delete(&self, role_id: Uuid) {
        if let Some(role) = self.roles.lock().expect("role store poisoned").get_mut(&role_id) {
            role.deleted_utc = Some(Utc::now());
        }
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn find_by_id(&self, role_id: Uuid) -> Result<Option<Role>, ServiceError> {
        let roles = self.roles.lock().map_err(poisoned)?;
        Ok(roles.get(&role_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryRolePermissionStore {
    permissions: Mutex<HashMap<Uuid, Permission>>,
    links: Mutex<Vec<RolePermission>>,
}

impl MemoryRolePermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_permission(&self, permission: Permission) {
        self.permissions
            .lock()
            .expect("permission store poisoned")
            .insert(permission.permission_id, permission);
    }

    pub fn assign(&self, role_id: Uuid, permission_id: Uuid) {
        self.links
            .lock()
            .expect("permission store poisoned")
            .push(RolePermission::new(role_id, permission_id));
    }

    /// Soft-delete the join row; the permission itself stays.
    pub fn revoke(&self, role_id: Uuid, permission_id: Uuid) {
        for link in self.links.lock().expect("permission store poisoned").iter_mut() {
            if link.role_id == role_id
                && link.permission_id == permission_id
                && !link.is_deleted()
            {
                link.deleted_utc = Some(Utc::now());
            }
        }
    }

    pub fn soft_delete_permission(&self, permission_id: Uuid) {
        if let Some(permission) = self
            .permissions
            .lock()
            .expect("permission store poisoned")
            .get_mut(&permission_id)
        {
            permission.deleted_utc = Some(Utc::now());
        }
    }
}

#[async_trait]
impl RolePermissionStore for MemoryRolePermissionStore {
    async fn permissions_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, ServiceError> {
        let links = self.links.lock().map_err(poisoned)?;
        let permissions = self.permissions.lock().map_err(poisoned)?;

        Ok(links
            .iter()
            .filter(|link| link.role_id == role_id && !link.is_deleted())
            .filter_map(|link| permissions.get(&link.permission_id).cloned())
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryVerificationStore {
    records: Mutex<HashMap<Uuid, VerificationRecord>>,
}

impl MemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerificationStore for MemoryVerificationStore {
    async fn insert(&self, record: &VerificationRecord) -> Result<(), ServiceError> {
        self.records
            .lock()
            .map_err(poisoned)?
            .insert(record.verification_id, record.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        verification_id: Uuid,
    ) -> Result<Option<VerificationRecord>, ServiceError> {
        let records = self.records.lock().map_err(poisoned)?;
        Ok(records.get(&verification_id).cloned())
    }

    async fn mark_used(
        &self,
        verification_id: Uuid,
        confirmed_utc: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let mut records = self.records.lock().map_err(poisoned)?;
        match records.get_mut(&verification_id) {
            Some(record) if !record.is_used => {
                record.is_used = true;
                record.confirmed_utc = Some(confirmed_utc);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    rows: Mutex<HashMap<Uuid, Credential>>,
    history: Mutex<Vec<CredentialHistory>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<CredentialHistory> {
        self.history.lock().expect("credential store poisoned").clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, credential: &Credential) -> Result<(), ServiceError> {
        self.rows
            .lock()
            .map_err(poisoned)?
            .insert(credential.credential_id, credential.clone());
        Ok(())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Credential>, ServiceError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows
            .values()
            .find(|c| c.login.eq_ignore_ascii_case(login) && !c.is_deleted())
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Credential>, ServiceError> {
        let rows = self.rows.lock().map_err(poisoned)?;
        Ok(rows
            .values()
            .find(|c| c.user_id == user_id && !c.is_deleted())
            .cloned())
    }

    async fn update(&self, credential: &Credential) -> Result<(), ServiceError> {
        let mut rows = self.rows.lock().map_err(poisoned)?;
        if !rows.contains_key(&credential.credential_id) {
            return Err(ServiceError::CredentialNotFound);
        }
        rows.insert(credential.credential_id, credential.clone());
        Ok(())
    }

    async fn insert_history(&self, entry: &CredentialHistory) -> Result<(), ServiceError> {
        self.history.lock().map_err(poisoned)?.push(entry.clone());
        Ok(())
    }
}

/// TTL-honoring in-memory cache. Entries expire passively on read, the
/// same observable behavior as the Redis-backed store.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Cache mutex poisoned: {}", e)))?;
        match entries.get(key) {
            Some((value, deadline)) if Instant::now() < *deadline => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), ServiceError> {
        let deadline = Instant::now() + Duration::from_secs(ttl_seconds);
        self.entries
            .lock()
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Cache mutex poisoned: {}", e)))?
            .insert(key.to_string(), (value.to_string(), deadline));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ServiceError> {
        self.entries
            .lock()
            .map_err(|e| ServiceError::Cache(anyhow::anyhow!("Cache mutex poisoned: {}", e)))?
            .remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.get(key).await?.is_some())
    }
}
