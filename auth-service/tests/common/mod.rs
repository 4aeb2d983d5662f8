//! Test fixtures wiring the core services against the in-memory stores.

#![allow(dead_code)]

use std::sync::Arc;

use auth_service::config::JwtConfig;
use auth_service::models::{Membership, Permission, ResourceType, Role};
use auth_service::services::{AuthService, JwtService, PermissionService, VerificationService};
use auth_service::stores::{
    MemoryCacheStore, MemoryCredentialStore, MemoryMembershipStore, MemoryRolePermissionStore,
    MemoryRoleStore, MemoryVerificationStore,
};
use uuid::Uuid;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        issuer: "taskboard-auth".to_string(),
        audience: "taskboard-api".to_string(),
        token_expiry_minutes: 60,
    }
}

/// Permission resolution wired to fresh in-memory stores.
pub struct PermissionHarness {
    pub memberships: Arc<MemoryMembershipStore>,
    pub roles: Arc<MemoryRoleStore>,
    pub role_permissions: Arc<MemoryRolePermissionStore>,
    pub cache: Arc<MemoryCacheStore>,
    pub service: PermissionService,
}

impl PermissionHarness {
    pub fn new(cache_ttl_seconds: u64) -> Self {
        let memberships = Arc::new(MemoryMembershipStore::new());
        let roles = Arc::new(MemoryRoleStore::new());
        let role_permissions = Arc::new(MemoryRolePermissionStore::new());
        let cache = Arc::new(MemoryCacheStore::new());

        let service = PermissionService::new(
            memberships.clone(),
            roles.clone(),
            role_permissions.clone(),
            cache.clone(),
            cache_ttl_seconds,
        );

        Self {
            memberships,
            roles,
            role_permissions,
            cache,
            service,
        }
    }

    /// Create a role, grant it the named permissions, and assign it to
    /// the user on the resource. Returns the role id.
    pub fn grant(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        resource_type: ResourceType,
        role_name: &str,
        permission_names: &[&str],
    ) -> Uuid {
        let role = Role::new(role_name.to_string(), None);
        let role_id = role.role_id;
        self.roles.insert(role);

        for name in permission_names {
            let permission = Permission::new(name.to_string(), None);
            let permission_id = permission.permission_id;
            self.role_permissions.insert_permission(permission);
            self.role_permissions.assign(role_id, permission_id);
        }

        self.memberships.insert(Membership::new(
            user_id,
            resource_id,
            resource_type,
            role_id,
        ));

        role_id
    }
}

/// Account flows wired to fresh in-memory stores.
pub struct AuthHarness {
    pub credentials: Arc<MemoryCredentialStore>,
    pub verifications: Arc<MemoryVerificationStore>,
    pub jwt: JwtService,
    pub verification: VerificationService,
    pub service: AuthService,
}

impl AuthHarness {
    pub fn new(code_expiry_minutes: i64) -> Self {
        let credentials = Arc::new(MemoryCredentialStore::new());
        let verifications = Arc::new(MemoryVerificationStore::new());
        let jwt = JwtService::new(&test_jwt_config());
        let verification = VerificationService::new(verifications.clone(), code_expiry_minutes);
        let service = AuthService::new(credentials.clone(), jwt.clone(), verification.clone());

        Self {
            credentials,
            verifications,
            jwt,
            verification,
            service,
        }
    }
}
