use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::models::ResourceType;
use crate::services::ServiceError;
use crate::stores::{CacheStore, MembershipStore, RolePermissionStore, RoleStore};

/// Cache-aside permission resolution.
///
/// Answers "can user U perform permission P on resource R" by walking
/// membership → role → role permissions, with the resolved name set
/// cached under a fixed TTL. There is no active invalidation: a role or
/// permission change may be served stale for up to the TTL, which
/// security-critical revocations must not rely on.
#[derive(Clone)]
pub struct PermissionService {
    memberships: Arc<dyn MembershipStore>,
    roles: Arc<dyn RoleStore>,
    role_permissions: Arc<dyn RolePermissionStore>,
    cache: Arc<dyn CacheStore>,
    cache_ttl_seconds: u64,
}

impl PermissionService {
    pub fn new(
        memberships: Arc<dyn MembershipStore>,
        roles: Arc<dyn RoleStore>,
        role_permissions: Arc<dyn RolePermissionStore>,
        cache: Arc<dyn CacheStore>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            memberships,
            roles,
            role_permissions,
            cache,
            cache_ttl_seconds,
        }
    }

    pub fn cache_key(user_id: Uuid, resource_type: ResourceType, resource_id: Uuid) -> String {
        format!(
            "permissions:{}:{}:{}",
            user_id,
            resource_type.as_str(),
            resource_id
        )
    }

    /// Resolve whether the user holds the named permission on the
    /// resource. Never errors for "no access"; store failures propagate.
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        resource_type: ResourceType,
        permission_name: &str,
    ) -> Result<bool, ServiceError> {
        if permission_name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Permission name must not be empty".to_string(),
            ));
        }

        let key = Self::cache_key(user_id, resource_type, resource_id);
        if let Some(names) = self.cached_permission_set(&key).await {
            tracing::debug!(key = %key, "Permission cache hit");
            return Ok(contains_ignore_case(&names, permission_name));
        }

        let membership = match self
            .memberships
            .find_membership(user_id, resource_id, resource_type)
            .await?
        {
            Some(membership) => membership,
            None => {
                tracing::debug!(
                    user_id = %user_id,
                    resource_id = %resource_id,
                    resource_type = resource_type.as_str(),
                    "No membership for resource"
                );
                return Ok(false);
            }
        };

        let role = match self.roles.find_by_id(membership.role_id).await? {
            Some(role) if !role.is_deleted() => role,
            _ => {
                tracing::warn!(
                    role_id = %membership.role_id,
                    user_id = %user_id,
                    "Membership references a missing or deleted role"
                );
                return Ok(false);
            }
        };

        // Owner/Admin hold every permission, including names introduced
        // after this check. A cached concrete set would understate that,
        // so the bypass skips the cache entirely.
        if role.is_super_role() {
            return Ok(true);
        }

        let names: Vec<String> = self
            .role_permissions
            .permissions_for_role(role.role_id)
            .await?
            .into_iter()
            .filter(|p| !p.is_deleted())
            .map(|p| p.name)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        self.store_permission_set(&key, &names).await;

        Ok(contains_ignore_case(&names, permission_name))
    }

    /// Cache read. Failures degrade to a miss so an unreachable cache
    /// never blocks resolution.
    async fn cached_permission_set(&self, key: &str) -> Option<Vec<String>> {
        let raw = match self.cache.get(key).await {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Permission cache read failed, recomputing");
                return None;
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(names) => Some(names),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable permission cache entry");
                None
            }
        }
    }

    /// Best-effort cache write; a failure only costs a recompute.
    async fn store_permission_set(&self, key: &str, names: &[String]) {
        let value = match serde_json::to_string(names) {
            Ok(value) => value,
            Err(_) => return,
        };

        if let Err(e) = self.cache.set(key, &value, self.cache_ttl_seconds).await {
            tracing::warn!(key = %key, error = %e, "Permission cache write failed");
        }
    }
}

fn contains_ignore_case(names: &[String], needle: &str) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        let user_id = Uuid::nil();
        let resource_id = Uuid::nil();
        let key = PermissionService::cache_key(user_id, ResourceType::Board, resource_id);
        assert_eq!(
            key,
            format!("permissions:{}:board:{}", user_id, resource_id)
        );
    }

    #[test]
    fn test_contains_ignore_case() {
        let names = vec!["Company.Create".to_string(), "Board.Delete".to_string()];
        assert!(contains_ignore_case(&names, "company.create"));
        assert!(contains_ignore_case(&names, "BOARD.DELETE"));
        assert!(!contains_ignore_case(&names, "Company.Delete"));
    }
}
