use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use nexus_core::DomainError;

use crate::{Permission, Role, User};

/// Outcome of a capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Denied, with a human-readable reason suitable for display.
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {reason}")]
    Forbidden { permission: Permission, reason: String },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden { reason, .. } => DomainError::unauthorized(reason),
        }
    }
}

/// Permissions granted to a role.
///
/// This is the single source of truth for RBAC. New roles or permissions are added
/// here; callers only ever go through [`check_capability`].
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => &Permission::ALL,
        Role::Manager | Role::Staff => &[
            Permission::ProductCreate,
            Permission::ProductUpdate,
            Permission::MovementRecord,
            Permission::SupplierOnboard,
            Permission::CategoryCreate,
            Permission::ReportExport,
        ],
    }
}

/// Full `role → permissions` table (for audit/display).
pub fn capability_table() -> BTreeMap<Role, BTreeSet<Permission>> {
    Role::ALL
        .iter()
        .map(|role| (*role, role_permissions(*role).iter().copied().collect()))
        .collect()
}

/// Check whether `user` may perform `permission`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn check_capability(user: &User, permission: Permission) -> Decision {
    if role_permissions(user.role).contains(&permission) {
        return Decision::Allow;
    }

    let granting: Vec<&str> = Role::ALL
        .iter()
        .filter(|role| role_permissions(**role).contains(&permission))
        .map(|role| role.as_str())
        .collect();

    Decision::Deny(format!(
        "Access Denied: role {} lacks '{}' (granted to: {})",
        user.role,
        permission,
        granting.join(", ")
    ))
}

/// Authorize `user` for `permission`, turning a denial into an error.
pub fn authorize(user: &User, permission: Permission) -> Result<(), AuthzError> {
    match check_capability(user, permission) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::warn!(user_id = %user.id, role = %user.role, %permission, "capability denied");
            Err(AuthzError::Forbidden { permission, reason })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User::new("u1", "Test User", "test@example.com", role)
    }

    #[test]
    fn only_admin_may_delete_products() {
        assert!(check_capability(&user(Role::Admin), Permission::ProductDelete).is_allowed());
        assert!(!check_capability(&user(Role::Manager), Permission::ProductDelete).is_allowed());
        assert!(!check_capability(&user(Role::Staff), Permission::ProductDelete).is_allowed());
    }

    #[test]
    fn every_role_may_perform_non_destructive_commands() {
        for role in Role::ALL {
            for permission in Permission::ALL {
                if permission == Permission::ProductDelete {
                    continue;
                }
                assert!(
                    check_capability(&user(role), permission).is_allowed(),
                    "{role} should hold {permission}"
                );
            }
        }
    }

    #[test]
    fn denial_reason_names_role_and_granting_roles() {
        match check_capability(&user(Role::Staff), Permission::ProductDelete) {
            Decision::Deny(reason) => {
                assert!(reason.contains("STAFF"));
                assert!(reason.contains("product.delete"));
                assert!(reason.contains("ADMIN"));
            }
            Decision::Allow => panic!("Expected denial for STAFF delete"),
        }
    }

    #[test]
    fn authorize_maps_denial_into_domain_error() {
        let err = authorize(&user(Role::Manager), Permission::ProductDelete).unwrap_err();
        match DomainError::from(err) {
            DomainError::Unauthorized(_) => {}
            other => panic!("Expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn capability_table_lists_every_role() {
        let table = capability_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table[&Role::Admin].len(), Permission::ALL.len());
        assert!(!table[&Role::Staff].contains(&Permission::ProductDelete));
    }
}
