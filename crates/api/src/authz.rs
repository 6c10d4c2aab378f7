//! API-side authorization guard for routes.
//!
//! Each handler checks its permission before doing any work, so a caller
//! without access learns nothing about the request's validity.

use axum::http::StatusCode;
use axum::response::Response;

use bulkparts_auth::{Permission, Role, authorize};

use crate::app::errors;
use crate::context::PrincipalContext;

/// Check a single permission for the current principal.
///
/// Returns a ready `403 {"error": "forbidden"}` response on denial.
pub fn require(principal: &PrincipalContext, permission: &Permission) -> Result<(), Response> {
    authorize(&principal.to_principal(), permission).map_err(|e| {
        tracing::debug!(principal = %principal.principal_id(), error = %e, "permission denied");
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}

const PARTS_MANAGER_GRANTS: &[Permission] = &[
    Permission::VIEW_CATEGORIES,
    Permission::ADD_PART,
    Permission::VIEW_LOCATIONS,
];
const VIEWER_GRANTS: &[Permission] = &[Permission::VIEW_CATEGORIES, Permission::VIEW_LOCATIONS];

/// Static role→permission policy.
///
/// - `admin`: everything
/// - `parts_manager`: view categories, add parts, view locations
/// - `viewer`: view categories and locations
///
/// Unknown roles grant nothing.
pub fn permissions_from_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(Role::is_admin) {
        return vec![Permission::WILDCARD];
    }

    let mut permissions = Vec::new();
    for role in roles {
        let granted: &[Permission] = if *role == Role::PARTS_MANAGER {
            PARTS_MANAGER_GRANTS
        } else if *role == Role::VIEWER {
            VIEWER_GRANTS
        } else {
            &[]
        };
        for permission in granted {
            if !permissions.contains(permission) {
                permissions.push(permission.clone());
            }
        }
    }
    permissions
}
