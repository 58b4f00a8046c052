//! Role → permission table.
//!
//! The table is compiled in and matched exhaustively on [`Role`], so a new
//! role cannot ship without an entry. Every role maps to a non-empty set.
//!
//! | Role | Permissions |
//! |------|-------------|
//! | job-seeker | view-dashboard, view-profile, edit-profile, view-jobs, apply-jobs, view-notifications |
//! | employer | post-job, view-applicants, edit-company-profile |
//! | moderator | view-dashboard, view-profile, edit-profile, view-jobs, apply-jobs, post-job, edit-job, moderate-content, view-notifications |
//! | admin | all |

use crate::AuthError;
use tracing::warn;
use workwise_types::{Permission, PermissionSet, Role};

const JOB_SEEKER: PermissionSet = PermissionSet::VIEW_DASHBOARD
    .union(PermissionSet::VIEW_PROFILE)
    .union(PermissionSet::EDIT_PROFILE)
    .union(PermissionSet::VIEW_JOBS)
    .union(PermissionSet::APPLY_JOBS)
    .union(PermissionSet::VIEW_NOTIFICATIONS);

const EMPLOYER: PermissionSet = PermissionSet::POST_JOB
    .union(PermissionSet::VIEW_APPLICANTS)
    .union(PermissionSet::EDIT_COMPANY_PROFILE);

const MODERATOR: PermissionSet = PermissionSet::VIEW_DASHBOARD
    .union(PermissionSet::VIEW_PROFILE)
    .union(PermissionSet::EDIT_PROFILE)
    .union(PermissionSet::VIEW_JOBS)
    .union(PermissionSet::APPLY_JOBS)
    .union(PermissionSet::POST_JOB)
    .union(PermissionSet::EDIT_JOB)
    .union(PermissionSet::MODERATE_CONTENT)
    .union(PermissionSet::VIEW_NOTIFICATIONS);

const ADMIN: PermissionSet = PermissionSet::all();

/// Returns the permissions granted to `role`.
///
/// # Example
///
/// ```
/// use workwise_auth::permissions_for_role;
/// use workwise_types::{Permission, Role};
///
/// let employer = permissions_for_role(Role::Employer);
/// assert!(employer.allows(Permission::PostJob));
/// assert!(!permissions_for_role(Role::JobSeeker).allows(Permission::PostJob));
/// ```
#[must_use]
pub const fn permissions_for_role(role: Role) -> PermissionSet {
    match role {
        Role::JobSeeker => JOB_SEEKER,
        Role::Employer => EMPLOYER,
        Role::Moderator => MODERATOR,
        Role::Admin => ADMIN,
    }
}

/// Resolves a role name from provider data to its permissions.
///
/// # Errors
///
/// Returns [`AuthError::Configuration`] if `name` is not a declared role.
///
/// # Example
///
/// ```
/// use workwise_auth::permissions_for_role_name;
///
/// assert!(permissions_for_role_name("admin").is_ok());
/// assert!(permissions_for_role_name("owner").is_err());
/// ```
pub fn permissions_for_role_name(name: &str) -> Result<PermissionSet, AuthError> {
    let role: Role = name.parse().map_err(|e| {
        warn!(role = name, "Unknown role name, granting nothing");
        AuthError::from(e)
    })?;
    Ok(permissions_for_role(role))
}

/// Iterates the full table in [`Role::ALL`] order.
pub fn role_permission_map() -> impl Iterator<Item = (Role, PermissionSet)> {
    Role::ALL
        .into_iter()
        .map(|role| (role, permissions_for_role(role)))
}

/// Roles whose grant includes `permission`.
#[must_use]
pub fn roles_granting(permission: Permission) -> Vec<Role> {
    role_permission_map()
        .filter(|(_, set)| set.allows(permission))
        .map(|(role, _)| role)
        .collect()
}
