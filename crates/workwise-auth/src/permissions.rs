//! Permissions derivation.
//!
//! [`Permissions`] turns the identity store's role slice into an effective
//! [`PermissionSet`] via the role table. The result is memoized on the
//! role value: recomputation only happens when the role differs from the
//! one the memo was computed for.
//!
//! Consumers that only care about access (guards, menus) subscribe here
//! and are not woken by profile edits.

use crate::table::permissions_for_role;
use parking_lot::Mutex;
use tokio::sync::watch;
use workwise_types::{Permission, PermissionSet, Role};

#[derive(Debug, Clone, Copy)]
struct Memo {
    role: Option<Role>,
    permissions: PermissionSet,
    #[cfg(test)]
    derivations: u64,
}

/// Read-only permission queries for the current user.
///
/// # Example
///
/// ```
/// use workwise_auth::{IdentityStore, Permissions};
/// use workwise_types::{AppUser, Permission, Role, UserId};
///
/// let store = IdentityStore::new();
/// let permissions = Permissions::new(&store);
/// assert!(permissions.effective_permissions().is_empty());
///
/// store.set_user(Some(AppUser::new(UserId::new("1"), Role::Employer, "hr@acme.co.za")));
/// assert!(permissions.has_permission(Permission::PostJob));
/// assert!(permissions.has_role(Role::Employer));
/// assert!(!permissions.has_permission(Permission::ApplyJobs));
/// ```
#[derive(Debug)]
pub struct Permissions {
    role: watch::Receiver<Option<Role>>,
    memo: Mutex<Memo>,
}

impl Permissions {
    /// Creates a derivation bound to `store`'s role slice.
    #[must_use]
    pub fn new(store: &crate::IdentityStore) -> Self {
        Self {
            role: store.subscribe_role(),
            memo: Mutex::new(Memo {
                role: None,
                permissions: PermissionSet::empty(),
                #[cfg(test)]
                derivations: 0,
            }),
        }
    }

    /// Role of the current user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        *self.role.borrow()
    }

    /// Effective permissions; empty when nobody is signed in.
    #[must_use]
    pub fn effective_permissions(&self) -> PermissionSet {
        let role = self.role();
        let mut memo = self.memo.lock();
        if memo.role != role {
            memo.permissions = role.map_or(PermissionSet::empty(), permissions_for_role);
            memo.role = role;
            #[cfg(test)]
            {
                memo.derivations += 1;
            }
        }
        memo.permissions
    }

    /// Returns `true` if the current user holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.effective_permissions().allows(permission)
    }

    /// Returns `true` if the current user holds at least one of `required`.
    #[must_use]
    pub fn has_any_permission(&self, required: PermissionSet) -> bool {
        self.effective_permissions().allows_any(required)
    }

    /// Returns `true` if the current user holds all of `required`.
    #[must_use]
    pub fn has_all_permissions(&self, required: PermissionSet) -> bool {
        self.effective_permissions().allows_all(required)
    }

    /// Returns `true` if the current user has exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    /// Returns `true` if the current user has any of `roles`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|r| roles.contains(&r))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    #[must_use]
    pub fn is_moderator(&self) -> bool {
        self.has_role(Role::Moderator)
    }

    #[must_use]
    pub fn is_employer(&self) -> bool {
        self.has_role(Role::Employer)
    }

    #[must_use]
    pub fn is_job_seeker(&self) -> bool {
        self.has_role(Role::JobSeeker)
    }

    /// Subscribes to permission changes.
    #[must_use]
    pub fn subscribe(&self) -> PermissionsSubscription {
        let mut role = self.role.clone();
        role.borrow_and_update();
        PermissionsSubscription { role }
    }

    /// Number of times the memo was recomputed.
    #[cfg(test)]
    pub(crate) fn derivations(&self) -> u64 {
        self.memo.lock().derivations
    }
}

/// Change feed for effective permissions.
///
/// Wakes only when the role changes, never for other profile edits.
#[derive(Debug)]
pub struct PermissionsSubscription {
    role: watch::Receiver<Option<Role>>,
}

impl PermissionsSubscription {
    /// Waits for the next change and returns the new permission set.
    ///
    /// Returns `None` once the identity store has been dropped.
    pub async fn changed(&mut self) -> Option<PermissionSet> {
        self.role.changed().await.ok()?;
        let role = *self.role.borrow_and_update();
        Some(role.map_or(PermissionSet::empty(), permissions_for_role))
    }

    /// Returns `true` if a change is pending.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.role.has_changed().unwrap_or(false)
    }
}
