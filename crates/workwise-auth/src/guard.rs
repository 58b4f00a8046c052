//! Access guard.
//!
//! Decides what a protected view shows, from the auth status and the
//! current user's permissions:
//!
//! | Status | Checks | Decision |
//! |--------|--------|----------|
//! | `authenticating` | | [`GuardDecision::Loading`] |
//! | `unauthenticated`, `error` | | [`GuardDecision::SignInRequired`] |
//! | `authenticated` | e-mail not verified | [`GuardDecision::EmailVerificationRequired`] |
//! | `authenticated` | profile incomplete | [`GuardDecision::ProfileIncomplete`] |
//! | `authenticated` | permission/role missing | [`GuardDecision::InsufficientPermission`] |
//! | `authenticated` | all pass | [`GuardDecision::Granted`] |
//!
//! The e-mail and profile rows only apply when the requirement asks for
//! them. Protected content is never produced for a denied decision.

use crate::{AuthStatus, IdentityStore, Permissions};
use std::fmt;
use workwise_types::{Permission, Role};

/// What a view needs from the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Any signed-in user.
    SignedIn,
    /// A user whose role grants the permission.
    Permission(Permission),
    /// A user with exactly this role.
    Role(Role),
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedIn => f.write_str("a signed-in account"),
            Self::Permission(p) => write!(f, "the '{p}' permission"),
            Self::Role(r) => write!(f, "the {} role", r.label()),
        }
    }
}

impl From<Permission> for Access {
    fn from(permission: Permission) -> Self {
        Self::Permission(permission)
    }
}

impl From<Role> for Access {
    fn from(role: Role) -> Self {
        Self::Role(role)
    }
}

/// Access plus optional account-state checks.
///
/// ```
/// use workwise_auth::{Access, AccessRequirement};
/// use workwise_types::Permission;
///
/// let req = AccessRequirement::permission(Permission::ApplyJobs).require_complete_profile();
/// assert_eq!(req.access(), Access::Permission(Permission::ApplyJobs));
/// assert!(req.needs_complete_profile());
/// assert!(!req.needs_verified_email());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessRequirement {
    access: Access,
    verified_email: bool,
    complete_profile: bool,
}

impl AccessRequirement {
    #[must_use]
    pub const fn new(access: Access) -> Self {
        Self {
            access,
            verified_email: false,
            complete_profile: false,
        }
    }

    #[must_use]
    pub const fn signed_in() -> Self {
        Self::new(Access::SignedIn)
    }

    #[must_use]
    pub const fn permission(permission: Permission) -> Self {
        Self::new(Access::Permission(permission))
    }

    #[must_use]
    pub const fn role(role: Role) -> Self {
        Self::new(Access::Role(role))
    }

    /// Also require a verified e-mail address.
    #[must_use]
    pub const fn require_verified_email(mut self) -> Self {
        self.verified_email = true;
        self
    }

    /// Also require a completed profile.
    #[must_use]
    pub const fn require_complete_profile(mut self) -> Self {
        self.complete_profile = true;
        self
    }

    #[must_use]
    pub const fn access(&self) -> Access {
        self.access
    }

    #[must_use]
    pub const fn needs_verified_email(&self) -> bool {
        self.verified_email
    }

    #[must_use]
    pub const fn needs_complete_profile(&self) -> bool {
        self.complete_profile
    }
}

impl From<Access> for AccessRequirement {
    fn from(access: Access) -> Self {
        Self::new(access)
    }
}

impl From<Permission> for AccessRequirement {
    fn from(permission: Permission) -> Self {
        Self::permission(permission)
    }
}

impl From<Role> for AccessRequirement {
    fn from(role: Role) -> Self {
        Self::role(role)
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// A session check or auth action is in flight.
    Loading,
    /// Show the login/register call-to-action.
    SignInRequired {
        /// The last auth action failed.
        after_error: bool,
    },
    /// The address must be confirmed first.
    EmailVerificationRequired { email: String },
    /// The profile must be completed first.
    ProfileIncomplete { display_label: String },
    /// Signed in, but the role does not grant `required`.
    InsufficientPermission { required: Access, role: Role },
    /// Show the protected content.
    Granted,
}

impl GuardDecision {
    /// Returns `true` only for [`GuardDecision::Granted`].
    #[must_use]
    pub fn allows(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Short machine-readable name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::SignInRequired { .. } => "sign-in-required",
            Self::EmailVerificationRequired { .. } => "email-verification-required",
            Self::ProfileIncomplete { .. } => "profile-incomplete",
            Self::InsufficientPermission { .. } => "insufficient-permission",
            Self::Granted => "granted",
        }
    }
}

impl fmt::Display for GuardDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Checking your session..."),
            Self::SignInRequired { after_error: false } => {
                f.write_str("Sign in or create an account to continue.")
            }
            Self::SignInRequired { after_error: true } => {
                f.write_str("Sign-in did not succeed. Sign in or create an account to continue.")
            }
            Self::EmailVerificationRequired { email } => {
                write!(f, "Verify your e-mail address ({email}) to continue.")
            }
            Self::ProfileIncomplete { display_label } => {
                write!(f, "{display_label}, complete your profile to continue.")
            }
            Self::InsufficientPermission { required, role } => write!(
                f,
                "Access denied: this page requires {required}, and your role is {}.",
                role.label()
            ),
            Self::Granted => f.write_str("Access granted."),
        }
    }
}

/// Either the protected content or the reason it was withheld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    Content(T),
    Fallback(GuardDecision),
}

impl<T> Rendered<T> {
    /// Returns the content if access was granted.
    #[must_use]
    pub fn content(self) -> Option<T> {
        match self {
            Self::Content(content) => Some(content),
            Self::Fallback(_) => None,
        }
    }
}

/// Evaluates one [`AccessRequirement`] against live auth state.
///
/// ```
/// use workwise_auth::{AccessGuard, AccessRequirement, GuardDecision, IdentityStore, Permissions};
/// use workwise_types::{AppUser, Permission, Role, UserId};
///
/// let store = IdentityStore::new();
/// let permissions = Permissions::new(&store);
/// let guard = AccessGuard::new(&store, &permissions, AccessRequirement::permission(Permission::PostJob));
/// assert_eq!(guard.decide(), GuardDecision::SignInRequired { after_error: false });
///
/// store.authenticate(AppUser::new(UserId::new("e"), Role::Employer, "hr@acme.co.za"));
/// assert_eq!(guard.render(|| "job form").content(), Some("job form"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard<'a> {
    identity: &'a IdentityStore,
    permissions: &'a Permissions,
    requirement: AccessRequirement,
}

impl<'a> AccessGuard<'a> {
    #[must_use]
    pub fn new(
        identity: &'a IdentityStore,
        permissions: &'a Permissions,
        requirement: impl Into<AccessRequirement>,
    ) -> Self {
        Self {
            identity,
            permissions,
            requirement: requirement.into(),
        }
    }

    #[must_use]
    pub fn requirement(&self) -> AccessRequirement {
        self.requirement
    }

    /// Decides against the current state.
    #[must_use]
    pub fn decide(&self) -> GuardDecision {
        match self.identity.status() {
            AuthStatus::Authenticating => GuardDecision::Loading,
            AuthStatus::Unauthenticated => GuardDecision::SignInRequired { after_error: false },
            AuthStatus::Error => GuardDecision::SignInRequired { after_error: true },
            AuthStatus::Authenticated => self.decide_signed_in(),
        }
    }

    /// Produces `content` only when access is granted.
    pub fn render<T>(&self, content: impl FnOnce() -> T) -> Rendered<T> {
        match self.decide() {
            GuardDecision::Granted => Rendered::Content(content()),
            denied => Rendered::Fallback(denied),
        }
    }

    fn decide_signed_in(&self) -> GuardDecision {
        let req = self.requirement;
        let account = self.identity.with_user(|user| {
            user.map(|u| {
                let pending = if req.verified_email && !u.email_verified {
                    Some(GuardDecision::EmailVerificationRequired {
                        email: u.email.clone(),
                    })
                } else if req.complete_profile && !u.profile_complete {
                    Some(GuardDecision::ProfileIncomplete {
                        display_label: u.display_label().to_string(),
                    })
                } else {
                    None
                };
                (u.role, pending)
            })
        });

        // Authenticated never coexists with an empty store; treat it as signed out.
        let Some((role, pending)) = account else {
            return GuardDecision::SignInRequired { after_error: false };
        };
        if let Some(decision) = pending {
            return decision;
        }

        let allowed = match req.access {
            Access::SignedIn => true,
            Access::Permission(p) => self.permissions.has_permission(p),
            Access::Role(r) => self.permissions.has_role(r),
        };
        if allowed {
            GuardDecision::Granted
        } else {
            GuardDecision::InsufficientPermission {
                required: req.access,
                role,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workwise_types::{AppUser, UserId};

    fn user(role: Role) -> AppUser {
        AppUser::new(UserId::new("u-1"), role, "naledi@example.co.za").with_display_name("Naledi")
    }

    #[test]
    fn status_decides_before_permissions() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        let guard = AccessGuard::new(&store, &perms, Role::Admin);

        assert_eq!(guard.decide(), GuardDecision::SignInRequired { after_error: false });

        store.set_status(AuthStatus::Authenticating).unwrap();
        assert_eq!(guard.decide(), GuardDecision::Loading);

        store.set_status(AuthStatus::Error).unwrap();
        assert_eq!(guard.decide(), GuardDecision::SignInRequired { after_error: true });
    }

    #[test]
    fn admin_passes_every_requirement() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        store.authenticate(user(Role::Admin));

        for p in Permission::ALL {
            assert!(AccessGuard::new(&store, &perms, p).decide().allows(), "{p}");
        }
        assert!(AccessGuard::new(&store, &perms, Role::Admin).decide().allows());
    }

    #[test]
    fn admin_is_not_employer_by_role() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        store.authenticate(user(Role::Admin));

        assert_eq!(
            AccessGuard::new(&store, &perms, Role::Employer).decide(),
            GuardDecision::InsufficientPermission {
                required: Access::Role(Role::Employer),
                role: Role::Admin,
            }
        );
    }

    #[test]
    fn job_seeker_cannot_post_jobs() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        store.authenticate(user(Role::JobSeeker));
        let guard = AccessGuard::new(&store, &perms, Permission::PostJob);

        let rendered = guard.render(|| "post a job");
        let Rendered::Fallback(decision) = rendered else {
            panic!("content rendered for job seeker");
        };
        assert_eq!(decision.kind(), "insufficient-permission");
        let text = decision.to_string();
        assert!(text.contains("post-job"), "{text}");
        assert!(text.contains("Job Seeker"), "{text}");
    }

    #[test]
    fn content_is_not_built_when_denied() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        let guard = AccessGuard::new(&store, &perms, AccessRequirement::signed_in());

        let mut built = false;
        let _ = guard.render(|| built = true);
        assert!(!built);
    }

    #[test]
    fn email_verification_checked_first() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        store.authenticate(user(Role::JobSeeker));
        let req = AccessRequirement::permission(Permission::ManageUsers)
            .require_verified_email()
            .require_complete_profile();

        assert_eq!(
            AccessGuard::new(&store, &perms, req).decide(),
            GuardDecision::EmailVerificationRequired {
                email: "naledi@example.co.za".into()
            }
        );

        store.authenticate(user(Role::JobSeeker).verified());
        assert_eq!(
            AccessGuard::new(&store, &perms, req).decide(),
            GuardDecision::ProfileIncomplete {
                display_label: "Naledi".into()
            }
        );

        store.authenticate(user(Role::JobSeeker).verified().with_profile_complete(true));
        assert_eq!(
            AccessGuard::new(&store, &perms, req).decide().kind(),
            "insufficient-permission"
        );
    }

    #[test]
    fn signed_in_requirement_accepts_any_role() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        for role in Role::ALL {
            store.authenticate(user(role));
            assert_eq!(
                AccessGuard::new(&store, &perms, AccessRequirement::signed_in()).decide(),
                GuardDecision::Granted
            );
        }
    }

    #[test]
    fn logout_returns_to_sign_in() {
        let store = IdentityStore::new();
        let perms = Permissions::new(&store);
        let guard = AccessGuard::new(&store, &perms, Permission::ViewDashboard);
        store.authenticate(user(Role::Moderator));
        assert!(guard.decide().allows());

        store.clear();
        assert_eq!(guard.decide(), GuardDecision::SignInRequired { after_error: false });
    }
}
