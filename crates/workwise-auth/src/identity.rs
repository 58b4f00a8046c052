//! User identity store.
//!
//! [`IdentityStore`] owns the current [`AppUser`] and [`AuthStatus`]. Each
//! is published on its own `tokio::sync::watch` channel, and the user's
//! role is published on a third one, so a consumer is only woken for the
//! slice it reads:
//!
//! ```text
//!                ┌──────────── IdentityStore ────────────┐
//!  set_user ────►│ user   : watch<Option<AppUser>>       │──► profile views
//!  update_user ─►│ role   : watch<Option<Role>>          │──► Permissions
//!  set_status ──►│ status : watch<AuthStatus>            │──► AccessGuard
//!                └───────────────────────────────────────┘
//! ```
//!
//! A display-name change notifies the user slice only; the role slice is
//! written with `send_if_modified` and stays quiet.
//!
//! # Ordering
//!
//! Consumers never observe `Authenticated` without a user: signing in
//! writes the user before the status, signing out drops the status before
//! the user. Mutations are serialized by an internal lock.

use crate::{AuthError, AuthStatus};
use parking_lot::Mutex;
use tokio::sync::watch;
use workwise_types::{AppUser, Role, UserUpdate};

/// Observable holder of the signed-in user and auth status.
///
/// Only [`AuthActions`](crate::AuthActions) writes to the store in a
/// running application; everything else subscribes.
///
/// # Example
///
/// ```
/// use workwise_auth::{AuthStatus, IdentityStore};
/// use workwise_types::{AppUser, Role, UserId};
///
/// let store = IdentityStore::new();
/// let mut role_rx = store.subscribe_role();
///
/// store.set_user(Some(AppUser::new(UserId::new("1"), Role::Admin, "a@workwise.co.za")));
/// assert!(role_rx.has_changed().unwrap());
/// role_rx.borrow_and_update();
///
/// store.set_user(None);
/// assert_eq!(store.status(), AuthStatus::Unauthenticated);
/// assert!(store.current_user().is_none());
/// ```
#[derive(Debug)]
pub struct IdentityStore {
    user: watch::Sender<Option<AppUser>>,
    role: watch::Sender<Option<Role>>,
    status: watch::Sender<AuthStatus>,
    write: Mutex<()>,
}

impl IdentityStore {
    /// Creates an empty, unauthenticated store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_status(AuthStatus::Unauthenticated)
    }

    /// Creates an empty store in the given initial status.
    ///
    /// Use [`AuthStatus::Authenticating`] when a session check starts
    /// immediately. [`AuthStatus::Authenticated`] is downgraded because
    /// the store has no user yet.
    #[must_use]
    pub fn with_status(status: AuthStatus) -> Self {
        let status = if status.is_authenticated() {
            AuthStatus::Unauthenticated
        } else {
            status
        };
        let (user, _) = watch::channel(None);
        let (role, _) = watch::channel(None);
        let (status, _) = watch::channel(status);
        Self {
            user,
            role,
            status,
            write: Mutex::new(()),
        }
    }

    /// Snapshot of the current user.
    #[must_use]
    pub fn current_user(&self) -> Option<AppUser> {
        self.user.borrow().clone()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        *self.status.borrow()
    }

    /// Role of the current user, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        *self.role.borrow()
    }

    /// Runs `f` against the current user without cloning it.
    pub fn with_user<R>(&self, f: impl FnOnce(Option<&AppUser>) -> R) -> R {
        f(self.user.borrow().as_ref())
    }

    /// Subscribes to the user slice.
    #[must_use]
    pub fn subscribe_user(&self) -> watch::Receiver<Option<AppUser>> {
        self.user.subscribe()
    }

    /// Subscribes to the role slice.
    #[must_use]
    pub fn subscribe_role(&self) -> watch::Receiver<Option<Role>> {
        self.role.subscribe()
    }

    /// Subscribes to the status slice.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// Replaces the identity.
    ///
    /// `None` also forces the status to [`AuthStatus::Unauthenticated`].
    /// `Some` leaves the status alone; see [`authenticate`](Self::authenticate)
    /// for the combined write.
    pub fn set_user(&self, user: Option<AppUser>) {
        let _guard = self.write.lock();
        match user {
            Some(user) => self.publish_user(Some(user)),
            None => {
                self.publish_status(AuthStatus::Unauthenticated);
                self.publish_user(None);
            }
        }
    }

    /// Merges `update` into the current user, all or nothing.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] if no user is set
    /// - [`AuthError::Validation`] if any field is invalid; nothing is applied
    pub fn update_user(&self, update: &UserUpdate) -> Result<AppUser, AuthError> {
        let _guard = self.write.lock();
        let mut user = self.user.borrow().clone().ok_or(AuthError::NotAuthenticated)?;
        update.validate()?;
        user.apply(update);
        self.publish_user(Some(user.clone()));
        Ok(user)
    }

    /// Moves the status along the state machine.
    ///
    /// Sign-in and sign-out go through [`authenticate`](Self::authenticate)
    /// and [`set_user`](Self::set_user), which write user and status together.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] when asked for
    ///   [`AuthStatus::Authenticated`] with no user set
    /// - [`AuthError::InvalidTransition`] when the current status cannot
    ///   move to `status`; nothing changes
    pub fn set_status(&self, status: AuthStatus) -> Result<(), AuthError> {
        let _guard = self.write.lock();
        if status.is_authenticated() && self.user.borrow().is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        let from = *self.status.borrow();
        if !from.can_transition_to(status) {
            return Err(AuthError::InvalidTransition { from, to: status });
        }
        self.publish_status(status);
        Ok(())
    }

    /// Installs `user` and then flips the status to authenticated.
    pub fn authenticate(&self, user: AppUser) {
        let _guard = self.write.lock();
        self.publish_user(Some(user));
        self.publish_status(AuthStatus::Authenticated);
    }

    /// Clears the user; status becomes unauthenticated.
    pub fn clear(&self) {
        self.set_user(None);
    }

    fn publish_user(&self, user: Option<AppUser>) {
        let role = user.as_ref().map(|u| u.role);
        self.user.send_if_modified(|current| {
            if *current == user {
                false
            } else {
                *current = user;
                true
            }
        });
        self.role.send_if_modified(|current| {
            if *current == role {
                false
            } else {
                *current = role;
                true
            }
        });
    }

    fn publish_status(&self, status: AuthStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::new()
    }
}
