//! Injectable auth context.
//!
//! [`AuthContext`] bundles the three slices (identity, permissions,
//! actions) with the loaded [`AuthConfig`]. It is cheap to clone and is
//! passed to whatever needs it; there is no global instance.

use crate::{
    Access, AccessGuard, AccessRequirement, AuthActions, AuthConfig, AuthStatus, IdentityAdapter,
    IdentityStore, Permissions,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared handle on the auth slices.
///
/// ```
/// use std::sync::Arc;
/// use workwise_auth::testing::MemoryIdentityAdapter;
/// use workwise_auth::{AuthConfig, AuthContext, GuardDecision};
/// use workwise_types::Permission;
///
/// let ctx = AuthContext::new(Arc::new(MemoryIdentityAdapter::new()), AuthConfig::default());
/// assert_eq!(
///     ctx.guard_for(Permission::ViewJobs).decide(),
///     GuardDecision::SignInRequired { after_error: false }
/// );
/// ```
#[derive(Clone)]
pub struct AuthContext {
    identity: Arc<IdentityStore>,
    permissions: Arc<Permissions>,
    actions: Arc<AuthActions>,
    adapter: Arc<dyn IdentityAdapter>,
    config: Arc<AuthConfig>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("status", &self.identity.status())
            .field("role", &self.identity.role())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Wires the slices around `adapter`.
    #[must_use]
    pub fn new(adapter: Arc<dyn IdentityAdapter>, config: AuthConfig) -> Self {
        Self::with_store(adapter, config, IdentityStore::new())
    }

    /// Like [`new`](Self::new), but the store starts in
    /// [`AuthStatus::Authenticating`] so guards show a loading state until
    /// [`AuthActions::restore_session`] settles.
    #[must_use]
    pub fn restoring(adapter: Arc<dyn IdentityAdapter>, config: AuthConfig) -> Self {
        Self::with_store(
            adapter,
            config,
            IdentityStore::with_status(AuthStatus::Authenticating),
        )
    }

    fn with_store(adapter: Arc<dyn IdentityAdapter>, config: AuthConfig, store: IdentityStore) -> Self {
        let identity = Arc::new(store);
        let permissions = Arc::new(Permissions::new(&identity));
        let actions = Arc::new(AuthActions::new(
            Arc::clone(&adapter),
            Arc::clone(&identity),
            config.security.clone(),
        ));
        Self {
            identity,
            permissions,
            actions,
            adapter,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    #[must_use]
    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    #[must_use]
    pub fn actions(&self) -> &AuthActions {
        &self.actions
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Guard for an explicit requirement, used as given.
    #[must_use]
    pub fn guard(&self, requirement: impl Into<AccessRequirement>) -> AccessGuard<'_> {
        AccessGuard::new(&self.identity, &self.permissions, requirement)
    }

    /// Guard for `access` with the configured defaults applied.
    #[must_use]
    pub fn guard_for(&self, access: impl Into<Access>) -> AccessGuard<'_> {
        let mut requirement = AccessRequirement::new(access.into());
        if self.config.guard.require_email_verification {
            requirement = requirement.require_verified_email();
        }
        self.guard(requirement)
    }

    /// Feeds provider-side auth state changes into the store on a
    /// background task. The task ends when the adapter closes its feed.
    #[must_use]
    pub fn spawn_session_listener(&self) -> JoinHandle<()> {
        let events = self.adapter.subscribe();
        let actions = Arc::clone(&self.actions);
        tokio::spawn(async move { actions.watch_session(events).await })
    }
}
