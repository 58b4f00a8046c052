//! Auth actions.
//!
//! [`AuthActions`] is the only writer of the [`IdentityStore`]. Each action
//! calls the [`IdentityAdapter`], then commits the outcome to the store.
//!
//! # Session generation
//!
//! Requests are not cancelled. Instead every action that will commit a
//! user records the session generation when it starts; `logout` (and a
//! provider-side sign-out) bumps it. The commit happens under the same
//! lock as the comparison, so a login that resolves after a logout is
//! dropped and reported as [`AuthError::Superseded`]:
//!
//! ```text
//! login ──begin(gen=4)──────── adapter.sign_in ───────────► commit(gen=4)? ✗ Superseded
//! logout ─────────── bump(gen=5) ─ clear ─ adapter.sign_out
//! ```
//!
//! Two logins in the same generation are not coalesced; whichever
//! resolves last wins.
//!
//! # Provider feed
//!
//! The adapter's auth-state feed echoes this client's own sign-ins and
//! sign-outs as well as remote ones, and a listener may drain it long
//! after the fact. Every local write bumps a revision number, so the feed
//! only acts on a session no local action has touched since:
//!
//! - a signed-in event is adopted only by a store still waiting for its
//!   first answer (revision 0, `Authenticating`, no user)
//! - a signed-out event ends the session only if the provider confirms
//!   there is none and the revision did not move while asking

use crate::adapter::{AdapterError, AuthStateReceiver, IdentityAdapter};
use crate::validation::{validate_credentials, validate_email, validate_registration};
use crate::{AuthError, AuthResult, AuthStatus, IdentityStore, SecurityConfig};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use workwise_types::{AppUser, Credentials, RegisterData, UserUpdate};

/// Login, registration, profile and session operations.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use workwise_auth::testing::MemoryIdentityAdapter;
/// use workwise_auth::{AuthActions, AuthStatus, IdentityStore, SecurityConfig};
/// use workwise_types::{AppUser, Credentials, Role, UserId};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let adapter = Arc::new(MemoryIdentityAdapter::new().with_account(
///     AppUser::new(UserId::new("7"), Role::Employer, "hr@acme.co.za"),
///     "s3cret-pass",
/// ));
/// let store = Arc::new(IdentityStore::new());
/// let actions = AuthActions::new(adapter, Arc::clone(&store), SecurityConfig::default());
///
/// let user = actions.login(&Credentials::new("hr@acme.co.za", "s3cret-pass")).await.unwrap();
/// assert_eq!(user.role, Role::Employer);
/// assert_eq!(store.status(), AuthStatus::Authenticated);
///
/// actions.logout().await;
/// assert!(store.current_user().is_none());
/// # }
/// ```
pub struct AuthActions {
    adapter: Arc<dyn IdentityAdapter>,
    identity: Arc<IdentityStore>,
    security: SecurityConfig,
    session: Mutex<Session>,
    next_request: AtomicU64,
}

#[derive(Debug, Default)]
struct Session {
    /// Bumped when a session ends; results started earlier are dropped.
    generation: u64,
    /// Bumped on every local write to the store.
    revision: u64,
}

impl std::fmt::Debug for AuthActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthActions")
            .field("security", &self.security)
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

impl AuthActions {
    #[must_use]
    pub fn new(
        adapter: Arc<dyn IdentityAdapter>,
        identity: Arc<IdentityStore>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            adapter,
            identity,
            security,
            session: Mutex::new(Session::default()),
            next_request: AtomicU64::new(1),
        }
    }

    /// Store this instance writes to.
    #[must_use]
    pub fn identity(&self) -> &Arc<IdentityStore> {
        &self.identity
    }

    /// Validation policy in effect.
    #[must_use]
    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    /// Signs in with e-mail and password.
    ///
    /// Blank fields are rejected locally and leave the status alone. A
    /// provider rejection moves the status to [`AuthStatus::Error`] and
    /// keeps whatever user was there.
    ///
    /// # Errors
    ///
    /// `Validation`, `InvalidCredentials`, `AccountDisabled`, `Network`,
    /// `TooManyRequests`, `Provider`, or `Superseded` if a logout ran
    /// while the request was in flight.
    pub async fn login(&self, credentials: &Credentials) -> AuthResult {
        validate_credentials(credentials)?;
        let (request, generation) = self.begin("login")?;

        match self.adapter.sign_in(credentials).await {
            Ok(user) => self.commit(request, generation, user),
            Err(err) => Err(self.fail(request, generation, err)),
        }
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// `Validation` for missing fields or unaccepted terms, `WeakPassword`
    /// below the configured length, `EmailAlreadyInUse`, `Network`, or
    /// `Superseded`.
    pub async fn register(&self, data: &RegisterData) -> AuthResult {
        validate_registration(data, &self.security)?;
        let (request, generation) = self.begin("register")?;

        match self.adapter.sign_up(data).await {
            Ok(user) => self.commit(request, generation, user),
            Err(err) => Err(self.fail(request, generation, err)),
        }
    }

    /// Persists a profile patch, then merges it into the store.
    ///
    /// The status does not change. Nothing is applied unless both the
    /// provider write and the local merge succeed.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a user, `Validation` (nothing sent to
    /// the provider), provider errors, or `Superseded`.
    pub async fn update_profile(&self, update: &UserUpdate) -> AuthResult {
        let id = self
            .identity
            .with_user(|user| user.map(|u| u.id.clone()))
            .ok_or(AuthError::NotAuthenticated)?;
        update.validate()?;

        let request = self.next_request();
        let generation = self.session.lock().generation;
        debug!(request, user = %id, "update_profile started");

        self.adapter
            .update_profile(&id, update)
            .await
            .map_err(|err| self.map_adapter_error(err))?;

        let mut session = self.session.lock();
        if session.generation != generation {
            debug!(request, "update_profile superseded by session change");
            return Err(AuthError::Superseded);
        }
        let user = self.identity.update_user(update)?;
        session.revision += 1;
        drop(session);
        info!(request, user = %user.id, "Profile updated");
        Ok(user)
    }

    /// Signs out.
    ///
    /// Local state is cleared before the provider is contacted, and a
    /// provider failure is logged, not returned. Calling it twice is the
    /// same as calling it once.
    pub async fn logout(&self) {
        let generation = {
            let mut session = self.session.lock();
            session.generation += 1;
            session.revision += 1;
            self.identity.clear();
            session.generation
        };
        info!(generation, "Signed out locally");

        if let Err(err) = self.adapter.sign_out().await {
            warn!(error = %err, "Provider sign-out failed; local session already cleared");
        }
    }

    /// Adopts an existing provider session at startup.
    ///
    /// The status is `Authenticating` while the check runs. Without a
    /// session the store ends up `Unauthenticated`.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when there is no session, provider errors, or
    /// `Superseded`.
    pub async fn restore_session(&self) -> AuthResult {
        let (request, generation) = self.begin("restore_session")?;

        match self.adapter.current_user().await {
            Ok(Some(user)) => self.commit(request, generation, user),
            Ok(None) => {
                let mut session = self.session.lock();
                if session.generation == generation {
                    session.revision += 1;
                    self.identity.clear();
                }
                debug!(request, "No session to restore");
                Err(AuthError::NotAuthenticated)
            }
            Err(err) => Err(self.fail(request, generation, err)),
        }
    }

    /// Re-reads the signed-in user from the provider.
    ///
    /// Used after out-of-band changes such as e-mail verification. The
    /// status is not touched unless the provider reports the session gone,
    /// in which case it is treated like a sign-out.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when nobody is signed in locally or remotely,
    /// provider errors, or `Superseded`.
    pub async fn refresh_user(&self) -> AuthResult {
        if self.identity.current_user().is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        let request = self.next_request();
        let generation = self.session.lock().generation;

        match self.adapter.current_user().await {
            Ok(Some(user)) => {
                let mut session = self.session.lock();
                if session.generation != generation {
                    return Err(AuthError::Superseded);
                }
                session.revision += 1;
                self.identity.set_user(Some(user.clone()));
                debug!(request, user = %user.id, "User refreshed");
                Ok(user)
            }
            Ok(None) => {
                self.end_session(&mut self.session.lock(), "refresh_user");
                Err(AuthError::NotAuthenticated)
            }
            Err(err) => Err(self.map_adapter_error(err)),
        }
    }

    /// Asks the provider to send a password-reset e-mail.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed address, or the provider's error.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        self.adapter
            .reset_password(email.trim())
            .await
            .map_err(|err| self.map_adapter_error(err))?;
        info!("Password reset requested");
        Ok(())
    }

    /// Applies provider-side auth state changes until the feed closes.
    ///
    /// A confirmed sign-out from the provider clears the store and
    /// supersedes in-flight requests. Events that only echo what a local
    /// action already did, or was superseded from doing, are dropped.
    pub async fn watch_session(&self, mut events: AuthStateReceiver) {
        loop {
            match events.recv().await {
                Ok(None) => self.apply_remote_sign_out().await,
                Ok(Some(user)) => self.apply_remote_sign_in(user),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth state feed lagged");
                }
                Err(RecvError::Closed) => {
                    debug!("Auth state feed closed");
                    break;
                }
            }
        }
    }

    fn apply_remote_sign_in(&self, user: AppUser) {
        let mut session = self.session.lock();
        let waiting = session.revision == 0
            && self.identity.status().is_loading()
            && self.identity.with_user(|u| u.is_none());
        if waiting {
            session.revision += 1;
            self.identity.authenticate(user.clone());
            info!(user = %user.id, role = %user.role, "Adopted provider session");
        } else {
            debug!(user = %user.id, revision = session.revision, "Ignoring provider session");
        }
    }

    async fn apply_remote_sign_out(&self) {
        let revision = {
            let session = self.session.lock();
            let signed_in = self.identity.with_user(|u| u.is_some());
            if !signed_in || self.identity.status().is_loading() {
                return;
            }
            session.revision
        };

        match self.adapter.current_user().await {
            Ok(None) => {}
            Ok(Some(user)) => {
                debug!(user = %user.id, "Provider still signed in; sign-out event is stale");
                return;
            }
            Err(err) => {
                warn!(error = %err, "Could not confirm provider sign-out");
                return;
            }
        }

        let mut session = self.session.lock();
        if session.revision != revision {
            debug!("Session changed while confirming provider sign-out");
            return;
        }
        self.end_session(&mut session, "provider");
    }

    fn next_request(&self) -> u64 {
        self.next_request.fetch_add(1, Ordering::Relaxed)
    }

    /// Enters `Authenticating` and records the generation.
    fn begin(&self, action: &'static str) -> Result<(u64, u64), AuthError> {
        let request = self.next_request();
        let mut session = self.session.lock();
        self.identity.set_status(AuthStatus::Authenticating)?;
        session.revision += 1;
        debug!(request, action, generation = session.generation, "Auth request started");
        Ok((request, session.generation))
    }

    fn commit(&self, request: u64, generation: u64, user: AppUser) -> AuthResult {
        let mut session = self.session.lock();
        if session.generation != generation {
            debug!(
                request,
                started = generation,
                now = session.generation,
                "Discarding stale auth result"
            );
            return Err(AuthError::Superseded);
        }
        session.revision += 1;
        self.identity.authenticate(user.clone());
        drop(session);
        info!(request, user = %user.id, role = %user.role, "Authenticated");
        Ok(user)
    }

    fn fail(&self, request: u64, generation: u64, err: AdapterError) -> AuthError {
        let err = self.map_adapter_error(err);
        let mut session = self.session.lock();
        if session.generation == generation {
            // a concurrent login may already have committed
            match self.identity.set_status(AuthStatus::Error) {
                Ok(()) => session.revision += 1,
                Err(refused) => debug!(request, %refused, "Status left unchanged"),
            }
        }
        drop(session);
        warn!(request, error = %err, "Auth request failed");
        err
    }

    fn end_session(&self, session: &mut Session, source: &'static str) {
        session.generation += 1;
        session.revision += 1;
        self.identity.clear();
        info!(source, generation = session.generation, "Session ended");
    }

    fn map_adapter_error(&self, err: AdapterError) -> AuthError {
        err.into_auth_error(self.security.password_min_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryIdentityAdapter;
    use workwise_types::{Role, UserId};

    const PASSWORD: &str = "correct-horse";

    fn seeker() -> AppUser {
        AppUser::new(UserId::new("js-1"), Role::JobSeeker, "sipho@example.co.za")
            .with_display_name("Sipho")
    }

    fn setup() -> (Arc<MemoryIdentityAdapter>, Arc<IdentityStore>, AuthActions) {
        let adapter = Arc::new(MemoryIdentityAdapter::new().with_account(seeker(), PASSWORD));
        let store = Arc::new(IdentityStore::new());
        let actions = AuthActions::new(
            Arc::clone(&adapter) as Arc<dyn IdentityAdapter>,
            Arc::clone(&store),
            SecurityConfig::default(),
        );
        (adapter, store, actions)
    }

    fn registration(email: &str) -> RegisterData {
        RegisterData {
            email: email.into(),
            password: "long-enough-pw".into(),
            display_name: "Lerato".into(),
            username: "lerato".into(),
            agree_terms: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn login_success_authenticates() {
        let (_, store, actions) = setup();
        let user = actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "js-1");
        assert_eq!(store.status(), AuthStatus::Authenticated);
        assert_eq!(store.current_user().map(|u| u.role), Some(Role::JobSeeker));
    }

    #[tokio::test]
    async fn wrong_password_sets_error_and_keeps_user_empty() {
        let (_, store, actions) = setup();
        let err = actions
            .login(&Credentials::new("sipho@example.co.za", "nope"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert!(store.current_user().is_none());
        assert_eq!(store.status(), AuthStatus::Error);
    }

    #[tokio::test]
    async fn blank_fields_fail_without_status_change() {
        let (_, store, actions) = setup();
        let err = actions.login(&Credentials::new("", "")).await.unwrap_err();

        assert!(matches!(err, AuthError::Validation { field: "email", .. }));
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn disabled_account_is_reported() {
        let (adapter, store, actions) = setup();
        adapter.disable("sipho@example.co.za");

        let err = actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::AccountDisabled);
        assert_eq!(store.status(), AuthStatus::Error);
    }

    #[tokio::test]
    async fn retry_after_network_error_succeeds() {
        let (adapter, store, actions) = setup();
        adapter.fail_next(AdapterError::Network("offline".into()));
        let creds = Credentials::new("sipho@example.co.za", PASSWORD);

        let err = actions.login(&creds).await.unwrap_err();
        assert!(err.offers_retry());
        assert_eq!(store.status(), AuthStatus::Error);

        actions.login(&creds).await.unwrap();
        assert_eq!(store.status(), AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn register_creates_job_seeker() {
        let (_, store, actions) = setup();
        let user = actions.register(&registration("lerato@example.co.za")).await.unwrap();

        assert_eq!(user.role, Role::JobSeeker);
        assert_eq!(user.display_name.as_deref(), Some("Lerato"));
        assert_eq!(store.status(), AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn register_existing_email_fails() {
        let (_, store, actions) = setup();
        let err = actions
            .register(&registration("sipho@example.co.za"))
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::EmailAlreadyInUse);
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn register_weak_password_checked_locally() {
        let (_, store, actions) = setup();
        let mut data = registration("new@example.co.za");
        data.password = "short".into();

        let err = actions.register(&data).await.unwrap_err();
        assert_eq!(err, AuthError::WeakPassword { min_length: 8 });
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn update_profile_requires_user() {
        let (_, _, actions) = setup();
        let update = UserUpdate {
            display_name: Some("New".into()),
            ..Default::default()
        };
        assert_eq!(
            actions.update_profile(&update).await,
            Err(AuthError::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn update_profile_merges_and_keeps_status() {
        let (_, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();

        let user = actions
            .update_profile(&UserUpdate {
                location: Some("Gqeberha".into()),
                profile_complete: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(user.metadata.location.as_deref(), Some("Gqeberha"));
        assert!(user.profile_complete);
        assert_eq!(store.status(), AuthStatus::Authenticated);
        assert_eq!(store.current_user(), Some(user));
    }

    #[tokio::test]
    async fn invalid_update_is_not_sent() {
        let (adapter, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();
        let before = store.current_user();
        // would fail the next adapter call if one were made
        adapter.fail_next(AdapterError::Network("unreachable".into()));

        let err = actions
            .update_profile(&UserUpdate {
                display_name: Some("   ".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Validation { field: "display_name", .. }));
        assert_eq!(store.current_user(), before);
        assert_eq!(adapter.pending_failures(), 1);
    }

    #[tokio::test]
    async fn provider_failure_leaves_profile_untouched() {
        let (adapter, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();
        let before = store.current_user();
        adapter.fail_next(AdapterError::Network("timeout".into()));

        let err = actions
            .update_profile(&UserUpdate {
                bio: Some("Welder".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::Network("timeout".into()));
        assert_eq!(store.current_user(), before);
        assert_eq!(store.status(), AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn logout_clears_even_when_provider_fails() {
        let (adapter, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();
        adapter.fail_sign_out(true);

        actions.logout().await;
        assert!(store.current_user().is_none());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let (_, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();

        actions.logout().await;
        let once = (store.current_user(), store.status());
        actions.logout().await;
        assert_eq!((store.current_user(), store.status()), once);
    }

    #[tokio::test]
    async fn logout_during_login_wins() {
        let (adapter, store, actions) = setup();
        let gate = adapter.hold_sign_in();
        let creds = Credentials::new("sipho@example.co.za", PASSWORD);

        let (login, ()) = tokio::join!(actions.login(&creds), async {
            gate.entered().await;
            assert_eq!(store.status(), AuthStatus::Authenticating);
            actions.logout().await;
            gate.release();
        });

        assert_eq!(login, Err(AuthError::Superseded));
        assert!(store.current_user().is_none());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn restore_adopts_existing_session() {
        let (adapter, store, actions) = setup();
        adapter.resume_session("sipho@example.co.za");

        let user = actions.restore_session().await.unwrap();
        assert_eq!(user.email, "sipho@example.co.za");
        assert_eq!(store.status(), AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn restore_without_session_is_unauthenticated() {
        let (_, store, actions) = setup();
        assert_eq!(
            actions.restore_session().await,
            Err(AuthError::NotAuthenticated)
        );
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn refresh_picks_up_verification() {
        let (adapter, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();
        assert!(!store.current_user().unwrap().email_verified);

        adapter.verify_email("sipho@example.co.za");
        let user = actions.refresh_user().await.unwrap();
        assert!(user.email_verified);
        assert_eq!(store.status(), AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn refresh_after_remote_sign_out_clears() {
        let (adapter, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();
        adapter.end_remote_session();

        assert_eq!(actions.refresh_user().await, Err(AuthError::NotAuthenticated));
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn reset_password_validates_and_delegates() {
        let (adapter, store, actions) = setup();
        assert!(matches!(
            actions.reset_password("not-an-email").await,
            Err(AuthError::Validation { field: "email", .. })
        ));

        actions.reset_password("sipho@example.co.za").await.unwrap();
        assert_eq!(adapter.reset_requests(), vec!["sipho@example.co.za".to_string()]);
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn provider_sign_out_event_clears_store() {
        let (adapter, store, actions) = setup();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();

        let events = adapter.subscribe();
        adapter.end_remote_session();
        adapter.close_events();
        actions.watch_session(events).await;

        assert!(store.current_user().is_none());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn restoring_store_adopts_first_provider_session() {
        let adapter = Arc::new(MemoryIdentityAdapter::new().with_account(seeker(), PASSWORD));
        let store = Arc::new(IdentityStore::with_status(AuthStatus::Authenticating));
        let actions = AuthActions::new(
            Arc::clone(&adapter) as Arc<dyn IdentityAdapter>,
            Arc::clone(&store),
            SecurityConfig::default(),
        );

        let events = adapter.subscribe();
        adapter.emit(Some(seeker()));
        adapter.close_events();
        actions.watch_session(events).await;

        assert_eq!(store.status(), AuthStatus::Authenticated);
        assert_eq!(store.current_user().map(|u| u.id), Some(UserId::new("js-1")));
    }

    #[tokio::test]
    async fn sign_out_event_is_checked_with_provider() {
        let (adapter, store, actions) = setup();
        let events = adapter.subscribe();
        actions
            .login(&Credentials::new("sipho@example.co.za", PASSWORD))
            .await
            .unwrap();

        // provider still holds the session this client just opened
        adapter.emit(None);
        adapter.close_events();
        actions.watch_session(events).await;

        assert_eq!(store.status(), AuthStatus::Authenticated);
        assert!(store.current_user().is_some());
    }

    #[tokio::test]
    async fn late_failure_does_not_demote_a_committed_session() {
        let (_, store, actions) = setup();
        let creds = Credentials::new("sipho@example.co.za", PASSWORD);
        actions.login(&creds).await.unwrap();

        let (request, generation) = actions.begin("login").unwrap();
        actions.commit(request, generation, seeker()).unwrap();
        let err = actions.fail(request, generation, AdapterError::Network("late".into()));

        assert_eq!(err, AuthError::Network("late".into()));
        assert_eq!(store.status(), AuthStatus::Authenticated);
    }

    #[tokio::test]
    async fn stale_provider_session_is_not_adopted() {
        let (adapter, store, actions) = setup();
        let events = adapter.subscribe();
        adapter.emit(Some(seeker()));
        adapter.close_events();

        actions.watch_session(events).await;
        assert!(store.current_user().is_none());
        assert_eq!(store.status(), AuthStatus::Unauthenticated);
    }
}
