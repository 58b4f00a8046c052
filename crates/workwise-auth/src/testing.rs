//! In-memory identity provider.
//!
//! [`MemoryIdentityAdapter`] keeps accounts in a map and behaves like a
//! hosted provider closely enough for tests and the CLI demo: seeded and
//! disabled accounts, injectable failures, a provider-side auth state feed,
//! and a gate that holds a sign-in in flight.
//!
//! ```
//! use workwise_auth::testing::MemoryIdentityAdapter;
//! use workwise_auth::{AdapterError, IdentityAdapter};
//! use workwise_types::{AppUser, Credentials, Role, UserId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let adapter = MemoryIdentityAdapter::new().with_account(
//!     AppUser::new(UserId::new("m-1"), Role::Moderator, "mod@workwise.co.za"),
//!     "moderate-me",
//! );
//! adapter.fail_next(AdapterError::TooManyRequests);
//!
//! let creds = Credentials::new("mod@workwise.co.za", "moderate-me");
//! assert_eq!(adapter.sign_in(&creds).await, Err(AdapterError::TooManyRequests));
//! assert!(adapter.sign_in(&creds).await.is_ok());
//! # }
//! ```

use crate::adapter::{AdapterError, AuthStateReceiver, IdentityAdapter};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};
use workwise_types::{AppUser, Credentials, RegisterData, Role, UserId, UserUpdate};

/// Shortest password the in-memory provider itself accepts.
pub const PROVIDER_MIN_PASSWORD: usize = 6;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
struct Account {
    user: AppUser,
    password: String,
    disabled: bool,
}

#[derive(Debug, Default)]
struct State {
    /// Keyed by lower-cased e-mail.
    accounts: HashMap<String, Account>,
    current: Option<String>,
    failures: VecDeque<AdapterError>,
    fail_sign_out: bool,
    sign_out_calls: usize,
    reset_requests: Vec<String>,
}

#[derive(Debug, Default)]
struct Gate {
    arrived: Notify,
    released: Notify,
}

/// Scripted identity provider backed by a `HashMap`.
#[derive(Debug)]
pub struct MemoryIdentityAdapter {
    state: Mutex<State>,
    events: Mutex<Option<broadcast::Sender<Option<AppUser>>>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl Default for MemoryIdentityAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityAdapter {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(State::default()),
            events: Mutex::new(Some(events)),
            gate: Mutex::new(None),
        }
    }

    /// Seeds an account.
    #[must_use]
    pub fn with_account(self, user: AppUser, password: impl Into<String>) -> Self {
        self.add_account(user, password);
        self
    }

    /// Adds or replaces an account.
    pub fn add_account(&self, user: AppUser, password: impl Into<String>) {
        let key = user.email.to_lowercase();
        self.state.lock().accounts.insert(
            key,
            Account {
                user,
                password: password.into(),
                disabled: false,
            },
        );
    }

    /// Marks an account disabled; later sign-ins fail with `UserDisabled`.
    pub fn disable(&self, email: &str) {
        if let Some(account) = self.state.lock().accounts.get_mut(&email.to_lowercase()) {
            account.disabled = true;
        }
    }

    /// Marks an account's e-mail as verified, as a confirmation link would.
    pub fn verify_email(&self, email: &str) {
        if let Some(account) = self.state.lock().accounts.get_mut(&email.to_lowercase()) {
            account.user.email_verified = true;
        }
    }

    /// Queues a failure for the next adapter call, whichever it is.
    pub fn fail_next(&self, err: AdapterError) {
        self.state.lock().failures.push_back(err);
    }

    /// Number of queued failures not yet consumed.
    #[must_use]
    pub fn pending_failures(&self) -> usize {
        self.state.lock().failures.len()
    }

    /// Makes every `sign_out` fail with a network error while set.
    pub fn fail_sign_out(&self, fail: bool) {
        self.state.lock().fail_sign_out = fail;
    }

    /// Starts a provider session for `email` without a sign-in call,
    /// as if it survived from an earlier visit.
    pub fn resume_session(&self, email: &str) {
        let key = email.to_lowercase();
        let mut state = self.state.lock();
        if state.accounts.contains_key(&key) {
            state.current = Some(key);
        }
    }

    /// Ends the provider session from the provider side and announces it.
    pub fn end_remote_session(&self) {
        self.state.lock().current = None;
        self.emit(None);
    }

    /// Publishes an auth state change on the feed.
    pub fn emit(&self, user: Option<AppUser>) {
        if let Some(events) = self.events.lock().as_ref() {
            // no subscribers is fine
            let _ = events.send(user);
        }
    }

    /// Closes the auth state feed; receivers drain and then see `Closed`.
    pub fn close_events(&self) {
        self.events.lock().take();
    }

    /// Holds the next `sign_in` until the returned gate is released.
    #[must_use]
    pub fn hold_sign_in(&self) -> SignInGate {
        let gate = Arc::new(Gate::default());
        *self.gate.lock() = Some(Arc::clone(&gate));
        SignInGate { gate }
    }

    /// Number of `sign_out` calls received, failed ones included.
    #[must_use]
    pub fn sign_out_calls(&self) -> usize {
        self.state.lock().sign_out_calls
    }

    /// Addresses passed to `reset_password`, in order.
    #[must_use]
    pub fn reset_requests(&self) -> Vec<String> {
        self.state.lock().reset_requests.clone()
    }

    fn take_failure(&self) -> Result<(), AdapterError> {
        match self.state.lock().failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityAdapter for MemoryIdentityAdapter {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AppUser, AdapterError> {
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.arrived.notify_one();
            gate.released.notified().await;
        }
        self.take_failure()?;

        let key = credentials.email.trim().to_lowercase();
        let user = {
            let mut state = self.state.lock();
            let account = state.accounts.get_mut(&key).ok_or(AdapterError::UserNotFound)?;
            if account.password != credentials.password {
                return Err(AdapterError::WrongPassword);
            }
            if account.disabled {
                return Err(AdapterError::UserDisabled);
            }
            account.user.last_login_at = Some(Utc::now());
            let user = account.user.clone();
            state.current = Some(key);
            user
        };
        self.emit(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, data: &RegisterData) -> Result<AppUser, AdapterError> {
        self.take_failure()?;

        let key = data.email.trim().to_lowercase();
        let user = {
            let mut state = self.state.lock();
            if state.accounts.contains_key(&key) {
                return Err(AdapterError::EmailAlreadyInUse);
            }
            if data.password.chars().count() < PROVIDER_MIN_PASSWORD {
                return Err(AdapterError::WeakPassword);
            }

            let mut user = AppUser::new(UserId::generate(), Role::JobSeeker, data.email.trim())
                .with_display_name(data.display_name.trim());
            user.metadata.location = data.location.clone();
            user.metadata.bio = data.bio.clone();
            user.metadata.willing_to_relocate = data.willing_to_relocate;
            user.last_login_at = Some(Utc::now());

            state.accounts.insert(
                key.clone(),
                Account {
                    user: user.clone(),
                    password: data.password.clone(),
                    disabled: false,
                },
            );
            state.current = Some(key);
            user
        };
        self.emit(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AdapterError> {
        {
            let mut state = self.state.lock();
            state.sign_out_calls += 1;
            if state.fail_sign_out {
                return Err(AdapterError::Network("sign-out request failed".into()));
            }
            if let Some(err) = state.failures.pop_front() {
                return Err(err);
            }
            state.current = None;
        }
        self.emit(None);
        Ok(())
    }

    async fn update_profile(&self, id: &UserId, update: &UserUpdate) -> Result<(), AdapterError> {
        self.take_failure()?;

        let mut state = self.state.lock();
        let account = state
            .accounts
            .values_mut()
            .find(|a| a.user.id == *id)
            .ok_or(AdapterError::NoCurrentUser)?;
        account.user.apply(update);
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<AppUser>, AdapterError> {
        self.take_failure()?;

        let state = self.state.lock();
        Ok(state
            .current
            .as_ref()
            .and_then(|key| state.accounts.get(key))
            .map(|account| account.user.clone()))
    }

    async fn reset_password(&self, email: &str) -> Result<(), AdapterError> {
        self.take_failure()?;

        let key = email.to_lowercase();
        let mut state = self.state.lock();
        if !state.accounts.contains_key(&key) {
            return Err(AdapterError::UserNotFound);
        }
        state.reset_requests.push(email.to_string());
        Ok(())
    }

    fn subscribe(&self) -> AuthStateReceiver {
        match self.events.lock().as_ref() {
            Some(events) => events.subscribe(),
            None => broadcast::channel(1).1,
        }
    }
}

/// Handle on a sign-in held by [`MemoryIdentityAdapter::hold_sign_in`].
#[derive(Debug, Clone)]
pub struct SignInGate {
    gate: Arc<Gate>,
}

impl SignInGate {
    /// Resolves once a `sign_in` call is waiting at the gate.
    pub async fn entered(&self) {
        self.gate.arrived.notified().await;
    }

    /// Lets the held `sign_in` continue.
    pub fn release(&self) {
        self.gate.released.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> MemoryIdentityAdapter {
        MemoryIdentityAdapter::new().with_account(
            AppUser::new(UserId::new("e-1"), Role::Employer, "Jobs@Acme.co.za"),
            "hire-people",
        )
    }

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let adapter = adapter();
        let user = adapter
            .sign_in(&Credentials::new("jobs@acme.co.za", "hire-people"))
            .await
            .unwrap();
        assert_eq!(user.id.as_str(), "e-1");
        assert!(user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn unknown_and_wrong_password_differ_at_provider_level() {
        let adapter = adapter();
        assert_eq!(
            adapter.sign_in(&Credentials::new("who@acme.co.za", "x")).await,
            Err(AdapterError::UserNotFound)
        );
        assert_eq!(
            adapter.sign_in(&Credentials::new("jobs@acme.co.za", "x")).await,
            Err(AdapterError::WrongPassword)
        );
    }

    #[tokio::test]
    async fn sign_in_announces_session() {
        let adapter = adapter();
        let mut events = adapter.subscribe();
        adapter
            .sign_in(&Credentials::new("jobs@acme.co.za", "hire-people"))
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.map(|u| u.role), Some(Role::Employer));
        assert!(adapter.current_user().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sign_up_rejects_provider_weak_password() {
        let adapter = adapter();
        let data = RegisterData {
            email: "new@acme.co.za".into(),
            password: "12345".into(),
            ..Default::default()
        };
        assert_eq!(adapter.sign_up(&data).await, Err(AdapterError::WeakPassword));
    }

    #[tokio::test]
    async fn failed_sign_out_keeps_counting() {
        let adapter = adapter();
        adapter.fail_sign_out(true);
        assert!(adapter.sign_out().await.is_err());
        assert!(adapter.sign_out().await.is_err());
        assert_eq!(adapter.sign_out_calls(), 2);
    }

    #[tokio::test]
    async fn closed_feed_reports_closed() {
        let adapter = adapter();
        adapter.close_events();
        let mut events = adapter.subscribe();
        assert!(events.recv().await.is_err());
    }

    #[tokio::test]
    async fn profile_update_persists() {
        let adapter = adapter();
        adapter.resume_session("jobs@acme.co.za");
        adapter
            .update_profile(
                &UserId::new("e-1"),
                &UserUpdate {
                    display_name: Some("Acme Hiring".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let user = adapter.current_user().await.unwrap().unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Acme Hiring"));
    }
}
