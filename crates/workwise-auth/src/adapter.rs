//! Identity provider boundary.
//!
//! [`IdentityAdapter`] is the single calling convention auth actions use
//! to reach the external identity provider, whatever its own transport
//! (callbacks, promises, REST). Implementations translate provider
//! failures into [`AdapterError`]; [`AdapterError::into_auth_error`] then
//! maps them onto the [`AuthError`] taxonomy.
//!
//! # Architecture
//!
//! ```text
//! AuthActions ──► IdentityAdapter (trait, this module)
//!                      │
//!                      ├── MemoryIdentityAdapter (crate::testing)
//!                      └── provider SDK bindings (application side)
//! ```

use crate::AuthError;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use workwise_types::{AppUser, Credentials, RegisterData, UserId, UserUpdate};

/// Feed of provider-side auth state changes (`None` = signed out).
pub type AuthStateReceiver = broadcast::Receiver<Option<AppUser>>;

/// Operations the identity provider offers.
///
/// All methods are asynchronous and may suspend at the network boundary.
#[async_trait]
pub trait IdentityAdapter: Send + Sync {
    /// Signs in with e-mail and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AppUser, AdapterError>;

    /// Creates an account and signs it in.
    async fn sign_up(&self, data: &RegisterData) -> Result<AppUser, AdapterError>;

    /// Ends the provider session.
    async fn sign_out(&self) -> Result<(), AdapterError>;

    /// Persists a profile update for `id`.
    async fn update_profile(&self, id: &UserId, update: &UserUpdate) -> Result<(), AdapterError>;

    /// Returns the user of an existing provider session, if any.
    async fn current_user(&self) -> Result<Option<AppUser>, AdapterError>;

    /// Sends a password-reset e-mail.
    async fn reset_password(&self, email: &str) -> Result<(), AdapterError>;

    /// Subscribes to provider-side auth state changes.
    fn subscribe(&self) -> AuthStateReceiver;
}

/// Failure reported by an identity provider.
///
/// Variants follow the provider's `auth/*` code vocabulary; see
/// [`from_code`](Self::from_code).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("user not found")]
    UserNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("user disabled")]
    UserDisabled,
    #[error("email already in use")]
    EmailAlreadyInUse,
    #[error("weak password")]
    WeakPassword,
    #[error("invalid email")]
    InvalidEmail,
    #[error("too many requests")]
    TooManyRequests,
    #[error("network request failed: {0}")]
    Network(String),
    #[error("no current user")]
    NoCurrentUser,
    #[error("provider error [{code}]: {message}")]
    Other { code: String, message: String },
}

impl AdapterError {
    /// Parses a provider error code such as `auth/wrong-password`.
    ///
    /// Unknown codes become [`AdapterError::Other`].
    ///
    /// # Example
    ///
    /// ```
    /// use workwise_auth::AdapterError;
    ///
    /// assert_eq!(
    ///     AdapterError::from_code("auth/user-disabled", "disabled"),
    ///     AdapterError::UserDisabled
    /// );
    /// assert!(matches!(
    ///     AdapterError::from_code("auth/popup-blocked", "blocked"),
    ///     AdapterError::Other { .. }
    /// ));
    /// ```
    #[must_use]
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        match code {
            "auth/user-not-found" => Self::UserNotFound,
            "auth/wrong-password" | "auth/invalid-credential" => Self::WrongPassword,
            "auth/user-disabled" | "auth/account-disabled" => Self::UserDisabled,
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/weak-password" => Self::WeakPassword,
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/too-many-requests" => Self::TooManyRequests,
            "auth/network-request-failed" => Self::Network(message.into()),
            "auth/no-current-user" | "auth/invalid-token" | "auth/token-expired" => {
                Self::NoCurrentUser
            }
            _ => Self::Other {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    /// Maps onto the auth taxonomy.
    ///
    /// `min_password_length` fills in [`AuthError::WeakPassword`], since
    /// providers do not report their threshold.
    #[must_use]
    pub fn into_auth_error(self, min_password_length: usize) -> AuthError {
        match self {
            Self::UserNotFound | Self::WrongPassword => AuthError::InvalidCredentials,
            Self::UserDisabled => AuthError::AccountDisabled,
            Self::EmailAlreadyInUse => AuthError::EmailAlreadyInUse,
            Self::WeakPassword => AuthError::WeakPassword {
                min_length: min_password_length,
            },
            Self::InvalidEmail => AuthError::validation("email", "is not a valid address"),
            Self::TooManyRequests => AuthError::TooManyRequests,
            Self::Network(detail) => AuthError::Network(detail),
            Self::NoCurrentUser => AuthError::NotAuthenticated,
            Self::Other { code, message } => AuthError::Provider { code, message },
        }
    }
}
