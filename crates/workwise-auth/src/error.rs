//! Auth error type.
//!
//! [`AuthError`] is the failure half of every [`AuthResult`]. Auth actions
//! never panic or propagate past their boundary; forms and the access
//! guard are the only layers that turn these into text.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | Bad role data | `AUTH_CONFIGURATION` | No |
//! | No signed-in user | `AUTH_NOT_AUTHENTICATED` | Yes |
//! | Wrong e-mail or password | `AUTH_INVALID_CREDENTIALS` | Yes |
//! | Account disabled | `AUTH_ACCOUNT_DISABLED` | Yes |
//! | E-mail already registered | `AUTH_EMAIL_ALREADY_IN_USE` | Yes |
//! | Password too short | `AUTH_WEAK_PASSWORD` | Yes |
//! | Invalid form field | `AUTH_VALIDATION` | Yes |
//! | Network failure | `AUTH_NETWORK` | Yes |
//! | Rate limited | `AUTH_TOO_MANY_REQUESTS` | Yes |
//! | Result arrived after logout | `AUTH_SUPERSEDED` | Yes |
//! | Illegal status change | `AUTH_INVALID_TRANSITION` | No |
//! | Unmapped provider failure | `AUTH_PROVIDER` | No |

use crate::AuthStatus;
use thiserror::Error;
use workwise_types::{AppUser, ErrorCode, FieldError, UnknownRole};

/// Outcome of an auth action.
pub type AuthResult = Result<AppUser, AuthError>;

/// Auth failure kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Role data outside the compiled-in table. A build-time data bug.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The action needs a signed-in user and there is none.
    #[error("not authenticated")]
    NotAuthenticated,

    /// E-mail/password pair rejected by the identity provider.
    #[error("invalid e-mail or password")]
    InvalidCredentials,

    /// The account exists but has been disabled.
    #[error("account disabled")]
    AccountDisabled,

    /// Registration with an e-mail that already has an account.
    #[error("e-mail already in use")]
    EmailAlreadyInUse,

    /// Password below the configured minimum length.
    #[error("password too weak: at least {min_length} characters required")]
    WeakPassword {
        /// Minimum accepted length.
        min_length: usize,
    },

    /// A form field is missing or malformed.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Offending field.
        field: &'static str,
        /// Reason shown next to the field.
        message: String,
    },

    /// The identity provider could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The identity provider is rate limiting this client.
    #[error("too many attempts, try again later")]
    TooManyRequests,

    /// The result arrived after a logout and was discarded.
    #[error("auth request superseded by a newer session change")]
    Superseded,

    /// A status change the state machine does not allow.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status before the change.
        from: AuthStatus,
        /// Requested status.
        to: AuthStatus,
    },

    /// Provider failure with no dedicated mapping.
    #[error("identity provider error [{code}]: {message}")]
    Provider {
        /// Provider-specific code.
        code: String,
        /// Provider message.
        message: String,
    },
}

impl AuthError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Text suitable for a form-level message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(_) | Self::InvalidTransition { .. } | Self::Provider { .. } => {
                "Something went wrong. Please try again later.".to_string()
            }
            Self::NotAuthenticated => "Please sign in to continue.".to_string(),
            Self::InvalidCredentials => "Invalid email or password.".to_string(),
            Self::AccountDisabled => {
                "This account has been disabled. Contact support for help.".to_string()
            }
            Self::EmailAlreadyInUse => "This email is already registered.".to_string(),
            Self::WeakPassword { min_length } => {
                format!("Password must be at least {min_length} characters.")
            }
            Self::Validation { field, message } => format!("{} {message}.", field_label(field)),
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
            Self::TooManyRequests => {
                "Too many failed attempts. Please try again later.".to_string()
            }
            Self::Superseded => "You were signed out before this finished.".to_string(),
        }
    }

    /// Returns `true` if the UI should offer a retry button.
    #[must_use]
    pub fn offers_retry(&self) -> bool {
        matches!(self, Self::Network(_) | Self::TooManyRequests)
    }
}

fn field_label(field: &str) -> String {
    let mut label = field.replace('_', " ");
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    label
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "AUTH_CONFIGURATION",
            Self::NotAuthenticated => "AUTH_NOT_AUTHENTICATED",
            Self::InvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            Self::AccountDisabled => "AUTH_ACCOUNT_DISABLED",
            Self::EmailAlreadyInUse => "AUTH_EMAIL_ALREADY_IN_USE",
            Self::WeakPassword { .. } => "AUTH_WEAK_PASSWORD",
            Self::Validation { .. } => "AUTH_VALIDATION",
            Self::Network(_) => "AUTH_NETWORK",
            Self::TooManyRequests => "AUTH_TOO_MANY_REQUESTS",
            Self::Superseded => "AUTH_SUPERSEDED",
            Self::InvalidTransition { .. } => "AUTH_INVALID_TRANSITION",
            Self::Provider { .. } => "AUTH_PROVIDER",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Configuration(_) | Self::InvalidTransition { .. } | Self::Provider { .. }
        )
    }
}

impl From<FieldError> for AuthError {
    fn from(err: FieldError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<UnknownRole> for AuthError {
    fn from(err: UnknownRole) -> Self {
        Self::Configuration(err.to_string())
    }
}
