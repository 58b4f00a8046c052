//! Authentication status.
//!
//! # State Machine
//!
//! ```text
//!                  any auth action
//!  Unauthenticated ───────────────► Authenticating ──success──► Authenticated
//!        ▲                            │    ▲                        │
//!        │                     failure│    │retry                   │
//!        │                            ▼    │                        │
//!        │                           Error ┘                        │
//!        └────────────────────── logout (always) ◄──────────────────┘
//! ```
//!
//! There is no terminal state; the machine cycles for the lifetime of the
//! application. Logout is accepted from every state.

use serde::{Deserialize, Serialize};

/// Where the current session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStatus {
    /// No user is signed in.
    #[default]
    Unauthenticated,
    /// An auth action or session check is in flight.
    Authenticating,
    /// A user is signed in.
    Authenticated,
    /// The last auth action failed.
    Error,
}

impl AuthStatus {
    /// Returns `true` for [`AuthStatus::Authenticated`].
    #[must_use]
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Authenticating)
    }

    /// Returns `true` if the guard should offer sign-in.
    #[must_use]
    pub fn needs_sign_in(self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Error)
    }

    /// Returns `true` if `next` is a legal successor of `self`.
    ///
    /// Re-entering `Authenticating` from `Authenticated` covers
    /// re-authentication; moving to `Unauthenticated` is always legal.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use AuthStatus::{Authenticated, Authenticating, Error, Unauthenticated};
        match (self, next) {
            (_, Unauthenticated) => true,
            (Unauthenticated | Error | Authenticated, Authenticating) => true,
            (Authenticating, Authenticated | Error) => true,
            (a, b) => a == b,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
