//! Machine-readable error codes.
//!
//! Every WorkWise error enum implements [`ErrorCode`] so that forms and
//! guards can branch on a stable code and decide whether to offer a
//! retry, without matching on display strings.
//!
//! # Code Format
//!
//! - UPPER_SNAKE_CASE, e.g. `"AUTH_INVALID_CREDENTIALS"`
//! - Prefixed with the owning domain (`AUTH_`, `CONFIG_`)
//! - Stable once published
//!
//! # Example
//!
//! ```
//! use workwise_types::ErrorCode;
//!
//! enum SessionError {
//!     Expired,
//!     Revoked,
//! }
//!
//! impl ErrorCode for SessionError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Expired => "SESSION_EXPIRED",
//!             Self::Revoked => "SESSION_REVOKED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Expired)
//!     }
//! }
//!
//! assert_eq!(SessionError::Expired.code(), "SESSION_EXPIRED");
//! assert!(!SessionError::Revoked.is_recoverable());
//! ```

/// Stable error code and retry hint.
pub trait ErrorCode {
    /// Returns the machine-readable code.
    fn code(&self) -> &'static str;

    /// Returns `true` if the user can act on the error (retry, fix input,
    /// sign in) and `false` if it signals a defect.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that `err` carries a well-formed code with the given prefix.
///
/// Intended for tests that walk every variant of an error enum.
///
/// # Panics
///
/// Panics if the code is empty, lacks `prefix`, or is not UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use workwise_types::{assert_error_code, ErrorCode};
///
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "NET_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "NET_");
/// ```
pub fn assert_error_code<E: ErrorCode + ?Sized>(err: &E, prefix: &str) {
    let code = err.code();
    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(prefix),
        "error code '{code}' must start with prefix '{prefix}'"
    );
    assert!(
        is_screaming_snake(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

fn is_screaming_snake(code: &str) -> bool {
    !code.starts_with('_')
        && !code.ends_with('_')
        && !code.contains("__")
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
