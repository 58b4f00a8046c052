//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};

/// Minimum password length when nothing is configured.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;

/// Root configuration after merging every layer.
///
/// # Example
///
/// ```
/// use workwise_auth::AuthConfig;
///
/// let config = AuthConfig::from_toml("[security]\npassword_min_length = 12\n").unwrap();
/// assert_eq!(config.security.password_min_length, 12);
/// assert!(config.security.require_terms);
/// assert!(!config.guard.require_email_verification);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Form validation policy for auth actions.
    pub security: SecurityConfig,
    /// Defaults applied to guards built from the context.
    pub guard: GuardConfig,
}

impl AuthConfig {
    /// Deserializes from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the input is malformed.
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Serializes to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Validation policy applied before contacting the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shortest password `register` accepts.
    pub password_min_length: usize,
    /// Reject registrations that did not accept the terms.
    pub require_terms: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
            require_terms: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Require a verified e-mail on guards built with `AuthContext::guard_for`.
    pub require_email_verification: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(AuthConfig::from_toml("").expect("parse"), AuthConfig::default());
    }

    #[test]
    fn toml_round_trip_keeps_values() {
        let mut config = AuthConfig::default();
        config.security.password_min_length = 14;
        config.guard.require_email_verification = true;

        let text = config.to_toml().expect("serialize");
        assert!(text.contains("password_min_length = 14"));
        assert_eq!(AuthConfig::from_toml(&text).expect("parse"), config);
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(AuthConfig::from_toml("[security]\npassword_min_length = \"long\"\n").is_err());
    }
}
