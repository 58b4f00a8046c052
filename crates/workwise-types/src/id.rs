//! User identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to a user by the identity provider.
///
/// Providers hand out opaque strings (`"1"`, `"k3PQ..."`), so the value is
/// kept verbatim rather than parsed into a UUID. [`UserId::generate`]
/// mints a random UUID-backed id for providers that let the client
/// choose.
///
/// # Example
///
/// ```
/// use workwise_types::UserId;
///
/// let id = UserId::new("1");
/// assert_eq!(id.as_str(), "1");
/// assert_eq!(id.to_string(), "1");
///
/// assert_ne!(UserId::generate(), UserId::generate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a provider-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a random identifier (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids() {
        let id = UserId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserId::new("abc");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"abc\"");
    }
}
