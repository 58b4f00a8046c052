//! User profile and form payloads.

use crate::{Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for a display name, in characters.
const MAX_DISPLAY_NAME: usize = 100;
/// Upper bound for a profile bio, in characters.
const MAX_BIO: usize = 500;
/// Minimum number of digits in a phone number.
const MIN_PHONE_DIGITS: usize = 7;

/// The signed-in user as seen by the client.
///
/// Constructed from the identity provider's response and owned by the
/// identity store. The role is fixed for the lifetime of the value;
/// [`UserUpdate`] cannot change it.
///
/// # Example
///
/// ```
/// use workwise_types::{AppUser, Role, UserId};
///
/// let user = AppUser::new(UserId::new("1"), Role::JobSeeker, "thandi@example.com")
///     .with_display_name("Thandi Nkosi")
///     .verified();
///
/// assert_eq!(user.display_label(), "Thandi Nkosi");
/// assert_eq!(user.initials(), "TN");
/// assert!(user.email_verified);
/// assert!(!user.profile_complete);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUser {
    pub id: UserId,
    pub role: Role,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub profile_complete: bool,
    #[serde(default)]
    pub metadata: UserMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Job-matching details kept alongside the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMetadata {
    pub location: Option<String>,
    pub bio: Option<String>,
    pub willing_to_relocate: bool,
}

impl AppUser {
    /// Creates an unverified user with an incomplete profile.
    #[must_use]
    pub fn new(id: UserId, role: Role, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            role,
            email: email.into(),
            display_name: None,
            photo_url: None,
            phone_number: None,
            email_verified: false,
            profile_complete: false,
            metadata: UserMetadata::default(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Marks the e-mail address as verified.
    #[must_use]
    pub fn verified(mut self) -> Self {
        self.email_verified = true;
        self
    }

    /// Sets the profile-completion flag.
    #[must_use]
    pub fn with_profile_complete(mut self, complete: bool) -> Self {
        self.profile_complete = complete;
        self
    }

    /// Name to greet the user with.
    ///
    /// Falls back to the local part of the e-mail address, then to `"User"`.
    #[must_use]
    pub fn display_label(&self) -> &str {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name;
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local,
            _ => "User",
        }
    }

    /// Up to two upper-case initials from the display name, `"U"` without one.
    #[must_use]
    pub fn initials(&self) -> String {
        let Some(name) = self.display_name.as_deref() else {
            return "U".to_string();
        };
        let initials: String = name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }

    /// Merges `update` into this user and stamps `updated_at`.
    ///
    /// Does not validate; callers that need all-or-nothing semantics run
    /// [`UserUpdate::validate`] first.
    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(name) = &update.display_name {
            self.display_name = Some(name.trim().to_string());
        }
        if let Some(url) = &update.photo_url {
            self.photo_url = non_empty(url);
        }
        if let Some(phone) = &update.phone_number {
            self.phone_number = non_empty(phone);
        }
        if let Some(complete) = update.profile_complete {
            self.profile_complete = complete;
        }
        if let Some(location) = &update.location {
            self.metadata.location = non_empty(location);
        }
        if let Some(bio) = &update.bio {
            self.metadata.bio = non_empty(bio);
        }
        if let Some(relocate) = update.willing_to_relocate {
            self.metadata.willing_to_relocate = relocate;
        }
        self.updated_at = Utc::now();
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A single invalid form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Partial profile update.
///
/// `None` leaves a field untouched. For optional text fields an empty
/// string clears the stored value.
///
/// # Example
///
/// ```
/// use workwise_types::UserUpdate;
///
/// let update = UserUpdate {
///     display_name: Some("Sipho".into()),
///     ..Default::default()
/// };
/// assert!(update.validate().is_ok());
///
/// let blank = UserUpdate {
///     display_name: Some("   ".into()),
///     ..Default::default()
/// };
/// assert_eq!(blank.validate().unwrap_err().field, "display_name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
    pub profile_complete: Option<bool>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub willing_to_relocate: Option<bool>,
}

impl UserUpdate {
    /// Returns `true` if the update touches no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks every field, reporting the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] naming the field that failed.
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(name) = &self.display_name {
            if name.trim().is_empty() {
                return Err(FieldError::new("display_name", "must not be blank"));
            }
            if name.chars().count() > MAX_DISPLAY_NAME {
                return Err(FieldError::new(
                    "display_name",
                    format!("must be at most {MAX_DISPLAY_NAME} characters"),
                ));
            }
        }
        if let Some(url) = self.photo_url.as_deref().map(str::trim) {
            if !url.is_empty() && !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(FieldError::new("photo_url", "must be an http(s) URL"));
            }
        }
        if let Some(phone) = self.phone_number.as_deref().map(str::trim) {
            if !phone.is_empty() && !is_phone_number(phone) {
                return Err(FieldError::new("phone_number", "is not a valid phone number"));
            }
        }
        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO {
                return Err(FieldError::new(
                    "bio",
                    format!("must be at most {MAX_BIO} characters"),
                ));
            }
        }
        Ok(())
    }
}

fn is_phone_number(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    allowed && digits >= MIN_PHONE_DIGITS && !phone[1..].contains('+')
}

/// Sign-in form payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl Credentials {
    /// Creates credentials without remember-me.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: false,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Registration form payload.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub username: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub willing_to_relocate: bool,
    pub agree_terms: bool,
}

impl std::fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterData")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("username", &self.username)
            .field("agree_terms", &self.agree_terms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AppUser {
        AppUser::new(UserId::new("7"), Role::JobSeeker, "lerato@example.com")
    }

    #[test]
    fn display_label_fallbacks() {
        let mut u = user();
        assert_eq!(u.display_label(), "lerato");

        u.display_name = Some("  ".into());
        assert_eq!(u.display_label(), "lerato");

        u.email = String::new();
        assert_eq!(u.display_label(), "User");
    }

    #[test]
    fn initials_take_two_words() {
        let u = user().with_display_name("anna maria van wyk");
        assert_eq!(u.initials(), "AM");
        assert_eq!(user().initials(), "U");
    }

    #[test]
    fn apply_merges_and_clears() {
        let mut u = user();
        u.phone_number = Some("+27 82 555 0101".into());
        let before = u.updated_at;

        u.apply(&UserUpdate {
            display_name: Some(" Lerato M ".into()),
            phone_number: Some(String::new()),
            willing_to_relocate: Some(true),
            ..Default::default()
        });

        assert_eq!(u.display_name.as_deref(), Some("Lerato M"));
        assert!(u.phone_number.is_none());
        assert!(u.metadata.willing_to_relocate);
        assert_eq!(u.role, Role::JobSeeker);
        assert!(u.updated_at >= before);
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let bad_url = UserUpdate {
            photo_url: Some("ftp://x".into()),
            ..Default::default()
        };
        assert_eq!(bad_url.validate().unwrap_err().field, "photo_url");

        let bad_phone = UserUpdate {
            phone_number: Some("12ab".into()),
            ..Default::default()
        };
        assert_eq!(bad_phone.validate().unwrap_err().field, "phone_number");

        let long_bio = UserUpdate {
            bio: Some("x".repeat(MAX_BIO + 1)),
            ..Default::default()
        };
        assert_eq!(long_bio.validate().unwrap_err().field, "bio");
    }

    #[test]
    fn validate_accepts_clearing_values() {
        let clear = UserUpdate {
            photo_url: Some(String::new()),
            phone_number: Some(" ".into()),
            ..Default::default()
        };
        assert!(clear.validate().is_ok());
        assert!(UserUpdate::default().is_empty());
        assert!(!clear.is_empty());
    }

    #[test]
    fn debug_redacts_passwords() {
        let creds = Credentials::new("a@b.co", "hunter22");
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("hunter22"), "got: {dbg}");

        let reg = RegisterData {
            password: "hunter22".into(),
            ..Default::default()
        };
        assert!(!format!("{reg:?}").contains("hunter22"));
    }
}
