//! Form checks run before the identity provider is contacted.
//!
//! Each check stops at the first failure, mirroring how the forms show a
//! single message at a time. Order for registration: required fields,
//! e-mail shape, password length, terms.

use crate::{AuthError, SecurityConfig};
use workwise_types::{Credentials, RegisterData};

/// Checks a login form.
///
/// # Errors
///
/// [`AuthError::Validation`] for a blank field or malformed e-mail.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), AuthError> {
    require("email", &credentials.email)?;
    if credentials.password.is_empty() {
        return Err(AuthError::validation("password", "is required"));
    }
    validate_email(&credentials.email)
}

/// Checks a registration form against `security`.
///
/// # Errors
///
/// - [`AuthError::Validation`] for a missing field, malformed e-mail or
///   unaccepted terms
/// - [`AuthError::WeakPassword`] when the password is shorter than
///   `security.password_min_length` characters
pub fn validate_registration(data: &RegisterData, security: &SecurityConfig) -> Result<(), AuthError> {
    require("email", &data.email)?;
    if data.password.is_empty() {
        return Err(AuthError::validation("password", "is required"));
    }
    require("display_name", &data.display_name)?;
    require("username", &data.username)?;
    validate_email(&data.email)?;

    if data.password.chars().count() < security.password_min_length {
        return Err(AuthError::WeakPassword {
            min_length: security.password_min_length,
        });
    }
    if security.require_terms && !data.agree_terms {
        return Err(AuthError::validation(
            "agree_terms",
            "must be accepted to create an account",
        ));
    }
    Ok(())
}

/// Checks the `local@domain.tld` shape. Deliverability is the provider's job.
///
/// # Errors
///
/// [`AuthError::Validation`] on field `email`.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.contains(char::is_whitespace)
    });
    if well_formed {
        Ok(())
    } else {
        Err(AuthError::validation("email", "is not a valid address"))
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::validation(field, "is required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterData {
        RegisterData {
            email: "thandi@example.co.za".into(),
            password: "correct-horse".into(),
            display_name: "Thandi Nkosi".into(),
            username: "thandi".into(),
            agree_terms: true,
            ..Default::default()
        }
    }

    fn field_of(err: AuthError) -> &'static str {
        match err {
            AuthError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let err = validate_credentials(&Credentials::new("", "secret")).unwrap_err();
        assert_eq!(field_of(err), "email");

        let err = validate_credentials(&Credentials::new("a@b.co", "")).unwrap_err();
        assert_eq!(field_of(err), "password");

        assert!(validate_credentials(&Credentials::new("a@b.co", "x")).is_ok());
    }

    #[test]
    fn email_shapes() {
        for ok in ["a@b.co", "first.last@mail.example.org", " padded@site.net "] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
        for bad in ["plain", "@b.co", "a@b", "a@.co", "a@b.", "a@@b.co", "a b@c.co"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn registration_accepts_complete_form() {
        assert!(validate_registration(&registration(), &SecurityConfig::default()).is_ok());
    }

    #[test]
    fn registration_missing_fields_in_order() {
        let mut data = registration();
        data.username = "  ".into();
        let err = validate_registration(&data, &SecurityConfig::default()).unwrap_err();
        assert_eq!(field_of(err), "username");

        data.display_name.clear();
        let err = validate_registration(&data, &SecurityConfig::default()).unwrap_err();
        assert_eq!(field_of(err), "display_name");
    }

    #[test]
    fn short_password_uses_configured_minimum() {
        let mut data = registration();
        data.password = "abcdefghi".into();
        let security = SecurityConfig {
            password_min_length: 10,
            ..Default::default()
        };

        assert_eq!(
            validate_registration(&data, &security),
            Err(AuthError::WeakPassword { min_length: 10 })
        );
        assert!(validate_registration(&data, &SecurityConfig::default()).is_ok());
    }

    #[test]
    fn terms_only_enforced_when_required() {
        let mut data = registration();
        data.agree_terms = false;

        let err = validate_registration(&data, &SecurityConfig::default()).unwrap_err();
        assert_eq!(field_of(err), "agree_terms");

        let relaxed = SecurityConfig {
            require_terms: false,
            ..Default::default()
        };
        assert!(validate_registration(&data, &relaxed).is_ok());
    }
}
