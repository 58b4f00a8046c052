//! User roles.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Coarse identity category that determines a user's default permissions.
///
/// Roles are assigned by the identity provider and never change during a
/// session; promoting a user is an administrative action outside the
/// client.
///
/// | Variant | Wire name | Typical user |
/// |---------|-----------|--------------|
/// | `JobSeeker` | `job-seeker` (alias `user`) | Candidate browsing and applying |
/// | `Employer` | `employer` | Company posting vacancies |
/// | `Moderator` | `moderator` | Staff curating listings |
/// | `Admin` | `admin` | Platform operator |
///
/// # Example
///
/// ```
/// use workwise_types::Role;
///
/// assert_eq!("employer".parse::<Role>(), Ok(Role::Employer));
/// assert_eq!("user".parse::<Role>(), Ok(Role::JobSeeker));
/// assert!("superuser".parse::<Role>().is_err());
/// assert_eq!(Role::Admin.label(), "Administrator");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Candidate looking for work.
    #[serde(alias = "user")]
    JobSeeker,
    /// Company representative.
    Employer,
    /// Content moderator.
    Moderator,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Every declared role, in ascending order of reach.
    pub const ALL: [Role; 4] = [Self::JobSeeker, Self::Employer, Self::Moderator, Self::Admin];

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JobSeeker => "job-seeker",
            Self::Employer => "employer",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Returns the human-facing label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::JobSeeker => "Job Seeker",
            Self::Employer => "Employer",
            Self::Moderator => "Moderator",
            Self::Admin => "Administrator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role name that is not part of the closed [`Role`] vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "job-seeker" | "job_seeker" | "jobseeker" | "user" => Ok(Self::JobSeeker),
            "employer" => Ok(Self::Employer),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
