//! Atomic permissions and permission sets.
//!
//! A [`Permission`] names exactly one capability; permissions are never
//! parameterized. A [`PermissionSet`] is a bitflag set of them, cheap to
//! copy and compare, which makes it suitable as a memoized derivation
//! result.
//!
//! # Example
//!
//! ```
//! use workwise_types::{Permission, PermissionSet};
//!
//! let employer: PermissionSet = [Permission::PostJob, Permission::ViewApplicants]
//!     .into_iter()
//!     .collect();
//!
//! assert!(employer.allows(Permission::PostJob));
//! assert!(employer.allows_any(Permission::PostJob | Permission::ManageUsers));
//! assert!(!employer.allows_all(Permission::PostJob | Permission::ManageUsers));
//! assert_eq!(employer.to_string(), "post-job, view-applicants");
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// A single capability checked before rendering a view or allowing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// Open the personal dashboard.
    ViewDashboard,
    /// View one's own profile.
    ViewProfile,
    /// Edit one's own profile.
    EditProfile,
    /// Browse job listings.
    ViewJobs,
    /// Apply to a job listing.
    ApplyJobs,
    /// Publish a new vacancy.
    PostJob,
    /// Edit an existing vacancy.
    EditJob,
    /// Remove a vacancy.
    DeleteJob,
    /// See who applied to a vacancy.
    ViewApplicants,
    /// Edit the employer's company page.
    EditCompanyProfile,
    /// Hide or restore user-generated content.
    ModerateContent,
    /// Open the admin area.
    ViewAdmin,
    /// Manage user accounts.
    ManageUsers,
    /// Change platform settings.
    ManageSettings,
    /// View platform analytics.
    ViewAnalytics,
    /// Manage security settings.
    ManageSecurity,
    /// View marketing campaigns.
    ViewMarketing,
    /// Edit marketing campaigns.
    EditMarketing,
    /// Read notifications.
    ViewNotifications,
    /// Send notifications to other users.
    SendNotifications,
}

impl Permission {
    /// Every declared permission, in table order.
    pub const ALL: [Permission; 20] = [
        Self::ViewDashboard,
        Self::ViewProfile,
        Self::EditProfile,
        Self::ViewJobs,
        Self::ApplyJobs,
        Self::PostJob,
        Self::EditJob,
        Self::DeleteJob,
        Self::ViewApplicants,
        Self::EditCompanyProfile,
        Self::ModerateContent,
        Self::ViewAdmin,
        Self::ManageUsers,
        Self::ManageSettings,
        Self::ViewAnalytics,
        Self::ManageSecurity,
        Self::ViewMarketing,
        Self::EditMarketing,
        Self::ViewNotifications,
        Self::SendNotifications,
    ];

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewDashboard => "view-dashboard",
            Self::ViewProfile => "view-profile",
            Self::EditProfile => "edit-profile",
            Self::ViewJobs => "view-jobs",
            Self::ApplyJobs => "apply-jobs",
            Self::PostJob => "post-job",
            Self::EditJob => "edit-job",
            Self::DeleteJob => "delete-job",
            Self::ViewApplicants => "view-applicants",
            Self::EditCompanyProfile => "edit-company-profile",
            Self::ModerateContent => "moderate-content",
            Self::ViewAdmin => "view-admin",
            Self::ManageUsers => "manage-users",
            Self::ManageSettings => "manage-settings",
            Self::ViewAnalytics => "view-analytics",
            Self::ManageSecurity => "manage-security",
            Self::ViewMarketing => "view-marketing",
            Self::EditMarketing => "edit-marketing",
            Self::ViewNotifications => "view-notifications",
            Self::SendNotifications => "send-notifications",
        }
    }

    /// Returns the single-member set for this permission.
    #[must_use]
    pub fn flag(self) -> PermissionSet {
        match self {
            Self::ViewDashboard => PermissionSet::VIEW_DASHBOARD,
            Self::ViewProfile => PermissionSet::VIEW_PROFILE,
            Self::EditProfile => PermissionSet::EDIT_PROFILE,
            Self::ViewJobs => PermissionSet::VIEW_JOBS,
            Self::ApplyJobs => PermissionSet::APPLY_JOBS,
            Self::PostJob => PermissionSet::POST_JOB,
            Self::EditJob => PermissionSet::EDIT_JOB,
            Self::DeleteJob => PermissionSet::DELETE_JOB,
            Self::ViewApplicants => PermissionSet::VIEW_APPLICANTS,
            Self::EditCompanyProfile => PermissionSet::EDIT_COMPANY_PROFILE,
            Self::ModerateContent => PermissionSet::MODERATE_CONTENT,
            Self::ViewAdmin => PermissionSet::VIEW_ADMIN,
            Self::ManageUsers => PermissionSet::MANAGE_USERS,
            Self::ManageSettings => PermissionSet::MANAGE_SETTINGS,
            Self::ViewAnalytics => PermissionSet::VIEW_ANALYTICS,
            Self::ManageSecurity => PermissionSet::MANAGE_SECURITY,
            Self::ViewMarketing => PermissionSet::VIEW_MARKETING,
            Self::EditMarketing => PermissionSet::EDIT_MARKETING,
            Self::ViewNotifications => PermissionSet::VIEW_NOTIFICATIONS,
            Self::SendNotifications => PermissionSet::SEND_NOTIFICATIONS,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A permission name outside the closed [`Permission`] vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized permission '{0}'")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    /// Parses a kebab-case name, or a legacy `scope:action` name as stored
    /// by older provider profiles (`jobs:create`, `admin:users`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if let Some(p) = Self::ALL.into_iter().find(|p| p.as_str() == name) {
            return Ok(p);
        }
        match name.as_str() {
            "dashboard:view" => Ok(Self::ViewDashboard),
            "profile:view" => Ok(Self::ViewProfile),
            "profile:edit" => Ok(Self::EditProfile),
            "jobs:view" => Ok(Self::ViewJobs),
            "jobs:apply" => Ok(Self::ApplyJobs),
            "jobs:create" => Ok(Self::PostJob),
            "jobs:edit" => Ok(Self::EditJob),
            "jobs:delete" => Ok(Self::DeleteJob),
            "admin:view" => Ok(Self::ViewAdmin),
            "admin:users" => Ok(Self::ManageUsers),
            "admin:settings" => Ok(Self::ManageSettings),
            "admin:analytics" => Ok(Self::ViewAnalytics),
            "admin:content" => Ok(Self::ModerateContent),
            "admin:security" => Ok(Self::ManageSecurity),
            "marketing:view" => Ok(Self::ViewMarketing),
            "marketing:edit" => Ok(Self::EditMarketing),
            "notifications:view" => Ok(Self::ViewNotifications),
            "notifications:send" => Ok(Self::SendNotifications),
            _ => Err(UnknownPermission(s.to_string())),
        }
    }
}

bitflags! {
    /// Set of [`Permission`]s.
    ///
    /// Each constant mirrors one `Permission` variant; convert with
    /// [`Permission::flag`] or `PermissionSet::from(permission)`. Serializes
    /// as a list of wire names.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PermissionSet: u32 {
        const VIEW_DASHBOARD       = 1 << 0;
        const VIEW_PROFILE         = 1 << 1;
        const EDIT_PROFILE         = 1 << 2;
        const VIEW_JOBS            = 1 << 3;
        const APPLY_JOBS           = 1 << 4;
        const POST_JOB             = 1 << 5;
        const EDIT_JOB             = 1 << 6;
        const DELETE_JOB           = 1 << 7;
        const VIEW_APPLICANTS      = 1 << 8;
        const EDIT_COMPANY_PROFILE = 1 << 9;
        const MODERATE_CONTENT     = 1 << 10;
        const VIEW_ADMIN           = 1 << 11;
        const MANAGE_USERS         = 1 << 12;
        const MANAGE_SETTINGS      = 1 << 13;
        const VIEW_ANALYTICS       = 1 << 14;
        const MANAGE_SECURITY      = 1 << 15;
        const VIEW_MARKETING       = 1 << 16;
        const EDIT_MARKETING       = 1 << 17;
        const VIEW_NOTIFICATIONS   = 1 << 18;
        const SEND_NOTIFICATIONS   = 1 << 19;
    }
}

impl PermissionSet {
    /// Returns `true` if `permission` is in the set.
    #[must_use]
    pub fn allows(self, permission: Permission) -> bool {
        self.contains(permission.flag())
    }

    /// Returns `true` if at least one member of `required` is in the set.
    ///
    /// An empty `required` set is never satisfied.
    #[must_use]
    pub fn allows_any(self, required: Self) -> bool {
        self.intersects(required)
    }

    /// Returns `true` if every member of `required` is in the set.
    #[must_use]
    pub fn allows_all(self, required: Self) -> bool {
        self.contains(required)
    }

    /// Iterates the members in [`Permission::ALL`] order.
    pub fn permissions(self) -> impl Iterator<Item = Permission> {
        Permission::ALL.into_iter().filter(move |p| self.allows(*p))
    }

    /// Returns the wire names of the members.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.permissions().map(Permission::as_str).collect()
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        permission.flag()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, p| set | p.flag())
    }
}

impl std::ops::BitOr for Permission {
    type Output = PermissionSet;

    fn bitor(self, rhs: Self) -> PermissionSet {
        self.flag() | rhs.flag()
    }
}

impl std::ops::BitOr<Permission> for PermissionSet {
    type Output = PermissionSet;

    fn bitor(self, rhs: Permission) -> PermissionSet {
        self | rhs.flag()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.permissions())
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let permissions = Vec::<Permission>::deserialize(deserializer)?;
        Ok(permissions.into_iter().collect())
    }
}

impl std::fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            f.write_str("(none)")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}
