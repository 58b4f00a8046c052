//! Core types for WorkWise authorization.
//!
//! This crate holds the identity and access vocabulary shared by every
//! WorkWise crate. It carries no authorization logic of its own.
//!
//! # Crate Architecture
//!
//! ```text
//! workwise-types  (UserId, Role, Permission, AppUser)  ◄── THIS CRATE
//!       ↑
//! workwise-auth   (IdentityStore, Permissions, AuthActions, AccessGuard)
//!       ↑
//! workwise-cli    (operator binary)
//! ```
//!
//! # Closed vocabularies
//!
//! [`Role`] and [`Permission`] are closed enums. Adding a variant is a
//! compile error everywhere a table or guard matches on them, so the
//! role table in `workwise-auth` cannot silently miss an entry.
//!
//! # Example
//!
//! ```
//! use workwise_types::{AppUser, Permission, PermissionSet, Role, UserId};
//!
//! let user = AppUser::new(UserId::new("u-1"), Role::Employer, "hr@acme.co.za");
//! assert_eq!(user.display_label(), "hr");
//!
//! let granted = PermissionSet::from(Permission::PostJob) | PermissionSet::from(Permission::ViewApplicants);
//! assert!(granted.allows(Permission::PostJob));
//! assert!(!granted.allows(Permission::ManageUsers));
//! ```

mod error;
mod id;
mod permission;
mod role;
mod user;

pub use error::{assert_error_code, ErrorCode};
pub use id::UserId;
pub use permission::{Permission, PermissionSet, UnknownPermission};
pub use role::{Role, UnknownRole};
pub use user::{AppUser, Credentials, FieldError, RegisterData, UserMetadata, UserUpdate};
