//! WorkWise Auth - role-based authorization core.
//!
//! Decides, for the signed-in user, which features of the job board are
//! visible and usable. Roles map to permission sets through a fixed table;
//! the current identity lives in an observable store; auth actions talk to
//! an external identity provider; the access guard turns all of it into a
//! render decision.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  workwise-types : Role, Permission, PermissionSet, AppUser  │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     workwise-auth (THIS CRATE)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  table        : role → PermissionSet                        │
//! │  identity     : IdentityStore (user / role / status slices) │
//! │  permissions  : memoized effective permissions              │
//! │  actions      : login, register, update, logout, session    │
//! │  guard        : AccessGuard → GuardDecision                 │
//! │  context      : AuthContext wiring + config                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  IdentityAdapter (provider SDK, or testing::Memory…)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use workwise_auth::testing::MemoryIdentityAdapter;
//! use workwise_auth::{AuthConfig, AuthContext, GuardDecision};
//! use workwise_types::{AppUser, Credentials, Permission, Role, UserId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let adapter = MemoryIdentityAdapter::new().with_account(
//!     AppUser::new(UserId::new("js-9"), Role::JobSeeker, "ayanda@example.co.za"),
//!     "find-me-a-job",
//! );
//! let ctx = AuthContext::new(Arc::new(adapter), AuthConfig::default());
//!
//! ctx.actions()
//!     .login(&Credentials::new("ayanda@example.co.za", "find-me-a-job"))
//!     .await
//!     .unwrap();
//!
//! assert!(ctx.guard_for(Permission::ApplyJobs).decide().allows());
//! assert!(matches!(
//!     ctx.guard_for(Permission::PostJob).decide(),
//!     GuardDecision::InsufficientPermission { role: Role::JobSeeker, .. }
//! ));
//! # }
//! ```

mod actions;
mod adapter;
pub mod config;
mod context;
mod error;
mod guard;
mod identity;
mod permissions;
mod status;
mod table;
pub mod testing;
pub mod validation;

pub use actions::AuthActions;
pub use adapter::{AdapterError, AuthStateReceiver, IdentityAdapter};
pub use config::{AuthConfig, ConfigError, ConfigLoader, GuardConfig, SecurityConfig};
pub use context::AuthContext;
pub use error::{AuthError, AuthResult};
pub use guard::{Access, AccessGuard, AccessRequirement, GuardDecision, Rendered};
pub use identity::IdentityStore;
pub use permissions::{Permissions, PermissionsSubscription};
pub use status::AuthStatus;
pub use table::{
    permissions_for_role, permissions_for_role_name, role_permission_map, roles_granting,
};
