//! Auth configuration with layered loading.
//!
//! # Layers
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────────┐
//! │  1. Environment variables (WORKWISE_*)       │
//! ├──────────────────────────────────────────────┤
//! │  2. ConfigLoader::with_config_file           │
//! ├──────────────────────────────────────────────┤
//! │  3. Global file (~/.workwise/auth.toml)      │
//! ├──────────────────────────────────────────────┤
//! │  4. Defaults (compile-time)                  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Files are merged key by key, so a file that only sets
//! `security.password_min_length` keeps every other value from the layer
//! below it.
//!
//! # Environment Variables
//!
//! | Variable | Field | Type |
//! |----------|-------|------|
//! | `WORKWISE_PASSWORD_MIN_LENGTH` | `security.password_min_length` | usize |
//! | `WORKWISE_REQUIRE_TERMS` | `security.require_terms` | bool |
//! | `WORKWISE_REQUIRE_EMAIL_VERIFICATION` | `guard.require_email_verification` | bool |
//!
//! # Example Configuration
//!
//! ```toml
//! [security]
//! password_min_length = 10
//! require_terms = true
//!
//! [guard]
//! require_email_verification = true
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{AuthConfig, GuardConfig, SecurityConfig};

/// Directory name under the home directory.
pub const CONFIG_DIR: &str = ".workwise";

/// Config file name.
pub const CONFIG_FILE: &str = "auth.toml";

/// Default global config path (`~/.workwise/auth.toml`).
#[must_use]
pub fn default_config_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}
