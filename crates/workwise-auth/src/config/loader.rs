//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.workwise/auth.toml`)
//! 3. Explicit config file
//! 4. Environment variables (`WORKWISE_*`)
//!
//! Each layer overrides the previous one key by key.

use super::{default_config_path, AuthConfig, ConfigError};
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PASSWORD_MIN_LENGTH: &str = "WORKWISE_PASSWORD_MIN_LENGTH";
const ENV_REQUIRE_TERMS: &str = "WORKWISE_REQUIRE_TERMS";
const ENV_REQUIRE_EMAIL_VERIFICATION: &str = "WORKWISE_REQUIRE_EMAIL_VERIFICATION";

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use workwise_auth::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_config_file("deploy/auth.toml")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), workwise_auth::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.workwise/auth.toml).
    global_config_path: Option<PathBuf>,

    /// File layered on top of the global config.
    config_file: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets an explicit config file.
    ///
    /// Unlike the global file, an explicit file must exist.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file cannot be read or parsed, an
    /// environment variable has the wrong type, or the merged values are
    /// out of range. A missing global file is ignored.
    pub fn load(&self) -> Result<AuthConfig, ConfigError> {
        let mut merged = toml::Table::new();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if global_path.exists() {
                merge_tables(&mut merged, read_table(&global_path)?);
                debug!(path = %global_path.display(), "Loaded global config");
            }
        }

        if let Some(ref path) = self.config_file {
            merge_tables(&mut merged, read_table(path)?);
            debug!(path = %path.display(), "Loaded config file");
        }

        let mut config: AuthConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Invalid(e.to_string()))?;

        if !self.skip_env {
            apply_env(&mut config, |name| std::env::var(name).ok())?;
        }

        validate(&config)?;
        Ok(config)
    }
}

/// Reads one layer. The file must also parse as a full config on its own,
/// so type errors are reported against the file that caused them.
fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    AuthConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;
    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Deep-merges `overlay` into `base`; nested tables merge, everything else replaces.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

/// Applies `WORKWISE_*` overrides read through `lookup`.
fn apply_env(
    config: &mut AuthConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(val) = lookup(ENV_PASSWORD_MIN_LENGTH) {
        config.security.password_min_length = val.trim().parse().map_err(|_| {
            ConfigError::invalid_env_var(ENV_PASSWORD_MIN_LENGTH, "expected positive integer")
        })?;
    }
    if let Some(val) = lookup(ENV_REQUIRE_TERMS) {
        config.security.require_terms = parse_bool(&val)
            .ok_or_else(|| ConfigError::invalid_env_var(ENV_REQUIRE_TERMS, "expected bool"))?;
    }
    if let Some(val) = lookup(ENV_REQUIRE_EMAIL_VERIFICATION) {
        config.guard.require_email_verification = parse_bool(&val).ok_or_else(|| {
            ConfigError::invalid_env_var(ENV_REQUIRE_EMAIL_VERIFICATION, "expected bool")
        })?;
    }
    Ok(())
}

fn validate(config: &AuthConfig) -> Result<(), ConfigError> {
    if config.security.password_min_length == 0 {
        return Err(ConfigError::Invalid(
            "security.password_min_length must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
