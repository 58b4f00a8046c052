//! Config files feeding into auth behavior.

use std::sync::Arc;
use tempfile::TempDir;
use workwise_auth::testing::MemoryIdentityAdapter;
use workwise_auth::{AuthConfig, AuthContext, ConfigLoader, GuardDecision};
use workwise_types::{AppUser, Credentials, ErrorCode, Permission, Role, UserId};

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn layered_files_merge_per_key() {
    let temp = TempDir::new().unwrap();
    let global = write(
        &temp,
        "global.toml",
        "[security]\npassword_min_length = 12\n\n[guard]\nrequire_email_verification = true\n",
    );
    let project = write(&temp, "project.toml", "[security]\nrequire_terms = false\n");

    let config = ConfigLoader::new()
        .with_global_config(&global)
        .with_config_file(&project)
        .skip_env_vars()
        .load()
        .unwrap();

    assert_eq!(config.security.password_min_length, 12);
    assert!(!config.security.require_terms);
    assert!(config.guard.require_email_verification);
}

#[test]
fn type_errors_point_at_the_file() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "auth.toml", "[guard]\nrequire_email_verification = \"sometimes\"\n");

    let err = ConfigLoader::new()
        .skip_global_config()
        .with_config_file(&path)
        .skip_env_vars()
        .load()
        .unwrap_err();

    assert_eq!(err.code(), "CONFIG_PARSE_TOML");
    assert!(!err.is_recoverable());
    assert!(err.to_string().contains("auth.toml"));
}

#[tokio::test]
async fn loaded_config_drives_guard_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "auth.toml", "[guard]\nrequire_email_verification = true\n");
    let config: AuthConfig = ConfigLoader::new()
        .skip_global_config()
        .with_config_file(&path)
        .skip_env_vars()
        .load()
        .unwrap();

    let adapter = MemoryIdentityAdapter::new().with_account(
        AppUser::new(UserId::new("m-1"), Role::Moderator, "mod@workwise.co.za"),
        "moderation-pw",
    );
    let adapter = Arc::new(adapter);
    let ctx = AuthContext::new(adapter.clone(), config);
    ctx.actions()
        .login(&Credentials::new("mod@workwise.co.za", "moderation-pw"))
        .await
        .unwrap();

    assert_eq!(
        ctx.guard_for(Permission::ModerateContent).decide(),
        GuardDecision::EmailVerificationRequired {
            email: "mod@workwise.co.za".into()
        }
    );

    adapter.verify_email("mod@workwise.co.za");
    ctx.actions().refresh_user().await.unwrap();
    assert!(ctx.guard_for(Permission::ModerateContent).decide().allows());
}
