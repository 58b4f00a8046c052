//! WorkWise CLI - inspect role permissions and access decisions.
//!
//! # Commands
//!
//! - `workwise roles [--grants <P>] [--json]`: print the role → permission table
//! - `workwise check --role <ROLE> [--permission <P> | --require-role <R>]`:
//!   evaluate the access guard for a simulated user (exit code 2 when denied)
//! - `workwise demo`: run a scripted session against the in-memory provider
//!
//! # Configuration
//!
//! 1. `--config <FILE>` (layered over the global file)
//! 2. Environment variables (`WORKWISE_*`)
//! 3. Global config (`~/.workwise/auth.toml`)
//! 4. Default values
//!
//! # Environment Variables
//!
//! - `WORKWISE_PASSWORD_MIN_LENGTH`: minimum registration password length
//! - `WORKWISE_REQUIRE_TERMS`: require accepted terms on registration
//! - `WORKWISE_REQUIRE_EMAIL_VERIFICATION`: guards require a verified e-mail

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use workwise_auth::testing::MemoryIdentityAdapter;
use workwise_auth::{
    role_permission_map, roles_granting, Access, AccessRequirement, AuthConfig, AuthContext,
    ConfigLoader, GuardDecision, IdentityAdapter,
};
use workwise_types::{AppUser, Credentials, Permission, Role, UserId};

/// Exit code for a denied `check`.
const EXIT_DENIED: u8 = 2;

const DEMO_PASSWORD: &str = "demo-password";

/// WorkWise CLI - role-based access inspection
#[derive(Parser, Debug)]
#[command(name = "workwise")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Config file layered over ~/.workwise/auth.toml
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the role → permission table
    Roles {
        /// Only list the roles granting this permission
        #[arg(long, value_name = "PERMISSION")]
        grants: Option<Permission>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Evaluate the access guard for a simulated user
    Check(CheckArgs),

    /// Run a scripted session against the in-memory provider
    Demo,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Role of the simulated user
    #[arg(long, required_unless_present = "signed_out")]
    role: Option<Role>,

    /// Require this permission
    #[arg(long, conflicts_with = "require_role")]
    permission: Option<Permission>,

    /// Require exactly this role
    #[arg(long)]
    require_role: Option<Role>,

    /// Evaluate with nobody signed in
    #[arg(long, conflicts_with = "role")]
    signed_out: bool,

    /// The simulated user has verified their e-mail
    #[arg(long)]
    verified: bool,

    /// The simulated user has completed their profile
    #[arg(long)]
    complete_profile: bool,

    /// Require a verified e-mail (also: guard.require_email_verification)
    #[arg(long)]
    require_verified_email: bool,

    /// Require a completed profile
    #[arg(long)]
    require_complete_profile: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    let mut loader = ConfigLoader::new();
    if let Some(ref path) = args.config {
        loader = loader.with_config_file(path);
    }
    let config = loader
        .load()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    debug!(?config, "Resolved config");

    match args.command {
        Command::Roles { grants, json } => {
            print_roles(grants, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(check) => run_check(&check, config).await,
        Command::Demo => {
            run_demo(config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_roles(grants: Option<Permission>, as_json: bool) -> Result<()> {
    if let Some(permission) = grants {
        let roles: Vec<&str> = roles_granting(permission)
            .into_iter()
            .map(Role::as_str)
            .collect();
        if as_json {
            println!("{}", json!({ "permission": permission.as_str(), "roles": roles }));
        } else {
            println!("{permission}: {}", roles.join(", "));
        }
        return Ok(());
    }

    if as_json {
        let table: serde_json::Map<String, serde_json::Value> = role_permission_map()
            .map(|(role, set)| (role.as_str().to_string(), json!(set.names())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    for (role, set) in role_permission_map() {
        println!("{:<12} {}", role.as_str(), set);
    }
    Ok(())
}

async fn run_check(args: &CheckArgs, config: AuthConfig) -> Result<ExitCode> {
    let adapter = Arc::new(MemoryIdentityAdapter::new());
    let mut requirement = AccessRequirement::new(match (args.permission, args.require_role) {
        (Some(p), _) => Access::Permission(p),
        (None, Some(r)) => Access::Role(r),
        (None, None) => Access::SignedIn,
    });
    if args.require_verified_email || config.guard.require_email_verification {
        requirement = requirement.require_verified_email();
    }
    if args.require_complete_profile {
        requirement = requirement.require_complete_profile();
    }

    let ctx = AuthContext::new(Arc::clone(&adapter) as Arc<dyn IdentityAdapter>, config);

    let role = if args.signed_out { None } else { args.role };
    if let Some(role) = role {
        let email = format!("{}@check.workwise.local", role.as_str());
        let mut user = AppUser::new(UserId::new("check"), role, email.as_str())
            .with_profile_complete(args.complete_profile);
        if args.verified {
            user = user.verified();
        }
        adapter.add_account(user, DEMO_PASSWORD);
        ctx.actions()
            .login(&Credentials::new(email, DEMO_PASSWORD))
            .await
            .context("simulated sign-in failed")?;
    }

    let decision = ctx.guard(requirement).decide();
    info!(kind = decision.kind(), "Guard decided");

    if args.json {
        let out = json!({
            "role": role.map(Role::as_str),
            "permissions": ctx.permissions().effective_permissions().names(),
            "decision": decision.kind(),
            "message": decision.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match role {
            Some(role) => println!("role:        {role}"),
            None => println!("role:        (signed out)"),
        }
        println!("requires:    {}", requirement.access());
        println!("decision:    {}", decision.kind());
        println!("{decision}");
    }

    Ok(if decision.allows() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_DENIED)
    })
}

/// Pages shown in the demo, with what each one requires.
const DEMO_PAGES: [(&str, Access); 6] = [
    ("Dashboard", Access::Permission(Permission::ViewDashboard)),
    ("Apply for a job", Access::Permission(Permission::ApplyJobs)),
    ("Post a job", Access::Permission(Permission::PostJob)),
    ("Applicants", Access::Permission(Permission::ViewApplicants)),
    ("Moderation queue", Access::Permission(Permission::ModerateContent)),
    ("Admin console", Access::Role(Role::Admin)),
];

async fn run_demo(config: AuthConfig) -> Result<()> {
    let adapter = Arc::new(MemoryIdentityAdapter::new());
    for role in Role::ALL {
        adapter.add_account(
            AppUser::new(
                UserId::new(format!("demo-{}", role.as_str())),
                role,
                demo_email(role),
            )
            .with_display_name(role.label())
            .verified()
            .with_profile_complete(true),
            DEMO_PASSWORD,
        );
    }
    let ctx = AuthContext::new(Arc::clone(&adapter) as Arc<dyn IdentityAdapter>, config);

    for role in Role::ALL {
        let user = ctx
            .actions()
            .login(&Credentials::new(demo_email(role), DEMO_PASSWORD))
            .await
            .with_context(|| format!("demo sign-in for {role} failed"))?;
        println!("== Signed in as {} ({})", user.display_label(), role.label());
        for (page, access) in DEMO_PAGES {
            print_decision(page, &ctx.guard_for(access).decide());
        }
        ctx.actions().logout().await;
        println!();
    }

    println!("== Wrong password");
    let err = ctx
        .actions()
        .login(&Credentials::new(demo_email(Role::Employer), "not-it"))
        .await
        .err();
    if let Some(err) = err {
        println!("  login: {}", err.user_message());
    }
    print_decision("Dashboard", &ctx.guard_for(Permission::ViewDashboard).decide());
    println!();

    println!("== Logout while sign-in is in flight");
    let gate = adapter.hold_sign_in();
    let creds = Credentials::new(demo_email(Role::Admin), DEMO_PASSWORD);
    let (login, ()) = tokio::join!(ctx.actions().login(&creds), async {
        gate.entered().await;
        print_decision("Admin console", &ctx.guard_for(Role::Admin).decide());
        ctx.actions().logout().await;
        gate.release();
    });
    match login {
        Ok(user) => println!("  login: signed in as {}", user.email),
        Err(err) => println!("  login: {err}"),
    }
    print_decision("Admin console", &ctx.guard_for(Role::Admin).decide());

    Ok(())
}

fn demo_email(role: Role) -> String {
    format!("{}@demo.workwise.co.za", role.as_str())
}

fn print_decision(page: &str, decision: &GuardDecision) {
    let mark = if decision.allows() { "+" } else { "-" };
    println!("  {mark} {page:<18} {}", decision.kind());
}
