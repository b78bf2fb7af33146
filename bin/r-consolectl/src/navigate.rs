//! ---
//! console_section: "05-external-interfaces"
//! console_subsection: "binary"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Control CLI for administrators inspecting R-Console navigation."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use r_console_access::{AccessGuard, MenuContext, Navigation, Session};
use r_console_common::config::AppConfig;
use serde::Serialize;

use crate::shared::{build_registry, permission_set, print_json, ConfigOptions};

#[derive(Debug, Args)]
pub struct MenuCommand {
    #[command(flatten)]
    pub config: ConfigOptions,
    /// Granted permission; repeat for several (`*` grants everything).
    #[arg(long = "grant", value_name = "PERMISSION")]
    grants: Vec<String>,
    /// Currently open route, highlighted in the output.
    #[arg(long, value_name = "PATH")]
    active: Option<String>,
}

#[derive(Debug, Args)]
pub struct AuthorizeCommand {
    #[command(flatten)]
    pub config: ConfigOptions,
    /// Requested path.
    #[arg(long, value_name = "PATH")]
    path: String,
    /// Granted permission; repeat for several.
    #[arg(long = "grant", value_name = "PERMISSION")]
    grants: Vec<String>,
    /// Evaluate as a session that has not logged in.
    #[arg(long)]
    anonymous: bool,
    /// Login name recorded on the guard's log events.
    #[arg(long, value_name = "NAME", conflicts_with = "anonymous")]
    user: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthorizeReport {
    path: String,
    decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_url: Option<String>,
}

pub fn run_menu(command: MenuCommand, config: &AppConfig) -> Result<()> {
    let registry = build_registry(config)?;
    let granted = permission_set(&command.grants);
    let guard = AccessGuard::new(Arc::new(registry)).with_navigation(config.navigation.clone());
    let mut ctx = MenuContext::new(&granted).with_preferences(&config.ui);
    if let Some(active) = command.active.as_deref() {
        ctx = ctx.with_active(active);
    }
    let menu = guard.menu_builder().build_with(&ctx);
    print_json(&menu)
}

pub fn run_authorize(command: AuthorizeCommand, config: &AppConfig) -> Result<()> {
    let registry = build_registry(config)?;
    let guard = AccessGuard::new(Arc::new(registry)).with_navigation(config.navigation.clone());
    let session = if command.anonymous {
        Session::anonymous()
    } else {
        let session = Session::authenticated(permission_set(&command.grants));
        match command.user.clone() {
            Some(user) => session.with_user(user),
            None => session,
        }
    };

    let not_found = |path: &str| eprintln!("no route registered for {path}");
    let report = match guard.navigate(&session, &command.path, &not_found) {
        Navigation::Decided(decision) => AuthorizeReport {
            path: command.path.clone(),
            decision: decision.outcome(),
            login_url: guard.login_url(&decision),
        },
        Navigation::Delegated => AuthorizeReport {
            path: command.path.clone(),
            decision: "not_found",
            login_url: None,
        },
    };
    print_json(&report)
}
