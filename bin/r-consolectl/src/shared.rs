//! ---
//! console_section: "05-external-interfaces"
//! console_subsection: "binary"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Control CLI for administrators inspecting R-Console navigation."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use r_console_access::{Permission, PermissionSet, RouteRegistry};
use r_console_common::config::AppConfig;
use r_console_logging::{log_system_event, LogContext, SystemEventOutcome};

/// Shared option for commands that read the console configuration.
#[derive(Debug, Args)]
pub struct ConfigOptions {
    /// Path to the console configuration (TOML or YAML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn load_config(options: &ConfigOptions) -> Result<AppConfig> {
    let mut candidates = Vec::new();
    if let Some(path) = &options.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/console.toml"));
    candidates.push(PathBuf::from("configs/console.yaml"));
    AppConfig::load(&candidates)
}

/// Build the registry, logging the outcome the way the application shell does at startup.
pub fn build_registry(config: &AppConfig) -> Result<RouteRegistry> {
    match RouteRegistry::from_config(&config.routes) {
        Ok(registry) => {
            log_system_event(
                None,
                "registry.build",
                "route registry published",
                SystemEventOutcome::Success,
            );
            Ok(registry)
        }
        Err(err) => {
            let message = err.to_string();
            log_system_event(
                Some(&LogContext::new()),
                "registry.build",
                &message,
                SystemEventOutcome::Fault,
            );
            Err(err).context("route table rejected")
        }
    }
}

pub fn permission_set(grants: &[String]) -> PermissionSet {
    grants.iter().cloned().map(Permission::from).collect()
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
