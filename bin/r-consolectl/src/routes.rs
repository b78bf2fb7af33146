//! ---
//! console_section: "05-external-interfaces"
//! console_subsection: "binary"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Control CLI for administrators inspecting R-Console navigation."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use anyhow::Result;
use clap::Subcommand;
use r_console_access::{RouteEntry, RouteRegistry};
use r_console_common::config::AppConfig;

use crate::shared::{build_registry, ConfigOptions};

/// Route table commands.
#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// Validate the route table (missing parents, duplicates, cycles, icons).
    Check(ConfigOptions),
    /// Print the route forest in menu order.
    List(ConfigOptions),
}

impl RoutesCommand {
    pub fn config_options(&self) -> &ConfigOptions {
        match self {
            RoutesCommand::Check(options) | RoutesCommand::List(options) => options,
        }
    }
}

pub fn run(command: RoutesCommand, config: &AppConfig) -> Result<()> {
    let registry = build_registry(config)?;
    match command {
        RoutesCommand::Check(_) => {
            println!(
                "route table ok: {} routes, {} top-level",
                registry.len(),
                registry.roots().len()
            );
        }
        RoutesCommand::List(_) => {
            for root in registry.roots() {
                print_tree(&registry, root, 0);
            }
        }
    }
    Ok(())
}

fn print_tree(registry: &RouteRegistry, entry: &RouteEntry, depth: usize) {
    let required = if entry.required.is_empty() {
        "public".to_owned()
    } else {
        entry
            .required
            .iter()
            .map(|permission| permission.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!(
        "{}{}  {}  [{}]",
        "  ".repeat(depth),
        entry.path,
        entry.label,
        required
    );
    for child in registry.children_of(&entry.path) {
        print_tree(registry, child, depth + 1);
    }
}
