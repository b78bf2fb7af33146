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
use clap::{Parser, Subcommand};
use r_console_common::init_tracing;
use r_console_logging as logging;

use crate::shared::ConfigOptions;

mod edit;
mod navigate;
mod routes;
mod shared;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "R-Console navigation and permission inspection utility",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand, about = "Route table validation and listing")]
    Routes(routes::RoutesCommand),
    #[command(about = "Print the menu tree visible to a permission set")]
    Menu(navigate::MenuCommand),
    #[command(about = "Evaluate the access guard for one path")]
    Authorize(navigate::AuthorizeCommand),
    #[command(about = "Apply permission editor toggles and print each resulting set")]
    Edit(edit::EditCommand),
}

impl Commands {
    fn config_options(&self) -> &ConfigOptions {
        match self {
            Commands::Routes(cmd) => cmd.config_options(),
            Commands::Menu(cmd) => &cmd.config,
            Commands::Authorize(cmd) => &cmd.config,
            Commands::Edit(cmd) => &cmd.config,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match shared::load_config(cli.command.config_options()) {
        Ok(config) => config,
        Err(err) => {
            logging::init();
            return Err(err);
        }
    };
    let _tracing = init_tracing(env!("CARGO_PKG_NAME"), &config.logging)?;

    match cli.command {
        Commands::Routes(cmd) => routes::run(cmd, &config)?,
        Commands::Menu(cmd) => navigate::run_menu(cmd, &config)?,
        Commands::Authorize(cmd) => navigate::run_authorize(cmd, &config)?,
        Commands::Edit(cmd) => edit::run(cmd, &config)?,
    }
    Ok(())
}
