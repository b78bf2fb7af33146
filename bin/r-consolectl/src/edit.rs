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
use clap::Args;
use r_console_access::{Permission, PermissionEditor, PermissionSet};
use r_console_common::config::AppConfig;

use crate::shared::{permission_set, ConfigOptions};

#[derive(Debug, Args)]
pub struct EditCommand {
    #[command(flatten)]
    pub config: ConfigOptions,
    /// Starting selection; repeat for several.
    #[arg(long = "start", value_name = "PERMISSION")]
    start: Vec<String>,
    /// Toggle to apply, `PERMISSION=on` or `PERMISSION=off`; applied in order.
    #[arg(long = "toggle", value_name = "PERMISSION=on|off", value_parser = parse_toggle)]
    toggles: Vec<(String, bool)>,
}

fn parse_toggle(raw: &str) -> Result<(String, bool), String> {
    let (permission, state) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PERMISSION=on|off, got '{raw}'"))?;
    if permission.is_empty() {
        return Err(format!("missing permission in '{raw}'"));
    }
    let checked = match state.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => true,
        "off" | "false" | "0" => false,
        other => return Err(format!("unknown toggle state '{other}'")),
    };
    Ok((permission.to_owned(), checked))
}

pub fn run(command: EditCommand, config: &AppConfig) -> Result<()> {
    let mut editor = PermissionEditor::from_config(
        &config.permissions,
        permission_set(&command.start),
    )
    .with_listener(|permissions: &PermissionSet| {
        let members: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
        match serde_json::to_string(&members) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("unable to render selection: {err}"),
        }
    });

    for (permission, checked) in &command.toggles {
        editor.toggle(&Permission::from(permission.clone()), *checked);
    }

    for (permission, selected) in editor.selection() {
        println!("[{}] {}", if selected { "x" } else { " " }, permission);
    }
    Ok(())
}
