//! ---
//! console_section: "02-navigation-access-control"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Permission model, route registry, menu derivation, and access guard."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Icon identifiers a menu entry may carry. The presentation layer maps each
/// variant to an actual glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuIcon {
    Dashboard,
    Analytics,
    Users,
    Roles,
    Permissions,
    Tasks,
    Profile,
    Settings,
    Logs,
    Folder,
}

impl MenuIcon {
    /// Returns every icon the presentation layer must be able to resolve.
    pub const fn all() -> &'static [MenuIcon] {
        &[
            MenuIcon::Dashboard,
            MenuIcon::Analytics,
            MenuIcon::Users,
            MenuIcon::Roles,
            MenuIcon::Permissions,
            MenuIcon::Tasks,
            MenuIcon::Profile,
            MenuIcon::Settings,
            MenuIcon::Logs,
            MenuIcon::Folder,
        ]
    }

    /// Canonical slug used in route configuration.
    pub fn slug(self) -> &'static str {
        match self {
            MenuIcon::Dashboard => "dashboard",
            MenuIcon::Analytics => "analytics",
            MenuIcon::Users => "users",
            MenuIcon::Roles => "roles",
            MenuIcon::Permissions => "permissions",
            MenuIcon::Tasks => "tasks",
            MenuIcon::Profile => "profile",
            MenuIcon::Settings => "settings",
            MenuIcon::Logs => "logs",
            MenuIcon::Folder => "folder",
        }
    }
}

impl fmt::Display for MenuIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for MenuIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MenuIcon::all()
            .iter()
            .copied()
            .find(|icon| icon.slug() == wanted)
            .ok_or_else(|| format!("unknown menu icon: {}", s))
    }
}
