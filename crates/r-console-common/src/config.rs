//! ---
//! console_section: "01-core-functionality"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Shared primitives and utilities for the navigation core."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use crate::logging::LogFormat;

fn default_login_path() -> String {
    "/login".to_owned()
}

fn default_redirect_param() -> String {
    "redirect".to_owned()
}

fn default_console_level() -> String {
    "warn".to_owned()
}

fn default_catalog() -> Vec<String> {
    vec!["*".to_owned()]
}

/// Primary configuration object for the navigation core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub ui: UiPreferences,
    #[serde(default)]
    pub permissions: PermissionCatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Route table in declaration order. Declaration order breaks `order` ties.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "R_CONSOLE_CONFIG";

    /// Load configuration from disk, respecting the `R_CONSOLE_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Parse a configuration file. `.yaml`/`.yml` files are read as YAML, anything else as TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str::<AppConfig>(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        } else {
            toml::from_str::<AppConfig>(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    ///
    /// Route hierarchy checks (dangling parents, cycles) belong to the route
    /// registry build and are not repeated here.
    pub fn validate(&self) -> Result<()> {
        self.navigation.validate()?;
        self.permissions.validate()?;
        self.logging.validate()?;
        let mut seen = HashSet::new();
        for route in &self.routes {
            if route.path.trim().is_empty() {
                return Err(anyhow!("route '{}' must declare a non-empty path", route.label));
            }
            if !seen.insert(route.path.as_str()) {
                return Err(anyhow!("route path '{}' is declared twice", route.path));
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationConfig::default(),
            ui: UiPreferences::default(),
            permissions: PermissionCatalogConfig::default(),
            logging: LoggingConfig::default(),
            routes: Vec::new(),
        }
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// One row of the route table as supplied by the configuration loader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    pub path: String,
    pub label: String,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub group_only: bool,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            required: Vec::new(),
            parent: None,
            order: 0,
            icon: None,
            group_only: false,
        }
    }

    pub fn with_required<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn group_only(mut self) -> Self {
        self.group_only = true;
        self
    }
}

/// Where unauthenticated sessions are sent and how the return path travels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_redirect_param")]
    pub redirect_param: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            redirect_param: default_redirect_param(),
        }
    }
}

impl NavigationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.login_path.starts_with('/') {
            return Err(anyhow!(
                "navigation login_path '{}' must be absolute",
                self.login_path
            ));
        }
        if self.redirect_param.trim().is_empty() {
            return Err(anyhow!("navigation redirect_param cannot be empty"));
        }
        Ok(())
    }
}

/// Per-render presentation state injected into the menu builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UiPreferences {
    #[serde(default)]
    pub sidebar_collapsed: bool,
    /// Menu groups the operator expanded by hand.
    #[serde(default)]
    pub open_groups: BTreeSet<String>,
}

impl UiPreferences {
    pub fn collapsed() -> Self {
        Self {
            sidebar_collapsed: true,
            open_groups: BTreeSet::new(),
        }
    }

    pub fn with_open_group(mut self, path: impl Into<String>) -> Self {
        self.open_groups.insert(path.into());
        self
    }
}

/// Permissions offered by the permission editor, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionCatalogConfig {
    #[serde(default = "default_catalog")]
    pub catalog: Vec<String>,
}

impl Default for PermissionCatalogConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
        }
    }
}

impl PermissionCatalogConfig {
    pub fn validate(&self) -> Result<()> {
        let mut seen = IndexSet::new();
        for entry in &self.catalog {
            if entry.trim().is_empty() {
                return Err(anyhow!("permission catalog contains an empty entry"));
            }
            if !seen.insert(entry.as_str()) {
                return Err(anyhow!("permission catalog lists '{}' twice", entry));
            }
        }
        Ok(())
    }
}

/// Where and how tooling writes its logs.
///
/// The console layer always writes to stderr at `console_level`. A rolling
/// JSON file is only written when `directory` is set; its filter comes from
/// `R_CONSOLE_LOG` or `RUST_LOG`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_console_level")]
    pub console_level: String,
    /// File name stem for the rolling log; defaults to the service name.
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn console_filter(&self) -> Result<LevelFilter> {
        self.console_level
            .parse::<LevelFilter>()
            .with_context(|| format!("invalid logging.console_level '{}'", self.console_level))
    }

    fn validate(&self) -> Result<()> {
        self.console_filter()?;
        if let Some(prefix) = &self.file_prefix {
            if prefix.trim().is_empty() || prefix.contains(['/', '\\']) {
                return Err(anyhow!(
                    "logging.file_prefix '{}' must be a plain file name",
                    prefix
                ));
            }
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: LogFormat::default(),
            console_level: default_console_level(),
            file_prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [navigation]
        login_path = "/auth/login"

        [ui]
        sidebar_collapsed = true

        [permissions]
        catalog = ["*", "users:read", "users:write"]

        [[routes]]
        path = "/users"
        label = "用户管理"
        required = ["users:read"]
        icon = "users"

        [[routes]]
        path = "/users/new"
        label = "新建用户"
        required = ["users:write"]
        parent = "/users"
    "#;

    #[test]
    fn parses_route_table_in_declaration_order() {
        let config: AppConfig = SAMPLE.parse().unwrap();
        assert_eq!(config.navigation.login_path, "/auth/login");
        assert_eq!(config.navigation.redirect_param, "redirect");
        assert!(config.ui.sidebar_collapsed);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].path, "/users");
        assert_eq!(config.routes[1].parent.as_deref(), Some("/users"));
        assert_eq!(config.routes[1].order, 0);
        assert!(!config.routes[1].group_only);
    }

    #[test]
    fn rejects_relative_login_path() {
        let err = "[navigation]\nlogin_path = \"login\"\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("must be absolute"));
    }

    #[test]
    fn logging_defaults_to_console_only() {
        let config: AppConfig = SAMPLE.parse().unwrap();
        assert!(config.logging.directory.is_none());
        assert_eq!(config.logging.console_filter().unwrap(), LevelFilter::WARN);
    }

    #[test]
    fn rejects_unknown_console_level() {
        let err = "[logging]\nconsole_level = \"chatty\"\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(format!("{err:#}").contains("console_level"));
        let err = "[logging]\nfile_prefix = \"../escape\"\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("plain file name"));
    }

    #[test]
    fn rejects_duplicate_catalog_entries() {
        let err = "[permissions]\ncatalog = [\"*\", \"a\", \"a\"]\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn rejects_duplicate_route_paths() {
        let raw = r#"
            [[routes]]
            path = "/a"
            label = "A"
            [[routes]]
            path = "/a"
            label = "A again"
        "#;
        assert!(raw.parse::<AppConfig>().is_err());
    }

    #[test]
    fn defaults_offer_wildcard_only_catalog() {
        let config = AppConfig::default();
        assert_eq!(config.permissions.catalog, vec!["*".to_owned()]);
        assert!(config.validate().is_ok());
    }
}
