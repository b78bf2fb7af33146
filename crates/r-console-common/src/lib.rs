//! ---
//! console_section: "01-core-functionality"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Shared primitives and utilities for the navigation core."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
//! Core shared primitives for the R-Console workspace.
//! This crate exposes configuration loading and tracing bootstrap
//! utilities consumed across the workspace.

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, LoadedAppConfig, LoggingConfig, NavigationConfig, PermissionCatalogConfig,
    RouteConfig, UiPreferences,
};
pub use logging::{init_tracing, LogFormat, TracingGuard};
