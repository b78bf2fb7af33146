//! ---
//! console_section: "03-logging"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Structured logging adapters and sinks."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Structured logging helpers shared by the navigation core and its tooling.

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for CLI tools and tests.
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(subscriber_fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Session or user identifier associated with the log event.
    pub user: Option<&'a str>,
    /// Requested navigation path.
    pub path: Option<&'a str>,
    /// Registry route the path resolved to.
    pub route: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a user identifier.
    pub fn with_user(mut self, user: &'a str) -> Self {
        self.user = Some(user);
        self
    }

    /// Attach the requested path.
    pub fn with_path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    /// Attach the resolved route.
    pub fn with_route(mut self, route: &'a str) -> Self {
        self.route = Some(route);
        self
    }
}

/// High-level outcome used when emitting lifecycle log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEventOutcome {
    /// The operation completed successfully.
    Success,
    /// The operation failed or was aborted.
    Fault,
}

impl SystemEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            SystemEventOutcome::Success => "success",
            SystemEventOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized system event with a success/fault outcome.
pub fn log_system_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: SystemEventOutcome,
) {
    let ctx = context.cloned().unwrap_or_default();
    match outcome {
        SystemEventOutcome::Success => tracing::event!(
            Level::INFO,
            event,
            outcome = outcome.as_str(),
            user = ctx.user.unwrap_or(""),
            path = ctx.path.unwrap_or(""),
            route = ctx.route.unwrap_or(""),
            message = %message
        ),
        SystemEventOutcome::Fault => tracing::event!(
            Level::ERROR,
            event,
            outcome = outcome.as_str(),
            user = ctx.user.unwrap_or(""),
            path = ctx.path.unwrap_or(""),
            route = ctx.route.unwrap_or(""),
            message = %message
        ),
    }
}
