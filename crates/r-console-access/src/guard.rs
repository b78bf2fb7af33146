//! ---
//! console_section: "02-navigation-access-control"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Permission model, route registry, menu derivation, and access guard."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::sync::Arc;

use r_console_common::config::NavigationConfig;
use r_console_logging::{console_debug, console_warn, LogContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::menu::{first_navigable, MenuBuilder};
use crate::metrics::AccessMetrics;
use crate::permission::satisfies_all;
use crate::registry::RouteRegistry;
use crate::session::Session;

/// Outcome of one navigation attempt. Denials are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "return_path", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    /// Not logged in; carries the originally requested path for the post-login return.
    RedirectToLogin(String),
    Forbidden,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Metric/log label for the decision.
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::RedirectToLogin(_) => "redirect_to_login",
            Decision::Forbidden => "forbidden",
        }
    }

    /// Login URL with the URL-encoded return path, e.g. `/login?redirect=%2Fusers`.
    /// `None` unless this is a redirect.
    pub fn login_url(&self, navigation: &NavigationConfig) -> Option<String> {
        match self {
            Decision::RedirectToLogin(return_path) => {
                Some(login_url(navigation, return_path))
            }
            _ => None,
        }
    }
}

/// Requested path is absent from the registry. Routing, not authorization, owns this case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no route registered for '{path}'")]
pub struct UnresolvedPath {
    pub path: String,
}

/// Collaborator invoked for paths the registry cannot resolve.
pub trait NotFoundHandler {
    fn handle_not_found(&self, path: &str);
}

impl<F> NotFoundHandler for F
where
    F: Fn(&str),
{
    fn handle_not_found(&self, path: &str) {
        self(path)
    }
}

/// Result of [`AccessGuard::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Decided(Decision),
    /// Handed to the [`NotFoundHandler`].
    Delegated,
}

/// Build `login_path?param=<encoded return path>`.
///
/// The return path is percent-encoded as a URI component, so a space becomes
/// `%20` and decodes back losslessly on the client.
pub fn login_url(navigation: &NavigationConfig, return_path: &str) -> String {
    let encoded = urlencoding::encode(return_path);
    let separator = if navigation.login_path.contains('?') {
        '&'
    } else {
        '?'
    };
    format!(
        "{}{}{}={}",
        navigation.login_path, separator, navigation.redirect_param, encoded
    )
}

fn log_context<'a>(session: &'a Session, path: &'a str) -> LogContext<'a> {
    let ctx = LogContext::new().with_path(path);
    match session.user.as_deref() {
        Some(user) => ctx.with_user(user),
        None => ctx,
    }
}

fn route_key(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Stateless allow / redirect / forbid gate evaluated on every navigation attempt.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    registry: Arc<RouteRegistry>,
    navigation: NavigationConfig,
    metrics: Option<AccessMetrics>,
}

impl AccessGuard {
    pub fn new(registry: Arc<RouteRegistry>) -> Self {
        Self {
            registry,
            navigation: NavigationConfig::default(),
            metrics: None,
        }
    }

    pub fn with_navigation(mut self, navigation: NavigationConfig) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn with_metrics(mut self, metrics: AccessMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn navigation(&self) -> &NavigationConfig {
        &self.navigation
    }

    /// Menu builder over the same registry, sharing this guard's metrics.
    pub fn menu_builder(&self) -> MenuBuilder<'_> {
        let builder = MenuBuilder::new(&self.registry);
        match &self.metrics {
            Some(metrics) => builder.with_metrics(metrics),
            None => builder,
        }
    }

    /// Decide whether `session` may open `path`.
    ///
    /// Authentication is checked before the path is resolved, so an anonymous
    /// session is redirected even for unknown paths. Query strings and fragments
    /// are ignored for lookup but kept in the return path.
    pub fn authorize(&self, session: &Session, path: &str) -> Result<Decision, UnresolvedPath> {
        let ctx = log_context(session, path);
        if !session.authenticated {
            console_debug!(context = ctx, "unauthenticated navigation redirected to login");
            return Ok(self.record(Decision::RedirectToLogin(path.to_owned())));
        }

        let Some(entry) = self.registry.lookup(route_key(path)) else {
            if let Some(metrics) = &self.metrics {
                metrics.inc_unresolved();
            }
            console_debug!(context = ctx, "path not present in route registry");
            return Err(UnresolvedPath {
                path: path.to_owned(),
            });
        };

        let ctx = ctx.with_route(&entry.path);
        if satisfies_all(&session.permissions, &entry.required) {
            console_debug!(context = ctx, "navigation allowed");
            Ok(self.record(Decision::Allow))
        } else {
            console_warn!(
                context = ctx,
                "navigation forbidden; granted {} does not cover {:?}",
                session.permissions,
                entry.required
            );
            Ok(self.record(Decision::Forbidden))
        }
    }

    /// [`AccessGuard::authorize`], delegating unresolved paths to `not_found`.
    pub fn navigate(
        &self,
        session: &Session,
        path: &str,
        not_found: &dyn NotFoundHandler,
    ) -> Navigation {
        match self.authorize(session, path) {
            Ok(decision) => Navigation::Decided(decision),
            Err(unresolved) => {
                not_found.handle_not_found(&unresolved.path);
                Navigation::Delegated
            }
        }
    }

    /// Where to send a session with nowhere else to go: the first navigable menu
    /// entry it can see. `None` for anonymous sessions or an empty menu.
    pub fn landing_path(&self, session: &Session) -> Option<String> {
        if !session.authenticated {
            return None;
        }
        let menu = self.menu_builder().build(&session.permissions);
        first_navigable(&menu).map(|node| node.path.clone())
    }

    /// Login URL for a redirect decision, using this guard's navigation settings.
    pub fn login_url(&self, decision: &Decision) -> Option<String> {
        decision.login_url(&self.navigation)
    }

    fn record(&self, decision: Decision) -> Decision {
        if let Some(metrics) = &self.metrics {
            metrics.record_decision(&decision);
        }
        decision
    }
}
