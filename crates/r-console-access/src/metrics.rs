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
use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::guard::Decision;

/// Navigation metrics exported via Prometheus.
#[derive(Clone)]
pub struct AccessMetrics {
    registry: Arc<Registry>,
    decisions_total: IntCounterVec,
    unresolved_paths_total: IntCounter,
    menu_builds_total: IntCounter,
}

impl AccessMetrics {
    /// Register metrics with the provided registry.
    pub fn new(registry: Arc<Registry>) -> anyhow::Result<Self> {
        let decisions_total = IntCounterVec::new(
            Opts::new(
                "navigation_decisions_total",
                "Access guard decisions by outcome",
            ),
            &["outcome"],
        )?;
        let unresolved_paths_total = IntCounter::new(
            "navigation_unresolved_paths_total",
            "Navigation attempts for paths missing from the route registry",
        )?;
        let menu_builds_total =
            IntCounter::new("navigation_menu_builds_total", "Menu trees derived")?;

        registry.register(Box::new(decisions_total.clone()))?;
        registry.register(Box::new(unresolved_paths_total.clone()))?;
        registry.register(Box::new(menu_builds_total.clone()))?;

        Ok(Self {
            registry,
            decisions_total,
            unresolved_paths_total,
            menu_builds_total,
        })
    }

    /// Access the underlying registry.
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Count a guard decision under its outcome label.
    pub fn record_decision(&self, decision: &Decision) {
        self.decisions_total
            .with_label_values(&[decision.outcome()])
            .inc();
    }

    /// Count a path the registry could not resolve.
    pub fn inc_unresolved(&self) {
        self.unresolved_paths_total.inc();
    }

    /// Count a menu derivation.
    pub fn inc_menu_build(&self) {
        self.menu_builds_total.inc();
    }

    /// Current count for one decision outcome.
    pub fn decisions(&self, outcome: &str) -> u64 {
        self.decisions_total.with_label_values(&[outcome]).get()
    }

    pub fn unresolved(&self) -> u64 {
        self.unresolved_paths_total.get()
    }

    pub fn menu_builds(&self) -> u64 {
        self.menu_builds_total.get()
    }
}

impl fmt::Debug for AccessMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessMetrics")
            .field("menu_builds", &self.menu_builds())
            .field("unresolved", &self.unresolved())
            .finish_non_exhaustive()
    }
}
