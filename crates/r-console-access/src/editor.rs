//! ---
//! console_section: "02-navigation-access-control"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Permission model, route registry, menu derivation, and access guard."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
//! Selection algebra behind the role-management permission picker.
//!
//! The wildcard and concrete permissions are mutually exclusive:
//!
//! * checking `*` replaces the selection with `{*}`;
//! * unchecking `*` clears the selection;
//! * checking a concrete permission while `*` is selected replaces the
//!   selection with just that permission;
//! * otherwise concrete permissions are added and removed individually.
//!
//! The third rule means an operator who holds "all permissions" and ticks a
//! single box ends up with only that box. The behaviour is kept for
//! compatibility with existing role data; screens built on this editor should
//! make the consequence visible before saving.

use std::fmt;

use r_console_common::config::PermissionCatalogConfig;
use tracing::debug;

use crate::permission::{satisfies, Permission, PermissionSet};

/// Receives the full selection after every toggle.
pub trait ChangeListener {
    fn on_change(&mut self, permissions: &PermissionSet);
}

impl<F> ChangeListener for F
where
    F: FnMut(&PermissionSet),
{
    fn on_change(&mut self, permissions: &PermissionSet) {
        self(permissions)
    }
}

/// Stateful permission picker over an ordered catalog.
pub struct PermissionEditor {
    current: PermissionSet,
    catalog: Vec<Permission>,
    listener: Option<Box<dyn ChangeListener>>,
}

impl PermissionEditor {
    /// Start from `initial`. A starting set containing `*` is collapsed to `{*}`.
    pub fn new<I>(catalog: I, initial: PermissionSet) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        Self {
            current: initial.normalized(),
            catalog: catalog.into_iter().collect(),
            listener: None,
        }
    }

    pub fn from_config(config: &PermissionCatalogConfig, initial: PermissionSet) -> Self {
        Self::new(
            config.catalog.iter().cloned().map(Permission::from),
            initial,
        )
    }

    pub fn with_listener(mut self, listener: impl ChangeListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn current(&self) -> &PermissionSet {
        &self.current
    }

    pub fn catalog(&self) -> &[Permission] {
        &self.catalog
    }

    /// Check or uncheck `target`, notify the listener and return the new selection.
    pub fn toggle(&mut self, target: &Permission, checked: bool) -> PermissionSet {
        let next = match (target.is_wildcard(), checked) {
            (true, true) => PermissionSet::all(),
            (true, false) => PermissionSet::new(),
            (false, true) if self.current.has_wildcard() => {
                PermissionSet::from_iter([target.clone()])
            }
            (false, true) => {
                let mut next = self.current.clone();
                next.insert(target.clone());
                next
            }
            (false, false) => {
                let mut next = self.current.clone();
                next.remove(target);
                next
            }
        };
        debug!(permission = %target, checked, before = %self.current, after = %next, "permission toggled");
        self.current = next;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_change(&self.current);
        }
        self.current.clone()
    }

    /// Whether the box for `target` renders checked. Every box is checked while `*` is selected.
    pub fn is_selected(&self, target: &Permission) -> bool {
        satisfies(&self.current, target)
    }

    /// Catalog entries paired with their checked state, in catalog order.
    pub fn selection(&self) -> Vec<(&Permission, bool)> {
        self.catalog
            .iter()
            .map(|permission| (permission, self.is_selected(permission)))
            .collect()
    }
}

impl fmt::Debug for PermissionEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionEditor")
            .field("current", &self.current)
            .field("catalog", &self.catalog)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
