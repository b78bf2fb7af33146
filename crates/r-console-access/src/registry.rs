//! ---
//! console_section: "02-navigation-access-control"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Permission model, route registry, menu derivation, and access guard."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::collections::HashMap;

use indexmap::IndexMap;
use r_console_common::config::RouteConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::icon::MenuIcon;
use crate::permission::Permission;

/// A navigable route and its place in the menu hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Unique routing key, e.g. `/users/new`.
    pub path: String,
    /// Display label.
    pub label: String,
    /// Every permission here must be satisfied. Empty means any authenticated session.
    #[serde(default)]
    pub required: Vec<Permission>,
    /// Parent path; `None` for top-level entries.
    #[serde(default)]
    pub parent: Option<String>,
    /// Sort key among siblings.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub icon: Option<MenuIcon>,
    /// Pure container: hidden from the menu when no child survives filtering.
    #[serde(default)]
    pub group_only: bool,
}

impl RouteEntry {
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

    pub fn requires(mut self, permission: impl Into<Permission>) -> Self {
        self.required.push(permission.into());
        self
    }

    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn ordered(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_icon(mut self, icon: MenuIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn group_only(mut self) -> Self {
        self.group_only = true;
        self
    }

    /// Convert a configuration row, resolving its icon slug.
    pub fn from_config(config: &RouteConfig) -> Result<Self, RegistryError> {
        let icon = match &config.icon {
            Some(slug) => Some(slug.parse::<MenuIcon>().map_err(|_| RegistryError::UnknownIcon {
                path: config.path.clone(),
                icon: slug.clone(),
            })?),
            None => None,
        };
        Ok(Self {
            path: config.path.clone(),
            label: config.label.clone(),
            required: config
                .required
                .iter()
                .cloned()
                .map(Permission::from)
                .collect(),
            parent: config.parent.clone(),
            order: config.order,
            icon,
            group_only: config.group_only,
        })
    }
}

/// Configuration errors detected while building the registry. Each one aborts the build.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("route '{path}' references missing parent '{parent}'")]
    RouteNotFound { path: String, parent: String },
    #[error("route path '{0}' is declared more than once")]
    DuplicateRoute(String),
    #[error("route '{0}' is part of a parent cycle")]
    CyclicRoute(String),
    #[error("route path '{0}' must start with '/'")]
    InvalidPath(String),
    #[error("route '{path}' uses unknown icon '{icon}'")]
    UnknownIcon { path: String, icon: String },
}

/// Immutable forest of routes, validated as a whole before it is handed out.
///
/// The registry is `Send + Sync` and never mutated after [`RouteRegistry::build`],
/// so it can be shared behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    entries: IndexMap<String, RouteEntry>,
    roots: Vec<usize>,
    children: HashMap<usize, Vec<usize>>,
}

impl RouteRegistry {
    /// Validate and index `entries`. Declaration order breaks `order` ties.
    pub fn build<I>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RouteEntry>,
    {
        let mut table: IndexMap<String, RouteEntry> = IndexMap::new();
        for entry in entries {
            if !entry.path.starts_with('/') {
                return Err(RegistryError::InvalidPath(entry.path));
            }
            if table.contains_key(&entry.path) {
                return Err(RegistryError::DuplicateRoute(entry.path));
            }
            table.insert(entry.path.clone(), entry);
        }

        let mut parents: Vec<Option<usize>> = Vec::with_capacity(table.len());
        for entry in table.values() {
            let parent = match &entry.parent {
                Some(parent) => Some(table.get_index_of(parent).ok_or_else(|| {
                    RegistryError::RouteNotFound {
                        path: entry.path.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };
            parents.push(parent);
        }

        for (idx, entry) in table.values().enumerate() {
            let mut cursor = parents[idx];
            let mut steps = 0;
            while let Some(up) = cursor {
                steps += 1;
                if up == idx || steps > table.len() {
                    return Err(RegistryError::CyclicRoute(entry.path.clone()));
                }
                cursor = parents[up];
            }
        }

        let mut roots = Vec::new();
        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        for (idx, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => children.entry(*parent).or_default().push(idx),
                None => roots.push(idx),
            }
        }
        let by_order = |idx: &usize| table[*idx].order;
        roots.sort_by_key(by_order);
        for siblings in children.values_mut() {
            siblings.sort_by_key(by_order);
        }

        debug!(routes = table.len(), roots = roots.len(), "route registry built");
        Ok(Self {
            entries: table,
            roots,
            children,
        })
    }

    /// Build from the configuration loader's route rows.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RegistryError> {
        let entries = routes
            .iter()
            .map(RouteEntry::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(entries)
    }

    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.get(path)
    }

    /// Top-level entries ordered by `order`, ties in declaration order.
    pub fn roots(&self) -> Vec<&RouteEntry> {
        self.resolve(&self.roots)
    }

    /// Direct children of `path` in sibling order; empty for leaves and unknown paths.
    pub fn children_of(&self, path: &str) -> Vec<&RouteEntry> {
        self.entries
            .get_index_of(path)
            .and_then(|idx| self.children.get(&idx))
            .map(|siblings| self.resolve(siblings))
            .unwrap_or_default()
    }

    /// Chain from the top-level ancestor down to `path` itself (breadcrumb trail).
    pub fn ancestors(&self, path: &str) -> Vec<&RouteEntry> {
        let mut trail = Vec::new();
        let mut cursor = self.lookup(path);
        while let Some(entry) = cursor {
            trail.push(entry);
            cursor = entry.parent.as_deref().and_then(|parent| self.lookup(parent));
        }
        trail.reverse();
        trail
    }

    /// All entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve(&self, indices: &[usize]) -> Vec<&RouteEntry> {
        indices
            .iter()
            .filter_map(|idx| self.entries.get_index(*idx).map(|(_, entry)| entry))
            .collect()
    }
}
