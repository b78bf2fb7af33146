//! ---
//! console_section: "02-navigation-access-control"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Permission model, route registry, menu derivation, and access guard."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::collections::HashSet;

use r_console_common::config::UiPreferences;
use serde::Serialize;
use tracing::debug;

use crate::icon::MenuIcon;
use crate::metrics::AccessMetrics;
use crate::permission::{satisfies_all, PermissionSet};
use crate::registry::{RouteEntry, RouteRegistry};

/// Sidebar entry visible to one session. Built per call and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    pub path: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<MenuIcon>,
    /// On the trail from the top level down to the active route.
    pub active: bool,
    /// Children should be drawn open.
    pub expanded: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub group_only: bool,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Depth-first search for `path` in this subtree.
    pub fn find(&self, path: &str) -> Option<&MenuNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}

/// First node, depth first, that can be navigated to (not a pure container).
pub fn first_navigable(nodes: &[MenuNode]) -> Option<&MenuNode> {
    nodes.iter().find_map(|node| {
        if node.group_only {
            first_navigable(&node.children)
        } else {
            Some(node)
        }
    })
}

/// Total number of nodes in a menu forest.
pub fn count_nodes(nodes: &[MenuNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_nodes(&node.children))
        .sum()
}

/// Inputs for one menu derivation: granted permissions plus the injected UI state.
#[derive(Debug, Clone, Copy)]
pub struct MenuContext<'a> {
    pub granted: &'a PermissionSet,
    pub active_path: Option<&'a str>,
    pub preferences: Option<&'a UiPreferences>,
}

impl<'a> MenuContext<'a> {
    pub fn new(granted: &'a PermissionSet) -> Self {
        Self {
            granted,
            active_path: None,
            preferences: None,
        }
    }

    pub fn with_active(mut self, path: &'a str) -> Self {
        self.active_path = Some(path);
        self
    }

    pub fn with_preferences(mut self, preferences: &'a UiPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}

/// Derives permission-filtered menu trees from a [`RouteRegistry`] without mutating it.
#[derive(Debug, Clone, Copy)]
pub struct MenuBuilder<'r> {
    registry: &'r RouteRegistry,
    metrics: Option<&'r AccessMetrics>,
}

impl<'r> MenuBuilder<'r> {
    pub fn new(registry: &'r RouteRegistry) -> Self {
        Self {
            registry,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: &'r AccessMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Menu for `granted` with no active route and default preferences.
    pub fn build(&self, granted: &PermissionSet) -> Vec<MenuNode> {
        self.build_with(&MenuContext::new(granted))
    }

    /// Depth-first derivation. A route whose requirement fails hides its whole
    /// subtree, whatever its descendants require.
    pub fn build_with(&self, ctx: &MenuContext<'_>) -> Vec<MenuNode> {
        let trail: HashSet<&str> = ctx
            .active_path
            .map(|path| {
                self.registry
                    .ancestors(path)
                    .into_iter()
                    .map(|entry| entry.path.as_str())
                    .collect()
            })
            .unwrap_or_default();
        let pass = Pass {
            registry: self.registry,
            granted: ctx.granted,
            trail,
            collapsed: ctx.preferences.is_some_and(|prefs| prefs.sidebar_collapsed),
            open_groups: ctx.preferences.map(|prefs| &prefs.open_groups),
        };
        let menu: Vec<MenuNode> = self
            .registry
            .roots()
            .into_iter()
            .filter_map(|entry| pass.visit(entry))
            .collect();

        if let Some(metrics) = self.metrics {
            metrics.inc_menu_build();
        }
        debug!(
            granted = %ctx.granted,
            active = ctx.active_path.unwrap_or(""),
            visible = count_nodes(&menu),
            routes = self.registry.len(),
            "menu built"
        );
        menu
    }
}

struct Pass<'a> {
    registry: &'a RouteRegistry,
    granted: &'a PermissionSet,
    trail: HashSet<&'a str>,
    collapsed: bool,
    open_groups: Option<&'a std::collections::BTreeSet<String>>,
}

impl Pass<'_> {
    fn visit(&self, entry: &RouteEntry) -> Option<MenuNode> {
        if !satisfies_all(self.granted, &entry.required) {
            return None;
        }
        let children: Vec<MenuNode> = self
            .registry
            .children_of(&entry.path)
            .into_iter()
            .filter_map(|child| self.visit(child))
            .collect();
        if entry.group_only && children.is_empty() {
            return None;
        }
        let active = self.trail.contains(entry.path.as_str());
        let opened = self
            .open_groups
            .is_some_and(|groups| groups.contains(&entry.path));
        Some(MenuNode {
            path: entry.path.clone(),
            label: entry.label.clone(),
            icon: entry.icon,
            active,
            expanded: !children.is_empty() && !self.collapsed && (active || opened),
            group_only: entry.group_only,
            children,
        })
    }
}

/// Convenience wrapper for [`MenuBuilder::build`].
pub fn build_menu(registry: &RouteRegistry, granted: &PermissionSet) -> Vec<MenuNode> {
    MenuBuilder::new(registry).build(granted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::Permission;

    fn granted(items: &[&'static str]) -> PermissionSet {
        items.iter().copied().map(Permission::from).collect()
    }

    fn users_registry() -> RouteRegistry {
        RouteRegistry::build([
            RouteEntry::new("/users", "用户管理").requires("users:read"),
            RouteEntry::new("/users/new", "新建用户")
                .requires("users:write")
                .under("/users"),
        ])
        .unwrap()
    }

    fn console_registry() -> RouteRegistry {
        RouteRegistry::build([
            RouteEntry::new("/dashboard", "仪表盘").with_icon(MenuIcon::Dashboard),
            RouteEntry::new("/system", "系统管理")
                .group_only()
                .ordered(10)
                .with_icon(MenuIcon::Settings),
            RouteEntry::new("/system/roles", "角色管理")
                .requires("roles:read")
                .under("/system")
                .ordered(2),
            RouteEntry::new("/system/users", "用户管理")
                .requires("users:read")
                .under("/system")
                .ordered(1),
            RouteEntry::new("/system/users/audit", "操作日志").under("/system/users"),
            RouteEntry::new("/tasks", "任务").ordered(5),
        ])
        .unwrap()
    }

    #[test]
    fn pruned_child_leaves_parent_as_leaf() {
        let registry = users_registry();
        let menu = build_menu(&registry, &granted(&["users:read"]));
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].path, "/users");
        assert!(menu[0].children.is_empty());
    }

    #[test]
    fn wildcard_reveals_child() {
        let registry = users_registry();
        let menu = build_menu(&registry, &PermissionSet::all());
        assert_eq!(menu[0].children.len(), 1);
        assert_eq!(menu[0].children[0].path, "/users/new");
    }

    #[test]
    fn hidden_parent_hides_unrestricted_descendants() {
        let registry = console_registry();
        let menu = build_menu(&registry, &granted(&["roles:read"]));
        let system = menu.iter().find(|node| node.path == "/system").unwrap();
        assert_eq!(system.children.len(), 1);
        assert_eq!(system.children[0].path, "/system/roles");
        assert!(system.find("/system/users/audit").is_none());
    }

    #[test]
    fn empty_group_container_is_omitted() {
        let registry = console_registry();
        let menu = build_menu(&registry, &PermissionSet::new());
        let paths: Vec<_> = menu.iter().map(|node| node.path.as_str()).collect();
        assert_eq!(paths, vec!["/dashboard", "/tasks"]);
    }

    #[test]
    fn wildcard_emits_every_route_in_sibling_order() {
        let registry = console_registry();
        let menu = build_menu(&registry, &PermissionSet::all());
        assert_eq!(count_nodes(&menu), registry.len());
        let roots: Vec<_> = menu.iter().map(|node| node.path.as_str()).collect();
        assert_eq!(roots, vec!["/dashboard", "/tasks", "/system"]);
        let system: Vec<_> = menu[2]
            .children
            .iter()
            .map(|node| node.path.as_str())
            .collect();
        assert_eq!(system, vec!["/system/users", "/system/roles"]);
    }

    #[test]
    fn active_trail_is_highlighted_and_expanded() {
        let registry = console_registry();
        let all = PermissionSet::all();
        let ctx = MenuContext::new(&all).with_active("/system/users/audit");
        let menu = MenuBuilder::new(&registry).build_with(&ctx);
        let system = &menu[2];
        assert!(system.active && system.expanded);
        let users = system.find("/system/users").unwrap();
        assert!(users.active && users.expanded);
        let audit = users.find("/system/users/audit").unwrap();
        assert!(audit.active);
        assert!(!audit.expanded);
        assert!(!system.find("/system/roles").unwrap().active);
        assert!(!menu[0].active);
    }

    #[test]
    fn collapsed_sidebar_keeps_highlight_without_expanding() {
        let registry = console_registry();
        let all = PermissionSet::all();
        let prefs = UiPreferences::collapsed();
        let ctx = MenuContext::new(&all)
            .with_active("/system/roles")
            .with_preferences(&prefs);
        let menu = MenuBuilder::new(&registry).build_with(&ctx);
        assert!(menu[2].active);
        assert!(!menu[2].expanded);
    }

    #[test]
    fn open_groups_expand_without_active_route() {
        let registry = console_registry();
        let all = PermissionSet::all();
        let prefs = UiPreferences::default().with_open_group("/system");
        let ctx = MenuContext::new(&all).with_preferences(&prefs);
        let menu = MenuBuilder::new(&registry).build_with(&ctx);
        assert!(menu[2].expanded);
        assert!(!menu[2].active);
        assert!(!menu[2].find("/system/users").unwrap().expanded);
    }

    #[test]
    fn first_navigable_skips_containers() {
        let registry = RouteRegistry::build([
            RouteEntry::new("/system", "系统管理").group_only(),
            RouteEntry::new("/system/users", "用户管理").under("/system"),
        ])
        .unwrap();
        let menu = build_menu(&registry, &PermissionSet::new());
        assert_eq!(first_navigable(&menu).unwrap().path, "/system/users");
        assert!(first_navigable(&[]).is_none());
    }

    #[test]
    fn menu_serializes_for_renderer() {
        let registry = console_registry();
        let menu = build_menu(&registry, &PermissionSet::new());
        let json = serde_json::to_value(&menu).unwrap();
        assert_eq!(json[0]["icon"], "dashboard");
        assert!(json[1].get("icon").is_none());
        assert!(json[0].get("group_only").is_none());
    }
}
