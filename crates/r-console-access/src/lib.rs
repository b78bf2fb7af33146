//! ---
//! console_section: "02-navigation-access-control"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Permission model, route registry, menu derivation, and access guard."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
//! Permission-gated navigation core.
//!
//! A [`RouteRegistry`] is validated once at startup and then shared read-only.
//! The [`AccessGuard`] decides each navigation attempt against a [`Session`]
//! snapshot, the [`MenuBuilder`] derives the sidebar a permission set can see,
//! and the [`PermissionEditor`] implements the selection rules used when
//! editing a role's permissions.

pub mod editor;
pub mod guard;
pub mod icon;
pub mod menu;
pub mod metrics;
pub mod permission;
pub mod registry;
pub mod session;

pub use editor::{ChangeListener, PermissionEditor};
pub use guard::{login_url, AccessGuard, Decision, Navigation, NotFoundHandler, UnresolvedPath};
pub use icon::MenuIcon;
pub use menu::{build_menu, first_navigable, MenuBuilder, MenuContext, MenuNode};
pub use metrics::AccessMetrics;
pub use permission::{satisfies, satisfies_all, Permission, PermissionSet, WILDCARD};
pub use registry::{RegistryError, RouteEntry, RouteRegistry};
pub use session::{Session, SessionProvider, SessionStore};
