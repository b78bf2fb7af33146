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

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::permission::PermissionSet;

/// Read-only view of the current user's authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    #[serde(default)]
    pub permissions: PermissionSet,
    /// Login name attached to log events for this session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Session {
    /// Session with no login.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Logged-in session holding `permissions`.
    pub fn authenticated(permissions: PermissionSet) -> Self {
        Self {
            authenticated: true,
            permissions,
            user: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Source of session snapshots for the guard and menu builder.
pub trait SessionProvider {
    /// Return an immutable snapshot of the current session.
    fn current_session(&self) -> Session;
}

impl SessionProvider for Session {
    fn current_session(&self) -> Session {
        self.clone()
    }
}

/// Copy-on-read session holder.
///
/// Readers get a cloned snapshot, so a permission refresh never changes the
/// permissions an in-flight authorization is looking at.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an authenticated session, replacing any previous one.
    pub fn login(&self, permissions: PermissionSet) {
        info!(permissions = %permissions, "session established");
        *self.inner.write() = Session::authenticated(permissions);
    }

    /// [`SessionStore::login`] for a named user.
    pub fn login_as(&self, user: impl Into<String>, permissions: PermissionSet) {
        let session = Session::authenticated(permissions).with_user(user);
        info!(
            user = session.user.as_deref().unwrap_or(""),
            permissions = %session.permissions,
            "session established"
        );
        *self.inner.write() = session;
    }

    /// Replace the permissions of an authenticated session. Returns `false` and
    /// leaves the store untouched when nobody is logged in.
    pub fn refresh_permissions(&self, permissions: PermissionSet) -> bool {
        let mut session = self.inner.write();
        if !session.authenticated {
            return false;
        }
        info!(permissions = %permissions, "session permissions refreshed");
        session.permissions = permissions;
        true
    }

    /// Drop the session back to anonymous.
    pub fn logout(&self) {
        info!("session closed");
        *self.inner.write() = Session::anonymous();
    }
}

impl SessionProvider for SessionStore {
    fn current_session(&self) -> Session {
        self.inner.read().clone()
    }
}
