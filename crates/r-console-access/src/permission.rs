//! ---
//! console_section: "02-navigation-access-control"
//! console_subsection: "module"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Permission model, route registry, menu derivation, and access guard."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::borrow::Cow;
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Token granting every permission.
pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

/// Opaque permission identifier such as `users:read`.
///
/// Matching is exact token equality. The wildcard `*` is a sentinel, not a glob:
/// `users:*` is just another opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Wrap a permission identifier.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the wildcard sentinel.
    pub fn is_wildcard(&self) -> bool {
        self.as_str() == WILDCARD.as_str()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// Set of permissions held by a session or role.
///
/// Iteration follows insertion order so rendered output stays stable; equality
/// ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(IndexSet<Permission>);

impl PermissionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `{*}` set.
    pub fn all() -> Self {
        Self::from_iter([WILDCARD])
    }

    /// Whether `permission` is literally a member. Use [`PermissionSet::satisfies`]
    /// for access checks.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    /// Whether the wildcard is a member.
    pub fn has_wildcard(&self) -> bool {
        self.0.contains(&WILDCARD)
    }

    /// Add a permission. Returns `false` when it was already present.
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    /// Remove a permission, keeping the order of the remaining members.
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.0.shift_remove(permission)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// See [`satisfies`].
    pub fn satisfies(&self, required: &Permission) -> bool {
        satisfies(self, required)
    }

    /// See [`satisfies_all`].
    pub fn satisfies_all<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        satisfies_all(self, required)
    }

    /// Collapse to `{*}` when the wildcard is present, dropping redundant members.
    pub fn normalized(&self) -> Self {
        if self.has_wildcard() {
            Self::all()
        } else {
            self.clone()
        }
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = indexmap::set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, permission) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{permission}")?;
        }
        f.write_str("}")
    }
}

/// True iff `required` is granted literally or the wildcard is granted.
pub fn satisfies(granted: &PermissionSet, required: &Permission) -> bool {
    granted.contains(required) || granted.has_wildcard()
}

/// Logical AND of [`satisfies`] over `required`; an empty list is vacuously satisfied.
pub fn satisfies_all<'a, I>(granted: &PermissionSet, required: I) -> bool
where
    I: IntoIterator<Item = &'a Permission>,
{
    required
        .into_iter()
        .all(|permission| satisfies(granted, permission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(items: &[&'static str]) -> PermissionSet {
        items.iter().copied().map(Permission::from).collect()
    }

    #[test]
    fn exact_match_only() {
        let granted = set(&["a"]);
        assert!(satisfies(&granted, &"a".into()));
        assert!(!satisfies(&granted, &"b".into()));
    }

    #[test]
    fn no_prefix_or_glob_matching() {
        let granted = set(&["users", "users:*"]);
        assert!(!granted.satisfies(&"users:read".into()));
        assert!(granted.satisfies(&"users:*".into()));
    }

    #[test]
    fn empty_requirement_is_public() {
        assert!(satisfies_all(&PermissionSet::new(), []));
    }

    #[test]
    fn all_requirements_must_hold() {
        let granted = set(&["users:read"]);
        let required = [Permission::from("users:read"), Permission::from("users:write")];
        assert!(!granted.satisfies_all(&required));
        assert!(granted.satisfies_all(&required[..1]));
    }

    #[test]
    fn normalized_collapses_wildcard() {
        let granted = set(&["a", "*", "b"]);
        assert_eq!(granted.normalized(), PermissionSet::all());
        assert_eq!(set(&["a"]).normalized(), set(&["a"]));
    }

    #[test]
    fn equality_ignores_order_and_display_keeps_it() {
        assert_eq!(set(&["a", "b"]), set(&["b", "a"]));
        assert_eq!(set(&["b", "a"]).to_string(), "{b, a}");
    }

    #[test]
    fn serializes_as_plain_list() {
        let json = serde_json::to_string(&set(&["users:read", "*"])).unwrap();
        assert_eq!(json, r#"["users:read","*"]"#);
        let back: PermissionSet = serde_json::from_str(&json).unwrap();
        assert!(back.has_wildcard());
    }

    proptest! {
        #[test]
        fn wildcard_absorbs_every_requirement(
            others in proptest::collection::vec("[a-z]{1,8}(:[a-z]{1,8})?", 0..6),
            required in "[a-z*:]{1,12}",
        ) {
            let mut granted: PermissionSet = others.into_iter().map(Permission::from).collect();
            granted.insert(WILDCARD);
            prop_assert!(satisfies(&granted, &Permission::from(required)));
        }

        #[test]
        fn without_wildcard_satisfies_is_membership(
            granted in proptest::collection::vec("[a-z]{1,4}", 0..6),
            required in "[a-z]{1,4}",
        ) {
            let set: PermissionSet = granted.iter().cloned().map(Permission::from).collect();
            prop_assert_eq!(
                satisfies(&set, &Permission::from(required.clone())),
                granted.contains(&required)
            );
        }
    }
}
