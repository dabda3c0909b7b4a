//! Role representation.
//!
//! Roles are realm-scoped or scoped to one client. A composite role
//! includes other roles, referenced by name: realm roles directly, client
//! roles qualified by the client's `clientId`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::group::Attributes;

/// A role, as declared in an import document or as returned remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
    /// Remote identifier. Never present in a declared role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Role name (unique within realm or client).
    pub name: String,
    /// Role description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this is a composite role. Derived remotely.
    #[serde(default)]
    pub composite: bool,
    /// Whether this is a client role.
    #[serde(default)]
    pub client_role: bool,
    /// Remote container (realm or client) identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Custom role attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    /// Declared composite members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composites: Option<Composites>,
}

/// Composite members of a role, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composites {
    /// Realm role names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<BTreeSet<String>>,
    /// Client role names per `client_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<BTreeMap<String, Vec<String>>>,
}

impl Composites {
    /// Checks whether no member is declared in either dimension.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.realm.as_ref().map_or(true, BTreeSet::is_empty)
            && self
                .client
                .as_ref()
                .map_or(true, |c| c.values().all(Vec::is_empty))
    }
}

impl RoleRepresentation {
    /// Creates a realm role.
    #[must_use]
    pub fn new_realm_role(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a client role.
    #[must_use]
    pub fn new_client_role(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_role: true,
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a realm composite.
    #[must_use]
    pub fn with_realm_composite(mut self, role: impl Into<String>) -> Self {
        self.composites
            .get_or_insert_with(Composites::default)
            .realm
            .get_or_insert_with(BTreeSet::new)
            .insert(role.into());
        self
    }

    /// Adds a client composite.
    #[must_use]
    pub fn with_client_composite(mut self, client_id: impl Into<String>, role: impl Into<String>) -> Self {
        self.composites
            .get_or_insert_with(Composites::default)
            .client
            .get_or_insert_with(BTreeMap::new)
            .entry(client_id.into())
            .or_default()
            .push(role.into());
        self
    }

    /// Checks if this is a composite role.
    ///
    /// True when the remote flag is set or any composite member is declared.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.composite || self.composites.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Returns the role without its composites, as used on creation.
    #[must_use]
    pub fn without_composites(&self) -> Self {
        Self {
            composite: false,
            composites: None,
            ..self.clone()
        }
    }

    /// Gets the full role name (`client_id.role_name` for client roles).
    #[must_use]
    pub fn full_name(&self, client_id: Option<&str>) -> String {
        match client_id {
            Some(client) if self.client_role => format!("{}.{}", client, self.name),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realm_role_creation() {
        let role = RoleRepresentation::new_realm_role("admin");

        assert_eq!(role.name, "admin");
        assert!(!role.client_role);
        assert!(!role.is_composite());
    }

    #[test]
    fn declared_composites_make_role_composite() {
        let role = RoleRepresentation::new_realm_role("my_composite_role")
            .with_realm_composite("role_x")
            .with_client_composite("app", "viewer");

        assert!(role.is_composite());
        assert!(!role.without_composites().is_composite());
        assert_eq!(role.without_composites().name, "my_composite_role");
    }

    #[test]
    fn empty_composites_are_not_composite() {
        let role: RoleRepresentation =
            serde_json::from_str(r#"{"name":"r","composites":{"realm":[],"client":{"app":[]}}}"#)
                .unwrap();
        assert!(!role.is_composite());
        assert!(role.composites.unwrap().realm.is_some());
    }

    #[test]
    fn full_name_formatting() {
        let realm_role = RoleRepresentation::new_realm_role("admin");
        assert_eq!(realm_role.full_name(Some("my-app")), "admin");

        let client_role = RoleRepresentation::new_client_role("manager");
        assert_eq!(client_role.full_name(Some("my-app")), "my-app.manager");
    }
}
