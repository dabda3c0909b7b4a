//! Realm import document.
//!
//! Only the parts of a realm document that `kcc` reconciles are modelled;
//! every other field is ignored on deserialization.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::group::{find_duplicate_sibling, GroupRepresentation};
use crate::role::RoleRepresentation;

/// One realm import document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmImport {
    /// Realm name.
    pub realm: String,
    /// Declared roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<RolesImport>,
    /// Declared top-level groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupRepresentation>>,
}

/// Declared roles, partitioned by scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesImport {
    /// Realm-level roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<Vec<RoleRepresentation>>,
    /// Client-level roles per `client_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<BTreeMap<String, Vec<RoleRepresentation>>>,
}

impl RolesImport {
    /// Realm roles (empty when omitted).
    #[must_use]
    pub fn realm_roles(&self) -> &[RoleRepresentation] {
        self.realm.as_deref().unwrap_or_default()
    }

    /// Client roles grouped by `client_id` (empty when omitted).
    pub fn client_roles(&self) -> impl Iterator<Item = (&str, &[RoleRepresentation])> {
        self.client
            .iter()
            .flatten()
            .map(|(client, roles)| (client.as_str(), roles.as_slice()))
    }
}

impl RealmImport {
    /// Creates an empty import for a realm.
    #[must_use]
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            ..Self::default()
        }
    }

    /// Sets the declared top-level groups.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<GroupRepresentation>) -> Self {
        self.groups = Some(groups);
        self
    }

    /// Adds a realm role.
    #[must_use]
    pub fn with_realm_role(mut self, role: RoleRepresentation) -> Self {
        self.roles
            .get_or_insert_with(RolesImport::default)
            .realm
            .get_or_insert_with(Vec::new)
            .push(role);
        self
    }

    /// Adds a client role.
    #[must_use]
    pub fn with_client_role(mut self, client_id: impl Into<String>, role: RoleRepresentation) -> Self {
        self.roles
            .get_or_insert_with(RolesImport::default)
            .client
            .get_or_insert_with(BTreeMap::new)
            .entry(client_id.into())
            .or_default()
            .push(role);
        self
    }

    /// Checks the declared tree for names that must be unique.
    ///
    /// Returns a message naming the first offending entity.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = self
            .groups
            .as_deref()
            .and_then(|groups| find_duplicate_sibling(groups, None))
        {
            return Err(format!("group '{path}' is declared more than once"));
        }

        if let Some(roles) = &self.roles {
            if let Some(name) = first_duplicate(roles.realm_roles()) {
                return Err(format!("realm role '{name}' is declared more than once"));
            }
            for (client, client_roles) in roles.client_roles() {
                if let Some(name) = first_duplicate(client_roles) {
                    return Err(format!(
                        "client role '{name}' of client '{client}' is declared more than once"
                    ));
                }
            }
        }

        Ok(())
    }
}

fn first_duplicate(roles: &[RoleRepresentation]) -> Option<&str> {
    let mut seen = HashSet::new();
    roles
        .iter()
        .map(|r| r.name.as_str())
        .find(|name| !seen.insert(*name))
}
