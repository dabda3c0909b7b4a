//! Group representation.
//!
//! Groups form a tree. The import document never carries identifiers or
//! paths; both are assigned by the identity provider, so a declared group
//! is located remotely by its path, which is always derivable from the
//! names of its ancestors.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Group attributes: attribute key to an ordered list of values.
///
/// An absent key, a key with an empty list and a key with values are three
/// distinct states.
pub type Attributes = BTreeMap<String, Vec<String>>;

/// A group, as declared in an import document or as returned remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRepresentation {
    /// Remote identifier. Never present in a declared group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group name, unique among its siblings.
    pub name: String,
    /// Full path (e.g. "/parent/child"), as reported by the remote side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Custom group attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    /// Names of the realm roles mapped to this group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_roles: Option<Vec<String>>,
    /// Client roles mapped to this group (`client_id` -> role names).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_roles: Option<BTreeMap<String, Vec<String>>>,
    /// Child groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_groups: Option<Vec<GroupRepresentation>>,
}

impl GroupRepresentation {
    /// Creates a group with only a name set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the remote identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets an attribute, replacing any previous values for the key.
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

    /// Adds a realm role mapping.
    #[must_use]
    pub fn with_realm_role(mut self, role: impl Into<String>) -> Self {
        self.realm_roles.get_or_insert_with(Vec::new).push(role.into());
        self
    }

    /// Adds a client role mapping.
    #[must_use]
    pub fn with_client_role(mut self, client_id: impl Into<String>, role: impl Into<String>) -> Self {
        self.client_roles
            .get_or_insert_with(BTreeMap::new)
            .entry(client_id.into())
            .or_default()
            .push(role.into());
        self
    }

    /// Adds a child group.
    #[must_use]
    pub fn with_sub_group(mut self, child: GroupRepresentation) -> Self {
        self.sub_groups.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Finds a direct child by name.
    #[must_use]
    pub fn sub_group(&self, name: &str) -> Option<&GroupRepresentation> {
        self.sub_groups
            .as_deref()
            .and_then(|children| children.iter().find(|g| g.name == name))
    }

    /// Realm role names as a set (empty when the field is omitted).
    #[must_use]
    pub fn realm_role_names(&self) -> BTreeSet<String> {
        self.realm_roles
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Client role names per client as sets (empty when the field is omitted).
    #[must_use]
    pub fn client_role_names(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.client_roles
            .iter()
            .flatten()
            .map(|(client, roles)| (client.clone(), roles.iter().cloned().collect()))
            .collect()
    }

    /// Gets the values of an attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&[String]> {
        self.attributes
            .as_ref()
            .and_then(|attrs| attrs.get(key))
            .map(Vec::as_slice)
    }
}

/// Returns the path of the first group whose name repeats among its
/// siblings, searching the whole tree below `parent`.
#[must_use]
pub fn find_duplicate_sibling(groups: &[GroupRepresentation], parent: Option<&GroupPath>) -> Option<String> {
    let mut seen = HashSet::new();
    for group in groups {
        let path = match parent {
            Some(p) => p.child(&group.name),
            None => GroupPath::root(&group.name),
        };
        if !seen.insert(group.name.as_str()) {
            return Some(path.to_string());
        }
        if let Some(children) = group.sub_groups.as_deref() {
            if let Some(dup) = find_duplicate_sibling(children, Some(&path)) {
                return Some(dup);
            }
        }
    }
    None
}

/// Slash-separated group path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupPath {
    /// Path segments from root to leaf.
    pub segments: Vec<String>,
}

impl GroupPath {
    /// Parses a group path string (e.g., "/parent/child/grandchild").
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments = path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self { segments }
    }

    /// Path of a top-level group.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    /// Path of a child of this group.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
