//! Update policies for existing remote entities.
//!
//! Roles and groups are updated differently. A role update deep-merges the
//! declared document onto the existing role, so anything not declared is
//! kept. A group's declared attribute map replaces the remote one key by
//! key, and undeclared keys are dropped.

use std::collections::BTreeSet;

use kcc_model::{Attributes, RoleRepresentation};
use serde_json::{Map, Value};

use crate::error::{ImportError, ImportResult};

/// Role fields owned by the remote side or by composite synchronization.
const UNPATCHED_ROLE_FIELDS: &[&str] = &["id", "composite", "composites", "clientRole", "containerId"];

/// Recursively merges `declared` onto `existing`.
///
/// Objects merge key by key. Declared nulls leave the existing value in
/// place. Arrays and scalars replace the existing value.
#[must_use]
pub fn deep_patch(existing: &Value, declared: &Value) -> Value {
    match (existing, declared) {
        (Value::Object(existing), Value::Object(declared)) => {
            let mut merged = existing.clone();
            for (key, value) in declared {
                if value.is_null() {
                    continue;
                }
                let patched = match merged.get(key) {
                    Some(current) => deep_patch(current, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), patched);
            }
            Value::Object(merged)
        }
        (existing, Value::Null) => existing.clone(),
        (_, declared) => declared.clone(),
    }
}

/// Computes the role an existing role becomes after a declared update.
///
/// Identity, container and composite fields always keep their existing
/// values.
pub fn patch_role(existing: &RoleRepresentation, declared: &RoleRepresentation) -> ImportResult<RoleRepresentation> {
    let existing_value = serde_json::to_value(existing).map_err(json_error)?;
    let mut declared_value = serde_json::to_value(declared).map_err(json_error)?;

    if let Value::Object(fields) = &mut declared_value {
        strip(fields, UNPATCHED_ROLE_FIELDS);
    }

    serde_json::from_value(deep_patch(&existing_value, &declared_value)).map_err(json_error)
}

fn strip(fields: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        fields.remove(*key);
    }
}

fn json_error(err: serde_json::Error) -> ImportError {
    ImportError::Remote(err.into())
}

/// Key-level changes that turn a remote attribute map into a declared one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDiff {
    /// Keys whose values are replaced, with their declared values.
    pub set: Attributes,
    /// Keys that are removed.
    pub removed: BTreeSet<String>,
}

impl AttributeDiff {
    /// Computes the key-level difference.
    ///
    /// A declared key with an empty list clears the key, the same as a key
    /// missing from the declared map.
    #[must_use]
    pub fn compute(remote: &Attributes, declared: &Attributes) -> Self {
        let set = declared
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .filter(|(key, values)| remote.get(*key) != Some(*values))
            .map(|(key, values)| (key.clone(), values.clone()))
            .collect();

        let removed = remote
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .filter(|(key, _)| declared.get(*key).map_or(true, Vec::is_empty))
            .map(|(key, _)| key.clone())
            .collect();

        Self { set, removed }
    }

    /// Checks if the maps already match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.removed.is_empty()
    }

    /// Applies the difference to a remote map.
    #[must_use]
    pub fn apply(&self, remote: &Attributes) -> Attributes {
        let mut merged: Attributes = remote
            .iter()
            .filter(|(key, values)| !values.is_empty() && !self.removed.contains(*key))
            .map(|(key, values)| (key.clone(), values.clone()))
            .collect();
        merged.extend(self.set.clone());
        merged
    }
}

/// Merges a declared attribute map onto a remote one.
///
/// Returns `None` when the remote map already matches, otherwise the full
/// map to send in a single group update.
#[must_use]
pub fn merge_attributes(remote: &Attributes, declared: &Attributes) -> Option<Attributes> {
    let diff = AttributeDiff::compute(remote, declared);
    (!diff.is_empty()).then(|| diff.apply(remote))
}
