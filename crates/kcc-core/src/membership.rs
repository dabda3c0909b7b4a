//! Named-set membership reconciliation.
//!
//! Group role mappings and role composites are all sets of role names
//! attached to an owner. Each is converged the same way: compute which
//! names to add and which to remove, resolve both sides to remote roles,
//! then issue at most one add call and one remove call.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use kcc_model::RoleRepresentation;

use crate::error::ImportResult;

/// Names to add to and remove from a current set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSetDiff {
    /// Declared but not current.
    pub to_add: BTreeSet<String>,
    /// Current but not declared.
    pub to_remove: BTreeSet<String>,
}

impl NameSetDiff {
    /// Computes the difference between a declared and a current set.
    #[must_use]
    pub fn compute(declared: &BTreeSet<String>, current: &BTreeSet<String>) -> Self {
        Self {
            to_add: declared.difference(current).cloned().collect(),
            to_remove: current.difference(declared).cloned().collect(),
        }
    }

    /// Difference that removes every current name.
    #[must_use]
    pub fn remove_all(current: &BTreeSet<String>) -> Self {
        Self {
            to_add: BTreeSet::new(),
            to_remove: current.clone(),
        }
    }

    /// Checks if the sets already match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Applies the difference to a set.
    #[must_use]
    pub fn apply(&self, current: &BTreeSet<String>) -> BTreeSet<String> {
        current
            .union(&self.to_add)
            .filter(|name| !self.to_remove.contains(*name))
            .cloned()
            .collect()
    }
}

/// Declared role assignment toward one client.
///
/// A client that is known remotely but missing from a declared client map
/// is `Unassigned`. Both variants converge to the same remote state when
/// the declared set is empty; keeping them apart makes the policy visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAssignment {
    /// The declared role names.
    Roles(BTreeSet<String>),
    /// Not declared at all: every role toward the client is removed.
    Unassigned,
}

impl ClientAssignment {
    /// Computes the difference against the current role names.
    #[must_use]
    pub fn diff(&self, current: &BTreeSet<String>) -> NameSetDiff {
        match self {
            Self::Roles(declared) => NameSetDiff::compute(declared, current),
            Self::Unassigned => NameSetDiff::remove_all(current),
        }
    }
}

/// Pairs every client of a declared map, and every client currently
/// assigned, with its declared assignment.
#[must_use]
pub fn client_assignments<'a>(
    declared: &BTreeMap<String, BTreeSet<String>>,
    current_clients: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, ClientAssignment> {
    let mut assignments: BTreeMap<String, ClientAssignment> = declared
        .iter()
        .map(|(client, roles)| (client.clone(), ClientAssignment::Roles(roles.clone())))
        .collect();

    for client in current_clients {
        assignments
            .entry(client.to_string())
            .or_insert(ClientAssignment::Unassigned);
    }

    assignments
}

/// A named set attached to an owner on the remote side.
#[async_trait]
pub trait MembershipTarget: Send + Sync {
    /// Resolves a member name to its remote role.
    ///
    /// ## Errors
    ///
    /// Returns `ImportError::Reference` if no such role exists.
    async fn resolve(&self, name: &str) -> ImportResult<RoleRepresentation>;

    /// Adds members.
    async fn add(&self, roles: &[RoleRepresentation]) -> ImportResult<()>;

    /// Removes members.
    async fn remove(&self, roles: &[RoleRepresentation]) -> ImportResult<()>;
}

/// Converges a target's membership by applying a precomputed difference.
///
/// Every name is resolved before anything is mutated, so an unresolvable
/// name leaves the target untouched. Additions are applied before
/// removals; the two sets are disjoint.
pub async fn apply_diff<T>(target: &T, diff: &NameSetDiff) -> ImportResult<()>
where
    T: MembershipTarget + ?Sized,
{
    let mut to_add = Vec::with_capacity(diff.to_add.len());
    for name in &diff.to_add {
        to_add.push(target.resolve(name).await?);
    }
    let mut to_remove = Vec::with_capacity(diff.to_remove.len());
    for name in &diff.to_remove {
        to_remove.push(target.resolve(name).await?);
    }

    if !to_add.is_empty() {
        target.add(&to_add).await?;
    }
    if !to_remove.is_empty() {
        target.remove(&to_remove).await?;
    }

    Ok(())
}

/// Converges a target's membership to the declared names.
///
/// Returns the difference that was applied.
pub async fn reconcile_named_set<T>(
    target: &T,
    declared: &BTreeSet<String>,
    current: &BTreeSet<String>,
) -> ImportResult<NameSetDiff>
where
    T: MembershipTarget + ?Sized,
{
    let diff = NameSetDiff::compute(declared, current);
    apply_diff(target, &diff).await?;
    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use parking_lot::Mutex;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn diff_satisfies_set_laws() {
        let cases = [
            (names(&[]), names(&[])),
            (names(&["a", "b"]), names(&[])),
            (names(&[]), names(&["a", "b"])),
            (names(&["a", "b", "c"]), names(&["b", "c", "d"])),
            (names(&["x"]), names(&["x"])),
        ];

        for (declared, current) in cases {
            let diff = NameSetDiff::compute(&declared, &current);

            assert!(diff.to_add.is_disjoint(&current));
            assert!(diff.to_remove.is_disjoint(&declared));
            assert_eq!(diff.apply(&current), declared);
        }
    }

    #[test]
    fn matching_sets_produce_empty_diff() {
        let set = names(&["r1", "r2"]);

        assert!(NameSetDiff::compute(&set, &set).is_empty());
    }

    #[test]
    fn absent_client_is_unassigned() {
        let declared = BTreeMap::from([("clientA".to_string(), names(&["r2"]))]);

        let assignments = client_assignments(&declared, ["clientA", "clientB"]);

        assert_eq!(assignments["clientA"], ClientAssignment::Roles(names(&["r2"])));
        assert_eq!(assignments["clientB"], ClientAssignment::Unassigned);

        let diff = assignments["clientB"].diff(&names(&["r3"]));
        assert_eq!(diff.to_remove, names(&["r3"]));
        assert!(diff.to_add.is_empty());
    }

    #[test]
    fn explicit_empty_and_unassigned_converge_alike() {
        let current = names(&["r1", "r2"]);

        let empty = ClientAssignment::Roles(BTreeSet::new()).diff(&current);
        let unassigned = ClientAssignment::Unassigned.diff(&current);

        assert_eq!(empty, unassigned);
    }

    #[derive(Default)]
    struct RecordingTarget {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MembershipTarget for RecordingTarget {
        async fn resolve(&self, name: &str) -> ImportResult<RoleRepresentation> {
            if name == "missing" {
                return Err(ImportError::reference("realm role", name, "test"));
            }
            Ok(RoleRepresentation::new_realm_role(name))
        }

        async fn add(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
            self.calls.lock().push(format!("add {}", roles.len()));
            Ok(())
        }

        async fn remove(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
            self.calls.lock().push(format!("remove {}", roles.len()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn one_call_per_direction() {
        let target = RecordingTarget::default();

        let diff = reconcile_named_set(&target, &names(&["a", "b", "c"]), &names(&["c", "d"]))
            .await
            .unwrap();

        assert_eq!(diff.to_add, names(&["a", "b"]));
        assert_eq!(*target.calls.lock(), vec!["add 2", "remove 1"]);
    }

    #[tokio::test]
    async fn no_calls_when_converged() {
        let target = RecordingTarget::default();

        reconcile_named_set(&target, &names(&["a"]), &names(&["a"]))
            .await
            .unwrap();

        assert!(target.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn unresolvable_name_fails_before_mutation() {
        let target = RecordingTarget::default();

        let err = reconcile_named_set(&target, &names(&["a", "missing"]), &names(&["b"]))
            .await
            .unwrap_err();

        assert!(err.is_reference());
        assert!(target.calls.lock().is_empty());
    }
}
