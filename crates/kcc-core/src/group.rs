//! Group tree reconciliation.
//!
//! Declared groups carry no identifiers, so every node is matched to the
//! remote tree by name: top-level groups by path, subgroups by name under
//! their matched parent. Remote identifiers are looked up as needed and
//! never kept beyond the node being reconciled.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use kcc_model::{Attributes, ClientRepresentation, GroupPath, GroupRepresentation, RoleRepresentation};
use kcc_remote::{RemoteError, RemoteState, RoleScope};

use crate::error::{ImportError, ImportResult};
use crate::membership::{apply_diff, client_assignments, reconcile_named_set, MembershipTarget, NameSetDiff};
use crate::patch::merge_attributes;
use crate::summary::ImportSummary;

/// A matched remote parent group.
#[derive(Debug, Clone, Copy)]
pub struct ParentGroup<'p> {
    /// Remote identifier.
    pub id: &'p str,
    /// Full path.
    pub path: &'p GroupPath,
}

/// Converges the group tree of one realm.
pub struct GroupReconciler<'a, R: ?Sized> {
    remote: &'a R,
    realm: &'a str,
}

impl<'a, R> GroupReconciler<'a, R>
where
    R: RemoteState + ?Sized,
{
    /// Creates a reconciler for a realm.
    pub fn new(remote: &'a R, realm: &'a str) -> Self {
        Self { remote, realm }
    }

    /// Converges the top level of the realm.
    ///
    /// `None` leaves every group untouched. Otherwise remote top-level
    /// groups that are not declared are deleted, then each declared group
    /// is reconciled.
    pub async fn reconcile_groups(
        &self,
        declared: Option<&[GroupRepresentation]>,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        let Some(declared) = declared else {
            tracing::debug!(realm = self.realm, "No groups declared, skipping");
            return Ok(());
        };

        let names: BTreeSet<&str> = declared.iter().map(|g| g.name.as_str()).collect();
        for orphan in self.remote.list_top_level_groups(self.realm).await? {
            if !names.contains(orphan.name.as_str()) {
                self.delete(&orphan, &GroupPath::root(&orphan.name), summary)
                    .await?;
            }
        }

        for group in declared {
            self.reconcile(group, None, summary).await?;
        }

        Ok(())
    }

    /// Converges the remote subtree matching a declared group.
    pub async fn reconcile(
        &self,
        declared: &GroupRepresentation,
        parent: Option<ParentGroup<'_>>,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        let path = match parent {
            Some(parent) => parent.path.child(&declared.name),
            None => GroupPath::root(&declared.name),
        };

        let existing = match parent {
            Some(parent) => {
                self.remote
                    .find_group_by_name(self.realm, parent.id, &declared.name)
                    .await?
            }
            None => {
                self.remote
                    .find_group_by_path(self.realm, &path.to_string())
                    .await?
            }
        };

        match existing {
            Some(existing) => self.update(declared, &existing, &path, summary).await,
            None => {
                self.create(declared, parent.map(|p| p.id), &path, summary)
                    .await
            }
        }
    }

    /// Creates a declared group and its whole declared subtree.
    async fn create(
        &self,
        declared: &GroupRepresentation,
        parent_id: Option<&str>,
        path: &GroupPath,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        tracing::debug!(realm = self.realm, group = %path, "Creating group");

        let shell = GroupRepresentation {
            name: declared.name.clone(),
            attributes: declared
                .attributes
                .as_ref()
                .and_then(|attrs| merge_attributes(&Attributes::new(), attrs)),
            ..GroupRepresentation::default()
        };
        let created = self
            .remote
            .create_group(self.realm, parent_id, &shell)
            .await?;
        summary.groups_created += 1;

        let id = created
            .id
            .ok_or_else(|| missing_id(path))?;

        self.sync_realm_roles(declared, &id, &BTreeSet::new(), path, summary)
            .await?;
        self.sync_client_roles(declared, &id, &BTreeMap::new(), path, summary)
            .await?;

        for child in declared.sub_groups.iter().flatten() {
            let child_path = path.child(&child.name);
            Box::pin(self.create(child, Some(&id), &child_path, summary)).await?;
        }

        Ok(())
    }

    /// Converges an existing remote group and its subtree.
    async fn update(
        &self,
        declared: &GroupRepresentation,
        existing: &GroupRepresentation,
        path: &GroupPath,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        let id = existing
            .id
            .as_deref()
            .ok_or_else(|| missing_id(path))?;

        if let Some(declared_attributes) = &declared.attributes {
            let remote_attributes = existing.attributes.clone().unwrap_or_default();
            if let Some(merged) = merge_attributes(&remote_attributes, declared_attributes) {
                tracing::debug!(realm = self.realm, group = %path, "Updating group attributes");
                let update = GroupRepresentation {
                    id: Some(id.to_string()),
                    name: existing.name.clone(),
                    attributes: Some(merged),
                    ..GroupRepresentation::default()
                };
                self.remote.update_group(self.realm, id, &update).await?;
                summary.groups_updated += 1;
            }
        }

        self.sync_realm_roles(declared, id, &existing.realm_role_names(), path, summary)
            .await?;
        self.sync_client_roles(declared, id, &existing.client_role_names(), path, summary)
            .await?;

        self.sync_sub_groups(declared, existing, id, path, summary)
            .await
    }

    /// Converges the children of a matched group.
    async fn sync_sub_groups(
        &self,
        declared: &GroupRepresentation,
        existing: &GroupRepresentation,
        id: &str,
        path: &GroupPath,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        let Some(declared_children) = &declared.sub_groups else {
            return Ok(());
        };

        let declared_names: BTreeSet<&str> = declared_children.iter().map(|g| g.name.as_str()).collect();
        for orphan in existing.sub_groups.iter().flatten() {
            if !declared_names.contains(orphan.name.as_str()) {
                self.delete(orphan, &path.child(&orphan.name), summary)
                    .await?;
            }
        }

        for child in declared_children {
            let child_path = path.child(&child.name);
            let remote_child = if existing.sub_group(&child.name).is_some() {
                self.remote
                    .find_group_by_name(self.realm, id, &child.name)
                    .await?
            } else {
                None
            };

            match remote_child {
                Some(remote_child) => {
                    Box::pin(self.update(child, &remote_child, &child_path, summary)).await?;
                }
                None => {
                    Box::pin(self.create(child, Some(id), &child_path, summary)).await?;
                }
            }
        }

        Ok(())
    }

    /// Deletes a remote group with its whole subtree.
    async fn delete(
        &self,
        group: &GroupRepresentation,
        path: &GroupPath,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        let id = group
            .id
            .as_deref()
            .ok_or_else(|| missing_id(path))?;

        tracing::debug!(realm = self.realm, group = %path, "Deleting group");
        self.remote.delete_group(self.realm, id).await?;
        summary.groups_deleted += 1;
        Ok(())
    }

    async fn sync_realm_roles(
        &self,
        declared: &GroupRepresentation,
        group_id: &str,
        current: &BTreeSet<String>,
        path: &GroupPath,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        if declared.realm_roles.is_none() {
            return Ok(());
        }

        let target = GroupRealmRoles {
            remote: self.remote,
            realm: self.realm,
            group_id,
        };
        let diff = reconcile_named_set(&target, &declared.realm_role_names(), current).await?;
        log_mappings(self.realm, path, None, &diff);
        summary.record_mappings(&diff);
        Ok(())
    }

    async fn sync_client_roles(
        &self,
        declared: &GroupRepresentation,
        group_id: &str,
        current: &BTreeMap<String, BTreeSet<String>>,
        path: &GroupPath,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        if declared.client_roles.is_none() {
            return Ok(());
        }

        let declared_roles = declared.client_role_names();
        let mut clients = BTreeMap::new();
        for client_id in declared_roles.keys() {
            clients.insert(client_id.as_str(), self.resolve_client(client_id).await?);
        }

        let assignments = client_assignments(&declared_roles, current.keys().map(String::as_str));
        let empty = BTreeSet::new();

        for (client_id, assignment) in &assignments {
            let current_roles = current.get(client_id).unwrap_or(&empty);
            let diff = assignment.diff(current_roles);
            if diff.is_empty() {
                continue;
            }

            let client = match clients.remove(client_id.as_str()) {
                Some(client) => client,
                None => self.resolve_client(client_id).await?,
            };
            let target = GroupClientRoles {
                remote: self.remote,
                realm: self.realm,
                group_id,
                client: &client,
            };

            apply_diff(&target, &diff).await?;
            log_mappings(self.realm, path, Some(client_id.as_str()), &diff);
            summary.record_mappings(&diff);
        }

        Ok(())
    }

    async fn resolve_client(&self, client_id: &str) -> ImportResult<ClientRepresentation> {
        self.remote
            .find_client_by_client_id(self.realm, client_id)
            .await?
            .ok_or_else(|| ImportError::reference("client", client_id, self.realm))
    }
}

fn missing_id(path: &GroupPath) -> ImportError {
    ImportError::Remote(RemoteError::UnexpectedResponse(format!(
        "group '{path}' has no id"
    )))
}

fn log_mappings(realm: &str, path: &GroupPath, client: Option<&str>, diff: &NameSetDiff) {
    if diff.is_empty() {
        return;
    }
    tracing::debug!(
        realm,
        group = %path,
        client,
        added = ?diff.to_add,
        removed = ?diff.to_remove,
        "Synchronized group role mappings"
    );
}

/// Realm roles mapped to a group.
struct GroupRealmRoles<'a, R: ?Sized> {
    remote: &'a R,
    realm: &'a str,
    group_id: &'a str,
}

#[async_trait]
impl<R> MembershipTarget for GroupRealmRoles<'_, R>
where
    R: RemoteState + ?Sized,
{
    async fn resolve(&self, name: &str) -> ImportResult<RoleRepresentation> {
        self.remote
            .find_role(self.realm, &RoleScope::Realm, name)
            .await?
            .ok_or_else(|| ImportError::reference("realm role", name, self.realm))
    }

    async fn add(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
        Ok(self
            .remote
            .add_realm_roles_to_group(self.realm, self.group_id, roles)
            .await?)
    }

    async fn remove(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
        Ok(self
            .remote
            .remove_realm_roles_from_group(self.realm, self.group_id, roles)
            .await?)
    }
}

/// Roles of one client mapped to a group.
struct GroupClientRoles<'a, R: ?Sized> {
    remote: &'a R,
    realm: &'a str,
    group_id: &'a str,
    client: &'a ClientRepresentation,
}

#[async_trait]
impl<R> MembershipTarget for GroupClientRoles<'_, R>
where
    R: RemoteState + ?Sized,
{
    async fn resolve(&self, name: &str) -> ImportResult<RoleRepresentation> {
        self.remote
            .find_role(self.realm, &RoleScope::client(self.client), name)
            .await?
            .ok_or_else(|| {
                ImportError::reference(
                    "client role",
                    format!("{}.{name}", self.client.client_id),
                    self.realm,
                )
            })
    }

    async fn add(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
        Ok(self
            .remote
            .add_client_roles_to_group(self.realm, self.group_id, &self.client.id, roles)
            .await?)
    }

    async fn remove(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
        Ok(self
            .remote
            .remove_client_roles_from_group(self.realm, self.group_id, &self.client.id, roles)
            .await?)
    }
}
