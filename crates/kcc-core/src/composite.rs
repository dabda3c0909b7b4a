//! Composite role synchronization.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use kcc_model::{ClientRepresentation, Composites, RoleRepresentation};
use kcc_remote::{RemoteState, RoleScope};

use crate::error::{ImportError, ImportResult};
use crate::membership::{apply_diff, client_assignments, reconcile_named_set, MembershipTarget};
use crate::summary::ImportSummary;

/// Synchronizes the composites of roles in one realm.
pub struct CompositeResolver<'a, R: ?Sized> {
    remote: &'a R,
    realm: &'a str,
}

impl<'a, R> CompositeResolver<'a, R>
where
    R: RemoteState + ?Sized,
{
    /// Creates a resolver for a realm.
    pub fn new(remote: &'a R, realm: &'a str) -> Self {
        Self { remote, realm }
    }

    /// Converges the composites of a role to the declared ones.
    ///
    /// `None`, or an omitted dimension, leaves that part of the composite
    /// set untouched. Within a declared client map, every client that is
    /// not declared loses all its composites.
    pub async fn sync_composites(
        &self,
        scope: &RoleScope,
        role_name: &str,
        declared: Option<&Composites>,
        summary: &mut ImportSummary,
    ) -> ImportResult<()> {
        let Some(declared) = declared else {
            return Ok(());
        };
        if declared.realm.is_none() && declared.client.is_none() {
            return Ok(());
        }

        let owner = self
            .remote
            .find_role(self.realm, scope, role_name)
            .await?
            .ok_or_else(|| ImportError::reference(role_kind(scope), role_name, self.realm))?;

        if let Some(realm_composites) = &declared.realm {
            let current = names(self.remote.realm_composites(self.realm, &owner).await?);
            let target = RealmComposites {
                remote: self.remote,
                realm: self.realm,
                owner: &owner,
            };

            let diff = reconcile_named_set(&target, realm_composites, &current).await?;
            if !diff.is_empty() {
                tracing::debug!(
                    realm = self.realm,
                    role = role_name,
                    added = ?diff.to_add,
                    removed = ?diff.to_remove,
                    "Synchronized realm composites"
                );
            }
            summary.record_composites(&diff);
        }

        if let Some(client_composites) = &declared.client {
            let declared: BTreeMap<String, BTreeSet<String>> = client_composites
                .iter()
                .map(|(client, roles)| (client.clone(), roles.iter().cloned().collect()))
                .collect();

            // Declared clients must exist; the others are only visited to
            // clear composites left over from earlier imports.
            let mut clients = Vec::new();
            for client_id in declared.keys() {
                let client = self
                    .remote
                    .find_client_by_client_id(self.realm, client_id)
                    .await?
                    .ok_or_else(|| ImportError::reference("client", client_id.as_str(), self.realm))?;
                clients.push(client);
            }
            for client in self.remote.list_clients(self.realm).await? {
                if !declared.contains_key(&client.client_id) {
                    clients.push(client);
                }
            }

            let assignments =
                client_assignments(&declared, clients.iter().map(|c| c.client_id.as_str()));
            for client in &clients {
                let Some(assignment) = assignments.get(&client.client_id) else {
                    continue;
                };
                let current = names(
                    self.remote
                        .client_composites(self.realm, &owner, &client.id)
                        .await?,
                );
                let diff = assignment.diff(&current);
                if diff.is_empty() {
                    continue;
                }

                let target = ClientComposites {
                    remote: self.remote,
                    realm: self.realm,
                    owner: &owner,
                    client,
                };
                apply_diff(&target, &diff).await?;

                tracing::debug!(
                    realm = self.realm,
                    role = role_name,
                    client = %client.client_id,
                    added = ?diff.to_add,
                    removed = ?diff.to_remove,
                    "Synchronized client composites"
                );
                summary.record_composites(&diff);
            }
        }

        Ok(())
    }
}

fn names(roles: Vec<RoleRepresentation>) -> BTreeSet<String> {
    roles.into_iter().map(|r| r.name).collect()
}

fn role_kind(scope: &RoleScope) -> &'static str {
    if scope.is_realm() {
        "realm role"
    } else {
        "client role"
    }
}

/// Realm roles a composite role includes.
struct RealmComposites<'a, R: ?Sized> {
    remote: &'a R,
    realm: &'a str,
    owner: &'a RoleRepresentation,
}

#[async_trait]
impl<R> MembershipTarget for RealmComposites<'_, R>
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
        Ok(self.remote.add_composites(self.realm, self.owner, roles).await?)
    }

    async fn remove(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
        Ok(self
            .remote
            .remove_composites(self.realm, self.owner, roles)
            .await?)
    }
}

/// Roles of one client a composite role includes.
struct ClientComposites<'a, R: ?Sized> {
    remote: &'a R,
    realm: &'a str,
    owner: &'a RoleRepresentation,
    client: &'a ClientRepresentation,
}

#[async_trait]
impl<R> MembershipTarget for ClientComposites<'_, R>
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
        Ok(self.remote.add_composites(self.realm, self.owner, roles).await?)
    }

    async fn remove(&self, roles: &[RoleRepresentation]) -> ImportResult<()> {
        Ok(self
            .remote
            .remove_composites(self.realm, self.owner, roles)
            .await?)
    }
}
