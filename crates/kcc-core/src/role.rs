//! Role reconciliation.

use kcc_model::{RoleRepresentation, RolesImport};
use kcc_remote::{RemoteState, RoleScope};

use crate::composite::CompositeResolver;
use crate::error::{ImportError, ImportResult};
use crate::patch::patch_role;
use crate::summary::ImportSummary;

/// What happened to a role's scalar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOutcome {
    /// The role did not exist and was created.
    Created,
    /// The role existed and was updated.
    Updated,
    /// The role already matched.
    Unchanged,
}

/// Converges the roles of one realm.
pub struct RoleReconciler<'a, R: ?Sized> {
    remote: &'a R,
    realm: &'a str,
}

impl<'a, R> RoleReconciler<'a, R>
where
    R: RemoteState + ?Sized,
{
    /// Creates a reconciler for a realm.
    pub fn new(remote: &'a R, realm: &'a str) -> Self {
        Self { remote, realm }
    }

    /// Converges one role: its scalar fields, then its composites.
    pub async fn reconcile_role(
        &self,
        scope: &RoleScope,
        declared: &RoleRepresentation,
        summary: &mut ImportSummary,
    ) -> ImportResult<RoleOutcome> {
        let outcome = self.upsert_role(scope, declared, summary).await?;
        CompositeResolver::new(self.remote, self.realm)
            .sync_composites(scope, &declared.name, declared.composites.as_ref(), summary)
            .await?;
        Ok(outcome)
    }

    /// Converges every declared role.
    ///
    /// All roles of all scopes are created or updated before any composite
    /// is synchronized, so a composite may name a role declared after it.
    pub async fn reconcile_roles(&self, roles: &RolesImport, summary: &mut ImportSummary) -> ImportResult<()> {
        let mut declared: Vec<(RoleScope, &RoleRepresentation)> = roles
            .realm_roles()
            .iter()
            .map(|role| (RoleScope::Realm, role))
            .collect();

        for (client_id, client_roles) in roles.client_roles() {
            let client = self
                .remote
                .find_client_by_client_id(self.realm, client_id)
                .await?
                .ok_or_else(|| ImportError::reference("client", client_id, self.realm))?;
            let scope = RoleScope::client(&client);
            declared.extend(client_roles.iter().map(|role| (scope.clone(), role)));
        }

        for (scope, role) in &declared {
            let outcome = self.upsert_role(scope, role, summary).await?;
            tracing::trace!(realm = self.realm, role = %role.name, %scope, ?outcome, "Role converged");
        }

        let composites = CompositeResolver::new(self.remote, self.realm);
        for (scope, role) in &declared {
            composites
                .sync_composites(scope, &role.name, role.composites.as_ref(), summary)
                .await?;
        }

        Ok(())
    }

    /// Creates the role, or deep-patches its scalar fields.
    async fn upsert_role(
        &self,
        scope: &RoleScope,
        declared: &RoleRepresentation,
        summary: &mut ImportSummary,
    ) -> ImportResult<RoleOutcome> {
        let Some(existing) = self.remote.find_role(self.realm, scope, &declared.name).await? else {
            tracing::debug!(realm = self.realm, role = %declared.name, %scope, "Creating role");
            self.remote
                .create_role(self.realm, scope, &declared.without_composites())
                .await?;
            summary.roles_created += 1;
            return Ok(RoleOutcome::Created);
        };

        let patched = patch_role(&existing, declared)?;
        if patched == existing {
            return Ok(RoleOutcome::Unchanged);
        }

        tracing::debug!(realm = self.realm, role = %declared.name, %scope, "Updating role");
        self.remote.update_role(self.realm, scope, &patched).await?;
        summary.roles_updated += 1;
        Ok(RoleOutcome::Updated)
    }
}
