//! Role and composite endpoints.

use async_trait::async_trait;
use kcc_model::RoleRepresentation;
use reqwest::Method;

use super::AdminClient;
use crate::error::{RemoteError, RemoteResult};
use crate::role::{RoleAccessor, RoleScope};

impl AdminClient {
    /// URL of the role collection of a scope.
    fn roles_url(&self, realm: &str, scope: &RoleScope) -> String {
        match scope {
            RoleScope::Realm => self.realm_url(realm, "/roles"),
            RoleScope::Client { id, .. } => self.realm_url(
                realm,
                &format!("/clients/{}/roles", urlencoding::encode(id)),
            ),
        }
    }

    /// URL of a role addressed by identifier.
    fn role_by_id_url(&self, realm: &str, role: &RoleRepresentation, suffix: &str) -> RemoteResult<String> {
        let id = role.id.as_deref().ok_or_else(|| {
            RemoteError::UnexpectedResponse(format!("role '{}' has no id", role.name))
        })?;

        Ok(self.realm_url(
            realm,
            &format!("/roles-by-id/{}{suffix}", urlencoding::encode(id)),
        ))
    }
}

#[async_trait]
impl RoleAccessor for AdminClient {
    async fn find_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        name: &str,
    ) -> RemoteResult<Option<RoleRepresentation>> {
        let url = format!(
            "{}/{}",
            self.roles_url(realm, scope),
            urlencoding::encode(name)
        );
        self.get_optional(&url).await
    }

    async fn create_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        role: &RoleRepresentation,
    ) -> RemoteResult<()> {
        let url = self.roles_url(realm, scope);
        self.post_created(
            format!("create {scope} role '{}'", role.name),
            &url,
            &role.without_composites(),
        )
        .await
        .map(|_| ())
    }

    async fn update_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        role: &RoleRepresentation,
    ) -> RemoteResult<()> {
        let url = self.role_by_id_url(realm, role, "")?;
        self.send(
            Method::PUT,
            format!("update {scope} role '{}'", role.name),
            &url,
            Some(role),
        )
        .await
    }

    async fn realm_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
    ) -> RemoteResult<Vec<RoleRepresentation>> {
        let url = self.role_by_id_url(realm, role, "/composites/realm")?;
        self.get(&url).await
    }

    async fn client_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        client_uuid: &str,
    ) -> RemoteResult<Vec<RoleRepresentation>> {
        let suffix = format!("/composites/clients/{}", urlencoding::encode(client_uuid));
        let url = self.role_by_id_url(realm, role, &suffix)?;
        self.get(&url).await
    }

    async fn add_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        composites: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let url = self.role_by_id_url(realm, role, "/composites")?;
        self.send(
            Method::POST,
            format!("add composites to role '{}'", role.name),
            &url,
            Some(composites),
        )
        .await
    }

    async fn remove_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        composites: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let url = self.role_by_id_url(realm, role, "/composites")?;
        self.send(
            Method::DELETE,
            format!("remove composites from role '{}'", role.name),
            &url,
            Some(composites),
        )
        .await
    }
}
