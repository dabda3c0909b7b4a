//! Client endpoints.

use async_trait::async_trait;
use kcc_model::ClientRepresentation;

use super::AdminClient;
use crate::client::ClientAccessor;
use crate::error::RemoteResult;

#[async_trait]
impl ClientAccessor for AdminClient {
    async fn find_client_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> RemoteResult<Option<ClientRepresentation>> {
        let url = self.realm_url(
            realm,
            &format!("/clients?clientId={}", urlencoding::encode(client_id)),
        );
        let clients: Vec<ClientRepresentation> = self.get(&url).await?;

        Ok(clients.into_iter().find(|c| c.client_id == client_id))
    }

    async fn list_clients(&self, realm: &str) -> RemoteResult<Vec<ClientRepresentation>> {
        let url = self.realm_url(realm, "/clients");
        self.get(&url).await
    }
}
