//! Client accessor trait.

use async_trait::async_trait;
use kcc_model::ClientRepresentation;

use crate::error::RemoteResult;

/// Read the clients of a realm. Clients are never mutated.
#[async_trait]
pub trait ClientAccessor: Send + Sync {
    /// Finds a client by its `client_id`.
    async fn find_client_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> RemoteResult<Option<ClientRepresentation>>;

    /// Lists all clients of a realm.
    async fn list_clients(&self, realm: &str) -> RemoteResult<Vec<ClientRepresentation>>;
}
