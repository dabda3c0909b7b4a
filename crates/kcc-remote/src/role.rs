//! Role accessor trait.

use std::fmt;

use async_trait::async_trait;
use kcc_model::{ClientRepresentation, RoleRepresentation};

use crate::error::RemoteResult;

/// Namespace a role name is unique in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleScope {
    /// The realm's own roles.
    Realm,
    /// The roles of one client.
    Client {
        /// Remote identifier of the client.
        id: String,
        /// Human-readable `client_id`.
        client_id: String,
    },
}

impl RoleScope {
    /// Scope of the roles of a client.
    #[must_use]
    pub fn client(client: &ClientRepresentation) -> Self {
        Self::Client {
            id: client.id.clone(),
            client_id: client.client_id.clone(),
        }
    }

    /// Checks if this is the realm scope.
    #[must_use]
    pub const fn is_realm(&self) -> bool {
        matches!(self, Self::Realm)
    }

    /// The `client_id` of a client scope.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Self::Realm => None,
            Self::Client { client_id, .. } => Some(client_id),
        }
    }
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Realm => f.write_str("realm"),
            Self::Client { client_id, .. } => write!(f, "client '{client_id}'"),
        }
    }
}

/// Read and mutate the roles of a realm and its clients.
///
/// Roles passed back in (to update, or as composite owner) are the ones
/// returned by [`RoleAccessor::find_role`], carrying their remote `id`.
#[async_trait]
pub trait RoleAccessor: Send + Sync {
    /// Finds a role by name within a scope.
    async fn find_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        name: &str,
    ) -> RemoteResult<Option<RoleRepresentation>>;

    /// Creates a role without composites.
    ///
    /// ## Errors
    ///
    /// Returns `RemoteError::Rejected` if the name is taken in the scope.
    async fn create_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        role: &RoleRepresentation,
    ) -> RemoteResult<()>;

    /// Overwrites the scalar fields of an existing role.
    async fn update_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        role: &RoleRepresentation,
    ) -> RemoteResult<()>;

    /// Lists the realm roles a role is composed of.
    async fn realm_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
    ) -> RemoteResult<Vec<RoleRepresentation>>;

    /// Lists the roles of one client a role is composed of.
    async fn client_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        client_uuid: &str,
    ) -> RemoteResult<Vec<RoleRepresentation>>;

    /// Adds composite members to a role.
    async fn add_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        composites: &[RoleRepresentation],
    ) -> RemoteResult<()>;

    /// Removes composite members from a role.
    async fn remove_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        composites: &[RoleRepresentation],
    ) -> RemoteResult<()>;
}
