//! Group accessor trait.

use async_trait::async_trait;
use kcc_model::{GroupRepresentation, RoleRepresentation};

use crate::error::RemoteResult;

/// Read and mutate the groups of a realm.
///
/// Every lookup returns the group in full: attributes, realm role names,
/// client role names keyed by `client_id`, and its direct children (each
/// at least with `id` and `name`). Lookups return `Ok(None)` when nothing
/// matches.
#[async_trait]
pub trait GroupAccessor: Send + Sync {
    /// Lists the top-level groups of a realm.
    async fn list_top_level_groups(&self, realm: &str) -> RemoteResult<Vec<GroupRepresentation>>;

    /// Finds a group by its full path (e.g. "/parent/child").
    async fn find_group_by_path(
        &self,
        realm: &str,
        path: &str,
    ) -> RemoteResult<Option<GroupRepresentation>>;

    /// Finds a direct child of a group by name.
    async fn find_group_by_name(
        &self,
        realm: &str,
        parent_id: &str,
        name: &str,
    ) -> RemoteResult<Option<GroupRepresentation>>;

    /// Creates a group, top-level when `parent_id` is `None`.
    ///
    /// Only the name and attributes of `group` are applied; role mappings
    /// and children must be added afterwards. Returns the created group.
    ///
    /// ## Errors
    ///
    /// Returns `RemoteError::Rejected` if a sibling with the same name exists.
    async fn create_group(
        &self,
        realm: &str,
        parent_id: Option<&str>,
        group: &GroupRepresentation,
    ) -> RemoteResult<GroupRepresentation>;

    /// Replaces the name and attributes of a group.
    async fn update_group(
        &self,
        realm: &str,
        group_id: &str,
        group: &GroupRepresentation,
    ) -> RemoteResult<()>;

    /// Deletes a group and its whole subtree.
    async fn delete_group(&self, realm: &str, group_id: &str) -> RemoteResult<()>;

    /// Maps realm roles to a group.
    async fn add_realm_roles_to_group(
        &self,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()>;

    /// Unmaps realm roles from a group.
    async fn remove_realm_roles_from_group(
        &self,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()>;

    /// Maps roles of one client to a group.
    async fn add_client_roles_to_group(
        &self,
        realm: &str,
        group_id: &str,
        client_uuid: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()>;

    /// Unmaps roles of one client from a group.
    async fn remove_client_roles_from_group(
        &self,
        realm: &str,
        group_id: &str,
        client_uuid: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()>;
}
