//! Group endpoints.

use async_trait::async_trait;
use kcc_model::{GroupRepresentation, RoleRepresentation};
use reqwest::{Method, StatusCode};
use serde::Serialize;

use super::{encode_path, AdminClient};
use crate::error::{RemoteError, RemoteResult};
use crate::group::GroupAccessor;

const PAGE_SIZE: usize = 100;

/// Statuses of servers that do not serve GET on the children resource.
const CHILDREN_ABSENT: &[StatusCode] = &[StatusCode::NOT_FOUND, StatusCode::METHOD_NOT_ALLOWED];

/// Body of group create and update requests.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attributes: Option<&'a kcc_model::Attributes>,
}

impl AdminClient {
    /// Fetches one group in full, including its direct children.
    async fn fetch_group(&self, realm: &str, id: &str) -> RemoteResult<Option<GroupRepresentation>> {
        let url = self.realm_url(realm, &format!("/groups/{}", urlencoding::encode(id)));
        let Some(mut group) = self.get_optional::<GroupRepresentation>(&url).await? else {
            return Ok(None);
        };

        // Newer servers report only a child count on the group itself.
        if group.sub_groups.as_ref().map_or(true, Vec::is_empty) {
            group.sub_groups = Some(self.list_children(realm, id).await?);
        }

        Ok(Some(group))
    }

    /// Lists the direct children of a group, page by page.
    async fn list_children(&self, realm: &str, id: &str) -> RemoteResult<Vec<GroupRepresentation>> {
        let mut children = Vec::new();
        let mut first = 0;

        loop {
            let url = self.realm_url(
                realm,
                &format!(
                    "/groups/{}/children?first={first}&max={PAGE_SIZE}&briefRepresentation=false",
                    urlencoding::encode(id)
                ),
            );
            let Some(page) = self
                .get_unless::<Vec<GroupRepresentation>>(&url, CHILDREN_ABSENT)
                .await?
            else {
                if first == 0 {
                    return self.embedded_children(realm, id).await;
                }
                break;
            };

            let len = page.len();
            children.extend(page);
            if len < PAGE_SIZE {
                break;
            }
            first += PAGE_SIZE;
        }

        Ok(children)
    }

    /// Reads the children embedded in the group itself.
    ///
    /// Servers without a GET children endpoint return the whole subtree
    /// under `subGroups`.
    async fn embedded_children(&self, realm: &str, id: &str) -> RemoteResult<Vec<GroupRepresentation>> {
        let url = self.realm_url(realm, &format!("/groups/{}", urlencoding::encode(id)));
        let group = self.get_optional::<GroupRepresentation>(&url).await?;

        Ok(group.and_then(|g| g.sub_groups).unwrap_or_default())
    }
}

#[async_trait]
impl GroupAccessor for AdminClient {
    async fn list_top_level_groups(&self, realm: &str) -> RemoteResult<Vec<GroupRepresentation>> {
        let mut groups = Vec::new();
        let mut first = 0;

        loop {
            let url = self.realm_url(
                realm,
                &format!("/groups?first={first}&max={PAGE_SIZE}&briefRepresentation=false"),
            );
            let page: Vec<GroupRepresentation> = self.get(&url).await?;

            let len = page.len();
            groups.extend(page);
            if len < PAGE_SIZE {
                break;
            }
            first += PAGE_SIZE;
        }

        Ok(groups)
    }

    async fn find_group_by_path(
        &self,
        realm: &str,
        path: &str,
    ) -> RemoteResult<Option<GroupRepresentation>> {
        let url = self.realm_url(realm, &format!("/group-by-path/{}", encode_path(path)));
        let Some(found) = self.get_optional::<GroupRepresentation>(&url).await? else {
            return Ok(None);
        };

        match found.id.as_deref() {
            Some(id) => self.fetch_group(realm, id).await,
            None => Err(RemoteError::UnexpectedResponse(format!(
                "group '{path}' has no id"
            ))),
        }
    }

    async fn find_group_by_name(
        &self,
        realm: &str,
        parent_id: &str,
        name: &str,
    ) -> RemoteResult<Option<GroupRepresentation>> {
        let children = self.list_children(realm, parent_id).await?;
        let Some(id) = children
            .into_iter()
            .find(|child| child.name == name)
            .and_then(|child| child.id)
        else {
            return Ok(None);
        };

        self.fetch_group(realm, &id).await
    }

    async fn create_group(
        &self,
        realm: &str,
        parent_id: Option<&str>,
        group: &GroupRepresentation,
    ) -> RemoteResult<GroupRepresentation> {
        let url = match parent_id {
            Some(parent) => self.realm_url(
                realm,
                &format!("/groups/{}/children", urlencoding::encode(parent)),
            ),
            None => self.realm_url(realm, "/groups"),
        };
        let body = GroupBody {
            id: None,
            name: &group.name,
            attributes: group.attributes.as_ref(),
        };

        let id = self
            .post_created(format!("create group '{}'", group.name), &url, &body)
            .await?;

        let created = match (id, parent_id) {
            (Some(id), _) => self.fetch_group(realm, &id).await?,
            (None, Some(parent)) => self.find_group_by_name(realm, parent, &group.name).await?,
            (None, None) => {
                self.find_group_by_path(realm, &format!("/{}", group.name))
                    .await?
            }
        };

        created.ok_or_else(|| {
            RemoteError::UnexpectedResponse(format!(
                "created group '{}' cannot be found",
                group.name
            ))
        })
    }

    async fn update_group(
        &self,
        realm: &str,
        group_id: &str,
        group: &GroupRepresentation,
    ) -> RemoteResult<()> {
        let url = self.realm_url(realm, &format!("/groups/{}", urlencoding::encode(group_id)));
        let body = GroupBody {
            id: Some(group_id),
            name: &group.name,
            attributes: group.attributes.as_ref(),
        };

        self.send(
            Method::PUT,
            format!("update group '{}'", group.name),
            &url,
            Some(&body),
        )
        .await
    }

    async fn delete_group(&self, realm: &str, group_id: &str) -> RemoteResult<()> {
        let url = self.realm_url(realm, &format!("/groups/{}", urlencoding::encode(group_id)));
        self.send(
            Method::DELETE,
            format!("delete group '{group_id}'"),
            &url,
            None::<&()>,
        )
        .await
    }

    async fn add_realm_roles_to_group(
        &self,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let url = self.realm_url(
            realm,
            &format!("/groups/{}/role-mappings/realm", urlencoding::encode(group_id)),
        );
        self.send(
            Method::POST,
            format!("add realm roles to group '{group_id}'"),
            &url,
            Some(roles),
        )
        .await
    }

    async fn remove_realm_roles_from_group(
        &self,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let url = self.realm_url(
            realm,
            &format!("/groups/{}/role-mappings/realm", urlencoding::encode(group_id)),
        );
        self.send(
            Method::DELETE,
            format!("remove realm roles from group '{group_id}'"),
            &url,
            Some(roles),
        )
        .await
    }

    async fn add_client_roles_to_group(
        &self,
        realm: &str,
        group_id: &str,
        client_uuid: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let url = self.realm_url(
            realm,
            &format!(
                "/groups/{}/role-mappings/clients/{}",
                urlencoding::encode(group_id),
                urlencoding::encode(client_uuid)
            ),
        );
        self.send(
            Method::POST,
            format!("add client roles to group '{group_id}'"),
            &url,
            Some(roles),
        )
        .await
    }

    async fn remove_client_roles_from_group(
        &self,
        realm: &str,
        group_id: &str,
        client_uuid: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let url = self.realm_url(
            realm,
            &format!(
                "/groups/{}/role-mappings/clients/{}",
                urlencoding::encode(group_id),
                urlencoding::encode(client_uuid)
            ),
        );
        self.send(
            Method::DELETE,
            format!("remove client roles from group '{group_id}'"),
            &url,
            Some(roles),
        )
        .await
    }
}
