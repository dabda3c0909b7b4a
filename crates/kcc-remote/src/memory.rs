//! In-process realm state.
//!
//! [`InMemoryRealms`] implements every accessor trait against plain maps
//! and records each mutating call, so a reconciliation can be run and then
//! checked both for the state it produced and for the calls it needed.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use async_trait::async_trait;
use kcc_model::{Attributes, ClientRepresentation, GroupPath, GroupRepresentation, RoleRepresentation};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::client::ClientAccessor;
use crate::error::{RemoteError, RemoteResult};
use crate::group::GroupAccessor;
use crate::role::{RoleAccessor, RoleScope};

// ============================================================================
// Mutation Log
// ============================================================================

/// One recorded mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// Accessor method that was called.
    pub operation: &'static str,
    /// Group path or role name the call targeted.
    pub target: String,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation, self.target)
    }
}

// ============================================================================
// Stored State
// ============================================================================

#[derive(Debug, Clone)]
struct StoredGroup {
    name: String,
    parent: Option<String>,
    children: Vec<String>,
    attributes: Attributes,
    realm_roles: BTreeSet<String>,
    client_roles: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone)]
struct StoredRole {
    role: RoleRepresentation,
    client: Option<String>,
    composites: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct RealmState {
    groups: HashMap<String, StoredGroup>,
    top_level: Vec<String>,
    roles: HashMap<String, StoredRole>,
    clients: Vec<ClientRepresentation>,
}

impl RealmState {
    fn siblings(&self, parent: Option<&str>) -> &[String] {
        match parent {
            Some(id) => self
                .groups
                .get(id)
                .map(|g| g.children.as_slice())
                .unwrap_or_default(),
            None => &self.top_level,
        }
    }

    fn sibling_named(&self, parent: Option<&str>, name: &str) -> Option<&str> {
        self.siblings(parent)
            .iter()
            .find(|id| self.groups.get(*id).is_some_and(|g| g.name == name))
            .map(String::as_str)
    }

    fn group_id_by_path(&self, path: &str) -> Option<String> {
        let mut current: Option<String> = None;
        for segment in &GroupPath::parse(path).segments {
            current = Some(self.sibling_named(current.as_deref(), segment)?.to_string());
        }
        current
    }

    fn path_of(&self, id: &str) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(group) = current.and_then(|id| self.groups.get(id)) {
            segments.push(group.name.clone());
            current = group.parent.as_deref();
        }
        segments.reverse();
        GroupPath { segments }.to_string()
    }

    fn client(&self, uuid: &str) -> Option<&ClientRepresentation> {
        self.clients.iter().find(|c| c.id == uuid)
    }

    fn client_uuid(&self, client_id: &str) -> RemoteResult<String> {
        self.clients
            .iter()
            .find(|c| c.client_id == client_id)
            .map(|c| c.id.clone())
            .ok_or_else(|| RemoteError::not_found("Client", client_id))
    }

    fn role_id(&self, client: Option<&str>, name: &str) -> Option<String> {
        self.roles
            .iter()
            .find(|(_, r)| r.client.as_deref() == client && r.role.name == name)
            .map(|(id, _)| id.clone())
    }

    fn role_repr(&self, id: &str) -> Option<RoleRepresentation> {
        self.roles.get(id).map(|stored| RoleRepresentation {
            composite: !stored.composites.is_empty(),
            ..stored.role.clone()
        })
    }

    fn group_repr(&self, id: &str) -> Option<GroupRepresentation> {
        let group = self.groups.get(id)?;

        let realm_roles = group
            .realm_roles
            .iter()
            .filter_map(|role| self.roles.get(role))
            .map(|r| r.role.name.clone())
            .collect();

        let client_roles = group
            .client_roles
            .iter()
            .filter(|(_, roles)| !roles.is_empty())
            .filter_map(|(uuid, roles)| {
                let client = self.client(uuid)?;
                let names = roles
                    .iter()
                    .filter_map(|role| self.roles.get(role))
                    .map(|r| r.role.name.clone())
                    .collect();
                Some((client.client_id.clone(), names))
            })
            .collect();

        let mut sub_groups: Vec<GroupRepresentation> = group
            .children
            .iter()
            .filter_map(|child| self.group_repr(child))
            .collect();
        sub_groups.sort_by(|a, b| a.name.cmp(&b.name));

        Some(GroupRepresentation {
            id: Some(id.to_string()),
            name: group.name.clone(),
            path: Some(self.path_of(id)),
            attributes: Some(group.attributes.clone()),
            realm_roles: Some(realm_roles),
            client_roles: Some(client_roles),
            sub_groups: Some(sub_groups),
        })
    }

    fn insert_group(
        &mut self,
        parent: Option<&str>,
        name: &str,
        attributes: Attributes,
    ) -> RemoteResult<String> {
        if let Some(parent) = parent {
            if !self.groups.contains_key(parent) {
                return Err(RemoteError::not_found("Group", parent));
            }
        }
        if self.sibling_named(parent, name).is_some() {
            return Err(RemoteError::rejected(
                format!("create group '{name}'"),
                409,
                "Conflict",
            ));
        }

        let id = Uuid::new_v4().to_string();
        self.groups.insert(
            id.clone(),
            StoredGroup {
                name: name.to_string(),
                parent: parent.map(ToString::to_string),
                children: Vec::new(),
                attributes,
                realm_roles: BTreeSet::new(),
                client_roles: BTreeMap::new(),
            },
        );
        match parent.and_then(|p| self.groups.get_mut(p)) {
            Some(parent) => parent.children.push(id.clone()),
            None => self.top_level.push(id.clone()),
        }

        Ok(id)
    }

    fn remove_group(&mut self, id: &str) {
        let Some(group) = self.groups.remove(id) else {
            return;
        };
        for child in &group.children {
            self.remove_group(child);
        }
        match group.parent.as_deref().and_then(|p| self.groups.get_mut(p)) {
            Some(parent) => parent.children.retain(|c| c != id),
            None => self.top_level.retain(|c| c != id),
        }
    }

    /// Resolves roles passed to a mutation to stored role ids.
    fn stored_role_ids(
        &self,
        roles: &[RoleRepresentation],
        client: Option<&str>,
    ) -> RemoteResult<Vec<String>> {
        roles
            .iter()
            .map(|role| {
                role.id
                    .as_deref()
                    .filter(|id| self.roles.get(*id).is_some_and(|r| r.client.as_deref() == client))
                    .map(ToString::to_string)
                    .ok_or_else(|| RemoteError::not_found("Role", role.name.clone()))
            })
            .collect()
    }

    fn group_mut(&mut self, id: &str) -> RemoteResult<&mut StoredGroup> {
        self.groups
            .get_mut(id)
            .ok_or_else(|| RemoteError::not_found("Group", id))
    }

    fn scope_client(&self, scope: &RoleScope) -> RemoteResult<Option<String>> {
        match scope {
            RoleScope::Realm => Ok(None),
            RoleScope::Client { id, client_id } => match self.client(id) {
                Some(_) => Ok(Some(id.clone())),
                None => Err(RemoteError::not_found("Client", client_id.clone())),
            },
        }
    }

    fn insert_role(
        &mut self,
        realm: &str,
        client: Option<&str>,
        role: &RoleRepresentation,
    ) -> RemoteResult<String> {
        if self.role_id(client, &role.name).is_some() {
            return Err(RemoteError::rejected(
                format!("create role '{}'", role.name),
                409,
                "Conflict",
            ));
        }

        let id = Uuid::new_v4().to_string();
        let stored = RoleRepresentation {
            id: Some(id.clone()),
            composite: false,
            client_role: client.is_some(),
            container_id: Some(client.unwrap_or(realm).to_string()),
            composites: None,
            ..role.clone()
        };
        self.roles.insert(
            id.clone(),
            StoredRole {
                role: stored,
                client: client.map(ToString::to_string),
                composites: BTreeSet::new(),
            },
        );

        Ok(id)
    }

    fn role_label(&self, role: &RoleRepresentation) -> String {
        let client = role
            .id
            .as_deref()
            .and_then(|id| self.roles.get(id))
            .and_then(|r| r.client.as_deref())
            .and_then(|uuid| self.client(uuid))
            .map(|c| c.client_id.as_str());
        role.full_name(client)
    }
}

// ============================================================================
// In-Memory Realms
// ============================================================================

/// In-memory realms for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryRealms {
    realms: RwLock<HashMap<String, RealmState>>,
    mutations: Mutex<Vec<Mutation>>,
}

impl InMemoryRealms {
    /// Creates an empty instance without any realm.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance holding one empty realm.
    #[must_use]
    pub fn with_realm(realm: &str) -> Self {
        let realms = Self::new();
        realms.add_realm(realm);
        realms
    }

    /// Adds an empty realm. Existing realms are kept as they are.
    pub fn add_realm(&self, realm: &str) {
        self.realms.write().entry(realm.to_string()).or_default();
    }

    /// Registers a client and returns its remote identifier.
    pub fn add_client(&self, realm: &str, client_id: &str) -> RemoteResult<String> {
        self.write(realm, |state| {
            if state.clients.iter().any(|c| c.client_id == client_id) {
                return Err(RemoteError::rejected(
                    format!("create client '{client_id}'"),
                    409,
                    "Conflict",
                ));
            }
            let id = Uuid::new_v4().to_string();
            state.clients.push(ClientRepresentation::new(id.clone(), client_id));
            Ok(id)
        })
    }

    /// Stores a role without recording a mutation. Composites are ignored.
    pub fn add_role(
        &self,
        realm: &str,
        client_id: Option<&str>,
        role: RoleRepresentation,
    ) -> RemoteResult<String> {
        self.write(realm, |state| {
            let client = client_id.map(|c| state.client_uuid(c)).transpose()?;
            state.insert_role(realm, client.as_deref(), &role)
        })
    }

    /// Stores a group tree without recording mutations.
    ///
    /// Role mappings are resolved by name and must refer to existing roles.
    pub fn seed_group(
        &self,
        realm: &str,
        parent_path: Option<&str>,
        group: &GroupRepresentation,
    ) -> RemoteResult<String> {
        self.write(realm, |state| {
            let parent = match parent_path {
                Some(path) => Some(
                    state
                        .group_id_by_path(path)
                        .ok_or_else(|| RemoteError::not_found("Group", path))?,
                ),
                None => None,
            };
            seed(state, parent.as_deref(), group)
        })
    }

    /// Gets a group by path.
    #[must_use]
    pub fn group(&self, realm: &str, path: &str) -> Option<GroupRepresentation> {
        let realms = self.realms.read();
        let state = realms.get(realm)?;
        state
            .group_id_by_path(path)
            .and_then(|id| state.group_repr(&id))
    }

    /// Names of the top-level groups of a realm, sorted.
    #[must_use]
    pub fn top_level_group_names(&self, realm: &str) -> Vec<String> {
        let realms = self.realms.read();
        let Some(state) = realms.get(realm) else {
            return Vec::new();
        };
        let mut names: Vec<String> = state
            .top_level
            .iter()
            .filter_map(|id| state.groups.get(id))
            .map(|g| g.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Gets a role by name, realm-level when `client_id` is `None`.
    #[must_use]
    pub fn role(&self, realm: &str, client_id: Option<&str>, name: &str) -> Option<RoleRepresentation> {
        let realms = self.realms.read();
        let state = realms.get(realm)?;
        let client = match client_id {
            Some(c) => Some(state.client_uuid(c).ok()?),
            None => None,
        };
        state
            .role_id(client.as_deref(), name)
            .and_then(|id| state.role_repr(&id))
    }

    /// Full names of the composite members of a role.
    ///
    /// Client roles are reported as `client_id.role_name`.
    #[must_use]
    pub fn composite_names(
        &self,
        realm: &str,
        client_id: Option<&str>,
        name: &str,
    ) -> Option<BTreeSet<String>> {
        let realms = self.realms.read();
        let state = realms.get(realm)?;
        let client = match client_id {
            Some(c) => Some(state.client_uuid(c).ok()?),
            None => None,
        };
        let id = state.role_id(client.as_deref(), name)?;
        let stored = state.roles.get(&id)?;

        Some(
            stored
                .composites
                .iter()
                .filter_map(|member| state.roles.get(member))
                .map(|member| state.role_label(&member.role))
                .collect(),
        )
    }

    /// Returns all recorded mutations, oldest first.
    #[must_use]
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().clone()
    }

    /// Number of recorded mutations.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.mutations.lock().len()
    }

    /// Clears the mutation log.
    pub fn clear_mutations(&self) {
        self.mutations.lock().clear();
    }

    fn record(&self, operation: &'static str, target: String) {
        tracing::trace!(operation, %target, "in-memory mutation");
        self.mutations.lock().push(Mutation { operation, target });
    }

    fn read<R>(&self, realm: &str, f: impl FnOnce(&RealmState) -> RemoteResult<R>) -> RemoteResult<R> {
        let realms = self.realms.read();
        let state = realms
            .get(realm)
            .ok_or_else(|| RemoteError::not_found("Realm", realm))?;
        f(state)
    }

    fn write<R>(
        &self,
        realm: &str,
        f: impl FnOnce(&mut RealmState) -> RemoteResult<R>,
    ) -> RemoteResult<R> {
        let mut realms = self.realms.write();
        let state = realms
            .get_mut(realm)
            .ok_or_else(|| RemoteError::not_found("Realm", realm))?;
        f(state)
    }
}

fn seed(state: &mut RealmState, parent: Option<&str>, group: &GroupRepresentation) -> RemoteResult<String> {
    let id = state.insert_group(parent, &group.name, group.attributes.clone().unwrap_or_default())?;

    for name in group.realm_role_names() {
        let role = state
            .role_id(None, &name)
            .ok_or_else(|| RemoteError::not_found("Role", name.clone()))?;
        state.group_mut(&id)?.realm_roles.insert(role);
    }

    for (client_id, names) in group.client_role_names() {
        let client = state.client_uuid(&client_id)?;
        for name in names {
            let role = state
                .role_id(Some(&client), &name)
                .ok_or_else(|| RemoteError::not_found("Role", name.clone()))?;
            state
                .group_mut(&id)?
                .client_roles
                .entry(client.clone())
                .or_default()
                .insert(role);
        }
    }

    for child in group.sub_groups.iter().flatten() {
        seed(state, Some(&id), child)?;
    }

    Ok(id)
}

// ============================================================================
// Accessor Implementations
// ============================================================================

#[async_trait]
impl GroupAccessor for InMemoryRealms {
    async fn list_top_level_groups(&self, realm: &str) -> RemoteResult<Vec<GroupRepresentation>> {
        self.read(realm, |state| {
            let mut groups: Vec<GroupRepresentation> = state
                .top_level
                .iter()
                .filter_map(|id| state.group_repr(id))
                .collect();
            groups.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(groups)
        })
    }

    async fn find_group_by_path(
        &self,
        realm: &str,
        path: &str,
    ) -> RemoteResult<Option<GroupRepresentation>> {
        self.read(realm, |state| {
            Ok(state
                .group_id_by_path(path)
                .and_then(|id| state.group_repr(&id)))
        })
    }

    async fn find_group_by_name(
        &self,
        realm: &str,
        parent_id: &str,
        name: &str,
    ) -> RemoteResult<Option<GroupRepresentation>> {
        self.read(realm, |state| {
            Ok(state
                .sibling_named(Some(parent_id), name)
                .and_then(|id| state.group_repr(id)))
        })
    }

    async fn create_group(
        &self,
        realm: &str,
        parent_id: Option<&str>,
        group: &GroupRepresentation,
    ) -> RemoteResult<GroupRepresentation> {
        let (path, created) = self.write(realm, |state| {
            let id = state.insert_group(
                parent_id,
                &group.name,
                group.attributes.clone().unwrap_or_default(),
            )?;
            let created = state
                .group_repr(&id)
                .ok_or_else(|| RemoteError::not_found("Group", id.clone()))?;
            Ok((state.path_of(&id), created))
        })?;

        self.record("create_group", path);
        Ok(created)
    }

    async fn update_group(
        &self,
        realm: &str,
        group_id: &str,
        group: &GroupRepresentation,
    ) -> RemoteResult<()> {
        let path = self.write(realm, |state| {
            let parent = state.group_mut(group_id)?.parent.clone();
            if state
                .sibling_named(parent.as_deref(), &group.name)
                .is_some_and(|id| id != group_id)
            {
                return Err(RemoteError::rejected(
                    format!("update group '{}'", group.name),
                    409,
                    "Conflict",
                ));
            }

            let stored = state.group_mut(group_id)?;
            stored.name.clone_from(&group.name);
            if let Some(attributes) = &group.attributes {
                stored.attributes.clone_from(attributes);
            }
            Ok(state.path_of(group_id))
        })?;

        self.record("update_group", path);
        Ok(())
    }

    async fn delete_group(&self, realm: &str, group_id: &str) -> RemoteResult<()> {
        let path = self.write(realm, |state| {
            if !state.groups.contains_key(group_id) {
                return Err(RemoteError::not_found("Group", group_id));
            }
            let path = state.path_of(group_id);
            state.remove_group(group_id);
            Ok(path)
        })?;

        self.record("delete_group", path);
        Ok(())
    }

    async fn add_realm_roles_to_group(
        &self,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let path = self.write(realm, |state| {
            let ids = state.stored_role_ids(roles, None)?;
            state.group_mut(group_id)?.realm_roles.extend(ids);
            Ok(state.path_of(group_id))
        })?;

        self.record("add_realm_roles_to_group", path);
        Ok(())
    }

    async fn remove_realm_roles_from_group(
        &self,
        realm: &str,
        group_id: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let path = self.write(realm, |state| {
            let ids = state.stored_role_ids(roles, None)?;
            let group = state.group_mut(group_id)?;
            for id in &ids {
                group.realm_roles.remove(id);
            }
            Ok(state.path_of(group_id))
        })?;

        self.record("remove_realm_roles_from_group", path);
        Ok(())
    }

    async fn add_client_roles_to_group(
        &self,
        realm: &str,
        group_id: &str,
        client_uuid: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let path = self.write(realm, |state| {
            let ids = state.stored_role_ids(roles, Some(client_uuid))?;
            state
                .group_mut(group_id)?
                .client_roles
                .entry(client_uuid.to_string())
                .or_default()
                .extend(ids);
            Ok(state.path_of(group_id))
        })?;

        self.record("add_client_roles_to_group", path);
        Ok(())
    }

    async fn remove_client_roles_from_group(
        &self,
        realm: &str,
        group_id: &str,
        client_uuid: &str,
        roles: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let path = self.write(realm, |state| {
            let ids = state.stored_role_ids(roles, Some(client_uuid))?;
            let group = state.group_mut(group_id)?;
            if let Some(mapped) = group.client_roles.get_mut(client_uuid) {
                for id in &ids {
                    mapped.remove(id);
                }
                if mapped.is_empty() {
                    group.client_roles.remove(client_uuid);
                }
            }
            Ok(state.path_of(group_id))
        })?;

        self.record("remove_client_roles_from_group", path);
        Ok(())
    }
}

#[async_trait]
impl RoleAccessor for InMemoryRealms {
    async fn find_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        name: &str,
    ) -> RemoteResult<Option<RoleRepresentation>> {
        self.read(realm, |state| {
            let client = state.scope_client(scope)?;
            Ok(state
                .role_id(client.as_deref(), name)
                .and_then(|id| state.role_repr(&id)))
        })
    }

    async fn create_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        role: &RoleRepresentation,
    ) -> RemoteResult<()> {
        self.write(realm, |state| {
            let client = state.scope_client(scope)?;
            state.insert_role(realm, client.as_deref(), role)
        })?;

        self.record("create_role", role.full_name(scope.client_id()));
        Ok(())
    }

    async fn update_role(
        &self,
        realm: &str,
        scope: &RoleScope,
        role: &RoleRepresentation,
    ) -> RemoteResult<()> {
        self.write(realm, |state| {
            let id = role
                .id
                .clone()
                .ok_or_else(|| RemoteError::not_found("Role", role.name.clone()))?;
            let stored = state
                .roles
                .get_mut(&id)
                .ok_or_else(|| RemoteError::not_found("Role", id.clone()))?;

            stored.role.name.clone_from(&role.name);
            stored.role.description.clone_from(&role.description);
            if let Some(attributes) = &role.attributes {
                stored.role.attributes = Some(attributes.clone());
            }
            Ok(())
        })?;

        self.record("update_role", role.full_name(scope.client_id()));
        Ok(())
    }

    async fn realm_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
    ) -> RemoteResult<Vec<RoleRepresentation>> {
        self.read(realm, |state| {
            let owner = composite_owner(state, role)?;
            Ok(owner
                .composites
                .iter()
                .filter(|id| state.roles.get(*id).is_some_and(|r| r.client.is_none()))
                .filter_map(|id| state.role_repr(id))
                .collect())
        })
    }

    async fn client_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        client_uuid: &str,
    ) -> RemoteResult<Vec<RoleRepresentation>> {
        self.read(realm, |state| {
            let owner = composite_owner(state, role)?;
            Ok(owner
                .composites
                .iter()
                .filter(|id| {
                    state
                        .roles
                        .get(*id)
                        .is_some_and(|r| r.client.as_deref() == Some(client_uuid))
                })
                .filter_map(|id| state.role_repr(id))
                .collect())
        })
    }

    async fn add_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        composites: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let label = self.write(realm, |state| {
            let members = member_ids(state, composites)?;
            let owner = composite_owner_id(state, role)?;
            if let Some(stored) = state.roles.get_mut(&owner) {
                stored.composites.extend(members);
            }
            Ok(state.role_label(role))
        })?;

        self.record("add_composites", label);
        Ok(())
    }

    async fn remove_composites(
        &self,
        realm: &str,
        role: &RoleRepresentation,
        composites: &[RoleRepresentation],
    ) -> RemoteResult<()> {
        let label = self.write(realm, |state| {
            let members = member_ids(state, composites)?;
            let owner = composite_owner_id(state, role)?;
            if let Some(stored) = state.roles.get_mut(&owner) {
                for member in &members {
                    stored.composites.remove(member);
                }
            }
            Ok(state.role_label(role))
        })?;

        self.record("remove_composites", label);
        Ok(())
    }
}

fn composite_owner_id(state: &RealmState, role: &RoleRepresentation) -> RemoteResult<String> {
    role.id
        .clone()
        .filter(|id| state.roles.contains_key(id))
        .ok_or_else(|| RemoteError::not_found("Role", role.name.clone()))
}

fn composite_owner<'a>(state: &'a RealmState, role: &RoleRepresentation) -> RemoteResult<&'a StoredRole> {
    let id = composite_owner_id(state, role)?;
    state
        .roles
        .get(&id)
        .ok_or_else(|| RemoteError::not_found("Role", id))
}

fn member_ids(state: &RealmState, members: &[RoleRepresentation]) -> RemoteResult<Vec<String>> {
    members
        .iter()
        .map(|member| composite_owner_id(state, member))
        .collect()
}

#[async_trait]
impl ClientAccessor for InMemoryRealms {
    async fn find_client_by_client_id(
        &self,
        realm: &str,
        client_id: &str,
    ) -> RemoteResult<Option<ClientRepresentation>> {
        self.read(realm, |state| {
            Ok(state
                .clients
                .iter()
                .find(|c| c.client_id == client_id)
                .cloned())
        })
    }

    async fn list_clients(&self, realm: &str) -> RemoteResult<Vec<ClientRepresentation>> {
        self.read(realm, |state| Ok(state.clients.clone()))
    }
}
