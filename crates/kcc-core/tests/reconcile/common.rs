//! Common test utilities and fixtures.

#![allow(dead_code)]

use std::collections::BTreeSet;

use kcc_core::{ImportSummary, RealmImporter};
use kcc_model::{RealmImport, RoleRepresentation};
use kcc_remote::memory::InMemoryRealms;

/// Realm every scenario imports into.
pub const REALM: &str = "realmWithGroups";

/// A realm holding the roles and clients the scenarios reference.
///
/// - realm roles `my_realm_role`, `my_second_realm_role`, `role_x`
/// - `moped-client` with `my_client_role`, `my_second_client_role`
/// - `second-moped-client` with `other_client_role`
pub fn realm_with_roles() -> anyhow::Result<InMemoryRealms> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kcc_core=debug")
        .with_test_writer()
        .try_init();

    let realms = InMemoryRealms::with_realm(REALM);
    for role in ["my_realm_role", "my_second_realm_role", "role_x"] {
        realms.add_role(REALM, None, RoleRepresentation::new_realm_role(role))?;
    }

    realms.add_client(REALM, "moped-client")?;
    for role in ["my_client_role", "my_second_client_role"] {
        realms.add_role(REALM, Some("moped-client"), RoleRepresentation::new_client_role(role))?;
    }

    realms.add_client(REALM, "second-moped-client")?;
    realms.add_role(
        REALM,
        Some("second-moped-client"),
        RoleRepresentation::new_client_role("other_client_role"),
    )?;

    Ok(realms)
}

/// Imports a document and returns its summary.
pub async fn import(realms: &InMemoryRealms, document: &RealmImport) -> anyhow::Result<ImportSummary> {
    Ok(RealmImporter::new(realms).import_realm(document).await?)
}

/// Builds a set of names.
pub fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(ToString::to_string).collect()
}
