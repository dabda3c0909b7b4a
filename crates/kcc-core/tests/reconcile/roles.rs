//! Role and composite import scenarios.

use anyhow::Context;
use kcc_core::role::{RoleOutcome, RoleReconciler};
use kcc_core::{ImportSummary, RealmImporter};
use kcc_model::{Composites, RealmImport, RoleRepresentation};
use kcc_remote::{RoleAccessor, RoleScope};
use serde_json::json;

use crate::common::{import, names, realm_with_roles, REALM};

/// Tests the composite realm role scenario, including the second run.
#[tokio::test]
async fn test_realm_composite_converges() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.add_role(REALM, None, RoleRepresentation::new_realm_role("my_composite_role"))?;

    let document = RealmImport::new(REALM)
        .with_realm_role(RoleRepresentation::new_realm_role("my_composite_role").with_realm_composite("role_x"));

    let summary = import(&realms, &document).await?;
    assert_eq!(
        realms.composite_names(REALM, None, "my_composite_role"),
        Some(names(&["role_x"]))
    );
    assert_eq!(summary.composites_added, 1);

    realms.clear_mutations();
    let summary = import(&realms, &document).await?;
    assert!(summary.is_unchanged());
    assert_eq!(realms.mutation_count(), 0);
    Ok(())
}

/// Tests creating realm and client roles from a JSON document.
#[tokio::test]
async fn test_creates_roles() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document: RealmImport = serde_json::from_value(json!({
        "realm": REALM,
        "roles": {
            "realm": [{"name": "my_new_realm_role", "description": "My new realm role"}],
            "client": {
                "moped-client": [{"name": "my_new_client_role", "description": "My new client role"}]
            }
        }
    }))?;

    let summary = import(&realms, &document).await?;

    let realm_role = realms
        .role(REALM, None, "my_new_realm_role")
        .context("realm role created")?;
    assert_eq!(realm_role.description.as_deref(), Some("My new realm role"));
    assert!(!realm_role.client_role);

    let client_role = realms
        .role(REALM, Some("moped-client"), "my_new_client_role")
        .context("client role created")?;
    assert!(client_role.client_role);
    assert_eq!(summary.roles_created, 2);
    Ok(())
}

/// Tests that role updates keep fields the document does not declare.
#[tokio::test]
async fn test_role_update_is_deep_patch() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.add_role(
        REALM,
        None,
        RoleRepresentation::new_realm_role("patched")
            .with_description("old")
            .with_attribute("team", ["red"]),
    )?;

    let summary = import(
        &realms,
        &RealmImport::new(REALM)
            .with_realm_role(RoleRepresentation::new_realm_role("patched").with_description("new")),
    )
    .await?;

    let role = realms.role(REALM, None, "patched").context("role")?;
    assert_eq!(role.description.as_deref(), Some("new"));
    assert_eq!(
        role.attributes.and_then(|a| a.get("team").cloned()),
        Some(vec!["red".to_string()])
    );
    assert_eq!(summary.roles_updated, 1);
    assert_eq!(summary.roles_created, 0);
    Ok(())
}

/// Tests that a composite may reference a role declared after it.
#[tokio::test]
async fn test_composite_references_later_role() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document = RealmImport::new(REALM)
        .with_realm_role(RoleRepresentation::new_realm_role("first").with_realm_composite("second"))
        .with_realm_role(RoleRepresentation::new_realm_role("second"));

    import(&realms, &document).await?;

    assert_eq!(
        realms.composite_names(REALM, None, "first"),
        Some(names(&["second"]))
    );
    assert!(realms.role(REALM, None, "first").context("first")?.composite);
    Ok(())
}

/// Tests client composites, including removal toward undeclared clients.
#[tokio::test]
async fn test_client_composites_converge() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.add_role(REALM, None, RoleRepresentation::new_realm_role("composite"))?;

    let owner = realms
        .find_role(REALM, &RoleScope::Realm, "composite")
        .await?
        .context("owner")?;
    let second = realms
        .role(REALM, Some("second-moped-client"), "other_client_role")
        .context("client role")?;
    realms.add_composites(REALM, &owner, &[second]).await?;

    let summary = import(
        &realms,
        &RealmImport::new(REALM).with_realm_role(
            RoleRepresentation::new_realm_role("composite")
                .with_client_composite("moped-client", "my_client_role"),
        ),
    )
    .await?;

    assert_eq!(
        realms.composite_names(REALM, None, "composite"),
        Some(names(&["moped-client.my_client_role"]))
    );
    assert_eq!(summary.composites_added, 1);
    assert_eq!(summary.composites_removed, 1);
    Ok(())
}

/// Tests that an omitted composite dimension is left alone.
#[tokio::test]
async fn test_omitted_realm_composites_are_untouched() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.add_role(REALM, None, RoleRepresentation::new_realm_role("composite"))?;
    let owner = realms
        .find_role(REALM, &RoleScope::Realm, "composite")
        .await?
        .context("owner")?;
    let member = realms.role(REALM, None, "role_x").context("member")?;
    realms.add_composites(REALM, &owner, &[member]).await?;

    let role = RoleRepresentation {
        composites: Some(Composites {
            realm: None,
            client: Some(Default::default()),
        }),
        ..RoleRepresentation::new_realm_role("composite")
    };
    import(&realms, &RealmImport::new(REALM).with_realm_role(role)).await?;

    assert_eq!(
        realms.composite_names(REALM, None, "composite"),
        Some(names(&["role_x"]))
    );
    Ok(())
}

/// Tests that an empty realm composite set removes every realm composite.
#[tokio::test]
async fn test_empty_realm_composites_clear() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    import(
        &realms,
        &RealmImport::new(REALM).with_realm_role(
            RoleRepresentation::new_realm_role("composite")
                .with_realm_composite("role_x")
                .with_realm_composite("my_realm_role"),
        ),
    )
    .await?;

    let role = RoleRepresentation {
        composites: Some(Composites {
            realm: Some(Default::default()),
            client: None,
        }),
        ..RoleRepresentation::new_realm_role("composite")
    };
    let summary = import(&realms, &RealmImport::new(REALM).with_realm_role(role)).await?;

    assert_eq!(
        realms.composite_names(REALM, None, "composite"),
        Some(names(&[]))
    );
    assert_eq!(summary.composites_removed, 2);
    Ok(())
}

/// Tests that a composite naming an unknown role aborts the import.
#[tokio::test]
async fn test_unknown_composite_fails() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document = RealmImport::new(REALM).with_realm_role(
        RoleRepresentation::new_realm_role("composite").with_realm_composite("missing"),
    );

    let err = RealmImporter::new(&realms)
        .import_realm(&document)
        .await
        .err()
        .context("import should fail")?;

    assert!(err.is_reference());
    // The role itself was created before composites were resolved.
    assert!(realms.role(REALM, None, "composite").is_some());
    Ok(())
}

/// Tests that client roles of an unknown client abort the import.
#[tokio::test]
async fn test_unknown_role_client_fails() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document = RealmImport::new(REALM)
        .with_client_role("no-such-client", RoleRepresentation::new_client_role("r"));

    let err = RealmImporter::new(&realms)
        .import_realm(&document)
        .await
        .err()
        .context("import should fail")?;

    assert!(err.is_reference());
    assert_eq!(realms.mutation_count(), 0);
    Ok(())
}

/// Tests converging a single role together with its composites.
#[tokio::test]
async fn test_reconcile_single_role() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let reconciler = RoleReconciler::new(&realms, REALM);
    let declared = RoleRepresentation::new_realm_role("single")
        .with_description("first")
        .with_realm_composite("role_x");

    let mut summary = ImportSummary::new(REALM);
    let outcome = reconciler
        .reconcile_role(&RoleScope::Realm, &declared, &mut summary)
        .await?;
    assert_eq!(outcome, RoleOutcome::Created);
    assert_eq!(
        realms.composite_names(REALM, None, "single"),
        Some(names(&["role_x"]))
    );
    assert_eq!(summary.composites_added, 1);

    realms.clear_mutations();
    let mut summary = ImportSummary::new(REALM);
    let outcome = reconciler
        .reconcile_role(&RoleScope::Realm, &declared, &mut summary)
        .await?;
    assert_eq!(outcome, RoleOutcome::Unchanged);
    assert_eq!(realms.mutation_count(), 0);

    let changed = declared.clone().with_description("second");
    let mut summary = ImportSummary::new(REALM);
    let outcome = reconciler
        .reconcile_role(&RoleScope::Realm, &changed, &mut summary)
        .await?;
    assert_eq!(outcome, RoleOutcome::Updated);
    assert_eq!(summary.roles_updated, 1);
    assert_eq!(summary.composites_added, 0);
    let role = realms.role(REALM, None, "single").context("role")?;
    assert_eq!(role.description.as_deref(), Some("second"));
    Ok(())
}
