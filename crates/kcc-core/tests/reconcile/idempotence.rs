//! Idempotence and partial-application scenarios.

use anyhow::Context;
use kcc_core::{ImportPhase, RealmImporter};
use kcc_model::{GroupRepresentation, RealmImport, RoleRepresentation};
use kcc_remote::RemoteState;
use serde_json::json;

use crate::common::{import, realm_with_roles, REALM};

fn full_document() -> anyhow::Result<RealmImport> {
    Ok(serde_json::from_value(json!({
        "realm": REALM,
        "roles": {
            "realm": [
                {"name": "my_composite_role", "composites": {"realm": ["role_x"]}},
                {
                    "name": "my_mixed_role",
                    "description": "Mixed",
                    "attributes": {"level": ["2"]},
                    "composites": {
                        "realm": ["my_realm_role"],
                        "client": {"moped-client": ["my_client_role"]}
                    }
                }
            ],
            "client": {
                "moped-client": [
                    {"name": "my_client_composite", "composites": {"realm": ["my_composite_role"]}}
                ]
            }
        },
        "groups": [
            {
                "name": "My Group",
                "attributes": {"k": ["v1", "v2"], "cleared": []},
                "realmRoles": ["my_composite_role"],
                "clientRoles": {"moped-client": ["my_client_composite"]},
                "subGroups": [
                    {"name": "A", "realmRoles": ["role_x"], "subGroups": [{"name": "A1"}]},
                    {"name": "B", "clientRoles": {"second-moped-client": ["other_client_role"]}}
                ]
            },
            {"name": "Other Group", "subGroups": []}
        ]
    }))?)
}

async fn snapshot<R: RemoteState + ?Sized>(remote: &R) -> anyhow::Result<Vec<GroupRepresentation>> {
    Ok(remote.list_top_level_groups(REALM).await?)
}

/// Tests that a second run issues no mutation and changes nothing.
#[tokio::test]
async fn test_second_run_is_noop() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(REALM, None, &GroupRepresentation::new("Stale"))?;
    let document = full_document()?;

    let first = import(&realms, &document).await?;
    assert!(!first.is_unchanged());
    assert!(realms.mutation_count() > 0);
    let after_first = snapshot(&realms).await?;

    realms.clear_mutations();
    let second = import(&realms, &document).await?;

    assert!(second.is_unchanged());
    assert_eq!(realms.mutations(), Vec::new());
    assert_eq!(snapshot(&realms).await?, after_first);
    assert_eq!(second.phase, ImportPhase::GroupsDone);
    Ok(())
}

/// Tests that an import that failed midway converges when re-run.
#[tokio::test]
async fn test_rerun_after_failure_converges() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document = RealmImport::new(REALM).with_groups(vec![
        GroupRepresentation::new("first").with_realm_role("my_realm_role"),
        GroupRepresentation::new("second").with_realm_role("late_role"),
        GroupRepresentation::new("third"),
    ]);

    let err = RealmImporter::new(&realms)
        .import_realm(&document)
        .await
        .err()
        .context("late_role does not exist yet")?;
    assert!(err.is_reference());
    assert!(realms.group(REALM, "/first").is_some());
    assert!(realms.group(REALM, "/third").is_none());

    realms.add_role(REALM, None, RoleRepresentation::new_realm_role("late_role"))?;
    realms.clear_mutations();
    let summary = import(&realms, &document).await?;

    // Only the remainder is applied.
    assert_eq!(summary.groups_created, 1);
    assert_eq!(summary.role_mappings_added, 1);
    let second = realms.group(REALM, "/second").context("second")?;
    assert_eq!(second.realm_roles, Some(vec!["late_role".to_string()]));

    realms.clear_mutations();
    import(&realms, &document).await?;
    assert_eq!(realms.mutation_count(), 0);
    Ok(())
}

/// Tests that a multi-realm run stops at the first failing realm.
#[tokio::test]
async fn test_import_all_stops_at_first_failure() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.add_realm("later");

    let documents = vec![
        RealmImport::new(REALM).with_groups(vec![GroupRepresentation::new("ok")]),
        RealmImport::new("missing-realm").with_groups(vec![GroupRepresentation::new("x")]),
        RealmImport::new("later").with_groups(vec![GroupRepresentation::new("never")]),
    ];

    let report = RealmImporter::new(&realms).import_all(&documents).await;

    assert!(!report.is_success());
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].groups_created, 1);

    let failure = report.failure.as_ref().context("failure")?;
    assert_eq!(failure.summary.realm, "missing-realm");
    assert_eq!(failure.summary.phase, ImportPhase::GroupsPending);
    assert!(realms.top_level_group_names("later").is_empty());
    Ok(())
}
