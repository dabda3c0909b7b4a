//! Group import scenarios.

use std::collections::BTreeMap;

use anyhow::Context;
use kcc_model::{GroupRepresentation, RealmImport};
use serde_json::json;

use crate::common::{import, names, realm_with_roles, REALM};

/// Tests creating a nested group with attributes and role mappings.
#[tokio::test]
async fn test_creates_group_tree() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document: RealmImport = serde_json::from_value(json!({
        "realm": REALM,
        "groups": [{
            "name": "My Group",
            "attributes": {"my added attribute": ["my added attribute value"]},
            "realmRoles": ["my_realm_role"],
            "clientRoles": {"moped-client": ["my_client_role"]},
            "subGroups": [{
                "name": "My SubGroup",
                "subGroups": [{"name": "My Inner SubGroup"}]
            }]
        }]
    }))?;

    let summary = import(&realms, &document).await?;

    let group = realms.group(REALM, "/My Group").context("group created")?;
    assert_eq!(
        group.attribute("my added attribute"),
        Some(&["my added attribute value".to_string()][..])
    );
    assert_eq!(group.realm_role_names(), names(&["my_realm_role"]));
    assert_eq!(
        group.client_role_names(),
        BTreeMap::from([("moped-client".to_string(), names(&["my_client_role"]))])
    );
    assert!(realms
        .group(REALM, "/My Group/My SubGroup/My Inner SubGroup")
        .is_some());

    assert_eq!(summary.groups_created, 3);
    assert_eq!(summary.role_mappings_added, 2);
    assert!(summary.phase.is_done());
    Ok(())
}

/// Tests that declared and remote children converge by name.
#[tokio::test]
async fn test_subgroups_converge_by_name() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(
        REALM,
        None,
        &GroupRepresentation::new("parent")
            .with_sub_group(GroupRepresentation::new("A").with_realm_role("my_realm_role"))
            .with_sub_group(GroupRepresentation::new("C"))
            .with_sub_group(
                GroupRepresentation::new("D").with_sub_group(GroupRepresentation::new("D1")),
            ),
    )?;

    let document = RealmImport::new(REALM).with_groups(vec![GroupRepresentation::new("parent")
        .with_sub_group(GroupRepresentation::new("A").with_realm_role("my_second_realm_role"))
        .with_sub_group(GroupRepresentation::new("B"))
        .with_sub_group(GroupRepresentation::new("C"))]);

    let summary = import(&realms, &document).await?;

    assert!(realms.group(REALM, "/parent/B").is_some());
    assert!(realms.group(REALM, "/parent/D").is_none());
    assert!(realms.group(REALM, "/parent/D/D1").is_none());
    assert!(realms.group(REALM, "/parent/C").is_some());

    let a = realms.group(REALM, "/parent/A").context("A kept")?;
    assert_eq!(a.realm_role_names(), names(&["my_second_realm_role"]));

    assert_eq!(summary.groups_created, 1);
    assert_eq!(summary.groups_deleted, 1);
    let operations: Vec<String> = realms.mutations().iter().map(ToString::to_string).collect();
    assert!(operations.contains(&"delete_group /parent/D".to_string()));
    assert!(operations.contains(&"create_group /parent/B".to_string()));
    Ok(())
}

/// Tests that omitted subgroups leave remote children alone.
#[tokio::test]
async fn test_omitted_subgroups_are_untouched() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(
        REALM,
        None,
        &GroupRepresentation::new("parent").with_sub_group(GroupRepresentation::new("child")),
    )?;

    let document = RealmImport::new(REALM).with_groups(vec![GroupRepresentation::new("parent")]);
    import(&realms, &document).await?;

    assert!(realms.group(REALM, "/parent/child").is_some());
    assert_eq!(realms.mutation_count(), 0);
    Ok(())
}

/// Tests that an empty subgroup list deletes every child.
#[tokio::test]
async fn test_empty_subgroups_delete_children() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(
        REALM,
        None,
        &GroupRepresentation::new("parent")
            .with_sub_group(GroupRepresentation::new("one"))
            .with_sub_group(GroupRepresentation::new("two")),
    )?;

    let mut parent = GroupRepresentation::new("parent");
    parent.sub_groups = Some(Vec::new());
    import(&realms, &RealmImport::new(REALM).with_groups(vec![parent])).await?;

    let parent = realms.group(REALM, "/parent").context("parent kept")?;
    assert_eq!(parent.sub_groups, Some(Vec::new()));
    Ok(())
}

/// Tests top-level orphan deletion and the omitted groups field.
#[tokio::test]
async fn test_top_level_groups() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    for name in ["X", "Y"] {
        realms.seed_group(REALM, None, &GroupRepresentation::new(name))?;
    }

    import(&realms, &RealmImport::new(REALM)).await?;
    assert_eq!(realms.top_level_group_names(REALM), vec!["X", "Y"]);

    import(
        &realms,
        &RealmImport::new(REALM).with_groups(vec![GroupRepresentation::new("Y")]),
    )
    .await?;
    assert_eq!(realms.top_level_group_names(REALM), vec!["Y"]);

    import(&realms, &RealmImport::new(REALM).with_groups(Vec::new())).await?;
    assert!(realms.top_level_group_names(REALM).is_empty());
    Ok(())
}

/// Tests setting, keeping and clearing attributes.
#[tokio::test]
async fn test_attribute_semantics() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(
        REALM,
        None,
        &GroupRepresentation::new("g")
            .with_attribute("k", ["old"])
            .with_attribute("other", ["x"]),
    )?;

    // Attributes omitted: nothing changes.
    import(
        &realms,
        &RealmImport::new(REALM).with_groups(vec![GroupRepresentation::new("g")]),
    )
    .await?;
    let group = realms.group(REALM, "/g").context("group")?;
    assert_eq!(group.attribute("k"), Some(&["old".to_string()][..]));
    assert_eq!(realms.mutation_count(), 0);

    // Declared map replaces values and drops undeclared keys.
    let summary = import(
        &realms,
        &RealmImport::new(REALM)
            .with_groups(vec![GroupRepresentation::new("g").with_attribute("k", ["v1", "v2"])]),
    )
    .await?;
    let group = realms.group(REALM, "/g").context("group")?;
    assert_eq!(
        group.attribute("k"),
        Some(&["v1".to_string(), "v2".to_string()][..])
    );
    assert_eq!(group.attribute("other"), None);
    assert_eq!(summary.groups_updated, 1);

    // An empty list clears the key.
    import(
        &realms,
        &RealmImport::new(REALM).with_groups(vec![
            GroupRepresentation::new("g").with_attribute("k", Vec::<String>::new())
        ]),
    )
    .await?;
    let group = realms.group(REALM, "/g").context("group")?;
    assert_eq!(group.attribute("k"), None);
    Ok(())
}

/// Tests that clients missing from a declared client role map lose all
/// their role mappings.
#[tokio::test]
async fn test_client_role_absence_policy() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(
        REALM,
        None,
        &GroupRepresentation::new("g")
            .with_client_role("moped-client", "my_client_role")
            .with_client_role("moped-client", "my_second_client_role")
            .with_client_role("second-moped-client", "other_client_role"),
    )?;

    let summary = import(
        &realms,
        &RealmImport::new(REALM).with_groups(vec![
            GroupRepresentation::new("g").with_client_role("moped-client", "my_second_client_role")
        ]),
    )
    .await?;

    let group = realms.group(REALM, "/g").context("group")?;
    assert_eq!(
        group.client_role_names(),
        BTreeMap::from([("moped-client".to_string(), names(&["my_second_client_role"]))])
    );
    assert_eq!(summary.role_mappings_removed, 2);
    assert_eq!(summary.role_mappings_added, 0);
    Ok(())
}

/// Tests realm role mapping set difference.
#[tokio::test]
async fn test_realm_role_set_difference() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(
        REALM,
        None,
        &GroupRepresentation::new("g")
            .with_realm_role("my_realm_role")
            .with_realm_role("role_x"),
    )?;

    let summary = import(
        &realms,
        &RealmImport::new(REALM).with_groups(vec![GroupRepresentation::new("g")
            .with_realm_role("role_x")
            .with_realm_role("my_second_realm_role")]),
    )
    .await?;

    let group = realms.group(REALM, "/g").context("group")?;
    assert_eq!(
        group.realm_role_names(),
        names(&["role_x", "my_second_realm_role"])
    );
    assert_eq!(summary.role_mappings_added, 1);
    assert_eq!(summary.role_mappings_removed, 1);
    Ok(())
}

/// Tests that an unknown realm role aborts the import.
#[tokio::test]
async fn test_unknown_realm_role_fails() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document = RealmImport::new(REALM).with_groups(vec![
        GroupRepresentation::new("g").with_realm_role("does_not_exist")
    ]);

    let err = kcc_core::RealmImporter::new(&realms)
        .import_realm(&document)
        .await
        .err()
        .context("import should fail")?;

    assert!(err.is_reference());
    assert!(err.to_string().contains("does_not_exist"));
    Ok(())
}

/// Tests that an unknown client in a client role map aborts the import.
#[tokio::test]
async fn test_unknown_client_fails() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document = RealmImport::new(REALM).with_groups(vec![
        GroupRepresentation::new("g").with_client_role("no-such-client", "my_client_role")
    ]);

    let err = kcc_core::RealmImporter::new(&realms)
        .import_realm(&document)
        .await
        .err()
        .context("import should fail")?;

    assert!(err.is_reference());
    Ok(())
}

/// Tests that duplicate sibling names are refused before anything runs.
#[tokio::test]
async fn test_duplicate_siblings_are_invalid() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    let document = RealmImport::new(REALM).with_groups(vec![
        GroupRepresentation::new("twin"),
        GroupRepresentation::new("twin"),
    ]);

    let err = kcc_core::RealmImporter::new(&realms)
        .import_realm(&document)
        .await
        .err()
        .context("import should fail")?;

    assert!(matches!(err, kcc_core::ImportError::InvalidImport(_)));
    assert_eq!(realms.mutation_count(), 0);
    Ok(())
}

/// Tests that a declared client is resolved even when it maps no roles.
#[tokio::test]
async fn test_unknown_client_with_empty_roles_fails() -> anyhow::Result<()> {
    let realms = realm_with_roles()?;
    realms.seed_group(REALM, None, &GroupRepresentation::new("existing"))?;

    for name in ["existing", "fresh"] {
        let mut group = GroupRepresentation::new(name);
        group.client_roles = Some(BTreeMap::from([("ghost-client".to_string(), Vec::new())]));

        let err = kcc_core::RealmImporter::new(&realms)
            .import_realm(&RealmImport::new(REALM).with_groups(vec![group]))
            .await
            .err()
            .context("import should fail")?;

        assert!(err.is_reference());
        assert!(err.to_string().contains("ghost-client"));
    }
    Ok(())
}
