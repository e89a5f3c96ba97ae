//! End-to-end scenarios against `Repository<InMemoryStore>` (spec §8).

use scim_gateway::repository::Repository;
use scim_gateway::resource::ListQuery;
use scim_gateway::store::InMemoryStore;
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn repo() -> Repository<InMemoryStore> {
    Repository::new(InMemoryStore::new()).expect("embedded schemas load")
}

fn tok() -> CancellationToken {
    CancellationToken::new()
}

/// Scenario 1: create-then-fetch user.
#[tokio::test]
async fn create_then_fetch_user() {
    let repo = repo();
    let created = repo
        .create(
            "User",
            "tenant-a",
            json!({
                "userName": "b@x",
                "name": {"familyName": "B"},
                "emails": [{"value": "b@x", "primary": true}],
            }),
            &tok(),
        )
        .await
        .expect("create succeeds");

    assert_eq!(created["meta"]["version"], "W/\"1\"");
    assert_eq!(created["meta"]["resourceType"], "User");
    let id = created["id"].as_str().expect("server-assigned id").to_string();

    let fetched = repo
        .read("User", "tenant-a", &id, &tok())
        .await
        .expect("read does not error")
        .expect("resource exists");
    assert_eq!(fetched["userName"], "b@x");
    assert_eq!(fetched["meta"]["resourceType"], "User");
    assert_eq!(fetched["id"], id);
}

/// Scenario 2: userName uniqueness is tenant-scoped and rejects a collision.
#[tokio::test]
async fn duplicate_username_is_rejected_with_uniqueness() {
    let repo = repo();
    repo.create("User", "tenant-a", json!({"userName": "b@x"}), &tok())
        .await
        .expect("first create succeeds");

    let err = repo
        .create("User", "tenant-a", json!({"userName": "b@x"}), &tok())
        .await
        .expect_err("second create with same userName must fail");

    assert_eq!(err.http_status(), 409);
    assert_eq!(err.scim_type(), Some("uniqueness"));
}

/// Uniqueness is scoped per tenant: the same `userName` in a different
/// tenant's partition is not a collision.
#[tokio::test]
async fn duplicate_username_across_tenants_is_allowed() {
    let repo = repo();
    repo.create("User", "tenant-a", json!({"userName": "shared@x"}), &tok())
        .await
        .expect("tenant-a create succeeds");
    repo.create("User", "tenant-b", json!({"userName": "shared@x"}), &tok())
        .await
        .expect("tenant-b create succeeds despite same userName");
}

/// Scenario 3: PATCH atomicity + at-most-one-primary invariant.
#[tokio::test]
async fn patch_adding_second_primary_email_fails_atomically() {
    let repo = repo();
    let created = repo
        .create(
            "User",
            "tenant-a",
            json!({
                "userName": "two.emails@x",
                "emails": [
                    {"value": "one@x", "primary": true},
                    {"value": "two@x", "primary": false},
                ],
            }),
            &tok(),
        )
        .await
        .expect("create succeeds");
    let id = created["id"].as_str().unwrap().to_string();
    let version_before = created["meta"]["version"].clone();

    let ops = vec![scim_gateway::patch::PatchOperation::from_json(&json!({
        "op": "add",
        "path": "emails",
        "value": [{"value": "three@x", "primary": true}],
    }))
    .unwrap()];

    let err = repo
        .patch("User", "tenant-a", &id, &ops, None, &tok())
        .await
        .expect_err("adding a second primary must fail validation");
    assert_eq!(err.http_status(), 400);

    let unchanged = repo
        .read("User", "tenant-a", &id, &tok())
        .await
        .unwrap()
        .expect("resource still exists");
    assert_eq!(unchanged["meta"]["version"], version_before, "a failed PATCH must not bump the version");
}

/// Scenario 7: a stale `If-Match` on PUT fails with 409 and does not mutate.
#[tokio::test]
async fn replace_with_stale_if_match_is_version_mismatch() {
    let repo = repo();
    let created = repo
        .create("User", "tenant-a", json!({"userName": "stale@x"}), &tok())
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // Bump the version once so the stored version is W/"2".
    repo.replace(
        "User",
        "tenant-a",
        &id,
        json!({"userName": "stale@x", "active": false}),
        None,
        &tok(),
    )
    .await
    .unwrap();

    let stale = scim_gateway::resource::ScimVersion::parse_http_header(
        created["meta"]["version"].as_str().unwrap(),
    )
    .unwrap();

    let err = repo
        .replace(
            "User",
            "tenant-a",
            &id,
            json!({"userName": "stale@x", "active": true}),
            Some(&stale),
            &tok(),
        )
        .await
        .expect_err("stale If-Match must fail");
    assert_eq!(err.http_status(), 409);

    let current = repo.read("User", "tenant-a", &id, &tok()).await.unwrap().unwrap();
    assert_eq!(current["active"], false, "the rejected write must not have landed");
}

/// Reading an unknown id returns `Ok(None)`, not an error — not-found is a
/// 404 mapping decision the caller makes, not an exceptional path.
#[tokio::test]
async fn read_missing_resource_returns_none() {
    let repo = repo();
    let found = repo.read("User", "tenant-a", "does-not-exist", &tok()).await.unwrap();
    assert!(found.is_none());
}

/// Every page returned from `list` is scoped to the requesting tenant, and
/// 1-based paging stays within `totalResults`.
#[tokio::test]
async fn list_is_tenant_scoped_and_paginated() {
    let repo = repo();
    for i in 0..3 {
        repo.create("User", "tenant-a", json!({"userName": format!("a{i}@x")}), &tok())
            .await
            .unwrap();
    }
    repo.create("User", "tenant-b", json!({"userName": "other@x"}), &tok())
        .await
        .unwrap();

    let page = repo
        .list(
            "User",
            "tenant-a",
            &ListQuery::new().with_start_index(1).with_count(2),
            &tok(),
        )
        .await
        .unwrap();

    assert_eq!(page.total_results, 3);
    assert_eq!(page.resources.len(), 2);
    assert!(page.start_index + page.resources.len() - 1 <= page.total_results);
}

/// Group deletion removes only the group, never its members' User records.
#[tokio::test]
async fn deleting_group_does_not_delete_members() {
    let repo = repo();
    let user = repo
        .create("User", "tenant-a", json!({"userName": "member@x"}), &tok())
        .await
        .unwrap();
    let user_id = user["id"].as_str().unwrap().to_string();

    let group = repo
        .create(
            "Group",
            "tenant-a",
            json!({"displayName": "Engineers", "members": [{"value": user_id, "type": "User"}]}),
            &tok(),
        )
        .await
        .unwrap();
    let group_id = group["id"].as_str().unwrap().to_string();

    repo.delete("Group", "tenant-a", &group_id, None, &tok()).await.unwrap();

    assert!(repo.read("Group", "tenant-a", &group_id, &tok()).await.unwrap().is_none());
    assert!(
        repo.read("User", "tenant-a", &user_id, &tok()).await.unwrap().is_some(),
        "deleting a group must never delete its members"
    );
}

/// Adding the same member value twice is idempotent set semantics, not a
/// duplicate entry.
#[tokio::test]
async fn add_member_is_idempotent() {
    let repo = repo();
    let group = repo
        .create("Group", "tenant-a", json!({"displayName": "Idempotent"}), &tok())
        .await
        .unwrap();
    let group_id = group["id"].as_str().unwrap().to_string();

    repo.add_member("tenant-a", &group_id, "user-1", Some("User"), &tok())
        .await
        .unwrap();
    let updated = repo
        .add_member("tenant-a", &group_id, "user-1", Some("User"), &tok())
        .await
        .unwrap();

    let members = updated["members"].as_array().unwrap();
    assert_eq!(members.iter().filter(|m| m["value"] == "user-1").count(), 1);
}
