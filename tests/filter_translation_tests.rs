//! Filter parser → translator → store round trip (spec §4.1/§4.2, scenario 4).

use scim_gateway::filter::{parse, translate};
use scim_gateway::repository::Repository;
use scim_gateway::resource::ListQuery;
use scim_gateway::store::predicate::{FieldOp, Predicate};
use scim_gateway::store::InMemoryStore;
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn tok() -> CancellationToken {
    CancellationToken::new()
}

/// Every translated query is AND-scoped by tenant before any user predicate.
#[test]
fn translate_always_scopes_by_tenant() {
    let expr = parse("userName eq \"b@x\"").unwrap();
    let scoped = translate("tenant-a", &expr).unwrap();
    assert_eq!(scoped.tenant_id, "tenant-a");
    match scoped.as_predicate() {
        Predicate::And(clauses) => {
            assert!(clauses.iter().any(|p| matches!(
                p,
                Predicate::Field { path, op: FieldOp::Eq(v) }
                    if path == "tenantId" && v == "tenant-a"
            )));
        }
        other => panic!("expected the mandatory tenant And-clause, got {other:?}"),
    }
}

/// Unknown attribute paths are rejected, never silently dropped.
#[test]
fn unknown_attribute_path_is_invalid_filter() {
    let expr = parse("nonexistentAttr eq \"x\"").unwrap();
    let err = translate("tenant-a", &expr).unwrap_err();
    assert_eq!(err.http_status(), 400);
    assert_eq!(err.scim_type(), Some("invalidFilter"));
}

/// `userName` equality is compiled case-insensitively per the translator's
/// documented attribute table.
#[test]
fn username_equality_is_case_insensitive() {
    let expr = parse("userName eq \"B@X\"").unwrap();
    let scoped = translate("tenant-a", &expr).unwrap();
    assert!(matches!(
        scoped.predicate,
        Predicate::Field { op: FieldOp::EqCaseInsensitive(_), .. }
    ));
}

/// Unbalanced parentheses are a parse-time `InvalidFilter`, not a panic.
#[test]
fn unbalanced_parens_is_invalid_filter() {
    let err = parse("(userName eq \"b@x\"").unwrap_err();
    assert_eq!(err.http_status(), 400);
    assert_eq!(err.scim_type(), Some("invalidFilter"));
}

/// `pr` (presence) with a value attached is rejected.
#[test]
fn presence_with_value_is_invalid_filter() {
    let err = parse("userName pr \"x\"").unwrap_err();
    assert_eq!(err.http_status(), 400);
    assert_eq!(err.scim_type(), Some("invalidFilter"));
}

/// Scenario 4: `filter=userName eq "b@x" or (active eq true and emails.value co "@x")`
/// returns every user in the tenant whose userName matches or who is active
/// with a matching email.
#[tokio::test]
async fn scenario_four_compound_filter_across_list() {
    let repo = Repository::new(InMemoryStore::new()).unwrap();

    repo.create(
        "User",
        "tenant-a",
        json!({"userName": "b@x", "active": false, "emails": [{"value": "other@y"}]}),
        &tok(),
    )
    .await
    .unwrap();
    repo.create(
        "User",
        "tenant-a",
        json!({"userName": "c@x", "active": true, "emails": [{"value": "c@x"}]}),
        &tok(),
    )
    .await
    .unwrap();
    repo.create(
        "User",
        "tenant-a",
        json!({"userName": "d@x", "active": false, "emails": [{"value": "d@x"}]}),
        &tok(),
    )
    .await
    .unwrap();
    // Different tenant, would otherwise match — must never appear.
    repo.create(
        "User",
        "tenant-b",
        json!({"userName": "b@x", "active": true, "emails": [{"value": "b@x"}]}),
        &tok(),
    )
    .await
    .unwrap();

    let query = ListQuery::new().with_filter(
        "userName eq \"b@x\" or (active eq true and emails.value co \"@x\")".to_string(),
    );
    let page = repo.list("User", "tenant-a", &query, &tok()).await.unwrap();

    let names: Vec<&str> = page
        .resources
        .iter()
        .map(|r| r["userName"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"b@x"));
    assert!(names.contains(&"c@x"));
    assert!(!names.contains(&"d@x"), "inactive user with no matching userName must be excluded");
    assert_eq!(page.resources.len(), 2);
}
