//! RFC 7644 §3.5.2 PATCH path/value semantics, independent of the repository
//! (spec §4.3 "PATCH semantics").

use scim_gateway::patch::{apply_ops, PatchOperation};
use serde_json::json;

fn op(json_op: serde_json::Value) -> PatchOperation {
    PatchOperation::from_json(&json_op).unwrap()
}

#[test]
fn add_without_selector_appends() {
    let mut resource = json!({"emails": [{"value": "a@x", "primary": true}]});
    let ops = vec![op(json!({"op": "add", "path": "emails", "value": [{"value": "b@x"}]}))];
    apply_ops(&mut resource, &ops).unwrap();
    assert_eq!(resource["emails"].as_array().unwrap().len(), 2);
}

#[test]
fn add_duplicate_value_is_idempotent_no_op() {
    let mut resource = json!({"emails": [{"value": "a@x", "primary": true}]});
    let ops = vec![op(json!({"op": "add", "path": "emails", "value": [{"value": "a@x"}]}))];
    apply_ops(&mut resource, &ops).unwrap();
    assert_eq!(resource["emails"].as_array().unwrap().len(), 1);
}

#[test]
fn remove_with_selector_deletes_matching_elements() {
    let mut resource = json!({
        "emails": [
            {"value": "a@x", "type": "work"},
            {"value": "b@x", "type": "home"},
        ]
    });
    let ops = vec![op(json!({"op": "remove", "path": "emails[type eq \"work\"]"}))];
    apply_ops(&mut resource, &ops).unwrap();
    let remaining = resource["emails"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["value"], "b@x");
}

#[test]
fn remove_without_selector_clears_whole_attribute() {
    let mut resource = json!({"emails": [{"value": "a@x"}]});
    let ops = vec![op(json!({"op": "remove", "path": "emails"}))];
    apply_ops(&mut resource, &ops).unwrap();
    assert!(resource.get("emails").is_none());
}

#[test]
fn replace_with_selector_replaces_only_matching_elements() {
    let mut resource = json!({
        "emails": [
            {"value": "a@x", "type": "work", "primary": true},
            {"value": "b@x", "type": "home"},
        ]
    });
    let ops = vec![op(json!({
        "op": "replace",
        "path": "emails[type eq \"work\"].value",
        "value": "new@x",
    }))];
    apply_ops(&mut resource, &ops).unwrap();
    let emails = resource["emails"].as_array().unwrap();
    assert_eq!(emails[0]["value"], "new@x");
    assert_eq!(emails[1]["value"], "b@x");
}

#[test]
fn value_selector_with_logical_or_is_rejected() {
    let err = PatchOperation::from_json(&json!({
        "op": "remove",
        "path": "emails[type eq \"work\" or type eq \"home\"]",
    }))
    .unwrap_err();
    assert_eq!(err.http_status(), 400);
}

#[test]
fn remove_without_path_requires_shaped_object_value() {
    let err = PatchOperation::from_json(&json!({"op": "remove", "value": "bare-scalar"})).unwrap_err();
    assert_eq!(err.http_status(), 400);
}

#[test]
fn remove_without_path_with_shaped_object_strips_named_fields() {
    let mut resource = json!({"nickName": "bob", "displayName": "Bob", "active": true});
    let ops = vec![op(json!({
        "op": "remove",
        "value": {"nickName": null, "displayName": null},
    }))];
    apply_ops(&mut resource, &ops).unwrap();
    assert!(resource.get("nickName").is_none());
    assert!(resource.get("displayName").is_none());
    assert_eq!(resource["active"], true);
}

#[test]
fn add_with_path_requires_a_value() {
    let err = PatchOperation::from_json(&json!({"op": "add", "path": "displayName"})).unwrap_err();
    assert_eq!(err.http_status(), 400);
}

/// PATCH applies every op in order, re-checking the at-most-one-primary
/// invariant after each one — the first violation fails the whole batch.
#[test]
fn second_op_violating_primary_invariant_fails_the_batch() {
    let mut resource = json!({"emails": [{"value": "a@x", "primary": true}]});
    let ops = vec![
        op(json!({"op": "add", "path": "emails", "value": [{"value": "b@x", "primary": false}]})),
        op(json!({"op": "replace", "path": "emails[value eq \"b@x\"].primary", "value": true})),
    ];
    let err = apply_ops(&mut resource, &ops).unwrap_err();
    assert_eq!(err.http_status(), 400);
}
