//! JSON PATCH application (RFC 7644 §3.5.2).
//!
//! The wire-level `value` field of a PATCH operation is untyped JSON; this
//! module closes it down to [`PatchValue`] at the parsing boundary so the
//! apply engine below never has to guess at a bare `serde_json::Value`'s
//! shape. Path parsing reuses [`crate::filter::parser`] for the bracketed
//! value-selector grammar (`emails[type eq "work"].value`), the same
//! restricted-to-no-`or` subset the filter translator already enforces for
//! value paths.

use serde_json::{Map, Value};

use crate::error::ScimError;
use crate::filter::ast::{CompareOp, FilterExpr, Literal, LogicalOp};
use crate::filter::parser;

/// The three PATCH operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl PatchOp {
    fn from_str(s: &str) -> Result<Self, ScimError> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "replace" => Ok(Self::Replace),
            other => Err(ScimError::invalid_request(format!(
                "unsupported PATCH op '{other}'"
            ))),
        }
    }
}

/// A parsed PATCH path: `attr`, `attr.sub`, `attr[valueFilter]`, or
/// `attr[valueFilter].sub`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchPath {
    pub attribute: String,
    pub value_filter: Option<FilterExpr>,
    pub sub_attribute: Option<String>,
}

impl PatchPath {
    /// Parse a PATCH path string, rejecting any bracketed selector that
    /// contains a logical `or` (the same restriction the filter translator
    /// applies to value paths).
    pub fn parse(input: &str) -> Result<Self, ScimError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScimError::invalid_path(input, "path must not be empty"));
        }

        let (head, rest) = match trimmed.find('[') {
            Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
            None => (trimmed, ""),
        };
        if head.is_empty() {
            return Err(ScimError::invalid_path(input, "missing attribute name"));
        }

        if rest.is_empty() {
            let mut parts = head.splitn(2, '.');
            let attribute = parts.next().unwrap().to_string();
            let sub_attribute = parts.next().map(|s| s.to_string());
            return Ok(Self {
                attribute,
                value_filter: None,
                sub_attribute,
            });
        }

        let close = rest
            .find(']')
            .ok_or_else(|| ScimError::invalid_path(input, "unterminated value selector"))?;
        let selector_text = rest[1..close].trim();
        if selector_text.is_empty() {
            return Err(ScimError::invalid_path(input, "empty value selector"));
        }
        let expr = parser::parse(selector_text)?;
        reject_or(&expr, input)?;

        let trailer = rest[close + 1..].trim();
        let sub_attribute = if trailer.is_empty() {
            None
        } else if let Some(sub) = trailer.strip_prefix('.') {
            if sub.is_empty() {
                return Err(ScimError::invalid_path(
                    input,
                    "missing sub-attribute after '.'",
                ));
            }
            Some(sub.to_string())
        } else {
            return Err(ScimError::invalid_path(
                input,
                "unexpected trailer after value selector",
            ));
        };

        Ok(Self {
            attribute: head.to_string(),
            value_filter: Some(expr),
            sub_attribute,
        })
    }
}

fn reject_or(expr: &FilterExpr, path: &str) -> Result<(), ScimError> {
    match expr {
        FilterExpr::Logical {
            op: LogicalOp::Or, ..
        } => Err(ScimError::invalid_path(
            path,
            "logical 'or' is not permitted inside a PATCH value selector",
        )),
        FilterExpr::Logical { left, right, .. } => {
            reject_or(left, path)?;
            reject_or(right, path)
        }
        FilterExpr::Not { inner } => reject_or(inner, path),
        FilterExpr::ValuePath { predicate, .. } => reject_or(predicate, path),
        FilterExpr::Comparison { .. } | FilterExpr::Presence { .. } => Ok(()),
    }
}

/// A closed tagged union for the `value` field of a PATCH operation: a
/// scalar for simple/sub-attribute targets, a single shaped object for a
/// multi-valued element or a whole-resource merge, or a list of shaped
/// objects for replacing/appending several elements at once.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    Scalar(Value),
    Object(Map<String, Value>),
    List(Vec<Map<String, Value>>),
}

impl PatchValue {
    fn from_json(value: Value) -> Result<Self, ScimError> {
        match value {
            Value::Object(map) => Ok(Self::Object(map)),
            Value::Array(items) => {
                let mut objects = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(map) => objects.push(map),
                        other => {
                            return Err(ScimError::invalid_request(format!(
                                "PATCH value array elements must be objects, got '{other}'"
                            )));
                        }
                    }
                }
                Ok(Self::List(objects))
            }
            scalar => Ok(Self::Scalar(scalar)),
        }
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    fn into_json(self) -> Value {
        match self {
            Self::Scalar(v) => v,
            Self::Object(m) => Value::Object(m),
            Self::List(items) => Value::Array(items.into_iter().map(Value::Object).collect()),
        }
    }

    fn to_json(&self) -> Value {
        self.clone().into_json()
    }
}

/// A single PATCH operation, parsed from its wire JSON form.
#[derive(Debug, Clone)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: Option<PatchPath>,
    pub value: Option<PatchValue>,
}

impl PatchOperation {
    /// Parse one operation object from a PATCH request body's `Operations` array.
    pub fn from_json(raw: &Value) -> Result<Self, ScimError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| ScimError::invalid_request("PATCH operation must be a JSON object"))?;

        let op_str = obj
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| ScimError::invalid_request("PATCH operation missing 'op'"))?;
        let op = PatchOp::from_str(op_str)?;

        let path = obj
            .get("path")
            .and_then(Value::as_str)
            .map(PatchPath::parse)
            .transpose()?;

        let value = match obj.get("value") {
            Some(v) => Some(PatchValue::from_json(v.clone())?),
            None => None,
        };

        if path.is_none() {
            let is_shaped_object = matches!(value, Some(PatchValue::Object(_)));
            match op {
                PatchOp::Remove if !is_shaped_object => {
                    return Err(ScimError::invalid_path(
                        "",
                        "'remove' without a path requires a shaped object value describing what to strip",
                    ));
                }
                PatchOp::Add | PatchOp::Replace if !is_shaped_object => {
                    return Err(ScimError::invalid_request(
                        "'add'/'replace' without a path requires an object value",
                    ));
                }
                _ => {}
            }
        } else if matches!(op, PatchOp::Add | PatchOp::Replace) && value.is_none() {
            return Err(ScimError::invalid_request(format!(
                "'{op_str}' requires a 'value'"
            )));
        }

        Ok(Self { op, path, value })
    }
}

/// Apply a batch of PATCH operations in order, re-checking the
/// at-most-one-primary invariant after each one. The first operation that
/// would violate it fails the whole batch — callers apply to a clone of the
/// stored document and only persist on success, giving PATCH all-or-nothing
/// semantics.
pub fn apply_ops(resource: &mut Value, ops: &[PatchOperation]) -> Result<(), ScimError> {
    for op in ops {
        apply_one(resource, op)?;
        check_primary_invariants(resource)?;
    }
    Ok(())
}

fn apply_one(resource: &mut Value, op: &PatchOperation) -> Result<(), ScimError> {
    let obj = resource
        .as_object_mut()
        .ok_or_else(|| ScimError::internal("PATCH target is not a JSON object"))?;

    let Some(path) = &op.path else {
        let fields = op
            .value
            .as_ref()
            .and_then(PatchValue::as_object)
            .cloned()
            .unwrap_or_default();
        match op.op {
            PatchOp::Remove => {
                for key in fields.keys() {
                    obj.remove(key);
                }
            }
            PatchOp::Add | PatchOp::Replace => {
                for (key, val) in fields {
                    obj.insert(key, val);
                }
            }
        }
        return Ok(());
    };

    match (&path.value_filter, &path.sub_attribute) {
        (None, None) => apply_whole_attribute(obj, &path.attribute, op.op, op.value.clone()),
        (None, Some(sub)) => {
            apply_sub_attribute(obj, &path.attribute, sub, op.op, op.value.clone())
        }
        (Some(filter), sub) => apply_selected_elements(
            obj,
            &path.attribute,
            filter,
            sub.as_deref(),
            op.op,
            op.value.clone(),
        ),
    }
}

fn require_value(value: Option<PatchValue>, attribute: &str) -> Result<PatchValue, ScimError> {
    value.ok_or_else(|| ScimError::invalid_request(format!("'{attribute}' requires a value")))
}

fn apply_whole_attribute(
    obj: &mut Map<String, Value>,
    attribute: &str,
    op: PatchOp,
    value: Option<PatchValue>,
) -> Result<(), ScimError> {
    match op {
        PatchOp::Remove => {
            obj.remove(attribute);
            Ok(())
        }
        PatchOp::Replace => {
            let value = require_value(value, attribute)?;
            obj.insert(attribute.to_string(), value.into_json());
            Ok(())
        }
        PatchOp::Add => {
            let value = require_value(value, attribute)?;
            match value {
                PatchValue::List(items) => {
                    let entry = obj
                        .entry(attribute.to_string())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    let Value::Array(array) = entry else {
                        return Err(ScimError::invalid_request(format!(
                            "attribute '{attribute}' is not multi-valued"
                        )));
                    };
                    append_distinct(array, items);
                    Ok(())
                }
                other => {
                    obj.insert(attribute.to_string(), other.into_json());
                    Ok(())
                }
            }
        }
    }
}

/// Append elements, skipping any whose `value` sub-attribute already exists
/// in the array — multi-valued membership adds are idempotent set inserts.
fn append_distinct(array: &mut Vec<Value>, items: Vec<Map<String, Value>>) {
    for item in items {
        let duplicate = item.get("value").is_some_and(|new_value| {
            array
                .iter()
                .any(|existing| existing.get("value").is_some_and(|v| v == new_value))
        });
        if !duplicate {
            array.push(Value::Object(item));
        }
    }
}

fn apply_sub_attribute(
    obj: &mut Map<String, Value>,
    attribute: &str,
    sub: &str,
    op: PatchOp,
    value: Option<PatchValue>,
) -> Result<(), ScimError> {
    match op {
        PatchOp::Remove => {
            if let Some(Value::Object(inner)) = obj.get_mut(attribute) {
                inner.remove(sub);
            }
            Ok(())
        }
        PatchOp::Add | PatchOp::Replace => {
            let value = require_value(value, attribute)?;
            let entry = obj
                .entry(attribute.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            let Value::Object(inner) = entry else {
                return Err(ScimError::invalid_request(format!(
                    "attribute '{attribute}' is not a complex attribute"
                )));
            };
            inner.insert(sub.to_string(), value.into_json());
            Ok(())
        }
    }
}

fn apply_selected_elements(
    obj: &mut Map<String, Value>,
    attribute: &str,
    filter: &FilterExpr,
    sub: Option<&str>,
    op: PatchOp,
    value: Option<PatchValue>,
) -> Result<(), ScimError> {
    let Some(Value::Array(array)) = obj.get_mut(attribute) else {
        return match op {
            PatchOp::Remove => Ok(()),
            _ => Err(ScimError::invalid_path(
                attribute,
                "selector path requires an existing multi-valued attribute",
            )),
        };
    };

    match op {
        PatchOp::Remove => {
            if let Some(sub) = sub {
                for element in array.iter_mut() {
                    if matches_filter(filter, element) {
                        if let Some(map) = element.as_object_mut() {
                            map.remove(sub);
                        }
                    }
                }
            } else {
                array.retain(|element| !matches_filter(filter, element));
            }
            Ok(())
        }
        PatchOp::Add | PatchOp::Replace => {
            let value = require_value(value, attribute)?;
            let mut matched = false;
            for element in array.iter_mut() {
                if !matches_filter(filter, element) {
                    continue;
                }
                matched = true;
                if let Some(sub) = sub {
                    if let Some(map) = element.as_object_mut() {
                        map.insert(sub.to_string(), value.to_json());
                    }
                } else if let (Some(patch_fields), Some(map)) =
                    (value.as_object(), element.as_object_mut())
                {
                    merge_object(map, patch_fields);
                }
            }
            if !matched && op == PatchOp::Add && sub.is_none() {
                let mut seed = seed_from_filter(filter);
                if let Some(patch_fields) = value.as_object() {
                    merge_object(&mut seed, patch_fields);
                }
                array.push(Value::Object(seed));
            }
            Ok(())
        }
    }
}

fn merge_object(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, val) in patch {
        target.insert(key.clone(), val.clone());
    }
}

/// Seed a new element from the equality clauses of a selector, so an `add`
/// with a selector that matched nothing still produces an element
/// consistent with the selector it was addressed by.
fn seed_from_filter(expr: &FilterExpr) -> Map<String, Value> {
    let mut seed = Map::new();
    collect_eq(expr, &mut seed);
    seed
}

fn collect_eq(expr: &FilterExpr, seed: &mut Map<String, Value>) {
    match expr {
        FilterExpr::Comparison {
            path,
            op: CompareOp::Eq,
            value,
        } => {
            seed.insert(path.bare(), value.to_json());
        }
        FilterExpr::Logical {
            op: LogicalOp::And,
            left,
            right,
        } => {
            collect_eq(left, seed);
            collect_eq(right, seed);
        }
        _ => {}
    }
}

fn matches_filter(expr: &FilterExpr, doc: &Value) -> bool {
    match expr {
        FilterExpr::Comparison { path, op, value } => {
            resolve_path(doc, &path.segments).is_some_and(|actual| compare(actual, *op, value))
        }
        FilterExpr::Presence { path } => {
            resolve_path(doc, &path.segments).is_some_and(|v| !v.is_null())
        }
        FilterExpr::Logical { op, left, right } => match op {
            LogicalOp::And => matches_filter(left, doc) && matches_filter(right, doc),
            LogicalOp::Or => matches_filter(left, doc) || matches_filter(right, doc),
        },
        FilterExpr::Not { inner } => !matches_filter(inner, doc),
        FilterExpr::ValuePath { predicate, .. } => matches_filter(predicate, doc),
    }
}

fn resolve_path<'a>(doc: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = doc;
    for segment in segments {
        current = current.get(segment)?;
    }
    Some(current)
}

fn values_eq(actual: &Value, literal: &Literal) -> bool {
    let expected = literal.to_json();
    match (actual, &expected) {
        (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
        _ => actual == &expected,
    }
}

fn literal_as_f64(literal: &Literal) -> Option<f64> {
    match literal {
        Literal::Number(n) => Some(*n),
        _ => None,
    }
}

fn compare(actual: &Value, op: CompareOp, literal: &Literal) -> bool {
    match op {
        CompareOp::Eq => values_eq(actual, literal),
        CompareOp::Ne => !values_eq(actual, literal),
        CompareOp::Co | CompareOp::Sw | CompareOp::Ew => {
            let (Some(a), Literal::String(s)) = (actual.as_str(), literal) else {
                return false;
            };
            let a = a.to_ascii_lowercase();
            let s = s.to_ascii_lowercase();
            match op {
                CompareOp::Co => a.contains(&s),
                CompareOp::Sw => a.starts_with(&s),
                CompareOp::Ew => a.ends_with(&s),
                _ => unreachable!(),
            }
        }
        CompareOp::Gt | CompareOp::Ge | CompareOp::Lt | CompareOp::Le => {
            let (Some(a), Some(b)) = (actual.as_f64(), literal_as_f64(literal)) else {
                return false;
            };
            match op {
                CompareOp::Gt => a > b,
                CompareOp::Ge => a >= b,
                CompareOp::Lt => a < b,
                CompareOp::Le => a <= b,
                _ => unreachable!(),
            }
        }
    }
}

/// Multi-valued attributes whose elements carry a `primary` flag, at most
/// one of which may be `true`. Re-checked after every PATCH operation.
const MULTI_VALUED_WITH_PRIMARY: &[&str] = &[
    "emails",
    "phoneNumbers",
    "addresses",
    "ims",
    "photos",
    "x509Certificates",
];

/// Check the at-most-one-primary invariant across all multi-valued
/// attributes that carry a `primary` flag.
pub fn check_primary_invariants(resource: &Value) -> Result<(), ScimError> {
    let Some(obj) = resource.as_object() else {
        return Ok(());
    };
    for attribute in MULTI_VALUED_WITH_PRIMARY {
        let Some(Value::Array(items)) = obj.get(*attribute) else {
            continue;
        };
        let primary_count = items
            .iter()
            .filter(|item| item.get("primary").and_then(Value::as_bool) == Some(true))
            .count();
        if primary_count > 1 {
            return Err(ScimError::invalid_request(format!(
                "attribute '{attribute}' has more than one primary value"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_attribute_path() {
        let path = PatchPath::parse("displayName").unwrap();
        assert_eq!(path.attribute, "displayName");
        assert!(path.value_filter.is_none());
        assert!(path.sub_attribute.is_none());
    }

    #[test]
    fn parses_attribute_with_sub_attribute() {
        let path = PatchPath::parse("name.familyName").unwrap();
        assert_eq!(path.attribute, "name");
        assert_eq!(path.sub_attribute.as_deref(), Some("familyName"));
    }

    #[test]
    fn parses_selector_with_trailing_sub_attribute() {
        let path = PatchPath::parse(r#"emails[type eq "work"].value"#).unwrap();
        assert_eq!(path.attribute, "emails");
        assert!(path.value_filter.is_some());
        assert_eq!(path.sub_attribute.as_deref(), Some("value"));
    }

    #[test]
    fn rejects_or_inside_selector() {
        let err =
            PatchPath::parse(r#"emails[type eq "work" or type eq "home"]"#).unwrap_err();
        assert!(matches!(err, ScimError::InvalidPath { .. }));
    }

    #[test]
    fn replace_whole_attribute() {
        let mut resource = json!({"displayName": "old"});
        let ops = vec![PatchOperation::from_json(&json!({
            "op": "replace",
            "path": "displayName",
            "value": "new"
        }))
        .unwrap()];
        apply_ops(&mut resource, &ops).unwrap();
        assert_eq!(resource["displayName"], "new");
    }

    #[test]
    fn remove_whole_attribute() {
        let mut resource = json!({"displayName": "old", "active": true});
        let ops = vec![
            PatchOperation::from_json(&json!({"op": "remove", "path": "displayName"})).unwrap(),
        ];
        apply_ops(&mut resource, &ops).unwrap();
        assert!(resource.get("displayName").is_none());
    }

    #[test]
    fn add_appends_to_multi_valued_and_is_idempotent() {
        let mut resource = json!({"emails": [{"value": "a@x", "primary": true}]});
        let ops = vec![PatchOperation::from_json(&json!({
            "op": "add",
            "path": "emails",
            "value": [{"value": "b@x"}, {"value": "a@x"}]
        }))
        .unwrap()];
        apply_ops(&mut resource, &ops).unwrap();
        assert_eq!(resource["emails"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn add_with_selector_upserts_matching_element() {
        let mut resource =
            json!({"emails": [{"value": "a@x", "type": "work", "primary": false}]});
        let ops = vec![PatchOperation::from_json(&json!({
            "op": "add",
            "path": r#"emails[type eq "work"]"#,
            "value": {"primary": true}
        }))
        .unwrap()];
        apply_ops(&mut resource, &ops).unwrap();
        assert_eq!(resource["emails"][0]["primary"], true);
    }

    #[test]
    fn add_with_selector_creates_element_when_unmatched() {
        let mut resource = json!({"emails": []});
        let ops = vec![PatchOperation::from_json(&json!({
            "op": "add",
            "path": r#"emails[type eq "home"]"#,
            "value": {"value": "c@x"}
        }))
        .unwrap()];
        apply_ops(&mut resource, &ops).unwrap();
        let emails = resource["emails"].as_array().unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0]["type"], "home");
        assert_eq!(emails[0]["value"], "c@x");
    }

    #[test]
    fn remove_with_selector_deletes_matching_elements() {
        let mut resource = json!({"emails": [
            {"value": "a@x", "type": "work"},
            {"value": "b@x", "type": "home"}
        ]});
        let ops = vec![PatchOperation::from_json(&json!({
            "op": "remove",
            "path": r#"emails[type eq "work"]"#
        }))
        .unwrap()];
        apply_ops(&mut resource, &ops).unwrap();
        let emails = resource["emails"].as_array().unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0]["value"], "b@x");
    }

    #[test]
    fn rejects_second_primary_mid_batch() {
        let mut resource = json!({"emails": [{"value": "a@x", "primary": true}]});
        let ops = vec![PatchOperation::from_json(&json!({
            "op": "add",
            "path": "emails",
            "value": [{"value": "b@x", "primary": true}]
        }))
        .unwrap()];
        let err = apply_ops(&mut resource, &ops).unwrap_err();
        assert!(matches!(err, ScimError::InvalidRequest { .. }));
    }

    #[test]
    fn sub_attribute_add_creates_complex_attribute() {
        let mut resource = json!({});
        let ops = vec![PatchOperation::from_json(&json!({
            "op": "add",
            "path": "name.familyName",
            "value": "Doe"
        }))
        .unwrap()];
        apply_ops(&mut resource, &ops).unwrap();
        assert_eq!(resource["name"]["familyName"], "Doe");
    }

    #[test]
    fn remove_without_path_requires_shaped_value() {
        let err = PatchOperation::from_json(&json!({"op": "remove", "value": "x"})).unwrap_err();
        assert!(matches!(err, ScimError::InvalidPath { .. }));
    }
}
