//! Compiles a parsed filter expression tree to a tenant-scoped store predicate.
//!
//! Every translated query is AND-scoped by the request's tenant before any
//! user predicate is applied — [`translate`] returns a [`ScopedPredicate`],
//! which has no constructor that skips the tenant clause. Unknown attribute
//! paths are rejected rather than silently dropped, via the attribute table
//! below.

use crate::error::ScimError;
use crate::filter::ast::{AttributePath, CompareOp, FilterExpr, Literal};
use crate::store::predicate::{FieldOp, Predicate, ScopedPredicate};

/// The documented map from SCIM attribute paths to store field paths.
/// Paths not listed here are rejected with `InvalidFilter` rather than
/// passed through, per the translator's fail-closed contract.
const ATTRIBUTE_TABLE: &[(&str, &str)] = &[
    ("userName", "userName"),
    ("name.familyName", "name.familyName"),
    ("name.givenName", "name.givenName"),
    ("name.middleName", "name.middleName"),
    ("displayName", "displayName"),
    ("active", "active"),
    ("externalId", "externalId"),
    ("emails.value", "emails[*].value"),
    ("emails.type", "emails[*].type"),
    ("emails.primary", "emails[*].primary"),
    ("phoneNumbers.value", "phoneNumbers[*].value"),
    ("addresses.type", "addresses[*].type"),
    ("members.value", "members[*].value"),
    ("meta.lastModified", "meta.lastModified"),
    ("meta.created", "meta.created"),
    ("meta.resourceType", "meta.resourceType"),
];

/// Attribute paths whose store-side comparison is case-insensitive.
const CASE_INSENSITIVE_PATHS: &[&str] = &["userName", "emails.value"];

fn resolve_path(path: &AttributePath) -> Result<&'static str, ScimError> {
    let bare = path.bare();
    ATTRIBUTE_TABLE
        .iter()
        .find(|(scim_path, _)| *scim_path == bare)
        .map(|(_, store_path)| *store_path)
        .ok_or_else(|| {
            ScimError::invalid_filter(0, format!("unknown or unsupported attribute path '{bare}'"))
        })
}

fn is_case_insensitive(path: &AttributePath) -> bool {
    CASE_INSENSITIVE_PATHS.contains(&path.bare().as_str())
}

fn translate_comparison(
    path: &AttributePath,
    op: CompareOp,
    value: &Literal,
) -> Result<Predicate, ScimError> {
    let store_path = resolve_path(path)?.to_string();
    let json_value = value.to_json();

    let field_op = match op {
        CompareOp::Eq if is_case_insensitive(path) => FieldOp::EqCaseInsensitive(json_value),
        CompareOp::Eq => FieldOp::Eq(json_value),
        CompareOp::Ne => {
            return Ok(Predicate::Not(Box::new(Predicate::Field {
                path: store_path,
                op: FieldOp::Eq(json_value),
            })));
        }
        CompareOp::Co => FieldOp::Contains(expect_string(value)?),
        CompareOp::Sw => FieldOp::StartsWith(expect_string(value)?),
        CompareOp::Ew => FieldOp::EndsWith(expect_string(value)?),
        CompareOp::Gt => FieldOp::GreaterThan(json_value),
        CompareOp::Ge => FieldOp::GreaterOrEqual(json_value),
        CompareOp::Lt => FieldOp::LessThan(json_value),
        CompareOp::Le => FieldOp::LessOrEqual(json_value),
    };

    Ok(Predicate::Field {
        path: store_path,
        op: field_op,
    })
}

fn expect_string(value: &Literal) -> Result<String, ScimError> {
    match value {
        Literal::String(s) => Ok(s.clone()),
        _ => Err(ScimError::invalid_filter(
            0,
            "substring/prefix/suffix operators require a string literal",
        )),
    }
}

fn translate_expr(expr: &FilterExpr) -> Result<Predicate, ScimError> {
    match expr {
        FilterExpr::Comparison { path, op, value } => translate_comparison(path, *op, value),
        FilterExpr::Presence { path } => {
            let store_path = resolve_path(path)?.to_string();
            Ok(Predicate::Field {
                path: store_path,
                op: FieldOp::IsDefined,
            })
        }
        FilterExpr::Logical { op, left, right } => {
            let left = translate_expr(left)?;
            let right = translate_expr(right)?;
            Ok(match op {
                crate::filter::ast::LogicalOp::And => Predicate::And(vec![left, right]),
                crate::filter::ast::LogicalOp::Or => Predicate::Or(vec![left, right]),
            })
        }
        FilterExpr::Not { inner } => Ok(Predicate::Not(Box::new(translate_expr(inner)?))),
        FilterExpr::ValuePath { path, predicate } => {
            let store_path = resolve_path(path)?.to_string();
            // The array-level path (strip any trailing `.sub` the resolver already
            // folded in) identifies which multi-valued attribute to match within.
            let array_root = store_path
                .split("[*]")
                .next()
                .unwrap_or(&store_path)
                .to_string();
            Ok(Predicate::AnyMatch {
                path: array_root,
                inner: Box::new(translate_expr(predicate)?),
            })
        }
    }
}

/// Translate a parsed filter expression into a predicate scoped to `tenant_id`.
pub fn translate(tenant_id: impl Into<String>, expr: &FilterExpr) -> Result<ScopedPredicate, ScimError> {
    let predicate = translate_expr(expr)?;
    Ok(Predicate::scoped(tenant_id, predicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parser::parse;

    #[test]
    fn translate_scopes_by_tenant() {
        let expr = parse(r#"userName eq "b@x""#).unwrap();
        let scoped = translate("tenant-1", &expr).unwrap();
        assert_eq!(scoped.tenant_id, "tenant-1");
        let full = scoped.as_predicate();
        match full {
            Predicate::And(clauses) => {
                assert_eq!(clauses.len(), 2);
                assert!(matches!(
                    &clauses[0],
                    Predicate::Field { path, op: FieldOp::Eq(_) } if path == "tenantId"
                ));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn translate_username_is_case_insensitive() {
        let expr = parse(r#"userName eq "b@x""#).unwrap();
        let scoped = translate("t", &expr).unwrap();
        match scoped.predicate {
            Predicate::Field {
                op: FieldOp::EqCaseInsensitive(_),
                ..
            } => {}
            other => panic!("expected case-insensitive eq, got {other:?}"),
        }
    }

    #[test]
    fn translate_rejects_unknown_attribute() {
        let expr = parse(r#"notARealAttribute eq "x""#).unwrap();
        let err = translate("t", &expr).unwrap_err();
        assert!(matches!(err, ScimError::InvalidFilter { .. }));
    }

    #[test]
    fn translate_value_path_becomes_any_match() {
        let expr = parse(r#"emails[type eq "work"].value eq "b@x""#).unwrap();
        let scoped = translate("t", &expr).unwrap();
        assert!(matches!(scoped.predicate, Predicate::AnyMatch { .. }));
    }

    #[test]
    fn translate_or_and_combination() {
        let expr =
            parse(r#"userName eq "b@x" or (active eq true and emails.value co "@x")"#).unwrap();
        let scoped = translate("t", &expr).unwrap();
        assert!(matches!(scoped.predicate, Predicate::Or(_)));
    }

    #[test]
    fn translate_ne_wraps_eq_in_not() {
        let expr = parse(r#"active ne true"#).unwrap();
        let scoped = translate("t", &expr).unwrap();
        assert!(matches!(scoped.predicate, Predicate::Not(_)));
    }
}
