//! The store predicate tree: the target of filter translation.
//!
//! This is a structural representation, never a query string — `store::in_memory`
//! walks it directly against in-process JSON documents, and `store::sqlite` fetches
//! rows scoped by tenant and applies the same [`evaluate`] over the decoded JSON
//! payload (mirroring the teacher's `find_by_attribute`, which fetches a tenant's
//! rows and filters in Rust rather than building per-attribute SQL). Building a
//! predicate tree instead of concatenating query text makes "string concatenation
//! of untrusted input" structurally impossible rather than merely avoided by
//! convention.

use serde_json::Value;

/// A single field comparison against a dot-separated store field path
/// (`userName`, `name.familyName`, `emails[*].value`, `meta.lastModified`).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    Eq(Value),
    /// Case-insensitive equality, used for `userName`/`emails.value`.
    EqCaseInsensitive(Value),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    GreaterThan(Value),
    GreaterOrEqual(Value),
    LessThan(Value),
    LessOrEqual(Value),
    IsDefined,
}

/// A predicate tree over store documents. Always scoped by a mandatory tenant
/// clause before any user-supplied predicate (see [`Predicate::scoped`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `path OP value`
    Field { path: String, op: FieldOp },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    /// At least one element of the multi-valued attribute at `path` satisfies `inner`
    /// (e.g. `members[value eq "u1"]`).
    AnyMatch { path: String, inner: Box<Predicate> },
    /// Always true; used for unfiltered listing.
    True,
}

impl Predicate {
    /// Wrap a user-supplied predicate with the mandatory tenant scope. Every
    /// predicate the translator emits must go through this constructor — there
    /// is deliberately no way to build a `Predicate` that skips tenant scoping
    /// and still type-check as "the thing a list operation accepts".
    pub fn scoped(tenant_id: impl Into<String>, user_predicate: Predicate) -> ScopedPredicate {
        ScopedPredicate {
            tenant_id: tenant_id.into(),
            predicate: user_predicate,
        }
    }
}

/// A predicate that has been bound to a tenant. `store` operations accept only
/// this type for queries, never a bare [`Predicate`] — fail-closed tenant
/// scoping is enforced by the type system, not by a runtime check a future
/// change could forget.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedPredicate {
    pub tenant_id: String,
    pub predicate: Predicate,
}

impl ScopedPredicate {
    /// The whole predicate, as `tenantId == t AND (user predicate)`.
    pub fn as_predicate(&self) -> Predicate {
        Predicate::And(vec![
            Predicate::Field {
                path: "tenantId".to_string(),
                op: FieldOp::Eq(Value::String(self.tenant_id.clone())),
            },
            self.predicate.clone(),
        ])
    }
}

/// Resolve a dot-separated field path against a JSON document. `[*]`-annotated
/// array-root paths are only meaningful inside [`Predicate::AnyMatch`], where
/// the array itself (not an element field) is what gets resolved.
fn resolve<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn values_equal_ci(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
        _ => a == b,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    // RFC 3339 timestamps don't reliably compare lexicographically (`Z` vs
    // `+00:00`), so give chrono a chance to normalize before falling through.
    value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp_millis() as f64)
}

fn compare_ord(value: &Value, other: &Value) -> Option<std::cmp::Ordering> {
    if let (Some(a), Some(b)) = (as_f64(value), as_f64(other)) {
        return a.partial_cmp(&b);
    }
    match (value, other) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn eval_field(doc: &Value, path: &str, op: &FieldOp) -> bool {
    let actual = resolve(doc, path);
    match op {
        FieldOp::IsDefined => actual.is_some_and(|v| !v.is_null()),
        FieldOp::Eq(expected) => actual.is_some_and(|v| v == expected),
        FieldOp::EqCaseInsensitive(expected) => {
            actual.is_some_and(|v| values_equal_ci(v, expected))
        }
        FieldOp::Contains(needle) => actual.and_then(|v| v.as_str()).is_some_and(|s| {
            s.to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase())
        }),
        FieldOp::StartsWith(prefix) => actual.and_then(|v| v.as_str()).is_some_and(|s| {
            s.to_ascii_lowercase()
                .starts_with(&prefix.to_ascii_lowercase())
        }),
        FieldOp::EndsWith(suffix) => actual.and_then(|v| v.as_str()).is_some_and(|s| {
            s.to_ascii_lowercase()
                .ends_with(&suffix.to_ascii_lowercase())
        }),
        FieldOp::GreaterThan(expected) => actual
            .and_then(|v| compare_ord(v, expected))
            .is_some_and(|o| o.is_gt()),
        FieldOp::GreaterOrEqual(expected) => actual
            .and_then(|v| compare_ord(v, expected))
            .is_some_and(|o| !o.is_lt()),
        FieldOp::LessThan(expected) => actual
            .and_then(|v| compare_ord(v, expected))
            .is_some_and(|o| o.is_lt()),
        FieldOp::LessOrEqual(expected) => actual
            .and_then(|v| compare_ord(v, expected))
            .is_some_and(|o| !o.is_gt()),
    }
}

/// Evaluate a predicate tree against a stored JSON document. Shared by
/// [`crate::store::in_memory::InMemoryStore`] (evaluated directly) and
/// [`crate::store::sqlite::SqliteStore`] (evaluated over rows fetched by
/// tenant, since the predicate tree is richer than a flat SQL `WHERE` clause
/// would stay readable as).
pub fn evaluate(predicate: &Predicate, doc: &Value) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::Field { path, op } => eval_field(doc, path, op),
        Predicate::And(clauses) => clauses.iter().all(|c| evaluate(c, doc)),
        Predicate::Or(clauses) => clauses.iter().any(|c| evaluate(c, doc)),
        Predicate::Not(inner) => !evaluate(inner, doc),
        Predicate::AnyMatch { path, inner } => {
            let Some(array) = resolve(doc, path).and_then(|v| v.as_array()) else {
                return false;
            };
            array.iter().any(|element| evaluate(inner, element))
        }
    }
}
