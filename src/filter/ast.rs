//! Expression tree produced by the filter parser (RFC 7644 §3.4.2.2).

use serde_json::Value;

/// A dotted, optionally URN-prefixed attribute path, with an optional
/// trailing sub-attribute after a bracketed value selector
/// (`emails[type eq "work"].value`).
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePath {
    /// Optional schema URN prefix (`urn:ietf:params:scim:schemas:core:2.0:User`)
    pub urn: Option<String>,
    /// Dot-separated path segments (`name`, `familyName`)
    pub segments: Vec<String>,
    /// A bracketed value selector restricting which element of a multi-valued
    /// attribute this path addresses (`emails[type eq "work"].value`). Always
    /// anchored to `segments[0]`; restricted to no logical `or` (§4.1).
    pub selector: Option<Box<FilterExpr>>,
}

impl AttributePath {
    /// Render the path without its URN prefix or selector, dot-joined.
    pub fn bare(&self) -> String {
        self.segments.join(".")
    }

    /// Construct a simple path with no URN and no selector.
    pub fn simple(segments: Vec<String>) -> Self {
        Self {
            urn: None,
            segments,
            selector: None,
        }
    }
}

/// Comparison operators from RFC 7644 §3.4.2.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Co,
    Sw,
    Ew,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Parse a case-insensitive operator keyword.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "co" => Some(Self::Co),
            "sw" => Some(Self::Sw),
            "ew" => Some(Self::Ew),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            _ => None,
        }
    }
}

/// Logical connectives, `not` binds tighter than `and`, which binds tighter than `or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A filter literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Literal {
    /// View this literal as a `serde_json::Value` for predicate translation.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Bool(b) => Value::Bool(*b),
            Self::Null => Value::Null,
        }
    }
}

/// A parsed SCIM filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `path op value`
    Comparison {
        path: AttributePath,
        op: CompareOp,
        value: Literal,
    },
    /// `path pr`
    Presence { path: AttributePath },
    /// `left and|or right`
    Logical {
        op: LogicalOp,
        left: Box<FilterExpr>,
        right: Box<FilterExpr>,
    },
    /// `not (inner)`
    Not { inner: Box<FilterExpr> },
    /// `attr[predicate]` or `attr[predicate].sub`
    ValuePath {
        path: AttributePath,
        predicate: Box<FilterExpr>,
    },
}
