//! Transformation rule and entitlement types.
//!
//! A `Rule` maps a Group display name to a downstream provider entitlement
//! through one of four matching strategies. Rules are tenant- and
//! provider-scoped, ordered by `priority` (lower wins), and validated before
//! they ever reach the cache — see [`crate::transform::engine::test_rule`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a rule's `source_pattern` is matched against a Group display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    Exact,
    Regex,
    Hierarchical,
    Conditional,
}

/// How multiple matching rules are reconciled into the final entitlement set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictStrategy {
    Union,
    FirstMatch,
    HighestPrivilege,
    ManualReview,
    Error,
}

/// A single transformation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub tenant_id: String,
    pub provider_id: String,
    pub rule_type: RuleType,
    pub source_pattern: String,
    pub target_type: String,
    /// Template string; `${1}..${N}` for capture groups, `${level0}..${levelK}`
    /// for hierarchical components.
    pub target_mapping: String,
    /// Lower wins; 1 is highest priority.
    pub priority: i64,
    pub enabled: bool,
    pub conflict_resolution: ConflictStrategy,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Rule {
    /// `metadata.privilegeLevel` as an integer, if the rule author set one.
    pub fn privilege_level(&self) -> Option<i64> {
        self.metadata.get("privilegeLevel").and_then(Value::as_i64)
    }
}

/// The outcome of a forward transformation: a provider-specific access grant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entitlement {
    pub provider_entitlement_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entitlement_type: String,
    pub mapped_groups: Vec<String>,
    pub priority: i64,
    pub source_rule_id: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// One row of `testRule` output: what a candidate rule would do against a
/// single sample input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTestResult {
    pub input: String,
    pub actual_output: Option<String>,
    pub passed: bool,
    pub error_message: Option<String>,
}

/// A problem found while validating a rule, before it is ever evaluated
/// against real traffic.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleIssue {
    Error(String),
    Warning(String),
}

impl RuleIssue {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Error(m) | Self::Warning(m) => m,
        }
    }
}

/// Validate a rule's static shape: regex compiles, template variables
/// reference existing capture groups / hierarchy levels, and a handful of
/// non-fatal style warnings (see spec §4.4 "Rule validation").
pub fn validate_rule(rule: &Rule) -> Vec<RuleIssue> {
    let mut issues = Vec::new();

    if rule.source_pattern.is_empty() {
        issues.push(RuleIssue::Error("sourcePattern must not be empty".into()));
    }
    if rule.target_mapping.is_empty() {
        issues.push(RuleIssue::Error("targetMapping must not be empty".into()));
    }

    match rule.rule_type {
        RuleType::Regex => {
            match regex::Regex::new(&rule.source_pattern) {
                Ok(re) => {
                    let groups = re.captures_len().saturating_sub(1);
                    for n in template_indices(&rule.target_mapping) {
                        if n == 0 || n > groups {
                            issues.push(RuleIssue::Error(format!(
                                "targetMapping references ${{{n}}} but sourcePattern has {groups} capture group(s)"
                            )));
                        }
                    }
                    if !rule.source_pattern.starts_with('^')
                        && !rule.source_pattern.ends_with('$')
                    {
                        issues.push(RuleIssue::Warning(
                            "sourcePattern is not anchored with ^/$".into(),
                        ));
                    }
                }
                Err(e) => issues.push(RuleIssue::Error(format!("invalid regex: {e}"))),
            }
        }
        RuleType::Hierarchical => {
            let levels = rule.source_pattern.split('/').count();
            for n in template_level_indices(&rule.target_mapping) {
                if n >= levels {
                    issues.push(RuleIssue::Error(format!(
                        "targetMapping references ${{level{n}}} but sourcePattern has {levels} level(s)"
                    )));
                }
            }
            if levels < 2 {
                issues.push(RuleIssue::Warning(
                    "hierarchical sourcePattern has only one level".into(),
                ));
            }
        }
        RuleType::Conditional => {
            if let Some(pattern) = rule.source_pattern.strip_prefix("MATCHES ") {
                if let Err(e) = regex::Regex::new(pattern) {
                    issues.push(RuleIssue::Error(format!("invalid regex: {e}")));
                }
            }
        }
        RuleType::Exact => {}
    }

    if rule.examples.is_empty() {
        issues.push(RuleIssue::Warning(
            "no examples provided for this rule".into(),
        ));
    }

    issues
}

pub(crate) fn template_indices(template: &str) -> Vec<usize> {
    template_refs(template, "")
}

pub(crate) fn template_level_indices(template: &str) -> Vec<usize> {
    template_refs(template, "level")
}

/// Substitute `${1}..${N}` / `${level0}..${levelK}` placeholders in `template`
/// with the corresponding entries of `vars`. Placeholders with no entry in
/// `vars` are left verbatim.
pub fn substitute(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => {
                out.push_str("${");
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Extract the numeric indices out of `${prefixN}` placeholders.
fn template_refs(template: &str, prefix: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else { break };
        let token = &after[..end];
        if let Some(num) = token.strip_prefix(prefix) {
            if !prefix.is_empty() || token.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(n) = num.parse::<usize>() {
                    out.push(n);
                }
            }
        }
        rest = &after[end + 1..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(rule_type: RuleType, source: &str, target: &str) -> Rule {
        Rule {
            id: "r1".into(),
            tenant_id: "t1".into(),
            provider_id: "p1".into(),
            rule_type,
            source_pattern: source.into(),
            target_type: "role".into(),
            target_mapping: target.into(),
            priority: 1,
            enabled: true,
            conflict_resolution: ConflictStrategy::Union,
            metadata: HashMap::new(),
            examples: vec!["example".into()],
        }
    }

    #[test]
    fn regex_rule_with_out_of_range_capture_is_an_error() {
        let r = rule(RuleType::Regex, "^Sales_(.*)$", "Sales_${2}_Rep");
        let issues = validate_rule(&r);
        assert!(issues.iter().any(|i| i.is_error()));
    }

    #[test]
    fn regex_rule_with_valid_capture_has_no_errors() {
        let r = rule(RuleType::Regex, "^Sales_(.*)$", "Sales_${1}_Rep");
        let issues = validate_rule(&r);
        assert!(!issues.iter().any(|i| i.is_error()));
    }

    #[test]
    fn hierarchical_rule_out_of_range_level_is_an_error() {
        let r = rule(RuleType::Hierarchical, "Eng/Backend", "${level2}_Access");
        let issues = validate_rule(&r);
        assert!(issues.iter().any(|i| i.is_error()));
    }

    #[test]
    fn invalid_regex_source_is_an_error() {
        let r = rule(RuleType::Regex, "^Sales_(.*", "Sales_${1}");
        let issues = validate_rule(&r);
        assert!(issues.iter().any(|i| i.is_error()));
    }

    #[test]
    fn substitute_replaces_known_placeholders_and_leaves_unknown_verbatim() {
        let mut vars = HashMap::new();
        vars.insert("1".to_string(), "Rep".to_string());
        assert_eq!(substitute("Sales_${1}_${2}", &vars), "Sales_Rep_${2}");
    }

    #[test]
    fn missing_examples_is_a_warning_not_an_error() {
        let mut r = rule(RuleType::Exact, "Sales", "Sales_Role");
        r.examples.clear();
        let issues = validate_rule(&r);
        assert!(!issues.iter().any(|i| i.is_error()));
        assert!(issues.iter().any(|i| !i.is_error()));
    }
}
