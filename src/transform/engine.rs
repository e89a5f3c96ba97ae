//! Rule evaluation, forward/reverse transformation, and conflict
//! resolution (spec §4.4).
//!
//! `match_rule` is a pure function: given a rule, an input string, and (for
//! regex-backed rule types) an already-compiled pattern, it decides whether
//! the rule matches and what template variables that match exposes. Cache
//! lookups, regex compilation, and the per-match timeout all happen in
//! [`TransformationEngine`], around this pure core — mirroring the
//! teacher's `schema::validation` style of small composable checks wired
//! together by one orchestrating entry point.

use std::collections::HashMap;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ScimError;
use crate::store::containers;
use crate::store::predicate::{FieldOp, Predicate};
use crate::store::Store;
use crate::transform::cache::{RegexCache, RuleCache};
use crate::transform::rules::{
    self, ConflictStrategy, Entitlement, Rule, RuleTestResult, RuleType, substitute,
};

const REGEX_MATCH_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_RULES_PER_PROVIDER: usize = 1000;

/// Template variables a matched rule exposes for substitution into
/// `target_mapping`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub vars: HashMap<String, String>,
}

/// Evaluate one rule against `input`. `regex` must be supplied (already
/// compiled) when `rule.rule_type` is [`RuleType::Regex`] or a
/// [`RuleType::Conditional`] `MATCHES`/bare-regex form; it is ignored
/// otherwise.
pub fn match_rule(rule: &Rule, input: &str, regex: Option<&Regex>) -> Option<MatchOutcome> {
    match rule.rule_type {
        RuleType::Exact => (rule.source_pattern == input).then(MatchOutcome::default),
        RuleType::Regex => {
            let re = regex?;
            let caps = re.captures(input)?;
            let mut vars = HashMap::new();
            for i in 1..caps.len() {
                if let Some(m) = caps.get(i) {
                    vars.insert(i.to_string(), m.as_str().to_string());
                }
            }
            Some(MatchOutcome { vars })
        }
        RuleType::Hierarchical => {
            let source_levels: Vec<&str> = rule.source_pattern.split('/').collect();
            let input_levels: Vec<&str> = input.split('/').collect();
            if input_levels.len() < source_levels.len() {
                return None;
            }
            let mut vars = HashMap::new();
            for (i, level) in input_levels.iter().enumerate() {
                vars.insert(format!("level{i}"), level.to_string());
                vars.insert(i.to_string(), level.to_string());
            }
            Some(MatchOutcome { vars })
        }
        RuleType::Conditional => match_conditional(rule, input, regex),
    }
}

enum Conditional<'a> {
    Contains(&'a str),
    StartsWith(&'a str),
    EndsWith(&'a str),
    Equals(&'a str),
    Matches,
}

fn parse_conditional(source_pattern: &str) -> Conditional<'_> {
    for (keyword, wrap) in [
        ("CONTAINS ", Conditional::Contains as fn(&str) -> Conditional),
        ("STARTS_WITH ", Conditional::StartsWith as fn(&str) -> Conditional),
        ("ENDS_WITH ", Conditional::EndsWith as fn(&str) -> Conditional),
        ("EQUALS ", Conditional::Equals as fn(&str) -> Conditional),
    ] {
        if let Some(rest) = source_pattern.strip_prefix(keyword) {
            return wrap(rest);
        }
    }
    if let Some(rest) = source_pattern.strip_prefix("MATCHES ") {
        return Conditional::Matches.with_rest(rest);
    }
    Conditional::Matches
}

impl<'a> Conditional<'a> {
    // Helper to keep `parse_conditional` a flat match above; MATCHES and the
    // bare-regex fallback both resolve to this variant, the pattern text is
    // read straight from `source_pattern` by the caller instead.
    fn with_rest(self, _rest: &'a str) -> Conditional<'a> {
        self
    }
}

fn match_conditional(rule: &Rule, input: &str, regex: Option<&Regex>) -> Option<MatchOutcome> {
    match parse_conditional(&rule.source_pattern) {
        Conditional::Contains(v) => input
            .to_ascii_lowercase()
            .contains(&v.to_ascii_lowercase())
            .then(MatchOutcome::default),
        Conditional::StartsWith(v) => input
            .to_ascii_lowercase()
            .starts_with(&v.to_ascii_lowercase())
            .then(MatchOutcome::default),
        Conditional::EndsWith(v) => input
            .to_ascii_lowercase()
            .ends_with(&v.to_ascii_lowercase())
            .then(MatchOutcome::default),
        Conditional::Equals(v) => input
            .eq_ignore_ascii_case(v)
            .then(MatchOutcome::default),
        Conditional::Matches => regex?.is_match(input).then(MatchOutcome::default),
    }
}

/// The conditional pattern text a rule needs compiled, if any (the part
/// after `MATCHES `, or the whole string for a bare-regex conditional).
fn conditional_regex_source(source_pattern: &str) -> Option<&str> {
    if let Some(rest) = source_pattern.strip_prefix("MATCHES ") {
        return Some(rest);
    }
    for keyword in ["CONTAINS ", "STARTS_WITH ", "ENDS_WITH ", "EQUALS "] {
        if source_pattern.starts_with(keyword) {
            return None;
        }
    }
    Some(source_pattern)
}

/// A conflict that a `MANUAL_REVIEW` resolution surfaces instead of
/// resolving.
#[derive(Debug, Clone)]
pub struct ConflictRecord {
    pub group_name: String,
    pub conflicting_rule_ids: Vec<String>,
    pub conflicting_entitlements: Vec<Entitlement>,
    pub status: &'static str,
}

/// Result of a forward transformation: the resolved entitlement set, plus a
/// pending-review record when the winning strategy was `MANUAL_REVIEW`.
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    pub entitlements: Vec<Entitlement>,
    pub conflict: Option<ConflictRecord>,
}

/// Owns the rule/regex caches and orchestrates forward/reverse
/// transformation and rule validation against a [`Store`]-backed rule
/// repository (container `transformation-rules`).
pub struct TransformationEngine<S: Store> {
    store: S,
    rule_cache: RuleCache,
    regex_cache: RegexCache,
}

impl<S: Store> TransformationEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rule_cache: RuleCache::new(),
            regex_cache: RegexCache::new(),
        }
    }

    /// Enabled rules for `(tenant_id, provider_id)`, sorted by priority
    /// ascending. Serves from the rule cache when fresh; on a miss, loads
    /// from the store and repopulates the cache.
    async fn load_rules(
        &self,
        tenant_id: &str,
        provider_id: &str,
        token: &CancellationToken,
    ) -> Result<Vec<Rule>, ScimError> {
        if let Some(cached) = self.rule_cache.get(tenant_id, provider_id).await {
            return Ok(cached);
        }

        let scoped = Predicate::scoped(
            tenant_id,
            Predicate::Field {
                path: "providerId".to_string(),
                op: FieldOp::Eq(Value::String(provider_id.to_string())),
            },
        );
        let page = self
            .store
            .query_items(
                containers::TRANSFORMATION_RULES,
                &scoped,
                1,
                MAX_RULES_PER_PROVIDER,
                token,
            )
            .await?;

        let mut rules: Vec<Rule> = page
            .items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Rule>(item.data).ok())
            .filter(|rule| rule.enabled)
            .collect();
        rules.sort_by_key(|r| r.priority);

        self.rule_cache.put(tenant_id, provider_id, rules.clone()).await;
        Ok(rules)
    }

    /// Invalidate the cached rule snapshot for `(tenant_id, provider_id)`.
    /// Call this synchronously with any rule create/update/delete.
    pub async fn invalidate_rules(&self, tenant_id: &str, provider_id: &str) {
        self.rule_cache.invalidate(tenant_id, provider_id).await;
    }

    async fn compiled_regex_for(&self, rule: &Rule) -> Result<Option<Regex>, ScimError> {
        let source = match rule.rule_type {
            RuleType::Regex => Some(rule.source_pattern.as_str()),
            RuleType::Conditional => conditional_regex_source(&rule.source_pattern),
            _ => None,
        };
        let Some(pattern) = source else {
            return Ok(None);
        };

        let pattern = pattern.to_string();
        let cache = &self.regex_cache;
        let compiled = tokio::time::timeout(REGEX_MATCH_TIMEOUT, cache.get_or_compile(&pattern))
            .await
            .map_err(|_| ScimError::ServerUnavailable {
                message: format!("regex compilation for rule '{}' timed out", rule.id),
            })?
            .map_err(|e| {
                ScimError::Validation(crate::error::ValidationError::custom(format!(
                    "invalid regex in rule '{}': {e}",
                    rule.id
                )))
            })?;
        Ok(Some((*compiled).clone()))
    }

    /// Forward transformation: `groupDisplayName → Entitlement[]`.
    pub async fn transform(
        &self,
        tenant_id: &str,
        provider_id: &str,
        group_display_name: &str,
        token: &CancellationToken,
    ) -> Result<TransformOutcome, ScimError> {
        let rules = self.load_rules(tenant_id, provider_id, token).await?;

        let mut matched: Vec<(&Rule, MatchOutcome)> = Vec::new();
        for rule in &rules {
            let regex = self.compiled_regex_for(rule).await?;
            if let Some(outcome) = match_rule(rule, group_display_name, regex.as_ref()) {
                matched.push((rule, outcome));
            }
        }

        if matched.is_empty() {
            return Ok(TransformOutcome::default());
        }

        let entitlements: Vec<Entitlement> = matched
            .iter()
            .map(|(rule, outcome)| Entitlement {
                provider_entitlement_id: substitute(&rule.target_mapping, &outcome.vars),
                name: substitute(&rule.target_mapping, &outcome.vars),
                entitlement_type: rule.target_type.clone(),
                mapped_groups: vec![group_display_name.to_string()],
                priority: rule.priority,
                source_rule_id: rule.id.clone(),
                metadata: rule.metadata.clone(),
            })
            .collect();

        let strategy = matched[0].0.conflict_resolution;
        resolve_conflicts(strategy, entitlements, group_display_name)
    }

    /// Reverse transformation: `entitlementId → groupName[]` (best effort;
    /// `CONDITIONAL` rules are not reversible and are skipped).
    pub async fn reverse(
        &self,
        tenant_id: &str,
        provider_id: &str,
        entitlement_id: &str,
        entitlement_type: &str,
        token: &CancellationToken,
    ) -> Result<Vec<String>, ScimError> {
        let rules = self.load_rules(tenant_id, provider_id, token).await?;
        let mut names = Vec::new();

        for rule in rules.iter().filter(|r| r.target_type == entitlement_type) {
            match rule.rule_type {
                RuleType::Exact => {
                    if rule.target_mapping == entitlement_id {
                        names.push(rule.source_pattern.clone());
                    }
                }
                RuleType::Regex => {
                    if let Some(name) = reverse_regex(rule, entitlement_id) {
                        names.push(name);
                    }
                }
                RuleType::Hierarchical => {
                    if let Some(hint) = reverse_hierarchical(rule, entitlement_id) {
                        names.push(hint);
                    }
                }
                RuleType::Conditional => {}
            }
        }

        Ok(names)
    }

    /// Validate a candidate rule's static shape and exercise it against
    /// sample inputs, without persisting it.
    pub async fn test_rule(&self, rule: &Rule, inputs: &[String]) -> Vec<RuleTestResult> {
        let issues = rules::validate_rule(rule);
        if issues.iter().any(|i| i.is_error()) {
            let message = issues
                .iter()
                .filter(|i| i.is_error())
                .map(|i| i.message())
                .collect::<Vec<_>>()
                .join("; ");
            return inputs
                .iter()
                .map(|input| RuleTestResult {
                    input: input.clone(),
                    actual_output: None,
                    passed: false,
                    error_message: Some(message.clone()),
                })
                .collect();
        }

        let regex = self.compiled_regex_for(rule).await.ok().flatten();
        inputs
            .iter()
            .map(|input| match match_rule(rule, input, regex.as_ref()) {
                Some(outcome) => RuleTestResult {
                    input: input.clone(),
                    actual_output: Some(substitute(&rule.target_mapping, &outcome.vars)),
                    passed: true,
                    error_message: None,
                },
                None => RuleTestResult {
                    input: input.clone(),
                    actual_output: None,
                    passed: false,
                    error_message: Some("rule did not match this input".to_string()),
                },
            })
            .collect()
    }
}

fn resolve_conflicts(
    strategy: ConflictStrategy,
    entitlements: Vec<Entitlement>,
    group_name: &str,
) -> Result<TransformOutcome, ScimError> {
    if entitlements.len() <= 1 {
        return Ok(TransformOutcome {
            entitlements,
            conflict: None,
        });
    }

    match strategy {
        ConflictStrategy::Union => {
            let mut seen = std::collections::HashSet::new();
            let deduped = entitlements
                .into_iter()
                .filter(|e| seen.insert(e.provider_entitlement_id.clone()))
                .collect();
            Ok(TransformOutcome {
                entitlements: deduped,
                conflict: None,
            })
        }
        ConflictStrategy::FirstMatch => Ok(TransformOutcome {
            entitlements: entitlements.into_iter().take(1).collect(),
            conflict: None,
        }),
        ConflictStrategy::HighestPrivilege => {
            let has_levels = entitlements
                .iter()
                .any(|e| e.metadata.get("privilegeLevel").and_then(Value::as_i64).is_some());
            if !has_levels {
                log::warn!(
                    "HIGHEST_PRIVILEGE resolution for '{group_name}' found no rule with a privilegeLevel; degrading to FIRST_MATCH"
                );
                return Ok(TransformOutcome {
                    entitlements: entitlements.into_iter().take(1).collect(),
                    conflict: None,
                });
            }
            let winner = entitlements
                .into_iter()
                .max_by_key(|e| e.metadata.get("privilegeLevel").and_then(Value::as_i64).unwrap_or(i64::MIN))
                .expect("non-empty by len() > 1 check above");
            Ok(TransformOutcome {
                entitlements: vec![winner],
                conflict: None,
            })
        }
        ConflictStrategy::ManualReview => Ok(TransformOutcome {
            entitlements: Vec::new(),
            conflict: Some(ConflictRecord {
                group_name: group_name.to_string(),
                conflicting_rule_ids: entitlements.iter().map(|e| e.source_rule_id.clone()).collect(),
                conflicting_entitlements: entitlements,
                status: "PENDING_REVIEW",
            }),
        }),
        ConflictStrategy::Error => Err(ScimError::TransformationConflict {
            group_name: group_name.to_string(),
            message: format!(
                "{} rules matched with conflicting entitlements and no automatic resolution is permitted",
                entitlements.len()
            ),
        }),
    }
}

/// Find the byte ranges of top-level capturing groups in `pattern` (groups
/// not nested inside another group). Good enough for the reversible subset
/// of patterns this function is meant for; patterns with nested groups
/// simply won't reverse (the metacharacter check below catches that).
fn top_level_capture_groups(pattern: &str) -> Vec<(usize, usize)> {
    let bytes = pattern.as_bytes();
    let mut groups = Vec::new();
    let mut depth = 0i32;
    let mut stack: Vec<(usize, bool)> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'(' => {
                let is_capturing = !pattern[i..].starts_with("(?");
                stack.push((i, is_capturing));
                depth += 1;
            }
            b')' => {
                if let Some((start, is_capturing)) = stack.pop() {
                    depth -= 1;
                    if is_capturing && depth == 0 {
                        groups.push((start, i));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    groups
}

const REGEX_METACHARS: &[char] = &['.', '^', '$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '\\'];

fn reverse_regex(rule: &Rule, entitlement_id: &str) -> Option<String> {
    let mut mapping_pattern = String::from("^");
    let mut token_order = Vec::new();
    let mut rest = rule.target_mapping.as_str();
    while let Some(start) = rest.find("${") {
        mapping_pattern.push_str(&regex::escape(&rest[..start]));
        let after = &rest[start + 2..];
        let end = after.find('}')?;
        let n: usize = after[..end].parse().ok()?;
        token_order.push(n);
        mapping_pattern.push_str("(.+)");
        rest = &after[end + 1..];
    }
    mapping_pattern.push_str(&regex::escape(rest));
    mapping_pattern.push('$');

    let mapping_re = Regex::new(&mapping_pattern).ok()?;
    let caps = mapping_re.captures(entitlement_id)?;

    let mut values: HashMap<usize, String> = HashMap::new();
    for (i, n) in token_order.iter().enumerate() {
        let value = caps.get(i + 1)?.as_str().to_string();
        values.insert(*n, value);
    }

    let groups = top_level_capture_groups(&rule.source_pattern);
    let mut reconstructed = rule.source_pattern.clone();
    for (ordinal, (start, end)) in groups.iter().enumerate().rev() {
        let group_number = ordinal + 1;
        if let Some(value) = values.get(&group_number) {
            reconstructed.replace_range(*start..=*end, value);
        }
    }

    if reconstructed.contains(REGEX_METACHARS) {
        return None;
    }
    Some(reconstructed)
}

fn reverse_hierarchical(rule: &Rule, entitlement_id: &str) -> Option<String> {
    let level_refs = rules::template_level_indices(&rule.target_mapping);
    let (&level,) = match level_refs.as_slice() {
        [only] => (only,),
        _ => return None,
    };
    let mut levels: Vec<&str> = rule.source_pattern.split('/').collect();
    if level >= levels.len() {
        return None;
    }
    levels[level] = entitlement_id;
    Some(levels.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::collections::HashMap as StdHashMap;

    fn tok() -> CancellationToken {
        CancellationToken::new()
    }

    fn rule(
        rule_type: RuleType,
        source: &str,
        target: &str,
        strategy: ConflictStrategy,
        priority: i64,
    ) -> Rule {
        Rule {
            id: format!("r-{source}"),
            tenant_id: "t1".into(),
            provider_id: "p1".into(),
            rule_type,
            source_pattern: source.into(),
            target_type: "role".into(),
            target_mapping: target.into(),
            priority,
            enabled: true,
            conflict_resolution: strategy,
            metadata: StdHashMap::new(),
            examples: vec![],
        }
    }

    #[test]
    fn exact_match_produces_no_template_vars() {
        let r = rule(RuleType::Exact, "Sales", "Sales_Role", ConflictStrategy::Union, 1);
        let outcome = match_rule(&r, "Sales", None).unwrap();
        assert!(outcome.vars.is_empty());
        assert!(match_rule(&r, "Marketing", None).is_none());
    }

    #[test]
    fn regex_match_exposes_numbered_capture_groups() {
        let r = rule(
            RuleType::Regex,
            "^Sales_(.*)$",
            "Sales_${1}_Rep",
            ConflictStrategy::Union,
            1,
        );
        let re = Regex::new(&r.source_pattern).unwrap();
        let outcome = match_rule(&r, "Sales_EMEA", Some(&re)).unwrap();
        assert_eq!(outcome.vars.get("1").unwrap(), "EMEA");
        assert_eq!(substitute(&r.target_mapping, &outcome.vars), "Sales_EMEA_Rep");
    }

    #[test]
    fn hierarchical_match_requires_at_least_as_many_components() {
        let r = rule(
            RuleType::Hierarchical,
            "Eng/Backend",
            "${level1}_Access",
            ConflictStrategy::Union,
            1,
        );
        assert!(match_rule(&r, "Eng", None).is_none());
        let outcome = match_rule(&r, "Eng/Backend/Platform", None).unwrap();
        assert_eq!(outcome.vars.get("level1").unwrap(), "Backend");
    }

    #[test]
    fn conditional_contains_is_case_insensitive() {
        let r = rule(
            RuleType::Conditional,
            "CONTAINS sales",
            "Sales_Role",
            ConflictStrategy::Union,
            1,
        );
        assert!(match_rule(&r, "Global Sales Team", None).is_some());
        assert!(match_rule(&r, "Engineering", None).is_none());
    }

    #[tokio::test]
    async fn transform_resolves_union_conflicts_by_dedup() {
        let engine = TransformationEngine::new(InMemoryStore::new());
        let rule1 = rule(RuleType::Exact, "Sales", "Role_A", ConflictStrategy::Union, 1);
        let rule2 = rule(RuleType::Exact, "Sales", "Role_A", ConflictStrategy::Union, 2);
        engine
            .store
            .create_item(
                containers::TRANSFORMATION_RULES,
                "t1",
                None,
                serde_json::to_value(&rule1).unwrap(),
                &tok(),
            )
            .await
            .unwrap();
        engine
            .store
            .create_item(
                containers::TRANSFORMATION_RULES,
                "t1",
                None,
                serde_json::to_value(&rule2).unwrap(),
                &tok(),
            )
            .await
            .unwrap();

        let outcome = engine.transform("t1", "p1", "Sales", &tok()).await.unwrap();
        assert_eq!(outcome.entitlements.len(), 1);
    }

    #[tokio::test]
    async fn transform_with_error_strategy_fails_on_conflict() {
        let engine = TransformationEngine::new(InMemoryStore::new());
        let rule1 = rule(RuleType::Exact, "Sales", "Role_A", ConflictStrategy::Error, 1);
        let mut rule2 = rule(RuleType::Exact, "Sales", "Role_B", ConflictStrategy::Error, 2);
        rule2.id = "r2".into();
        engine
            .store
            .create_item(
                containers::TRANSFORMATION_RULES,
                "t1",
                None,
                serde_json::to_value(&rule1).unwrap(),
                &tok(),
            )
            .await
            .unwrap();
        engine
            .store
            .create_item(
                containers::TRANSFORMATION_RULES,
                "t1",
                None,
                serde_json::to_value(&rule2).unwrap(),
                &tok(),
            )
            .await
            .unwrap();

        let err = engine.transform("t1", "p1", "Sales", &tok()).await.unwrap_err();
        assert!(matches!(err, ScimError::TransformationConflict { .. }));
    }

    #[tokio::test]
    async fn transform_with_manual_review_returns_empty_and_conflict_record() {
        let engine = TransformationEngine::new(InMemoryStore::new());
        let rule1 = rule(RuleType::Exact, "Sales", "Role_A", ConflictStrategy::ManualReview, 1);
        let mut rule2 = rule(RuleType::Exact, "Sales", "Role_B", ConflictStrategy::ManualReview, 2);
        rule2.id = "r2".into();
        engine
            .store
            .create_item(
                containers::TRANSFORMATION_RULES,
                "t1",
                None,
                serde_json::to_value(&rule1).unwrap(),
                &tok(),
            )
            .await
            .unwrap();
        engine
            .store
            .create_item(
                containers::TRANSFORMATION_RULES,
                "t1",
                None,
                serde_json::to_value(&rule2).unwrap(),
                &tok(),
            )
            .await
            .unwrap();

        let outcome = engine.transform("t1", "p1", "Sales", &tok()).await.unwrap();
        assert!(outcome.entitlements.is_empty());
        let conflict = outcome.conflict.unwrap();
        assert_eq!(conflict.status, "PENDING_REVIEW");
        assert_eq!(conflict.conflicting_rule_ids.len(), 2);
    }

    #[test]
    fn reverse_regex_reconstructs_source_from_entitlement_id() {
        let r = rule(
            RuleType::Regex,
            "^Sales_(.*)$",
            "Sales_${1}_Rep",
            ConflictStrategy::Union,
            1,
        );
        let name = reverse_regex(&r, "Sales_EMEA_Rep").unwrap();
        assert_eq!(name, "Sales_EMEA");
    }

    #[test]
    fn reverse_hierarchical_substitutes_the_referenced_level() {
        let r = rule(
            RuleType::Hierarchical,
            "Eng/Backend",
            "${level1}_Access",
            ConflictStrategy::Union,
            1,
        );
        let hint = reverse_hierarchical(&r, "Platform").unwrap();
        assert_eq!(hint, "Eng/Platform");
    }

    #[tokio::test]
    async fn test_rule_reports_pass_and_fail_rows() {
        let engine = TransformationEngine::new(InMemoryStore::new());
        let r = rule(RuleType::Exact, "Sales", "Sales_Role", ConflictStrategy::Union, 1);
        let results = engine
            .test_rule(&r, &["Sales".to_string(), "Marketing".to_string()])
            .await;
        assert!(results[0].passed);
        assert_eq!(results[0].actual_output.as_deref(), Some("Sales_Role"));
        assert!(!results[1].passed);
    }
}
