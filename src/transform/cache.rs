//! Two-level cache for the transformation engine (spec §4.5).
//!
//! `RuleCache` holds per-`(tenantId, providerId)` rule snapshots with a
//! 5-minute TTL, the same `tokio::sync::RwLock`-over-`HashMap` shape as
//! [`crate::store::in_memory::InMemoryStore`]. `RegexCache` is a
//! process-wide compiled-pattern cache with no eviction — the pattern set
//! is a small number of admin-authored strings, not request-driven.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::Regex;
use tokio::sync::RwLock;

use crate::transform::rules::Rule;

const RULE_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    rules: Vec<Rule>,
    inserted_at: Instant,
}

/// Tenant/provider-scoped cache of enabled rules, sorted by priority.
#[derive(Default)]
pub struct RuleCache {
    entries: RwLock<HashMap<(String, String), CacheEntry>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(tenant_id: &str, provider_id: &str) -> (String, String) {
        (tenant_id.to_string(), provider_id.to_string())
    }

    /// Return a cached snapshot if present and not yet expired.
    pub async fn get(&self, tenant_id: &str, provider_id: &str) -> Option<Vec<Rule>> {
        let key = Self::key(tenant_id, provider_id);
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        if entry.inserted_at.elapsed() > RULE_TTL {
            return None;
        }
        Some(entry.rules.clone())
    }

    /// Replace the snapshot for `(tenantId, providerId)`.
    pub async fn put(&self, tenant_id: &str, provider_id: &str, rules: Vec<Rule>) {
        let key = Self::key(tenant_id, provider_id);
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                rules,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop the snapshot for `(tenantId, providerId)` synchronously with the
    /// mutation that invalidated it — the next `transform`/`reverse` call
    /// reloads from the repository.
    pub async fn invalidate(&self, tenant_id: &str, provider_id: &str) {
        let key = Self::key(tenant_id, provider_id);
        self.entries.write().await.remove(&key);
    }
}

/// Process-wide compiled-regex cache, populated lazily, never evicted.
#[derive(Default)]
pub struct RegexCache {
    compiled: RwLock<HashMap<String, Arc<Regex>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a compiled regex for `pattern`, compiling and caching it on
    /// first use. Compilation failures are not cached.
    pub async fn get_or_compile(&self, pattern: &str) -> Result<Arc<Regex>, regex::Error> {
        if let Some(re) = self.compiled.read().await.get(pattern) {
            return Ok(re.clone());
        }
        let compiled = Arc::new(Regex::new(pattern)?);
        self.compiled
            .write()
            .await
            .insert(pattern.to_string(), compiled.clone());
        Ok(compiled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::rules::{ConflictStrategy, RuleType};
    use std::collections::HashMap as StdHashMap;

    fn sample_rule(priority: i64) -> Rule {
        Rule {
            id: format!("r{priority}"),
            tenant_id: "t1".into(),
            provider_id: "p1".into(),
            rule_type: RuleType::Exact,
            source_pattern: "Sales".into(),
            target_type: "role".into(),
            target_mapping: "Sales_Role".into(),
            priority,
            enabled: true,
            conflict_resolution: ConflictStrategy::Union,
            metadata: StdHashMap::new(),
            examples: vec![],
        }
    }

    #[tokio::test]
    async fn miss_then_hit_after_put() {
        let cache = RuleCache::new();
        assert!(cache.get("t1", "p1").await.is_none());
        cache.put("t1", "p1", vec![sample_rule(1)]).await;
        let hit = cache.get("t1", "p1").await.unwrap();
        assert_eq!(hit.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_clears_the_snapshot() {
        let cache = RuleCache::new();
        cache.put("t1", "p1", vec![sample_rule(1)]).await;
        cache.invalidate("t1", "p1").await;
        assert!(cache.get("t1", "p1").await.is_none());
    }

    #[tokio::test]
    async fn regex_cache_returns_same_instance_on_repeat_lookup() {
        let cache = RegexCache::new();
        let a = cache.get_or_compile(r"^Sales_(.*)$").await.unwrap();
        let b = cache.get_or_compile(r"^Sales_(.*)$").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn regex_cache_surfaces_compile_errors() {
        let cache = RegexCache::new();
        assert!(cache.get_or_compile(r"^Sales_(.*").await.is_err());
    }
}
