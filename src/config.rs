//! Layered runtime configuration: struct defaults overridable by environment
//! variables, in the shape of the teacher's `config::limits` (`serde(default
//! = "fn")` paired with a matching `Default` impl, so the same defaults apply
//! whether a field is missing from a config document or simply unset in the
//! environment).
//!
//! [`GatewayConfig::from_env`] is the process-level entry point; tests and
//! embedders that want to skip environment lookups entirely can use
//! `GatewayConfig::default()` directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub pool: AdapterPoolConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            pool: AdapterPoolConfig::default(),
            cache: CacheConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Build a config from struct defaults overridden by `SCIM_GATEWAY_*`
    /// environment variables. Unset or unparsable variables fall back to the
    /// default silently for booleans/paths; numeric overrides that fail to
    /// parse are logged and ignored rather than aborting startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.store.backend = match std::env::var("SCIM_GATEWAY_STORE_BACKEND").as_deref() {
            Ok("sqlite") => StoreBackend::Sqlite,
            Ok("in-memory") | Ok("in_memory") => StoreBackend::InMemory,
            Ok(other) => {
                log::warn!("unknown SCIM_GATEWAY_STORE_BACKEND={other}, defaulting to in-memory");
                StoreBackend::InMemory
            }
            Err(_) => config.store.backend,
        };
        if let Ok(path) = std::env::var("SCIM_GATEWAY_SQLITE_PATH") {
            config.store.sqlite_path = path;
        }

        env_u32("SCIM_GATEWAY_POOL_MAX_CONNECTIONS", &mut config.pool.max_connections);
        env_secs("SCIM_GATEWAY_POOL_IDLE_TIMEOUT_SECS", &mut config.pool.idle_timeout);
        env_secs(
            "SCIM_GATEWAY_POOL_CONNECTION_LIFETIME_SECS",
            &mut config.pool.connection_lifetime,
        );

        env_secs("SCIM_GATEWAY_CACHE_RULE_TTL_SECS", &mut config.cache.rule_ttl);

        env_secs(
            "SCIM_GATEWAY_ADAPTER_REQUEST_TIMEOUT_SECS",
            &mut config.timeouts.adapter_request,
        );
        env_secs(
            "SCIM_GATEWAY_REGEX_MATCH_TIMEOUT_SECS",
            &mut config.timeouts.regex_match,
        );

        config
    }
}

fn env_u32(var: &str, slot: &mut u32) {
    match std::env::var(var) {
        Ok(raw) => match raw.parse() {
            Ok(value) => *slot = value,
            Err(_) => log::warn!("{var}={raw:?} is not a valid u32, keeping default {slot}"),
        },
        Err(_) => {}
    }
}

fn env_secs(var: &str, slot: &mut Duration) {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) => *slot = Duration::from_secs(secs),
            Err(_) => {
                log::warn!("{var}={raw:?} is not a valid number of seconds, keeping default {slot:?}")
            }
        },
        Err(_) => {}
    }
}

/// Which [`crate::store::Store`] backend the gateway persists to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    InMemory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

fn default_sqlite_path() -> String {
    "scim-gateway.sqlite3".to_string()
}

/// Per-provider downstream HTTP connection pool sizing (spec §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterPoolConfig {
    /// Maximum concurrently-leased connections per `(tenantId, providerId)`.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// A pooled connection idle longer than this is recycled on its next
    /// acquire rather than reused.
    #[serde(default = "default_idle_timeout", with = "duration_secs")]
    pub idle_timeout: Duration,
    /// A pooled connection older than this is recycled regardless of use.
    #[serde(default = "default_connection_lifetime", with = "duration_secs")]
    pub connection_lifetime: Duration,
}

impl Default for AdapterPoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            idle_timeout: default_idle_timeout(),
            connection_lifetime: default_connection_lifetime(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(90)
}

fn default_connection_lifetime() -> Duration {
    Duration::from_secs(1800)
}

/// Transformation engine cache sizing (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// How long a tenant/provider rule snapshot stays cached before the next
    /// `transform`/`reverse` call reloads from the repository.
    #[serde(default = "default_rule_ttl", with = "duration_secs")]
    pub rule_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            rule_ttl: default_rule_ttl(),
        }
    }
}

fn default_rule_ttl() -> Duration {
    Duration::from_secs(300)
}

/// Request and pattern-match timeout bounds (spec §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Default timeout for a downstream adapter HTTP call.
    #[serde(default = "default_adapter_request_timeout", with = "duration_secs")]
    pub adapter_request: Duration,
    /// Upper bound on a single regex match against a Group display name,
    /// guarding against catastrophic backtracking in admin-authored patterns.
    #[serde(default = "default_regex_match_timeout", with = "duration_secs")]
    pub regex_match: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            adapter_request: default_adapter_request_timeout(),
            regex_match: default_regex_match_timeout(),
        }
    }
}

fn default_adapter_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_regex_match_timeout() -> Duration {
    Duration::from_secs(5)
}

/// (De)serialize a [`Duration`] as a whole number of seconds, so config
/// documents read `90` rather than `{"secs": 90, "nanos": 0}`.
mod duration_secs {
    use super::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
