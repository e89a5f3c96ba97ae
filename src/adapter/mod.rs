//! Adapter dispatch and connection pool (component **G**, spec §4.6).
//!
//! An [`Adapter`] is a downstream provider's SCIM-shaped driver: one per
//! `(tenantId, providerId)` pair, resolved through [`registry::AdapterRegistry`]
//! and backed by a [`pool::ConnectionPool`] of pluggable [`transport::HttpTransport`]
//! clients. Three concrete adapters ship as worked examples of the pattern:
//! [`salesforce::SalesforceRoleAdapter`], [`workday::WorkdayOrgAdapter`], and
//! [`servicenow::ServiceNowGroupAdapter`].

pub mod error;
pub mod pool;
pub mod registry;
pub mod salesforce;
pub mod secrets;
pub mod servicenow;
pub mod transport;
pub mod workday;

use async_trait::async_trait;
use serde_json::Value;

pub use error::AdapterError;
pub use registry::AdapterRegistry;
pub use transport::HttpTransport;

use crate::transform::rules::Entitlement;

/// Provider reachability, returned by [`Adapter::check_health`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unreachable,
}

/// What an adapter supports, so the router and transformation engine can
/// skip operations a given provider never implements (e.g. a provider with
/// no native group concept still needs `MapGroupToEntitlement`, but has
/// nothing useful to return from `GetGroupMembers`).
#[derive(Debug, Clone)]
pub struct AdapterCapabilities {
    pub provider_id: String,
    pub supports_users: bool,
    pub supports_groups: bool,
    pub supports_group_membership: bool,
}

/// The SCIM-shaped method set every downstream provider driver implements
/// (spec §4.6). Object-safe via `async_trait` so the registry can hold
/// `Arc<dyn Adapter>` keyed by `(tenantId, providerId)`.
#[async_trait]
pub trait Adapter: Send + Sync {
    fn provider_id(&self) -> &str;

    async fn create_user(&self, tenant_id: &str, user: &Value) -> Result<Value, AdapterError>;
    async fn get_user(&self, tenant_id: &str, id: &str) -> Result<Option<Value>, AdapterError>;
    async fn update_user(&self, tenant_id: &str, id: &str, user: &Value) -> Result<Value, AdapterError>;
    async fn delete_user(&self, tenant_id: &str, id: &str) -> Result<(), AdapterError>;
    async fn list_users(&self, tenant_id: &str) -> Result<Vec<Value>, AdapterError>;

    async fn create_group(&self, tenant_id: &str, group: &Value) -> Result<Value, AdapterError>;
    async fn add_user_to_group(
        &self,
        tenant_id: &str,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), AdapterError>;
    async fn remove_user_from_group(
        &self,
        tenant_id: &str,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), AdapterError>;
    async fn get_group_members(
        &self,
        tenant_id: &str,
        group_id: &str,
    ) -> Result<Vec<String>, AdapterError>;

    /// Apply a transformation-engine entitlement to this provider (grant the
    /// downstream role/org-unit/group the entitlement names).
    async fn map_group_to_entitlement(
        &self,
        tenant_id: &str,
        user_id: &str,
        entitlement: &Entitlement,
    ) -> Result<(), AdapterError>;

    async fn check_health(&self) -> Result<HealthStatus, AdapterError>;
    fn get_capabilities(&self) -> AdapterCapabilities;
}

/// Shared status-code-to-`AdapterError` translation for the concrete
/// adapters: 429/5xx are retryable, everything else is treated as a
/// permanent failure the caller must not blindly retry.
pub(crate) fn error_from_response(
    provider_id: &str,
    response: &transport::TransportResponse,
) -> AdapterError {
    let provider_error_code = response
        .body
        .get("errorCode")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut err = if response.status == 429 {
        AdapterError::retryable(provider_id, "rate limited by provider", None)
    } else if response.status >= 500 {
        AdapterError::retryable(provider_id, format!("provider returned {}", response.status), None)
    } else {
        AdapterError::permanent(provider_id, format!("provider returned {}", response.status))
    }
    .with_http_status(response.status);

    if let Some(code) = provider_error_code {
        err = err.with_provider_error_code(code);
    }
    err
}
