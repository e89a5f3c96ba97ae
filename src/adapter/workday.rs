//! Worked example of the capability-record pattern: a Workday-like
//! hierarchical organization system. `HIERARCHICAL` transformation rules
//! (spec §4.4) map a Group's `Eng/Backend/Platform` display name onto this
//! provider's nested organizational units, surfaced here as the "group"
//! resource.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapter::secrets::SecretProvider;
use crate::adapter::transport::{HttpMethod, HttpTransport, TransportRequest};
use crate::adapter::{error_from_response, Adapter, AdapterCapabilities, AdapterError, HealthStatus};
use crate::transform::rules::Entitlement;

pub struct WorkdayOrgAdapter {
    base_url: String,
    credential_path: String,
    transport: Arc<dyn HttpTransport>,
    secrets: Arc<dyn SecretProvider>,
}

impl WorkdayOrgAdapter {
    pub fn new(
        base_url: impl Into<String>,
        credential_path: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        secrets: Arc<dyn SecretProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credential_path: credential_path.into(),
            transport,
            secrets,
        }
    }

    async fn auth_header(&self) -> Result<String, AdapterError> {
        let token = self.secrets.get(&self.credential_path).await?;
        let token = String::from_utf8(token)
            .map_err(|e| AdapterError::permanent("workday", format!("malformed credential: {e}")))?;
        Ok(format!("Bearer {token}"))
    }

    fn workers_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/ccx/api/v1/workers/{id}", self.base_url),
            None => format!("{}/ccx/api/v1/workers", self.base_url),
        }
    }

    fn org_units_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/ccx/api/v1/organizationUnits/{id}", self.base_url),
            None => format!("{}/ccx/api/v1/organizationUnits", self.base_url),
        }
    }
}

#[async_trait]
impl Adapter for WorkdayOrgAdapter {
    fn provider_id(&self) -> &str {
        "workday"
    }

    async fn create_user(&self, _tenant_id: &str, user: &Value) -> Result<Value, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Post, self.workers_url(None))
            .with_header("Authorization", auth)
            .with_body(user.clone());
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response.body)
    }

    async fn get_user(&self, _tenant_id: &str, id: &str) -> Result<Option<Value>, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Get, self.workers_url(Some(id)))
            .with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(Some(response.body))
    }

    async fn update_user(&self, _tenant_id: &str, id: &str, user: &Value) -> Result<Value, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Put, self.workers_url(Some(id)))
            .with_header("Authorization", auth)
            .with_body(user.clone());
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response.body)
    }

    async fn delete_user(&self, _tenant_id: &str, id: &str) -> Result<(), AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Delete, self.workers_url(Some(id)))
            .with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(())
    }

    async fn list_users(&self, _tenant_id: &str) -> Result<Vec<Value>, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Get, self.workers_url(None))
            .with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response
            .body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_group(&self, _tenant_id: &str, group: &Value) -> Result<Value, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Post, self.org_units_url(None))
            .with_header("Authorization", auth)
            .with_body(group.clone());
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response.body)
    }

    async fn add_user_to_group(
        &self,
        _tenant_id: &str,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), AdapterError> {
        let auth = self.auth_header().await?;
        let url = format!("{}/assignments", self.org_units_url(Some(group_id)));
        let request = TransportRequest::new(HttpMethod::Post, url)
            .with_header("Authorization", auth)
            .with_body(json!({"workerId": user_id}));
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(())
    }

    async fn remove_user_from_group(
        &self,
        _tenant_id: &str,
        group_id: &str,
        user_id: &str,
    ) -> Result<(), AdapterError> {
        let auth = self.auth_header().await?;
        let url = format!("{}/assignments/{user_id}", self.org_units_url(Some(group_id)));
        let request = TransportRequest::new(HttpMethod::Delete, url).with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(())
    }

    async fn get_group_members(&self, _tenant_id: &str, group_id: &str) -> Result<Vec<String>, AdapterError> {
        let auth = self.auth_header().await?;
        let url = format!("{}/assignments", self.org_units_url(Some(group_id)));
        let request = TransportRequest::new(HttpMethod::Get, url).with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response
            .body
            .get("data")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("workerId").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn map_group_to_entitlement(
        &self,
        tenant_id: &str,
        user_id: &str,
        entitlement: &Entitlement,
    ) -> Result<(), AdapterError> {
        self.add_user_to_group(tenant_id, &entitlement.provider_entitlement_id, user_id)
            .await
    }

    async fn check_health(&self) -> Result<HealthStatus, AdapterError> {
        let auth = self.auth_header().await?;
        let url = format!("{}/ccx/api/v1/status", self.base_url);
        let request = TransportRequest::new(HttpMethod::Get, url).with_header("Authorization", auth);
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Degraded),
            Err(_) => Ok(HealthStatus::Unreachable),
        }
    }

    fn get_capabilities(&self) -> AdapterCapabilities {
        AdapterCapabilities {
            provider_id: self.provider_id().to_string(),
            supports_users: true,
            supports_groups: true,
            supports_group_membership: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::secrets::InMemorySecretProvider;
    use crate::adapter::transport::TransportResponse;

    struct FakeTransport {
        response: TransportResponse,
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, AdapterError> {
            Ok(self.response.clone())
        }
    }

    fn adapter(status: u16, body: Value) -> WorkdayOrgAdapter {
        let secrets = InMemorySecretProvider::new().with_secret("workday/token", b"tok".to_vec());
        let transport = FakeTransport {
            response: TransportResponse { status, body },
        };
        WorkdayOrgAdapter::new(
            "https://wd5.workday.test",
            "workday/token",
            Arc::new(transport),
            Arc::new(secrets),
        )
    }

    #[tokio::test]
    async fn get_user_maps_404_to_none() {
        let a = adapter(404, json!({}));
        assert!(a.get_user("t1", "w1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn map_group_to_entitlement_assigns_the_org_unit() {
        let a = adapter(204, json!({}));
        let entitlement = Entitlement {
            provider_entitlement_id: "org-eng-backend".into(),
            name: "Engineering Backend".into(),
            entitlement_type: "org_unit".into(),
            mapped_groups: vec!["Eng/Backend".into()],
            priority: 1,
            source_rule_id: "r2".into(),
            metadata: Default::default(),
        };
        a.map_group_to_entitlement("t1", "w1", &entitlement).await.unwrap();
    }

    #[tokio::test]
    async fn get_group_members_extracts_worker_ids() {
        let a = adapter(200, json!({"data": [{"workerId": "w1"}, {"workerId": "w2"}]}));
        let members = a.get_group_members("t1", "org-eng").await.unwrap();
        assert_eq!(members, vec!["w1".to_string(), "w2".to_string()]);
    }
}
