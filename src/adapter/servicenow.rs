//! Worked example of the capability-record pattern: a ServiceNow-like
//! system with native `sys_user_group` membership — the only one of the
//! three worked adapters where `GetGroupMembers` is a direct provider call
//! rather than a derived view over role/org assignments.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapter::secrets::SecretProvider;
use crate::adapter::transport::{HttpMethod, HttpTransport, TransportRequest};
use crate::adapter::{error_from_response, Adapter, AdapterCapabilities, AdapterError, HealthStatus};
use crate::transform::rules::Entitlement;

pub struct ServiceNowGroupAdapter {
    base_url: String,
    credential_path: String,
    transport: Arc<dyn HttpTransport>,
    secrets: Arc<dyn SecretProvider>,
}

impl ServiceNowGroupAdapter {
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
            .map_err(|e| AdapterError::permanent("servicenow", format!("malformed credential: {e}")))?;
        Ok(format!("Bearer {token}"))
    }

    fn users_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/api/now/table/sys_user/{id}", self.base_url),
            None => format!("{}/api/now/table/sys_user", self.base_url),
        }
    }

    fn groups_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/api/now/table/sys_user_group/{id}", self.base_url),
            None => format!("{}/api/now/table/sys_user_group", self.base_url),
        }
    }

    fn memberships_url(&self) -> String {
        format!("{}/api/now/table/sys_user_grmember", self.base_url)
    }
}

#[async_trait]
impl Adapter for ServiceNowGroupAdapter {
    fn provider_id(&self) -> &str {
        "servicenow"
    }

    async fn create_user(&self, _tenant_id: &str, user: &Value) -> Result<Value, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Post, self.users_url(None))
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
        let request = TransportRequest::new(HttpMethod::Get, self.users_url(Some(id)))
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
        let request = TransportRequest::new(HttpMethod::Patch, self.users_url(Some(id)))
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
        let request = TransportRequest::new(HttpMethod::Delete, self.users_url(Some(id)))
            .with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(())
    }

    async fn list_users(&self, _tenant_id: &str) -> Result<Vec<Value>, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Get, self.users_url(None))
            .with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response
            .body
            .get("result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_group(&self, _tenant_id: &str, group: &Value) -> Result<Value, AdapterError> {
        let auth = self.auth_header().await?;
        let request = TransportRequest::new(HttpMethod::Post, self.groups_url(None))
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
        let body = json!({"group": group_id, "user": user_id});
        let request = TransportRequest::new(HttpMethod::Post, self.memberships_url())
            .with_header("Authorization", auth)
            .with_body(body);
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
        let url = format!(
            "{}?sysparm_query=group%3D{group_id}%5Euser%3D{user_id}",
            self.memberships_url()
        );
        let request = TransportRequest::new(HttpMethod::Delete, url).with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(())
    }

    async fn get_group_members(&self, _tenant_id: &str, group_id: &str) -> Result<Vec<String>, AdapterError> {
        let auth = self.auth_header().await?;
        let url = format!("{}?sysparm_query=group%3D{group_id}", self.memberships_url());
        let request = TransportRequest::new(HttpMethod::Get, url).with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response
            .body
            .get("result")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("user").and_then(Value::as_str))
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
        let url = format!("{}/api/now/table/sys_properties?sysparm_limit=1", self.base_url);
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
