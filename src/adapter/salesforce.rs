//! Worked example of the capability-record pattern: a Salesforce-like role
//! system where group membership maps onto `PermissionSetAssignment`
//! records rather than a native group concept.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapter::secrets::SecretProvider;
use crate::adapter::transport::{HttpMethod, HttpTransport, TransportRequest};
use crate::adapter::{error_from_response, Adapter, AdapterCapabilities, AdapterError, HealthStatus};
use crate::transform::rules::Entitlement;

pub struct SalesforceRoleAdapter {
    base_url: String,
    credential_path: String,
    transport: Arc<dyn HttpTransport>,
    secrets: Arc<dyn SecretProvider>,
}

impl SalesforceRoleAdapter {
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
            .map_err(|e| AdapterError::permanent("salesforce", format!("malformed credential: {e}")))?;
        Ok(format!("Bearer {token}"))
    }

    fn users_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/services/data/v59.0/sobjects/User/{id}", self.base_url),
            None => format!("{}/services/data/v59.0/sobjects/User", self.base_url),
        }
    }
}

#[async_trait]
impl Adapter for SalesforceRoleAdapter {
    fn provider_id(&self) -> &str {
        "salesforce"
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
        let url = format!(
            "{}/services/data/v59.0/query?q=SELECT+Id,Username,Email+FROM+User",
            self.base_url
        );
        let request = TransportRequest::new(HttpMethod::Get, url).with_header("Authorization", auth);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(response
            .body
            .get("records")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_group(&self, _tenant_id: &str, _group: &Value) -> Result<Value, AdapterError> {
        // Salesforce has no native "group" concept this adapter targets;
        // membership is expressed entirely through PermissionSetAssignment
        // via `map_group_to_entitlement`.
        Err(AdapterError::permanent(
            self.provider_id(),
            "salesforce adapter has no native group resource, use map_group_to_entitlement",
        ))
    }

    async fn add_user_to_group(
        &self,
        _tenant_id: &str,
        _group_id: &str,
        _user_id: &str,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::permanent(
            self.provider_id(),
            "salesforce adapter has no native group membership, use map_group_to_entitlement",
        ))
    }

    async fn remove_user_from_group(
        &self,
        _tenant_id: &str,
        _group_id: &str,
        _user_id: &str,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::permanent(
            self.provider_id(),
            "salesforce adapter has no native group membership, use map_group_to_entitlement",
        ))
    }

    async fn get_group_members(&self, _tenant_id: &str, _group_id: &str) -> Result<Vec<String>, AdapterError> {
        Ok(Vec::new())
    }

    async fn map_group_to_entitlement(
        &self,
        _tenant_id: &str,
        user_id: &str,
        entitlement: &Entitlement,
    ) -> Result<(), AdapterError> {
        let auth = self.auth_header().await?;
        let url = format!("{}/services/data/v59.0/sobjects/PermissionSetAssignment", self.base_url);
        let body = json!({
            "AssigneeId": user_id,
            "PermissionSetId": entitlement.provider_entitlement_id,
        });
        let request = TransportRequest::new(HttpMethod::Post, url)
            .with_header("Authorization", auth)
            .with_body(body);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(self.provider_id(), &response));
        }
        Ok(())
    }

    async fn check_health(&self) -> Result<HealthStatus, AdapterError> {
        let auth = self.auth_header().await?;
        let url = format!("{}/services/data/v59.0/limits", self.base_url);
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
            supports_groups: false,
            supports_group_membership: false,
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

    fn adapter(status: u16, body: Value) -> SalesforceRoleAdapter {
        let secrets = InMemorySecretProvider::new().with_secret("salesforce/token", b"tok".to_vec());
        let transport = FakeTransport {
            response: TransportResponse { status, body },
        };
        SalesforceRoleAdapter::new(
            "https://na1.salesforce.test",
            "salesforce/token",
            Arc::new(transport),
            Arc::new(secrets),
        )
    }

    #[tokio::test]
    async fn create_user_returns_the_provider_body_on_success() {
        let a = adapter(201, json!({"id": "005abc"}));
        let result = a.create_user("t1", &json!({"userName": "bob"})).await.unwrap();
        assert_eq!(result["id"], "005abc");
    }

    #[tokio::test]
    async fn non_success_status_becomes_an_adapter_error() {
        let a = adapter(500, json!({"errorCode": "SERVER_ERROR"}));
        let err = a.create_user("t1", &json!({})).await.unwrap_err();
        assert!(err.is_retryable);
        assert_eq!(err.provider_error_code.as_deref(), Some("SERVER_ERROR"));
    }

    #[tokio::test]
    async fn map_group_to_entitlement_posts_a_permission_set_assignment() {
        let a = adapter(201, json!({"id": "0PS123"}));
        let entitlement = Entitlement {
            provider_entitlement_id: "0PS000".into(),
            name: "Sales_Rep".into(),
            entitlement_type: "role".into(),
            mapped_groups: vec!["Sales".into()],
            priority: 1,
            source_rule_id: "r1".into(),
            metadata: Default::default(),
        };
        a.map_group_to_entitlement("t1", "005abc", &entitlement)
            .await
            .unwrap();
    }
}
