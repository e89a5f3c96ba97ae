//! The seam adapters call through instead of `reqwest::Client` directly, so
//! tests can exercise adapter logic without real network access.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::error::AdapterError;
use crate::adapter::pool::ConnectionPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstracts "send this request, get this response" so `SalesforceRoleAdapter`
/// and friends can be driven by a fake in tests instead of `reqwest::Client`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, AdapterError>;
}

/// Production transport. Leases a client from the per-adapter
/// [`ConnectionPool`] for the duration of one request and returns it
/// afterward, whether the request succeeded or failed.
pub struct ReqwestTransport {
    pool: Arc<ConnectionPool>,
    timeout: std::time::Duration,
}

impl ReqwestTransport {
    pub fn new(pool: Arc<ConnectionPool>, timeout: std::time::Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, AdapterError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let lease = self.pool.acquire().await;
        let mut builder = lease
            .client()
            .request(method, &request.url)
            .timeout(self.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let sent = builder.send().await;
        self.pool.release(lease).await;

        let response = sent.map_err(|e| {
            if e.is_timeout() {
                AdapterError::retryable("http", format!("request timed out: {e}"), None)
            } else {
                AdapterError::retryable("http", format!("transport error: {e}"), None)
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .unwrap_or(Value::Null);

        Ok(TransportResponse { status, body })
    }
}
