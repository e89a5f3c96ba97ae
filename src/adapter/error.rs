//! Uniform error shape downstream adapters translate their own failures
//! into (spec §4.6), plus the conversion into the core's [`ScimError`] at the
//! router boundary.

use crate::error::ScimError;

/// A downstream provider call failed. Carries enough of the provider's
/// response for the router to both log something useful and pick the right
/// SCIM error shape, without leaking provider-specific error types past the
/// adapter boundary.
#[derive(Debug, Clone, thiserror::Error)]
#[error("adapter '{provider_name}' request failed: {message}")]
pub struct AdapterError {
    pub provider_name: String,
    pub message: String,
    pub http_status_code: Option<u16>,
    pub provider_error_code: Option<String>,
    pub scim_error_type: Option<&'static str>,
    pub is_retryable: bool,
    pub retry_after: Option<u64>,
}

impl AdapterError {
    /// A failure the caller should not retry (bad request, auth failure,
    /// not-found on the provider side, ...).
    pub fn permanent(provider_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            message: message.into(),
            http_status_code: None,
            provider_error_code: None,
            scim_error_type: None,
            is_retryable: false,
            retry_after: None,
        }
    }

    /// A transient failure (provider rate limit, timeout, 5xx) the caller
    /// may retry, optionally after `retry_after` seconds.
    pub fn retryable(
        provider_name: impl Into<String>,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            message: message.into(),
            http_status_code: None,
            provider_error_code: None,
            scim_error_type: None,
            is_retryable: true,
            retry_after,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status_code = Some(status);
        self
    }

    pub fn with_provider_error_code(mut self, code: impl Into<String>) -> Self {
        self.provider_error_code = Some(code.into());
        self
    }
}

/// Propagation policy (spec §7): `isRetryable=true` surfaces as 429 when a
/// `retryAfter` is known, else 503; non-retryable failures also surface as
/// 503 since the core has no narrower "the downstream SaaS rejected this"
/// SCIM error kind to map onto. The core never retries internally — retrying
/// is the caller's concern.
impl From<AdapterError> for ScimError {
    fn from(err: AdapterError) -> Self {
        match (err.is_retryable, err.retry_after) {
            (true, Some(retry_after)) => ScimError::TooMany {
                retry_after: Some(retry_after),
            },
            _ => ScimError::ServerUnavailable {
                message: format!("{}: {}", err.provider_name, err.message),
            },
        }
    }
}
