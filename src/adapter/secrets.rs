//! `SecretProvider`: opaque credential lookup for adapters (spec §6).
//!
//! Adapters never see a provider's raw API key management; they ask for a
//! secret by path and get bytes back. Production deployments back this with
//! a real secrets manager; the in-memory double here exists purely for
//! tests.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::adapter::error::AdapterError;

pub trait SecretProvider: Send + Sync {
    fn get(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>, AdapterError>> + Send;
}

/// In-memory secret store for tests: `path -> bytes`, populated up front.
#[derive(Default)]
pub struct InMemorySecretProvider {
    secrets: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(self, path: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.secrets
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), value.into());
        self
    }
}

impl SecretProvider for InMemorySecretProvider {
    async fn get(&self, path: &str) -> Result<Vec<u8>, AdapterError> {
        self.secrets
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
            .ok_or_else(|| AdapterError::permanent("secrets", format!("no secret at path '{path}'")))
    }
}
