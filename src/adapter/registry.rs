//! Resolve `(tenantId, providerId) -> Adapter` (spec §4.6).
//!
//! Grounded on the same double-checked-locking registry shape as a circuit
//! breaker registry keyed by provider name: a `RwLock<HashMap<_, Arc<_>>>`
//! checked under a read lock first, promoted to a write lock only to
//! install a missing entry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::adapter::Adapter;
use crate::error::ScimError;

type Key = (String, String);

fn key(tenant_id: &str, provider_id: &str) -> Key {
    (tenant_id.to_string(), provider_id.to_string())
}

/// Thread-safe, cheaply cloneable map from `(tenantId, providerId)` to the
/// adapter instance that serves it.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Arc<RwLock<HashMap<Key, Arc<dyn Adapter>>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the adapter for `(tenantId, providerId)`.
    pub fn register(&self, tenant_id: &str, provider_id: &str, adapter: Arc<dyn Adapter>) {
        let mut adapters = self.adapters.write().expect("adapter registry lock poisoned");
        adapters.insert(key(tenant_id, provider_id), adapter);
    }

    /// Get the adapter for `(tenantId, providerId)` if one is registered.
    pub fn get(&self, tenant_id: &str, provider_id: &str) -> Option<Arc<dyn Adapter>> {
        let adapters = self.adapters.read().expect("adapter registry lock poisoned");
        adapters.get(&key(tenant_id, provider_id)).cloned()
    }

    /// Get-or-install: returns the existing adapter if registered, otherwise
    /// builds one via `factory`, installs it, and returns it. A read lock is
    /// tried first; the write lock is taken (and the map re-checked) only on
    /// a miss, so concurrent resolutions for an already-registered adapter
    /// never contend on the write lock.
    pub fn get_or_create(
        &self,
        tenant_id: &str,
        provider_id: &str,
        factory: impl FnOnce() -> Arc<dyn Adapter>,
    ) -> Arc<dyn Adapter> {
        let k = key(tenant_id, provider_id);
        {
            let adapters = self.adapters.read().expect("adapter registry lock poisoned");
            if let Some(adapter) = adapters.get(&k) {
                return adapter.clone();
            }
        }

        let mut adapters = self.adapters.write().expect("adapter registry lock poisoned");
        if let Some(adapter) = adapters.get(&k) {
            return adapter.clone();
        }
        let adapter = factory();
        adapters.insert(k, adapter.clone());
        adapter
    }

    /// Resolve an adapter, or the routing error the router maps to HTTP 404
    /// `invalidPath` (spec §4.6) when the combination is unknown.
    pub fn resolve(&self, tenant_id: &str, provider_id: &str) -> Result<Arc<dyn Adapter>, ScimError> {
        self.get(tenant_id, provider_id)
            .ok_or_else(|| ScimError::adapter_not_found(tenant_id, provider_id))
    }

    pub fn deregister(&self, tenant_id: &str, provider_id: &str) {
        let mut adapters = self.adapters.write().expect("adapter registry lock poisoned");
        adapters.remove(&key(tenant_id, provider_id));
    }

    /// Every `providerId` with an adapter registered for `tenant_id`, used
    /// by the router to fan a Group mutation out to every provider the
    /// tenant has configured rather than just one.
    pub fn providers_for_tenant(&self, tenant_id: &str) -> Vec<String> {
        let adapters = self.adapters.read().expect("adapter registry lock poisoned");
        adapters
            .keys()
            .filter(|(t, _)| t == tenant_id)
            .map(|(_, provider_id)| provider_id.clone())
            .collect()
    }
}
