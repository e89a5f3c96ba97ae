//! In-memory [`Store`] implementation: a tenant-partitioned map guarded by a
//! single `RwLock`, in the shape of the teacher's `InMemoryStorage`
//! (`tokio::sync::RwLock` over nested `HashMap`s) but keyed by container
//! first, since this gateway's containers (`users`, `groups`, `sync-state`,
//! `transformation-rules`, `audit-logs`) are fixed and known up front rather
//! than discovered per-tenant.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::resource::ScimVersion;
use crate::store::errors::StoreError;
use crate::store::predicate::{self, ScopedPredicate};
use crate::store::{QueryPage, Store, StoredItem};

#[derive(Default)]
struct TenantPartition {
    items: HashMap<String, StoredItem>,
}

#[derive(Default)]
struct ContainerTable {
    tenants: HashMap<String, TenantPartition>,
}

/// An in-process [`Store`], suitable for tests and small single-instance
/// deployments. Data does not survive process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    containers: Arc<RwLock<HashMap<String, ContainerTable>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn content_version(item: &Value) -> ScimVersion {
        let bytes = serde_json::to_vec(item).unwrap_or_default();
        ScimVersion::from_content(&bytes)
    }

    fn check_cancelled(token: &CancellationToken) -> Result<(), StoreError> {
        if token.is_cancelled() {
            Err(StoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Store for InMemoryStore {
    async fn create_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: Option<String>,
        item: Value,
        token: &CancellationToken,
    ) -> Result<StoredItem, StoreError> {
        Self::check_cancelled(token)?;
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut containers = self.containers.write().await;
        let table = containers.entry(container.to_string()).or_default();
        let partition = table.tenants.entry(tenant_id.to_string()).or_default();

        if partition.items.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                container: container.to_string(),
                id,
            });
        }

        let stored = StoredItem {
            id: id.clone(),
            version: Self::content_version(&item),
            data: item,
        };
        partition.items.insert(id, stored.clone());
        Ok(stored)
    }

    async fn read_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        token: &CancellationToken,
    ) -> Result<Option<StoredItem>, StoreError> {
        Self::check_cancelled(token)?;
        let containers = self.containers.read().await;
        Ok(containers
            .get(container)
            .and_then(|table| table.tenants.get(tenant_id))
            .and_then(|partition| partition.items.get(id))
            .cloned())
    }

    async fn upsert_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        item: Value,
        token: &CancellationToken,
    ) -> Result<StoredItem, StoreError> {
        Self::check_cancelled(token)?;
        let mut containers = self.containers.write().await;
        let table = containers.entry(container.to_string()).or_default();
        let partition = table.tenants.entry(tenant_id.to_string()).or_default();

        let stored = StoredItem {
            id: id.to_string(),
            version: Self::content_version(&item),
            data: item,
        };
        partition.items.insert(id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn compare_and_swap(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        expected_version: &ScimVersion,
        item: Value,
        token: &CancellationToken,
    ) -> Result<StoredItem, StoreError> {
        Self::check_cancelled(token)?;
        let mut containers = self.containers.write().await;
        let table = containers.entry(container.to_string()).or_default();
        let partition = table.tenants.entry(tenant_id.to_string()).or_default();

        let current = partition
            .items
            .get(id)
            .ok_or_else(|| StoreError::NotFound {
                container: container.to_string(),
                id: id.to_string(),
            })?;

        if !current.version.matches(expected_version) {
            return Err(StoreError::version_conflict(
                expected_version,
                &current.version,
            ));
        }

        let stored = StoredItem {
            id: id.to_string(),
            version: Self::content_version(&item),
            data: item,
        };
        partition.items.insert(id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn delete_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        expected_version: Option<&ScimVersion>,
        token: &CancellationToken,
    ) -> Result<(), StoreError> {
        Self::check_cancelled(token)?;
        let mut containers = self.containers.write().await;
        let table = containers.entry(container.to_string()).or_default();
        let partition = table.tenants.entry(tenant_id.to_string()).or_default();

        let current = partition
            .items
            .get(id)
            .ok_or_else(|| StoreError::NotFound {
                container: container.to_string(),
                id: id.to_string(),
            })?;

        if let Some(expected) = expected_version {
            if !current.version.matches(expected) {
                return Err(StoreError::version_conflict(expected, &current.version));
            }
        }

        partition.items.remove(id);
        Ok(())
    }

    async fn query_items(
        &self,
        container: &str,
        predicate: &ScopedPredicate,
        start_index: usize,
        count: usize,
        token: &CancellationToken,
    ) -> Result<QueryPage, StoreError> {
        Self::check_cancelled(token)?;
        let start_index = start_index.max(1);
        let containers = self.containers.read().await;
        let full = predicate.as_predicate();

        let Some(table) = containers.get(container) else {
            return Ok(QueryPage::default());
        };
        let Some(partition) = table.tenants.get(&predicate.tenant_id) else {
            return Ok(QueryPage::default());
        };

        let mut matched: Vec<&StoredItem> = partition
            .items
            .values()
            .filter(|item| crate::store::predicate::evaluate(&full, &item.data))
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let total_results = matched.len();
        let items = matched
            .into_iter()
            .skip(start_index - 1)
            .take(count)
            .cloned()
            .collect();

        Ok(QueryPage {
            items,
            total_results,
        })
    }
}
