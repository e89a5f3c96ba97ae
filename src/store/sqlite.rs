//! SQLite-backed [`Store`] implementation, grounded in the teacher's
//! (unwired) `storage::sqlite` module: a single key-value table keyed by
//! `(container, tenant_id, id)` holding the JSON document as `TEXT`, queried
//! by fetching a tenant's rows and evaluating the [`crate::store::Predicate`]
//! tree over the decoded payload in Rust — the same strategy the teacher's
//! `find_by_attribute` uses rather than generating per-attribute SQL.

use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

use tokio_util::sync::CancellationToken;

use crate::resource::ScimVersion;
use crate::store::errors::StoreError;
use crate::store::predicate::{self, ScopedPredicate};
use crate::store::{QueryPage, Store, StoredItem};

/// A [`Store`] backed by a SQLite database, for deployments that need
/// durability beyond a single process's lifetime. Cheaply cloneable —
/// `SqlitePool` is an `Arc` handle to the same connection pool — so the
/// repository, transformation engine, and audit sink can each own their own
/// handle to the same database.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if necessary) a SQLite database at `path`, including any
    /// missing parent directories.
    pub async fn new_with_path(path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
                    message: format!("failed to create directory {}: {e}", parent.display()),
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{path}"))
            .map_err(|e| StoreError::Backend {
                message: format!("invalid database path {path}: {e}"),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| StoreError::Backend {
                message: format!("failed to open sqlite database at {path}: {e}"),
            })?;

        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    /// Open a private in-memory SQLite database, for tests and ephemeral use.
    pub async fn new_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(":memory:")
            .await
            .map_err(|e| StoreError::Backend {
                message: format!("failed to open in-memory sqlite database: {e}"),
            })?;
        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scim_documents (
                container TEXT NOT NULL,
                tenant_id TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (container, tenant_id, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend {
            message: format!("failed to create schema: {e}"),
        })?;
        Ok(())
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

    async fn fetch_data(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query(
            "SELECT data FROM scim_documents WHERE container = ? AND tenant_id = ? AND id = ?",
        )
        .bind(container)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend {
            message: format!("failed to fetch document: {e}"),
        })?;

        match row {
            Some(row) => {
                let raw: String = row.get("data");
                let value = serde_json::from_str(&raw).map_err(|e| StoreError::Backend {
                    message: format!("stored document is not valid JSON: {e}"),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl Store for SqliteStore {
    async fn create_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: Option<String>,
        item: Value,
        token: &CancellationToken,
    ) -> Result<StoredItem, StoreError> {
        Self::check_cancelled(token)?;
        let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        if self.fetch_data(container, tenant_id, &id).await?.is_some() {
            return Err(StoreError::AlreadyExists {
                container: container.to_string(),
                id,
            });
        }

        let raw = serde_json::to_string(&item).map_err(|e| StoreError::Backend {
            message: format!("failed to serialize document: {e}"),
        })?;

        sqlx::query(
            "INSERT INTO scim_documents (container, tenant_id, id, data) VALUES (?, ?, ?, ?)",
        )
        .bind(container)
        .bind(tenant_id)
        .bind(&id)
        .bind(&raw)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend {
            message: format!("failed to insert document: {e}"),
        })?;

        Ok(StoredItem {
            id,
            version: Self::content_version(&item),
            data: item,
        })
    }

    async fn read_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        token: &CancellationToken,
    ) -> Result<Option<StoredItem>, StoreError> {
        Self::check_cancelled(token)?;
        Ok(self
            .fetch_data(container, tenant_id, id)
            .await?
            .map(|data| StoredItem {
                id: id.to_string(),
                version: Self::content_version(&data),
                data,
            }))
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
        let raw = serde_json::to_string(&item).map_err(|e| StoreError::Backend {
            message: format!("failed to serialize document: {e}"),
        })?;

        sqlx::query(
            "INSERT INTO scim_documents (container, tenant_id, id, data) VALUES (?, ?, ?, ?)
             ON CONFLICT(container, tenant_id, id) DO UPDATE SET data = excluded.data",
        )
        .bind(container)
        .bind(tenant_id)
        .bind(id)
        .bind(&raw)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend {
            message: format!("failed to upsert document: {e}"),
        })?;

        Ok(StoredItem {
            id: id.to_string(),
            version: Self::content_version(&item),
            data: item,
        })
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
        let mut tx = self.pool.begin().await.map_err(|e| StoreError::Backend {
            message: format!("failed to start transaction: {e}"),
        })?;

        let row = sqlx::query(
            "SELECT data FROM scim_documents WHERE container = ? AND tenant_id = ? AND id = ?",
        )
        .bind(container)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend {
            message: format!("failed to fetch document: {e}"),
        })?
        .ok_or_else(|| StoreError::NotFound {
            container: container.to_string(),
            id: id.to_string(),
        })?;

        let raw: String = row.get("data");
        let current_data: Value = serde_json::from_str(&raw).map_err(|e| StoreError::Backend {
            message: format!("stored document is not valid JSON: {e}"),
        })?;
        let current_version = Self::content_version(&current_data);

        if !current_version.matches(expected_version) {
            return Err(StoreError::version_conflict(
                expected_version,
                &current_version,
            ));
        }

        let new_raw = serde_json::to_string(&item).map_err(|e| StoreError::Backend {
            message: format!("failed to serialize document: {e}"),
        })?;

        sqlx::query(
            "UPDATE scim_documents SET data = ? WHERE container = ? AND tenant_id = ? AND id = ?",
        )
        .bind(&new_raw)
        .bind(container)
        .bind(tenant_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Backend {
            message: format!("failed to update document: {e}"),
        })?;

        tx.commit().await.map_err(|e| StoreError::Backend {
            message: format!("failed to commit transaction: {e}"),
        })?;

        Ok(StoredItem {
            id: id.to_string(),
            version: Self::content_version(&item),
            data: item,
        })
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
        if let Some(expected) = expected_version {
            let current = self
                .fetch_data(container, tenant_id, id)
                .await?
                .ok_or_else(|| StoreError::NotFound {
                    container: container.to_string(),
                    id: id.to_string(),
                })?;
            let current_version = Self::content_version(&current);
            if !current_version.matches(expected) {
                return Err(StoreError::version_conflict(expected, &current_version));
            }
        }

        let result = sqlx::query(
            "DELETE FROM scim_documents WHERE container = ? AND tenant_id = ? AND id = ?",
        )
        .bind(container)
        .bind(tenant_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend {
            message: format!("failed to delete document: {e}"),
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                container: container.to_string(),
                id: id.to_string(),
            });
        }
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
        let rows = sqlx::query("SELECT id, data FROM scim_documents WHERE container = ? AND tenant_id = ? ORDER BY id")
            .bind(container)
            .bind(&predicate.tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend {
                message: format!("failed to query documents: {e}"),
            })?;

        let full = predicate.as_predicate();
        let mut matched = Vec::new();
        for row in rows {
            let id: String = row.get("id");
            let raw: String = row.get("data");
            let data: Value = serde_json::from_str(&raw).map_err(|e| StoreError::Backend {
                message: format!("stored document is not valid JSON: {e}"),
            })?;
            if predicate::evaluate(&full, &data) {
                matched.push(StoredItem {
                    version: Self::content_version(&data),
                    id,
                    data,
                });
            }
        }

        let total_results = matched.len();
        let items = matched.into_iter().skip(start_index - 1).take(count).collect();

        Ok(QueryPage {
            items,
            total_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tok() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let item = store
            .create_item("users", "t1", Some("u1".into()), json!({"userName": "b@x"}), &tok())
            .await
            .unwrap();
        let read = store.read_item("users", "t1", &item.id, &tok()).await.unwrap();
        assert_eq!(read.unwrap().data["userName"], "b@x");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store
            .create_item("users", "t1", Some("u1".into()), json!({"userName": "a"}), &tok())
            .await
            .unwrap();
        let err = store
            .create_item("users", "t1", Some("u1".into()), json!({"userName": "b"}), &tok())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn compare_and_swap_rejects_stale_version() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let created = store
            .create_item("users", "t1", Some("u1".into()), json!({"userName": "a"}), &tok())
            .await
            .unwrap();
        let stale = ScimVersion::from_hash("stale");
        let err = store
            .compare_and_swap("users", "t1", "u1", &stale, json!({"userName": "b"}), &tok())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));

        let updated = store
            .compare_and_swap(
                "users",
                "t1",
                "u1",
                &created.version,
                json!({"userName": "b"}),
                &tok(),
            )
            .await
            .unwrap();
        assert_eq!(updated.data["userName"], "b");
    }

    #[tokio::test]
    async fn query_items_is_tenant_scoped() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store
            .create_item("users", "t1", Some("u1".into()), json!({"userName": "b@x"}), &tok())
            .await
            .unwrap();
        store
            .create_item("users", "t2", Some("u2".into()), json!({"userName": "b@x"}), &tok())
            .await
            .unwrap();

        let scoped = predicate::Predicate::scoped("t1", predicate::Predicate::True);
        let page = store.query_items("users", &scoped, 1, 10, &tok()).await.unwrap();
        assert_eq!(page.total_results, 1);
        assert_eq!(page.items[0].id, "u1");
    }
}
