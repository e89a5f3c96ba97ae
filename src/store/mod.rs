//! Partitioned document store (component **C**).
//!
//! A `Store` is the raw persistence layer: per-tenant-partitioned CRUD and
//! predicate-based querying over JSON documents, with no SCIM-specific
//! invariants (those live one layer up, in [`crate::repository`]). Containers
//! are `users`, `groups`, `sync-state`, `transformation-rules`, `audit-logs`;
//! the partition key is `tenantId` everywhere.
//!
//! Two implementations ship: [`in_memory::InMemoryStore`] for tests and small
//! deployments, and [`sqlite::SqliteStore`] for anything that needs real
//! durability — both implement the same [`Store`] trait.

pub mod errors;
pub mod in_memory;
pub mod sqlite;
pub mod predicate;

pub use errors::StoreError;
pub use in_memory::InMemoryStore;
pub use predicate::{FieldOp, Predicate, ScopedPredicate};
pub use sqlite::SqliteStore;

use crate::resource::ScimVersion;
use serde_json::Value;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// A single stored document plus the version computed over its content.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub id: String,
    pub data: Value,
    pub version: ScimVersion,
}

/// One page of a [`Store::query_items`] result.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub items: Vec<StoredItem>,
    pub total_results: usize,
}

/// Partitioned document storage. Every method suspends — store operations are
/// the "every I/O is a suspension point" boundary the concurrency model
/// describes.
pub trait Store: Send + Sync {
    /// Create a new item, assigning it `id` if none is supplied by the caller.
    /// Fails with [`StoreError::AlreadyExists`] if `id` is already taken within
    /// the tenant partition. `token` is checked before the write begins;
    /// cancelling after that point never leaves a half-written item.
    fn create_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: Option<String>,
        item: Value,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<StoredItem, StoreError>> + Send;

    /// Point read by id. Returns `Ok(None)` rather than an error when the item
    /// does not exist — not-found is not an exceptional path.
    fn read_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<Option<StoredItem>, StoreError>> + Send;

    /// Unconditional upsert, replacing the item's content and bumping its version.
    fn upsert_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        item: Value,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<StoredItem, StoreError>> + Send;

    /// Conditional write: succeeds only if the currently stored version equals
    /// `expected_version`, else fails with [`StoreError::VersionConflict`].
    /// This is the primitive PATCH atomicity and `If-Match` enforcement are
    /// built on.
    fn compare_and_swap(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        expected_version: &ScimVersion,
        item: Value,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<StoredItem, StoreError>> + Send;

    /// Delete by id. `expected_version`, if given, makes the delete conditional.
    fn delete_item(
        &self,
        container: &str,
        tenant_id: &str,
        id: &str,
        expected_version: Option<&ScimVersion>,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Predicate-based query, 1-based paging (`start_index >= 1`).
    fn query_items(
        &self,
        container: &str,
        predicate: &ScopedPredicate,
        start_index: usize,
        count: usize,
        token: &CancellationToken,
    ) -> impl Future<Output = Result<QueryPage, StoreError>> + Send;
}

/// Container names used throughout the gateway.
pub mod containers {
    pub const USERS: &str = "users";
    pub const GROUPS: &str = "groups";
    pub const SYNC_STATE: &str = "sync-state";
    pub const TRANSFORMATION_RULES: &str = "transformation-rules";
    pub const AUDIT_LOGS: &str = "audit-logs";
}
