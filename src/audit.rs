//! Audit trail for tenant-scoped mutations (spec §6).
//!
//! `AuditSink::record` is best-effort and non-blocking from the caller's
//! perspective: a write failure is logged and swallowed, never propagated as
//! a user-visible error. The store-backed implementation writes into the
//! `audit-logs` container alongside `users`/`groups`, partitioned the same
//! way by `tenantId`.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::store::{containers, Store};

/// Retention window for audit entries: 90 days (spec §3/§6).
pub const AUDIT_RETENTION_SECS: i64 = 7_776_000;

/// Who performed the audited operation, carried on every [`crate::router`]
/// request and stamped onto every entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub actor_id: String,
    pub actor_type: String,
}

/// Outcome of the audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failure,
}

/// One audit record: who did what, to which resource, and whether it
/// succeeded. `snapshot` carries the pre-delete resource body so a delete can
/// be reconstructed from the trail even after the resource itself is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub tenant_id: String,
    pub actor_id: String,
    pub actor_type: String,
    pub operation: String,
    pub resource_type: String,
    pub resource_id: String,
    pub status: AuditStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Value>,
}

impl AuditLogEntry {
    fn new(
        tenant_id: impl Into<String>,
        actor: &Actor,
        operation: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        status: AuditStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            actor_id: actor.actor_id.clone(),
            actor_type: actor.actor_type.clone(),
            operation: operation.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            status,
            timestamp: Utc::now(),
            detail: None,
            snapshot: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_snapshot(mut self, snapshot: Value) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

/// Write path for audit entries. Implementations must never let a write
/// failure surface to the caller of [`Self::record`] — log and return.
pub trait AuditSink: Send + Sync {
    /// Record `entry`. Errors are a contract violation if they reach the
    /// caller; implementations catch and log their own failures.
    fn record(&self, entry: AuditLogEntry) -> impl std::future::Future<Output = ()> + Send;
}

/// Convenience constructors mirroring the operations the router dispatches.
pub fn success(
    tenant_id: impl Into<String>,
    actor: &Actor,
    operation: impl Into<String>,
    resource_type: impl Into<String>,
    resource_id: impl Into<String>,
) -> AuditLogEntry {
    AuditLogEntry::new(
        tenant_id,
        actor,
        operation,
        resource_type,
        resource_id,
        AuditStatus::Success,
    )
}

pub fn failure(
    tenant_id: impl Into<String>,
    actor: &Actor,
    operation: impl Into<String>,
    resource_type: impl Into<String>,
    resource_id: impl Into<String>,
    detail: impl Into<String>,
) -> AuditLogEntry {
    AuditLogEntry::new(
        tenant_id,
        actor,
        operation,
        resource_type,
        resource_id,
        AuditStatus::Failure,
    )
    .with_detail(detail)
}

/// Store-backed audit sink. Writes land in [`containers::AUDIT_LOGS`],
/// keyed by a fresh id each time — audit entries are append-only, never
/// updated in place.
pub struct StoreAuditSink<S: Store> {
    store: S,
}

impl<S: Store> StoreAuditSink<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: Store> AuditSink for StoreAuditSink<S> {
    async fn record(&self, entry: AuditLogEntry) {
        let tenant_id = entry.tenant_id.clone();
        let id = entry.id.clone();
        let doc = match serde_json::to_value(&entry) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("audit entry {id} failed to serialize: {e}");
                return;
            }
        };
        // The sink's own trait has no cancellation token to thread through —
        // audit writes are best-effort and fire-and-forget from the caller's
        // perspective — so a fresh, never-cancelled token is used here.
        if let Err(e) = self
            .store
            .create_item(
                containers::AUDIT_LOGS,
                &tenant_id,
                Some(id.clone()),
                doc,
                &CancellationToken::new(),
            )
            .await
        {
            log::warn!("audit write failed for tenant={tenant_id} entry={id}: {e}");
        }
    }
}

/// In-memory test double. Retains every entry recorded against it in
/// insertion order; never fails.
#[derive(Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditLogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }
}
