//! SCIM-invariant-enforcing layer over a [`Store`] (component **D**).
//!
//! A [`Store`] knows nothing about SCIM: it persists JSON documents per
//! tenant partition. `Repository` is where the SCIM-specific rules the
//! teacher's `ResourceProvider` used to fold into one trait now live on their
//! own: natural-key uniqueness, server-generated `id`/`meta`, optimistic
//! concurrency via [`ScimVersion`], and RFC 7644 §3.5.2 PATCH semantics built
//! on [`crate::patch`].
//!
//! Users and Groups share the same operations; which container and natural
//! key apply is resolved once, in [`ResourceKind`].

mod validate;

use chrono::Utc;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ScimError;
use crate::filter::translate;
use crate::patch::{self, PatchOperation};
use crate::resource::{ListQuery, ScimVersion};
use crate::schema::SchemaRegistry;
use crate::store::predicate::{FieldOp, Predicate};
use crate::store::{Store, containers};

/// Which SCIM resource an operation targets, and the container/natural key
/// that follow from it. Users and Groups are symmetric in every operation
/// below; this is the one place that distinction is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Group,
}

impl ResourceKind {
    /// Parse from the SCIM resource type string used on the wire (`"User"`, `"Group"`).
    pub fn parse(resource_type: &str) -> Result<Self, ScimError> {
        match resource_type {
            "User" => Ok(Self::User),
            "Group" => Ok(Self::Group),
            other => Err(ScimError::UnsupportedResourceType(other.to_string())),
        }
    }

    fn container(self) -> &'static str {
        match self {
            Self::User => containers::USERS,
            Self::Group => containers::GROUPS,
        }
    }

    /// The attribute whose value must be unique within a tenant for this kind.
    fn natural_key_attribute(self) -> &'static str {
        match self {
            Self::User => "userName",
            Self::Group => "displayName",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
        }
    }
}

/// A single page of a [`Repository::list`] result, shaped for direct
/// embedding in a SCIM `ListResponse`.
#[derive(Debug, Clone)]
pub struct ListResult {
    pub resources: Vec<Value>,
    pub total_results: usize,
    pub start_index: usize,
    pub items_per_page: usize,
}

const DEFAULT_COUNT: usize = 100;
const MAX_COUNT: usize = 1000;

/// SCIM-invariant-enforcing repository over any [`Store`] implementation.
///
/// Generic over the store backend so the same repository logic runs
/// identically against [`crate::store::InMemoryStore`] in tests and
/// [`crate::store::SqliteStore`] in production.
pub struct Repository<S: Store> {
    store: S,
    schema_registry: SchemaRegistry,
}

impl<S: Store> Repository<S> {
    /// Build a repository over `store`, loading the embedded core schemas
    /// for canonical-URN lookups. Fails only if the embedded schema JSON
    /// itself cannot be parsed, which would indicate a packaging defect
    /// rather than a runtime condition.
    pub fn new(store: S) -> Result<Self, ScimError> {
        let schema_registry = SchemaRegistry::with_embedded_schemas()
            .map_err(|e| ScimError::internal(format!("embedded schema load failed: {e}")))?;
        Ok(Self {
            store,
            schema_registry,
        })
    }

    fn validate_shape(&self, kind: ResourceKind, data: &Value) -> Result<(), ScimError> {
        match kind {
            ResourceKind::User => validate::validate_user(data, &self.schema_registry),
            ResourceKind::Group => validate::validate_group(data, &self.schema_registry),
        }
    }

    /// Check that `kind`'s natural key on `data` does not collide with
    /// another resource already in `tenant_id`, ignoring `exclude_id` (the
    /// resource's own id, on replace).
    async fn check_natural_key_unique(
        &self,
        kind: ResourceKind,
        tenant_id: &str,
        data: &Value,
        exclude_id: Option<&str>,
        token: &CancellationToken,
    ) -> Result<(), ScimError> {
        let attribute = kind.natural_key_attribute();
        let Some(key) = data.get(attribute).and_then(Value::as_str) else {
            return Ok(());
        };

        let scoped = Predicate::scoped(
            tenant_id,
            Predicate::Field {
                path: attribute.to_string(),
                op: FieldOp::Eq(Value::String(key.to_string())),
            },
        );
        let page = self
            .store
            .query_items(kind.container(), &scoped, 1, 2, token)
            .await?;

        let collides = page
            .items
            .iter()
            .any(|item| Some(item.id.as_str()) != exclude_id);
        if collides {
            return Err(ScimError::uniqueness(attribute, key));
        }
        Ok(())
    }

    /// Stamp server-owned `meta` fields and return the document ready for
    /// the response. `created` is preserved across mutations; `lastModified`
    /// and `version` are always refreshed from the just-persisted version.
    fn stamp_response(
        kind: ResourceKind,
        id: &str,
        created: &str,
        version: &ScimVersion,
        mut data: Value,
    ) -> Value {
        let now = Utc::now().to_rfc3339();
        if let Some(obj) = data.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.to_string()));
            obj.insert(
                "meta".to_string(),
                serde_json::json!({
                    "resourceType": kind.as_str(),
                    "created": created,
                    "lastModified": now,
                    "version": version.to_http_header(),
                }),
            );
        }
        data
    }

    fn existing_created(data: &Value) -> Option<String> {
        data.get("meta")
            .and_then(|m| m.get("created"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Create a new resource. Generates `id` and `meta`; rejects a
    /// `userName`/`displayName` collision within the tenant.
    pub async fn create(
        &self,
        resource_type: &str,
        tenant_id: &str,
        data: Value,
        token: &CancellationToken,
    ) -> Result<Value, ScimError> {
        ScimError::check_cancelled(token)?;
        let kind = ResourceKind::parse(resource_type)?;
        self.validate_shape(kind, &data)?;
        self.check_natural_key_unique(kind, tenant_id, &data, None, token)
            .await?;

        let stored = self
            .store
            .create_item(kind.container(), tenant_id, None, data.clone(), token)
            .await?;

        Ok(Self::stamp_response(
            kind,
            &stored.id,
            &Utc::now().to_rfc3339(),
            &stored.version,
            data,
        ))
    }

    /// Read a resource by server id. `Ok(None)` means not found, which
    /// callers surface as a 404 rather than an error variant — symmetric
    /// with [`Store::read_item`].
    pub async fn read(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        token: &CancellationToken,
    ) -> Result<Option<Value>, ScimError> {
        ScimError::check_cancelled(token)?;
        let kind = ResourceKind::parse(resource_type)?;
        let stored = self.store.read_item(kind.container(), tenant_id, id, token).await?;
        Ok(stored.map(|item| {
            let created = Self::existing_created(&item.data).unwrap_or_default();
            Self::stamp_response(kind, &item.id, &created, &item.version, item.data)
        }))
    }

    /// Read a resource by its natural key (`userName`/`displayName`).
    pub async fn read_by_natural_key(
        &self,
        resource_type: &str,
        tenant_id: &str,
        key: &str,
        token: &CancellationToken,
    ) -> Result<Option<Value>, ScimError> {
        ScimError::check_cancelled(token)?;
        let kind = ResourceKind::parse(resource_type)?;
        let scoped = Predicate::scoped(
            tenant_id,
            Predicate::Field {
                path: kind.natural_key_attribute().to_string(),
                op: FieldOp::Eq(Value::String(key.to_string())),
            },
        );
        let page = self.store.query_items(kind.container(), &scoped, 1, 1, token).await?;
        Ok(page.items.into_iter().next().map(|item| {
            let created = Self::existing_created(&item.data).unwrap_or_default();
            Self::stamp_response(kind, &item.id, &created, &item.version, item.data)
        }))
    }

    /// List resources, optionally filtered, 1-based paged.
    pub async fn list(
        &self,
        resource_type: &str,
        tenant_id: &str,
        query: &ListQuery,
        token: &CancellationToken,
    ) -> Result<ListResult, ScimError> {
        ScimError::check_cancelled(token)?;
        let kind = ResourceKind::parse(resource_type)?;

        let scoped = match &query.filter {
            Some(filter_text) => {
                let expr = crate::filter::parse(filter_text)?;
                translate(tenant_id, &expr)?
            }
            None => Predicate::scoped(tenant_id, Predicate::True),
        };

        let start_index = query.start_index.unwrap_or(1).max(1);
        let count = query.count.unwrap_or(DEFAULT_COUNT).min(MAX_COUNT);

        let page = self
            .store
            .query_items(kind.container(), &scoped, start_index, count, token)
            .await?;

        let mut resources: Vec<Value> = page
            .items
            .into_iter()
            .map(|item| {
                let created = Self::existing_created(&item.data).unwrap_or_default();
                Self::stamp_response(kind, &item.id, &created, &item.version, item.data)
            })
            .collect();

        if let Some(sort_by) = &query.sort_by {
            resources.sort_by(|a, b| {
                let av = a.get(sort_by).and_then(Value::as_str).unwrap_or_default();
                let bv = b.get(sort_by).and_then(Value::as_str).unwrap_or_default();
                av.cmp(bv)
            });
            if query.sort_descending {
                resources.reverse();
            }
        }

        let items_per_page = resources.len();
        Ok(ListResult {
            resources,
            total_results: page.total_results,
            start_index,
            items_per_page,
        })
    }

    /// Replace (PUT) a resource in full. `if_match`, when given, must equal
    /// the stored version or the write fails with [`ScimError::VersionMismatch`].
    pub async fn replace(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        data: Value,
        if_match: Option<&ScimVersion>,
        token: &CancellationToken,
    ) -> Result<Value, ScimError> {
        ScimError::check_cancelled(token)?;
        let kind = ResourceKind::parse(resource_type)?;
        self.validate_shape(kind, &data)?;
        self.check_natural_key_unique(kind, tenant_id, &data, Some(id), token)
            .await?;

        let current = self
            .store
            .read_item(kind.container(), tenant_id, id, token)
            .await?
            .ok_or_else(|| ScimError::resource_not_found(kind.as_str(), id))?;

        let expected = if_match.cloned().unwrap_or_else(|| current.version.clone());
        if !current.version.matches(&expected) {
            return Err(ScimError::version_mismatch(
                expected.to_http_header(),
                current.version.to_http_header(),
            ));
        }

        let created = Self::existing_created(&current.data).unwrap_or_default();
        let stored = self
            .store
            .compare_and_swap(kind.container(), tenant_id, id, &expected, data.clone(), token)
            .await?;

        Ok(Self::stamp_response(
            kind,
            &stored.id,
            &created,
            &stored.version,
            data,
        ))
    }

    /// Apply an ordered batch of PATCH operations (RFC 7644 §3.5.2).
    /// Materializes the current document, applies all operations in memory
    /// via [`patch::apply_ops`], re-validates repository invariants, and
    /// commits with the version read at materialization time — a concurrent
    /// writer racing in between surfaces as [`ScimError::VersionMismatch`],
    /// not a lost update.
    pub async fn patch(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        ops: &[PatchOperation],
        if_match: Option<&ScimVersion>,
        token: &CancellationToken,
    ) -> Result<Value, ScimError> {
        ScimError::check_cancelled(token)?;
        let kind = ResourceKind::parse(resource_type)?;

        let current = self
            .store
            .read_item(kind.container(), tenant_id, id, token)
            .await?
            .ok_or_else(|| ScimError::resource_not_found(kind.as_str(), id))?;

        if let Some(expected) = if_match {
            if !current.version.matches(expected) {
                return Err(ScimError::version_mismatch(
                    expected.to_http_header(),
                    current.version.to_http_header(),
                ));
            }
        }

        let mut patched = current.data.clone();
        patch::apply_ops(&mut patched, ops)?;
        self.validate_shape(kind, &patched)?;
        self.check_natural_key_unique(kind, tenant_id, &patched, Some(id), token)
            .await?;

        let created = Self::existing_created(&current.data).unwrap_or_default();
        let stored = self
            .store
            .compare_and_swap(
                kind.container(),
                tenant_id,
                id,
                &current.version,
                patched.clone(),
                token,
            )
            .await?;

        Ok(Self::stamp_response(
            kind,
            &stored.id,
            &created,
            &stored.version,
            patched,
        ))
    }

    /// Delete a resource. `if_match`, when given, must equal the stored version.
    pub async fn delete(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        if_match: Option<&ScimVersion>,
        token: &CancellationToken,
    ) -> Result<(), ScimError> {
        ScimError::check_cancelled(token)?;
        let kind = ResourceKind::parse(resource_type)?;
        self.store
            .delete_item(kind.container(), tenant_id, id, if_match, token)
            .await?;
        Ok(())
    }

    /// Add a member to a group's `members` list. Adding a `value` that is
    /// already present is a no-op, matching PATCH `add`'s idempotent set
    /// semantics for multi-valued attributes.
    pub async fn add_member(
        &self,
        tenant_id: &str,
        group_id: &str,
        member_value: &str,
        member_type: Option<&str>,
        token: &CancellationToken,
    ) -> Result<Value, ScimError> {
        ScimError::check_cancelled(token)?;
        let current = self
            .store
            .read_item(containers::GROUPS, tenant_id, group_id, token)
            .await?
            .ok_or_else(|| ScimError::resource_not_found("Group", group_id))?;

        let mut data = current.data.clone();
        let members = data
            .as_object_mut()
            .unwrap()
            .entry("members")
            .or_insert_with(|| Value::Array(Vec::new()));
        let members = members
            .as_array_mut()
            .ok_or_else(|| ScimError::internal("'members' is not an array"))?;

        let already_present = members
            .iter()
            .any(|m| m.get("value").and_then(Value::as_str) == Some(member_value));
        if !already_present {
            let mut entry = serde_json::Map::new();
            entry.insert("value".to_string(), Value::String(member_value.to_string()));
            if let Some(t) = member_type {
                entry.insert("type".to_string(), Value::String(t.to_string()));
            }
            members.push(Value::Object(entry));
        }

        self.validate_shape(ResourceKind::Group, &data)?;
        let created = Self::existing_created(&current.data).unwrap_or_default();
        let stored = self
            .store
            .compare_and_swap(
                containers::GROUPS,
                tenant_id,
                group_id,
                &current.version,
                data.clone(),
                token,
            )
            .await?;

        Ok(Self::stamp_response(
            ResourceKind::Group,
            &stored.id,
            &created,
            &stored.version,
            data,
        ))
    }

    /// Remove a member from a group's `members` list by `value`. Removing a
    /// `value` that isn't present is a no-op.
    pub async fn remove_member(
        &self,
        tenant_id: &str,
        group_id: &str,
        member_value: &str,
        token: &CancellationToken,
    ) -> Result<Value, ScimError> {
        ScimError::check_cancelled(token)?;
        let current = self
            .store
            .read_item(containers::GROUPS, tenant_id, group_id, token)
            .await?
            .ok_or_else(|| ScimError::resource_not_found("Group", group_id))?;

        let mut data = current.data.clone();
        if let Some(members) = data.get_mut("members").and_then(Value::as_array_mut) {
            members.retain(|m| m.get("value").and_then(Value::as_str) != Some(member_value));
        }

        let created = Self::existing_created(&current.data).unwrap_or_default();
        let stored = self
            .store
            .compare_and_swap(
                containers::GROUPS,
                tenant_id,
                group_id,
                &current.version,
                data.clone(),
                token,
            )
            .await?;

        Ok(Self::stamp_response(
            ResourceKind::Group,
            &stored.id,
            &created,
            &stored.version,
            data,
        ))
    }
}
