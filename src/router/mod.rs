//! Request router (component **H**): parses a framework-agnostic
//! [`ScimRequest`] into a dispatch against the repository, and — for
//! mutating Group/membership operations — fans out to the transformation
//! engine and adapter registry. Never binds to a concrete HTTP framework;
//! an embedder (axum, actix, whatever) translates its own request/response
//! types to and from [`ScimRequest`]/[`ScimResponse`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::adapter::{Adapter, AdapterRegistry};
use crate::audit::{self, AuditSink};
use crate::error::ScimError;
use crate::patch::{PatchOperation, PatchOp};
use crate::repository::Repository;
use crate::resource::{ListQuery, ScimVersion};
use crate::store::Store;
use crate::transform::TransformationEngine;

/// HTTP method of an inbound [`ScimRequest`]. The router only needs the
/// methods RFC 7644 defines for the resource endpoints it serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Who is making the request, threaded through from whatever bearer-token
/// validation the embedder performs upstream (spec §6: "consumed as an
/// opaque `TenantContext` + `ActorId`"). Distinct from
/// [`crate::resource::TenantContext`], which carries the richer
/// permission/limit data the repository layer doesn't need here — this is
/// just enough to scope a request and attribute an audit entry.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub tenant_id: String,
    pub actor_id: String,
    pub actor_type: String,
}

impl AuthContext {
    fn actor(&self) -> audit::Actor {
        audit::Actor {
            actor_id: self.actor_id.clone(),
            actor_type: self.actor_type.clone(),
        }
    }
}

/// A framework-agnostic inbound request.
#[derive(Debug, Clone)]
pub struct ScimRequest {
    pub method: Method,
    /// Path with the leading slash and any query string stripped, e.g.
    /// `"Users"` or `"Groups/abc-123"`.
    pub path: String,
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
    pub auth: AuthContext,
}

impl ScimRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A framework-agnostic outbound response.
#[derive(Debug, Clone)]
pub struct ScimResponse {
    pub status: u16,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl ScimResponse {
    fn json(status: u16, body: Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/scim+json".to_string());
        Self {
            status,
            body: Some(body),
            headers,
        }
    }

    fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
            headers: HashMap::new(),
        }
    }

    fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.headers.insert("ETag".to_string(), etag.into());
        self
    }
}

const SCIM_ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";
const SCIM_CONTENT_TYPE: &str = "application/scim+json";

fn error_response(err: ScimError) -> ScimResponse {
    let status = err.http_status();
    let mut body = json!({
        "schemas": [SCIM_ERROR_SCHEMA],
        "status": status.to_string(),
        "detail": err.to_string(),
    });
    if let Some(scim_type) = err.scim_type() {
        body["scimType"] = json!(scim_type);
    }
    let mut response = ScimResponse::json(status, body);
    if let Some(retry_after) = err.retry_after() {
        response
            .headers
            .insert("Retry-After".to_string(), retry_after.to_string());
    }
    response
}

/// Accepts `application/scim+json`, `application/json`, or a request with no
/// `Content-Type` at all (some clients omit it on bodies the method implies).
fn content_type_ok(request: &ScimRequest) -> bool {
    match request.header("Content-Type") {
        None => true,
        Some(value) => {
            let value = value.split(';').next().unwrap_or(value).trim();
            value.eq_ignore_ascii_case(SCIM_CONTENT_TYPE) || value.eq_ignore_ascii_case("application/json")
        }
    }
}

fn accept_ok(request: &ScimRequest) -> bool {
    match request.header("Accept") {
        None => true,
        Some(value) => value.split(',').any(|part| {
            let part = part.split(';').next().unwrap_or(part).trim();
            part == "*/*" || part.eq_ignore_ascii_case(SCIM_CONTENT_TYPE) || part.eq_ignore_ascii_case("application/json")
        }),
    }
}

/// Split `"Groups/abc-123"` into `("Groups", Some("abc-123"))`.
fn split_path(path: &str) -> (&str, Option<&str>) {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    match trimmed.split_once('/') {
        Some((resource, id)) if !id.is_empty() => (resource, Some(id)),
        _ => (trimmed, None),
    }
}

fn singular_resource_type(plural: &str) -> Option<&'static str> {
    match plural {
        "Users" => Some("User"),
        "Groups" => Some("Group"),
        _ => None,
    }
}

fn if_match_header(request: &ScimRequest) -> Result<Option<ScimVersion>, ScimError> {
    match request.header("If-Match") {
        None => Ok(None),
        Some(raw) => ScimVersion::parse_http_header(raw)
            .map(Some)
            .map_err(|e| ScimError::invalid_request(format!("malformed If-Match header: {e}"))),
    }
}

fn list_query_from(request: &ScimRequest) -> ListQuery {
    let mut query = ListQuery::new();
    if let Some(filter) = request.query.get("filter") {
        query = query.with_filter(filter.clone());
    }
    if let Some(count) = request.query.get("count").and_then(|v| v.parse().ok()) {
        query = query.with_count(count);
    }
    if let Some(start_index) = request.query.get("startIndex").and_then(|v| v.parse().ok()) {
        query = query.with_start_index(start_index);
    }
    if let Some(sort_by) = request.query.get("sortBy") {
        query = query.with_sort_by(sort_by.clone());
        if request.query.get("sortOrder").map(String::as_str) == Some("descending") {
            query = query.descending();
        }
    }
    query
}

fn etag_of(resource: &Value) -> Option<String> {
    resource
        .get("meta")
        .and_then(|m| m.get("version"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn patch_ops_from_body(body: &Value) -> Result<Vec<PatchOperation>, ScimError> {
    let ops = body
        .get("Operations")
        .and_then(Value::as_array)
        .ok_or_else(|| ScimError::invalid_request("PATCH body missing 'Operations' array"))?;
    ops.iter().map(PatchOperation::from_json).collect()
}

/// Owns one repository/transformation-engine/adapter-registry/audit-sink
/// quadruple and dispatches [`ScimRequest`]s against them.
pub struct ScimRouter<S: Store> {
    repository: Repository<S>,
    transform: TransformationEngine<S>,
    adapters: AdapterRegistry,
    audit: Arc<dyn AuditSink>,
}

impl<S: Store + Clone> ScimRouter<S> {
    pub fn new(
        store: S,
        adapters: AdapterRegistry,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ScimError> {
        Ok(Self {
            repository: Repository::new(store.clone())?,
            transform: TransformationEngine::new(store),
            adapters,
            audit,
        })
    }

    pub async fn handle(&self, request: ScimRequest) -> ScimResponse {
        if !content_type_ok(&request) {
            return error_response(ScimError::invalid_request(
                "unsupported Content-Type, expected application/scim+json",
            ));
        }
        if !accept_ok(&request) {
            return error_response(ScimError::invalid_request(
                "unsupported Accept header, expected application/scim+json",
            ));
        }

        match self.dispatch(&request).await {
            Ok(response) => response,
            Err(err) => error_response(err),
        }
    }

    async fn dispatch(&self, request: &ScimRequest) -> Result<ScimResponse, ScimError> {
        let (plural, id) = split_path(&request.path);
        let resource_type = singular_resource_type(plural)
            .ok_or_else(|| ScimError::UnsupportedResourceType(plural.to_string()))?;
        let tenant_id = request.auth.tenant_id.as_str();
        // No embedder-supplied cancellation signal reaches `ScimRequest` yet
        // (spec §6 leaves transport plumbing external); a fresh token is
        // synthesized per request and threaded into every suspension point
        // below, ready to be wired to a real client-disconnect signal later.
        let token = CancellationToken::new();

        match (request.method, id) {
            (Method::Get, None) => self.list(resource_type, tenant_id, request, &token).await,
            (Method::Get, Some(id)) => self.read(resource_type, tenant_id, id, &token).await,
            (Method::Post, None) => self.create(resource_type, tenant_id, request, &token).await,
            (Method::Put, Some(id)) => self.replace(resource_type, tenant_id, id, request, &token).await,
            (Method::Patch, Some(id)) => self.patch(resource_type, tenant_id, id, request, &token).await,
            (Method::Delete, Some(id)) => self.delete(resource_type, tenant_id, id, request, &token).await,
            _ => Err(ScimError::invalid_request(format!(
                "method not supported on this path: {plural}"
            ))),
        }
    }

    async fn list(
        &self,
        resource_type: &str,
        tenant_id: &str,
        request: &ScimRequest,
        token: &CancellationToken,
    ) -> Result<ScimResponse, ScimError> {
        let query = list_query_from(request);
        let result = self.repository.list(resource_type, tenant_id, &query, token).await?;
        Ok(ScimResponse::json(
            200,
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
                "totalResults": result.total_results,
                "startIndex": result.start_index,
                "itemsPerPage": result.items_per_page,
                "Resources": result.resources,
            }),
        ))
    }

    async fn read(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        token: &CancellationToken,
    ) -> Result<ScimResponse, ScimError> {
        match self.repository.read(resource_type, tenant_id, id, token).await? {
            Some(resource) => Ok(ScimResponse::json(200, resource)),
            None => Err(ScimError::resource_not_found(resource_type, id)),
        }
    }

    async fn create(
        &self,
        resource_type: &str,
        tenant_id: &str,
        request: &ScimRequest,
        token: &CancellationToken,
    ) -> Result<ScimResponse, ScimError> {
        let body = request
            .body
            .clone()
            .ok_or_else(|| ScimError::invalid_request("request body required"))?;

        let result = self.repository.create(resource_type, tenant_id, body, token).await;
        self.record(&request.auth, "CREATE", resource_type, &result).await;
        let resource = result?;

        if resource_type == "Group" {
            self.dispatch_group_membership(tenant_id, &resource, token).await;
        }

        let etag = etag_of(&resource);
        let mut response = ScimResponse::json(201, resource);
        if let Some(etag) = etag {
            response = response.with_etag(etag);
        }
        Ok(response)
    }

    async fn replace(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        request: &ScimRequest,
        token: &CancellationToken,
    ) -> Result<ScimResponse, ScimError> {
        let body = request
            .body
            .clone()
            .ok_or_else(|| ScimError::invalid_request("request body required"))?;
        let if_match = if_match_header(request)?;

        let result = self
            .repository
            .replace(resource_type, tenant_id, id, body, if_match.as_ref(), token)
            .await;
        self.record(&request.auth, "REPLACE", resource_type, &result).await;
        let resource = result?;

        if resource_type == "Group" {
            self.dispatch_group_membership(tenant_id, &resource, token).await;
        }

        Ok(ScimResponse::json(200, resource))
    }

    async fn patch(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        request: &ScimRequest,
        token: &CancellationToken,
    ) -> Result<ScimResponse, ScimError> {
        let body = request
            .body
            .clone()
            .ok_or_else(|| ScimError::invalid_request("request body required"))?;
        let ops = patch_ops_from_body(&body)?;
        let if_match = if_match_header(request)?;
        let touches_membership = resource_type == "Group"
            && ops
                .iter()
                .any(|op| matches!(op.op, PatchOp::Add | PatchOp::Remove | PatchOp::Replace) && op
                    .path
                    .as_ref()
                    .is_none_or(|p| p.attribute.eq_ignore_ascii_case("members")));

        let result = self
            .repository
            .patch(resource_type, tenant_id, id, &ops, if_match.as_ref(), token)
            .await;
        self.record(&request.auth, "PATCH", resource_type, &result).await;
        let resource = result?;

        if touches_membership {
            self.dispatch_group_membership(tenant_id, &resource, token).await;
        }

        Ok(ScimResponse::json(200, resource))
    }

    async fn delete(
        &self,
        resource_type: &str,
        tenant_id: &str,
        id: &str,
        request: &ScimRequest,
        token: &CancellationToken,
    ) -> Result<ScimResponse, ScimError> {
        let if_match = if_match_header(request)?;
        // Deletion audit retains the pre-delete snapshot (90-day retention,
        // spec §3) since the resource itself won't be readable afterward.
        let snapshot = self
            .repository
            .read(resource_type, tenant_id, id, token)
            .await
            .ok()
            .flatten();

        let result = self
            .repository
            .delete(resource_type, tenant_id, id, if_match.as_ref(), token)
            .await;

        let actor = request.auth.actor();
        let mut entry = match &result {
            Ok(()) => audit::success(tenant_id, &actor, "DELETE", resource_type, id),
            Err(e) => audit::failure(tenant_id, &actor, "DELETE", resource_type, id, e.to_string()),
        };
        if let Some(snapshot) = snapshot {
            entry = entry.with_snapshot(snapshot);
        }
        self.audit.record(entry).await;

        result?;
        Ok(ScimResponse::no_content())
    }

    async fn record(
        &self,
        auth: &AuthContext,
        operation: &str,
        resource_type: &str,
        result: &Result<Value, ScimError>,
    ) {
        let actor = auth.actor();
        let entry = match result {
            Ok(resource) => {
                let id = resource.get("id").and_then(Value::as_str).unwrap_or_default();
                audit::success(&auth.tenant_id, &actor, operation, resource_type, id)
            }
            Err(e) => audit::failure(&auth.tenant_id, &actor, operation, resource_type, "", e.to_string()),
        };
        self.audit.record(entry).await;
    }

    /// Fan a Group write out to every provider the tenant has an adapter
    /// for: transform the Group's `displayName` into that provider's
    /// entitlements, then apply the entitlement to every current member.
    /// Best-effort — a provider being unreachable does not fail the SCIM
    /// write, which already committed to the canonical store.
    async fn dispatch_group_membership(
        &self,
        tenant_id: &str,
        group: &Value,
        token: &CancellationToken,
    ) {
        let Some(display_name) = group.get("displayName").and_then(Value::as_str) else {
            return;
        };
        let members: Vec<&str> = group
            .get("members")
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| m.get("value").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        for provider_id in self.adapters.providers_for_tenant(tenant_id) {
            let outcome = match self
                .transform
                .transform(tenant_id, &provider_id, display_name, token)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::warn!("transform failed for tenant={tenant_id} provider={provider_id}: {e}");
                    continue;
                }
            };
            let Ok(adapter) = self.adapters.resolve(tenant_id, &provider_id) else {
                continue;
            };
            for entitlement in &outcome.entitlements {
                for member_id in &members {
                    if let Err(e) = adapter.map_group_to_entitlement(tenant_id, member_id, entitlement).await {
                        log::warn!(
                            "adapter '{provider_id}' entitlement push failed for tenant={tenant_id} user={member_id}: {e}"
                        );
                    }
                }
            }
        }
    }
}
