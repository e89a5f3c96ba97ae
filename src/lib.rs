//! # SCIM Gateway
//!
//! A multi-tenant SCIM 2.0 gateway: a protocol-compliant front door (RFC 7643/7644)
//! that accepts identity-provider traffic, enforces per-tenant isolation and resource
//! invariants, and fans requests out to downstream systems (HR, CRM, ticketing, ...)
//! through a pluggable adapter layer with rule-based attribute transformation.
//!
//! ## Layering
//!
//! - [`resource`] - the `Resource`/`ScimVersion`/`TenantContext` data model
//! - [`schema`] - RFC 7643 schema registry and attribute validation
//! - [`filter`] - SCIM filter grammar (§3.4.2.2): tokenizer, parser, predicate AST
//! - [`store`] - tenant-partitioned document storage (in-memory and SQLite)
//! - [`repository`] - SCIM-invariant-enforcing layer over a [`store::Store`]: uniqueness,
//!   optimistic concurrency, PATCH semantics
//! - [`patch`] - RFC 7644 §3.5.2 PATCH operation types and application
//! - [`transform`] - rule-based attribute transformation engine with conflict resolution
//! - [`adapter`] - downstream system adapters behind a connection-pooled registry
//! - [`audit`] - audit log sink for mutating operations
//! - [`router`] - framework-agnostic HTTP request/response mapping
//! - [`config`] - gateway configuration
//! - [`error`] - the `ScimError`/`ValidationError` taxonomy, mapped to RFC 7644 statuses
//!
//! ## Quick Start
//!
//! ```rust
//! use scim_gateway::store::{InMemoryStore, Store};
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! let token = CancellationToken::new();
//!
//! let stored = store
//!     .create_item(
//!         "users",
//!         "tenant-a",
//!         None,
//!         json!({
//!             "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
//!             "userName": "jdoe"
//!         }),
//!         &token,
//!     )
//!     .await?;
//! println!("stored with version {}", stored.version.to_http_header());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod audit;
pub mod config;
pub mod error;
pub mod filter;
pub mod patch;
pub mod repository;
pub mod resource;
pub mod router;
pub mod schema;
pub mod store;
pub mod transform;

// Core re-exports for library users
pub use error::{BuildError, ScimError, ScimResult, ValidationError, ValidationResult};
pub use resource::{ListQuery, RequestContext, Resource, ScimVersion, TenantContext};
pub use schema::{
    AttributeDefinition, AttributeType, Mutability, Schema, SchemaRegistry, Uniqueness,
};
