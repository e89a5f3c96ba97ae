//! Resource model for SCIM resources.
//!
//! This module defines the core resource abstractions shared by the filter,
//! store, repository, and transformation layers: the value-object-backed
//! [`Resource`] type, its version-aware wrapper, tenant and request context,
//! and list-query parameters.
//!
//! # Module Organization
//!
//! * [`resource`] - The core `Resource` type, built from validated value objects
//! * [`builder`] - Fluent, type-safe construction of `Resource` values
//! * [`serialization`] - Serde glue between `Resource` and its JSON wire form
//! * [`value_objects`] - Self-validating primitives (`UserName`, `EmailAddress`, ...)
//! * [`version`] - Content-hashed, opaque `ScimVersion` (weak ETags)
//! * [`versioned`] - `VersionedResource`, pairing a `Resource` with its `ScimVersion`
//! * [`tenant`] - `TenantContext` and isolation levels for multi-tenant deployments
//! * [`context`] - `RequestContext` and `ListQuery`

pub mod builder;
pub mod context;
pub mod resource;
pub mod serialization;
pub mod tenant;
pub mod value_objects;
pub mod version;
pub mod versioned;

pub use builder::ResourceBuilder;
pub use context::{ListQuery, RequestContext};
pub use resource::Resource;
pub use tenant::{IsolationLevel, TenantContext, TenantPermissions};
pub use version::ScimVersion;
pub use versioned::VersionedResource;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_creation() {
        let data = json!({
            "userName": "testuser",
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"]
        });
        let resource = Resource::from_json("User".to_string(), data).unwrap();

        assert_eq!(resource.resource_type, "User");
        assert_eq!(resource.get_username(), Some("testuser"));
    }

    #[test]
    fn test_resource_id_extraction() {
        let data = json!({
            "id": "12345",
            "userName": "testuser"
        });
        let resource = Resource::from_json("User".to_string(), data).unwrap();

        assert_eq!(resource.get_id(), Some("12345"));
    }

    #[test]
    fn test_resource_schemas() {
        let data = json!({
            "userName": "testuser"
        });
        let resource = Resource::from_json("User".to_string(), data).unwrap();

        let schemas = resource.get_schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0], "urn:ietf:params:scim:schemas:core:2.0:User");
    }

    #[test]
    fn test_email_extraction() {
        let data = json!({
            "userName": "testuser",
            "emails": [
                {
                    "value": "test@example.com",
                    "type": "work",
                    "primary": true
                }
            ]
        });
        let resource = Resource::from_json("User".to_string(), data).unwrap();

        let emails = resource.get_emails().expect("emails present");
        assert_eq!(emails.values().len(), 1);
        assert_eq!(emails.values()[0].value, "test@example.com");
    }

    #[test]
    fn test_request_context_creation() {
        let context = RequestContext::new("test-123".to_string());
        assert_eq!(context.request_id, "test-123");
        assert!(!context.is_multi_tenant());
    }

    #[test]
    fn test_resource_active_status() {
        let active_data = json!({
            "userName": "testuser",
            "active": true
        });
        let active_resource = Resource::from_json("User".to_string(), active_data).unwrap();
        assert!(active_resource.is_active());

        let inactive_data = json!({
            "userName": "testuser",
            "active": false
        });
        let inactive_resource = Resource::from_json("User".to_string(), inactive_data).unwrap();
        assert!(!inactive_resource.is_active());

        let no_active_data = json!({
            "userName": "testuser"
        });
        let default_resource = Resource::from_json("User".to_string(), no_active_data).unwrap();
        assert!(default_resource.is_active());
    }
}
