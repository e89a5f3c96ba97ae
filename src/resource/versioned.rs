//! Versioned resource types for SCIM resource versioning.
//!
//! This module provides the `VersionedResource` type for handling SCIM resources
//! with version control. It enables conditional operations with ETag-based
//! concurrency control for preventing lost updates.
//!
//! # Core Type
//!
//! * [`VersionedResource`] - Resource wrapper that includes automatic version computation
//!
//! # Usage
//!
//! ```rust
//! use scim_gateway::resource::{versioned::VersionedResource, resource::Resource};
//! use serde_json::json;
//!
//! let resource = Resource::from_json("User".to_string(), json!({
//!     "id": "123",
//!     "userName": "john.doe",
//!     "active": true
//! })).unwrap();
//!
//! let versioned = VersionedResource::new(resource);
//! println!("Resource version: {}", versioned.version().to_http_header());
//! ```

use super::{resource::Resource, version::ScimVersion};
use serde::{Deserialize, Serialize};

/// A resource with its associated version information.
///
/// This wrapper combines a SCIM resource with its version, enabling
/// conditional operations that can detect concurrent modifications.
/// The version is automatically computed from the resource content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedResource {
    /// The SCIM resource data
    resource: Resource,

    /// The version computed from the resource content
    version: ScimVersion,
}

impl VersionedResource {
    /// Create a new versioned resource.
    ///
    /// The version is automatically computed from the resource's JSON representation,
    /// ensuring consistency across all provider implementations.
    pub fn new(resource: Resource) -> Self {
        let version = Self::get_or_compute_version(&resource);
        Self { resource, version }
    }

    /// Create a versioned resource with a specific version.
    ///
    /// Useful when migrating from existing systems or when the version
    /// needs to be preserved from external sources.
    pub fn with_version(resource: Resource, version: ScimVersion) -> Self {
        Self { resource, version }
    }

    /// Get the resource data.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Get the resource version.
    pub fn version(&self) -> &ScimVersion {
        &self.version
    }

    /// Convert into the underlying resource, discarding version information.
    pub fn into_resource(self) -> Resource {
        self.resource
    }

    /// Get the unique identifier of this resource.
    pub fn get_id(&self) -> Option<&str> {
        self.resource.get_id()
    }

    /// Get the userName field for User resources.
    pub fn get_username(&self) -> Option<&str> {
        self.resource.get_username()
    }

    /// Get the external id if present.
    pub fn get_external_id(&self) -> Option<&str> {
        self.resource.get_external_id()
    }

    /// Get the meta attributes if present.
    pub fn get_meta(&self) -> Option<&crate::resource::value_objects::Meta> {
        self.resource.get_meta()
    }

    /// Get an attribute value from the resource.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.resource.get(key)
    }

    /// Get an attribute value from the resource.
    ///
    /// Alias for `get()` for consistency with the `Resource` API.
    pub fn get_attribute(&self, attribute_name: &str) -> Option<&serde_json::Value> {
        self.resource.get_attribute(attribute_name)
    }

    /// Update the resource content and recompute the version.
    pub fn update_resource(&mut self, new_resource: Resource) {
        self.version = Self::compute_version(&new_resource);
        self.resource = new_resource;
    }

    /// Check if this resource's version matches the expected version.
    pub fn version_matches(&self, expected: &ScimVersion) -> bool {
        self.version.matches(expected)
    }

    /// Refresh the version based on current resource content.
    ///
    /// Useful if the resource was modified externally and the version
    /// needs to be synchronized.
    pub fn refresh_version(&mut self) {
        self.version = Self::compute_version(&self.resource);
    }

    /// Get version from resource meta or compute from content if not available.
    fn get_or_compute_version(resource: &Resource) -> ScimVersion {
        if let Some(meta) = resource.get_meta() {
            if let Some(meta_version) = meta.version() {
                if let Ok(version) = ScimVersion::parse_http_header(meta_version) {
                    return version;
                }
                return ScimVersion::from_hash(meta_version);
            }
        }

        Self::compute_version(resource)
    }

    /// Compute version from resource content.
    fn compute_version(resource: &Resource) -> ScimVersion {
        let json_bytes = resource.to_json().unwrap().to_string().into_bytes();
        ScimVersion::from_content(&json_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_versioned_resource_creation() {
        let resource = Resource::from_json(
            "User".to_string(),
            json!({
                "id": "123",
                "userName": "john.doe",
                "active": true
            }),
        )
        .unwrap();

        let versioned = VersionedResource::new(resource.clone());
        assert_eq!(versioned.get_id(), resource.get_id());
        assert!(!versioned.version().as_str().is_empty());
    }

    #[test]
    fn test_versioned_resource_version_changes() {
        let resource1 = Resource::from_json(
            "User".to_string(),
            json!({
                "id": "123",
                "userName": "john.doe",
                "active": true
            }),
        )
        .unwrap();

        let resource2 = Resource::from_json(
            "User".to_string(),
            json!({
                "id": "123",
                "userName": "john.doe",
                "active": false
            }),
        )
        .unwrap();

        let versioned1 = VersionedResource::new(resource1);
        let versioned2 = VersionedResource::new(resource2);

        assert!(versioned1.version() != versioned2.version());
    }

    #[test]
    fn test_versioned_resource_update() {
        let initial_resource = Resource::from_json(
            "User".to_string(),
            json!({
                "id": "123",
                "userName": "john.doe",
                "active": true
            }),
        )
        .unwrap();

        let mut versioned = VersionedResource::new(initial_resource);
        let old_version = versioned.version().clone();

        let updated_resource = Resource::from_json(
            "User".to_string(),
            json!({
                "id": "123",
                "userName": "john.doe",
                "active": false
            }),
        )
        .unwrap();

        versioned.update_resource(updated_resource);

        assert!(versioned.version() != &old_version);
        assert_eq!(versioned.get_id(), Some("123"));
    }

    #[test]
    fn test_versioned_resource_version_matching() {
        let resource = Resource::from_json(
            "User".to_string(),
            json!({
                "id": "123",
                "userName": "test"
            }),
        )
        .unwrap();

        let versioned = VersionedResource::new(resource);
        let version_copy = versioned.version().clone();
        let different_version = ScimVersion::from_hash("different");

        assert!(versioned.version_matches(&version_copy));
        assert!(!versioned.version_matches(&different_version));
    }

    #[test]
    fn test_versioned_resource_with_version() {
        let resource = Resource::from_json("User".to_string(), json!({"id": "123"})).unwrap();
        let custom_version = ScimVersion::from_hash("custom-version-123");

        let versioned = VersionedResource::with_version(resource.clone(), custom_version.clone());

        assert_eq!(versioned.get_id(), resource.get_id());
        assert_eq!(versioned.version(), &custom_version);
    }

    #[test]
    fn test_versioned_resource_refresh_version() {
        let resource =
            Resource::from_json("User".to_string(), json!({"id": "123", "data": "test"})).unwrap();
        let custom_version = ScimVersion::from_hash("custom");

        let mut versioned = VersionedResource::with_version(resource, custom_version.clone());
        assert_eq!(versioned.version(), &custom_version);

        versioned.refresh_version();
        assert!(versioned.version() != &custom_version);
    }

    #[test]
    fn test_versioned_resource_serialization() {
        let resource = Resource::from_json(
            "User".to_string(),
            json!({
                "id": "123",
                "userName": "test.user"
            }),
        )
        .unwrap();

        let versioned = VersionedResource::new(resource);

        let json = serde_json::to_string(&versioned).unwrap();
        let deserialized: VersionedResource = serde_json::from_str(&json).unwrap();

        assert_eq!(versioned.get_id(), deserialized.get_id());
        assert!(versioned.version() == deserialized.version());
    }
}
