//! Meta value object for SCIM resource metadata.
//!
//! This module provides a type-safe wrapper around SCIM meta attributes with built-in validation.
//! Meta attributes contain common metadata for all SCIM resources including timestamps, location,
//! and version information.

use crate::error::{ValidationError, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated SCIM meta attribute.
///
/// Meta represents the common metadata for SCIM resources as defined in RFC 7643.
/// It enforces validation rules at construction time, ensuring that only valid meta
/// attributes can exist in the system.
///
/// ## Validation Rules
///
/// - Resource type must not be empty
/// - Created timestamp must be valid ISO 8601 format
/// - Last modified timestamp must be valid ISO 8601 format
/// - Last modified must not be before created timestamp
/// - Location URI, if provided, must be valid format
/// - Version, if provided, must follow ETag format
///
/// ## Examples
///
/// ```rust
/// use scim_gateway::resource::value_objects::Meta;
/// use chrono::Utc;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let now = Utc::now();
///     let meta = Meta::new(
///         "User".to_string(),
///         now,
///         now,
///         Some("https://example.com/Users/123".to_string()),
///         Some("W/\"123-456\"".to_string())
///     )?;
///     println!("Resource type: {}", meta.resource_type());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    pub created: DateTime<Utc>,
    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,
    pub location: Option<String>,
    pub version: Option<String>,
}

impl Meta {
    /// Create a new Meta with full attributes.
    ///
    /// This is the primary constructor that enforces all validation rules.
    /// Use this method when creating Meta instances from untrusted input.
    ///
    /// # Arguments
    ///
    /// * `resource_type` - The SCIM resource type (e.g., "User", "Group")
    /// * `created` - The resource creation timestamp
    /// * `last_modified` - The resource last modification timestamp
    /// * `location` - Optional location URI for the resource
    /// * `version` - Optional version identifier (ETag format)
    ///
    /// # Returns
    ///
    /// * `Ok(Meta)` - If all values are valid
    /// * `Err(ValidationError)` - If any value violates validation rules
    pub fn new(
        resource_type: String,
        created: DateTime<Utc>,
        last_modified: DateTime<Utc>,
        location: Option<String>,
        version: Option<String>,
    ) -> ValidationResult<Self> {
        Self::validate_resource_type(&resource_type)?;
        Self::validate_timestamps(created, last_modified)?;
        if let Some(ref location_val) = location {
            Self::validate_location(location_val)?;
        }
        if let Some(ref version_val) = version {
            Self::validate_version(version_val)?;
        }

        Ok(Self {
            resource_type,
            created,
            last_modified,
            location,
            version,
        })
    }

    /// Create a simple Meta with just resource type and timestamps.
    ///
    /// Convenience constructor for creating meta attributes without optional fields.
    ///
    /// # Arguments
    ///
    /// * `resource_type` - The SCIM resource type
    /// * `created` - The resource creation timestamp
    /// * `last_modified` - The resource last modification timestamp
    ///
    /// # Returns
    ///
    /// * `Ok(Meta)` - If the values are valid
    /// * `Err(ValidationError)` - If any value violates validation rules
    pub fn new_simple(
        resource_type: String,
        created: DateTime<Utc>,
        last_modified: DateTime<Utc>,
    ) -> ValidationResult<Self> {
        Self::new(resource_type, created, last_modified, None, None)
    }

    /// Create a Meta for a new resource with current timestamp.
    ///
    /// Convenience constructor for creating meta attributes for new resources.
    /// Sets both created and last_modified to the current time.
    ///
    /// # Arguments
    ///
    /// * `resource_type` - The SCIM resource type
    ///
    /// # Returns
    ///
    /// * `Ok(Meta)` - If the resource type is valid
    /// * `Err(ValidationError)` - If the resource type violates validation rules
    pub fn new_for_creation(resource_type: String) -> ValidationResult<Self> {
        let now = Utc::now();
        Self::new_simple(resource_type, now, now)
    }

    /// Get the resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Get the created timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Get the last modified timestamp.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Get the location URI.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Get the version identifier.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Create a new Meta with updated last modified timestamp.
    ///
    /// This method creates a new Meta instance with the last_modified timestamp
    /// updated to the current time, preserving all other attributes.
    pub fn with_updated_timestamp(&self) -> Self {
        Self {
            resource_type: self.resource_type.clone(),
            created: self.created,
            last_modified: Utc::now(),
            location: self.location.clone(),
            version: self.version.clone(),
        }
    }

    /// Create a new Meta with a specific location.
    ///
    /// This method creates a new Meta instance with the location set to the
    /// provided value, preserving all other attributes.
    pub fn with_location(mut self, location: String) -> ValidationResult<Self> {
        Self::validate_location(&location)?;
        self.location = Some(location);
        Ok(self)
    }

    /// Create a new Meta with a specific version.
    ///
    /// This method creates a new Meta instance with the version set to the
    /// provided value, preserving all other attributes.
    pub fn with_version(mut self, version: String) -> ValidationResult<Self> {
        Self::validate_version(&version)?;
        self.version = Some(version);
        Ok(self)
    }

    /// Generate a location URI for the resource.
    ///
    /// Creates a standard SCIM location URI based on the base URL, resource type,
    /// and resource ID.
    pub fn generate_location(base_url: &str, resource_type: &str, resource_id: &str) -> String {
        format!(
            "{}/{}s/{}",
            base_url.trim_end_matches('/'),
            resource_type,
            resource_id
        )
    }



    /// Validate the resource type value.
    fn validate_resource_type(resource_type: &str) -> ValidationResult<()> {
        if resource_type.is_empty() {
            return Err(ValidationError::MissingResourceType);
        }

        // Resource type should be a valid identifier
        if !resource_type
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(ValidationError::InvalidResourceType {
                resource_type: resource_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate the timestamp values.
    fn validate_timestamps(
        created: DateTime<Utc>,
        last_modified: DateTime<Utc>,
    ) -> ValidationResult<()> {
        if last_modified < created {
            return Err(ValidationError::Custom {
                message: "Last modified timestamp cannot be before created timestamp".to_string(),
            });
        }

        Ok(())
    }

    /// Validate the location URI value.
    fn validate_location(location: &str) -> ValidationResult<()> {
        if location.is_empty() {
            return Err(ValidationError::InvalidLocationUri);
        }

        // Basic URI validation - should start with http:// or https://
        if !location.starts_with("http://") && !location.starts_with("https://") {
            return Err(ValidationError::InvalidLocationUri);
        }

        Ok(())
    }

    /// Validate the version identifier value.
    fn validate_version(version: &str) -> ValidationResult<()> {
        if version.is_empty() {
            return Err(ValidationError::InvalidVersionFormat);
        }

        // Version should follow ETag format: W/"..." or "..."
        if !version.starts_with("W/\"") && !version.starts_with('"') {
            return Err(ValidationError::InvalidVersionFormat);
        }

        if !version.ends_with('"') {
            return Err(ValidationError::InvalidVersionFormat);
        }

        Ok(())
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Meta(resourceType={}, created={}, lastModified={})",
            self.resource_type,
            self.created.to_rfc3339(),
            self.last_modified.to_rfc3339()
        )
    }
}
