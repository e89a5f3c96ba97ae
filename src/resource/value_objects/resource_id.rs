//! ResourceId value object for SCIM resource identifiers.
//!
//! This module provides a type-safe wrapper around resource IDs with built-in validation.
//! Resource IDs are fundamental identifiers in SCIM and must follow specific format rules.

use crate::error::{ValidationError, ValidationResult};
use crate::resource::value_objects::value_object_trait::{SchemaConstructible, ValueObject};
use crate::schema::types::{AttributeDefinition, AttributeType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// A validated SCIM resource identifier.
///
/// ResourceId represents a unique identifier for a SCIM resource. It enforces
/// validation rules at construction time, ensuring that only valid resource IDs
/// can exist in the system.
///
/// ## Validation Rules
///
/// - Must not be empty
/// - Must be a valid string
/// - Additional format rules may be added in the future
///
/// ## Examples
///
/// ```rust
/// use scim_gateway::resource::value_objects::ResourceId;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Valid resource ID
///     let id = ResourceId::new("2819c223-7f76-453a-919d-413861904646".to_string())?;
///     println!("Resource ID: {}", id.as_str());
///
///     // Invalid resource ID - returns ValidationError
///     let invalid = ResourceId::new("".to_string());
///     assert!(invalid.is_err());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create a new ResourceId with validation.
    ///
    /// This is the primary constructor that enforces all validation rules.
    /// Use this method when creating ResourceId instances from untrusted input.
    ///
    /// # Arguments
    ///
    /// * `value` - The string value to validate and wrap
    ///
    /// # Returns
    ///
    /// * `Ok(ResourceId)` - If the value is valid
    /// * `Err(ValidationError)` - If the value violates validation rules
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scim_gateway::resource::value_objects::ResourceId;
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let id = ResourceId::new("user-123".to_string())?;
    ///     let empty_id = ResourceId::new("".to_string()); // Error
    ///     assert!(empty_id.is_err());
    ///     Ok(())
    /// }
    /// ```
    pub fn new(value: String) -> ValidationResult<Self> {
        Self::validate_format(&value)?;
        Ok(Self(value))
    }

    /// Create a ResourceId without validation.
    ///
    /// This constructor bypasses validation and should only be used in contexts
    /// where the value is guaranteed to be valid (e.g., from trusted data sources
    /// like databases where validation has already occurred).
    ///
    /// # Safety
    ///
    /// The caller must ensure that the value meets all ResourceId validation requirements.
    /// Using this with invalid data may lead to inconsistent system state.
    ///
    /// # Arguments
    ///
    /// * `value` - The pre-validated string value
    ///
    /// # Examples
    ///
    /// This method is for internal crate usage only when loading pre-validated
    /// resource IDs from trusted sources like databases.
    ///
    /// ```text
    /// // Internal usage pattern:
    /// let id = ResourceId::new_unchecked("db-validated-id".to_string());
    /// ```
    #[allow(dead_code)]
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    /// Get the string representation of the ResourceId.
    ///
    /// Returns a reference to the underlying string value. This is safe
    /// because the value is guaranteed to be valid by construction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scim_gateway::resource::value_objects::ResourceId;
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let id = ResourceId::new("test-id".to_string())?;
    ///     assert_eq!(id.as_str(), "test-id");
    ///     Ok(())
    /// }
    /// ```
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the owned string value of the ResourceId.
    ///
    /// Consumes the ResourceId and returns the underlying string.
    /// Use this when you need to transfer ownership of the string value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scim_gateway::resource::value_objects::ResourceId;
    ///
    /// fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let id = ResourceId::new("test-id".to_string())?;
    ///     let owned_string = id.into_string();
    ///     assert_eq!(owned_string, "test-id");
    ///     Ok(())
    /// }
    /// ```
    pub fn into_string(self) -> String {
        self.0
    }

    /// Validate the format of a resource ID string.
    ///
    /// This function contains the core validation logic moved from SchemaRegistry.
    /// It enforces all the rules that define a valid resource ID.
    ///
    /// # Arguments
    ///
    /// * `value` - The string to validate
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the value is valid
    /// * `Err(ValidationError)` - If the value violates any rules
    fn validate_format(value: &str) -> ValidationResult<()> {
        // Check if id is empty
        if value.is_empty() {
            return Err(ValidationError::EmptyId);
        }

        // TODO: Add more sophisticated ID format validation if needed
        // For now, we accept any non-empty string as a valid ID
        // Future enhancements might include:
        // - UUID format validation
        // - Character set restrictions
        // - Length limits

        Ok(())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Convert from String to ResourceId with validation.
impl TryFrom<String> for ResourceId {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

/// Convert from &str to ResourceId with validation.
impl TryFrom<&str> for ResourceId {
    type Error = ValidationError;

    fn try_from(value: &str) -> ValidationResult<Self> {
        Self::new(value.to_string())
    }
}

impl ValueObject for ResourceId {
    fn attribute_type(&self) -> AttributeType {
        AttributeType::String
    }

    fn attribute_name(&self) -> &str {
        "id"
    }

    fn to_json(&self) -> ValidationResult<Value> {
        Ok(Value::String(self.0.clone()))
    }

    fn validate_against_schema(&self, definition: &AttributeDefinition) -> ValidationResult<()> {
        if definition.data_type != AttributeType::String {
            return Err(ValidationError::InvalidAttributeType {
                attribute: definition.name.clone(),
                expected: "string".to_string(),
                actual: format!("{:?}", definition.data_type),
            });
        }

        if definition.name != "id" {
            return Err(ValidationError::InvalidAttributeName {
                actual: definition.name.clone(),
                expected: "id".to_string(),
            });
        }

        Ok(())
    }

    fn as_json_value(&self) -> Value {
        Value::String(self.0.clone())
    }

    fn supports_definition(&self, definition: &AttributeDefinition) -> bool {
        definition.data_type == AttributeType::String && definition.name == "id"
    }

    fn clone_boxed(&self) -> Box<dyn ValueObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl SchemaConstructible for ResourceId {
    fn from_schema_and_value(
        definition: &AttributeDefinition,
        value: &Value,
    ) -> ValidationResult<Self> {
        if definition.name != "id" || definition.data_type != AttributeType::String {
            return Err(ValidationError::UnsupportedAttributeType {
                attribute: definition.name.clone(),
                type_name: format!("{:?}", definition.data_type),
            });
        }

        if let Some(id_str) = value.as_str() {
            Self::new(id_str.to_string())
        } else {
            Err(ValidationError::InvalidAttributeType {
                attribute: definition.name.clone(),
                expected: "string".to_string(),
                actual: "non-string".to_string(),
            })
        }
    }

    fn can_construct_from(definition: &AttributeDefinition) -> bool {
        definition.name == "id" && definition.data_type == AttributeType::String
    }

    fn constructor_priority() -> u8 {
        100 // High priority for exact name match
    }
}
