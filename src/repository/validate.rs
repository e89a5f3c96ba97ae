//! SCIM invariants enforced at the repository write boundary.
//!
//! These checks are deliberately independent of [`crate::schema::validation`]:
//! the embedded User/Group schemas don't yet cover every attribute a real
//! tenant sends (`ims`, `photos`, `x509Certificates`, the enterprise
//! extension, ...), so routing every write through `validate_scim_resource`
//! would reject legitimate input on an "unknown attribute". The registry is
//! still consulted, but only for the canonical schema URN.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{ScimError, ValidationError};
use crate::schema::SchemaRegistry;

const MAX_FIELD_LEN: usize = 256;

const ADDRESS_TYPES: &[&str] = &["work", "home", "other"];
const MEMBER_TYPES: &[&str] = &["User", "Group"];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[\d\s().-]{7,20}$").unwrap());

/// Bounded-length string fields checked against [`MAX_FIELD_LEN`].
const CAPPED_STRING_PATHS: &[&[&str]] = &[
    &["userName"],
    &["displayName"],
    &["externalId"],
    &["nickName"],
    &["title"],
    &["profileUrl"],
    &["preferredLanguage"],
    &["locale"],
    &["timezone"],
    &["name", "formatted"],
    &["name", "givenName"],
    &["name", "familyName"],
    &["name", "middleName"],
    &["name", "honorificPrefix"],
    &["name", "honorificSuffix"],
];

fn resolve_path<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = data;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

fn check_length_caps(data: &Value) -> Result<(), ScimError> {
    for path in CAPPED_STRING_PATHS {
        if let Some(Value::String(s)) = resolve_path(data, path) {
            if s.chars().count() > MAX_FIELD_LEN {
                return Err(ScimError::Validation(ValidationError::custom(format!(
                    "attribute '{}' exceeds the maximum length of {MAX_FIELD_LEN} characters",
                    path.join(".")
                ))));
            }
        }
    }
    Ok(())
}

fn check_schemas_urn(data: &Value, canonical: &str) -> Result<(), ScimError> {
    let Some(schemas) = data.get("schemas") else {
        return Ok(());
    };
    let Some(list) = schemas.as_array() else {
        return Err(ScimError::Validation(ValidationError::custom(
            "'schemas' must be an array",
        )));
    };
    let contains = list
        .iter()
        .any(|uri| uri.as_str() == Some(canonical));
    if !contains {
        return Err(ScimError::Validation(ValidationError::InvalidSchemaUri {
            uri: canonical.to_string(),
        }));
    }
    Ok(())
}

fn check_multi_valued_array(data: &Value, attribute: &str) -> Result<(), ScimError> {
    let Some(items) = data.get(attribute).and_then(Value::as_array) else {
        return Ok(());
    };

    let primary_count = items
        .iter()
        .filter(|item| item.get("primary").and_then(Value::as_bool) == Some(true))
        .count();
    if primary_count > 1 {
        return Err(ScimError::Validation(ValidationError::custom(format!(
            "at most one '{attribute}' entry may be marked primary"
        ))));
    }

    for item in items {
        if let Some(value) = item.get("value").and_then(Value::as_str) {
            match attribute {
                "emails" if !EMAIL_RE.is_match(value) => {
                    return Err(ScimError::Validation(ValidationError::custom(format!(
                        "invalid email address '{value}'"
                    ))));
                }
                "phoneNumbers" if !PHONE_RE.is_match(value) => {
                    return Err(ScimError::Validation(ValidationError::custom(format!(
                        "invalid phone number '{value}'"
                    ))));
                }
                _ => {}
            }
        }
        if let Some(kind) = item.get("type").and_then(Value::as_str) {
            match attribute {
                "addresses" if !ADDRESS_TYPES.contains(&kind) => {
                    return Err(ScimError::Validation(ValidationError::InvalidCanonicalValue {
                        attribute: "addresses.type".to_string(),
                        value: kind.to_string(),
                        allowed: ADDRESS_TYPES.iter().map(|s| s.to_string()).collect(),
                    }));
                }
                "members" if !MEMBER_TYPES.contains(&kind) => {
                    return Err(ScimError::Validation(ValidationError::InvalidCanonicalValue {
                        attribute: "members.type".to_string(),
                        value: kind.to_string(),
                        allowed: MEMBER_TYPES.iter().map(|s| s.to_string()).collect(),
                    }));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Validate a User resource's input shape before it reaches the store.
pub fn validate_user(data: &Value, registry: &SchemaRegistry) -> Result<(), ScimError> {
    let user_name = data
        .get("userName")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    if user_name.is_none() {
        return Err(ScimError::Validation(
            ValidationError::missing_required("userName"),
        ));
    }

    check_length_caps(data)?;
    check_schemas_urn(data, &registry.get_user_schema().id)?;
    for attribute in ["emails", "phoneNumbers", "addresses", "ims", "photos"] {
        check_multi_valued_array(data, attribute)?;
    }
    Ok(())
}

/// Validate a Group resource's input shape before it reaches the store.
pub fn validate_group(data: &Value, registry: &SchemaRegistry) -> Result<(), ScimError> {
    let display_name = data
        .get("displayName")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    if display_name.is_none() {
        return Err(ScimError::Validation(
            ValidationError::missing_required("displayName"),
        ));
    }

    check_length_caps(data)?;
    check_schemas_urn(data, &registry.get_group_schema().id)?;
    check_multi_valued_array(data, "members")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::with_embedded_schemas().unwrap()
    }

    #[test]
    fn rejects_missing_username() {
        let err = validate_user(&json!({}), &registry()).unwrap_err();
        assert!(matches!(
            err,
            ScimError::Validation(ValidationError::MissingRequiredAttribute { .. })
        ));
    }

    #[test]
    fn rejects_overlong_display_name() {
        let data = json!({"displayName": "x".repeat(300)});
        let err = validate_group(&data, &registry()).unwrap_err();
        assert!(matches!(err, ScimError::Validation(_)));
    }

    #[test]
    fn rejects_bad_email() {
        let data = json!({
            "userName": "bob",
            "emails": [{"value": "not-an-email"}]
        });
        assert!(validate_user(&data, &registry()).is_err());
    }

    #[test]
    fn rejects_multiple_primary_emails() {
        let data = json!({
            "userName": "bob",
            "emails": [
                {"value": "a@example.com", "primary": true},
                {"value": "b@example.com", "primary": true}
            ]
        });
        assert!(validate_user(&data, &registry()).is_err());
    }

    #[test]
    fn rejects_bad_member_type() {
        let data = json!({
            "displayName": "Engineering",
            "members": [{"value": "u1", "type": "Robot"}]
        });
        assert!(validate_group(&data, &registry()).is_err());
    }

    #[test]
    fn accepts_well_formed_user() {
        let data = json!({
            "userName": "bob",
            "emails": [{"value": "bob@example.com", "type": "work", "primary": true}],
            "phoneNumbers": [{"value": "+1 555 123 4567"}]
        });
        assert!(validate_user(&data, &registry()).is_ok());
    }
}
