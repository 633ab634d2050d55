//! Form-data validation against a schema tree
//!
//! Validation semantics:
//! - The submitted document is an object
//! - No undeclared fields exist
//! - Declared fields may be missing (every form field is optional)
//! - Field types exactly match property types; no coercion
//! - Null values are rejected
//! - Enum-restricted strings must be one of the allowed values
//! - Array elements are checked against the items descriptor, if any

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{PropertyKind, PropertyMap, RootSchema, SchemaProperty};

/// Validates submitted form data. Never mutates the data.
pub struct SchemaValidator<'a> {
    schema: &'a RootSchema,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator for the given schema.
    pub fn new(schema: &'a RootSchema) -> Self {
        Self { schema }
    }

    /// Validates a whole form-data document.
    ///
    /// # Errors
    ///
    /// Returns `SCHEMA_VALIDATION_FAILED` with the first offending field.
    pub fn validate(&self, data: &Value) -> SchemaResult<()> {
        let obj = data
            .as_object()
            .ok_or_else(|| type_error("$root", "object", data))?;

        validate_object(obj, &self.schema.properties, "")
    }
}

fn validate_object(obj: &Map<String, Value>, properties: &PropertyMap, prefix: &str) -> SchemaResult<()> {
    for (key, value) in obj {
        let field_path = make_path(prefix, key);

        let Some(property) = properties.get(key) else {
            return Err(SchemaError::validation_failed(
                ValidationDetails::extra_field(field_path),
            ));
        };

        validate_value(value, property, &field_path)?;
    }

    Ok(())
}

fn validate_value(value: &Value, property: &SchemaProperty, field_path: &str) -> SchemaResult<()> {
    if value.is_null() {
        return Err(SchemaError::validation_failed(
            ValidationDetails::null_value(field_path),
        ));
    }

    match &property.kind {
        PropertyKind::String { enum_values } => {
            let Some(text) = value.as_str() else {
                return Err(type_error(field_path, "string", value));
            };
            if let Some(allowed) = enum_values {
                if !allowed.is_empty() && !allowed.iter().any(|v| v == text) {
                    return Err(SchemaError::validation_failed(
                        ValidationDetails::not_in_enum(field_path, allowed, text),
                    ));
                }
            }
        }
        PropertyKind::Integer => {
            if !value.is_i64() && !value.is_u64() {
                return Err(type_error(field_path, "integer", value));
            }
        }
        PropertyKind::Boolean => {
            if !value.is_boolean() {
                return Err(type_error(field_path, "boolean", value));
            }
        }
        PropertyKind::Object { properties } => {
            let obj = value
                .as_object()
                .ok_or_else(|| type_error(field_path, "object", value))?;
            validate_object(obj, properties, field_path)?;
        }
        PropertyKind::Array { items } => {
            let elements = value
                .as_array()
                .ok_or_else(|| type_error(field_path, "array", value))?;

            for (i, element) in elements.iter().enumerate() {
                let element_path = format!("{}[{}]", field_path, i);
                match items {
                    Some(item) => validate_value(element, item, &element_path)?,
                    None if element.is_null() => {
                        return Err(SchemaError::validation_failed(
                            ValidationDetails::null_value(element_path),
                        ));
                    }
                    None => {}
                }
            }
        }
    }

    Ok(())
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn type_error(field_path: &str, expected: &str, actual: &Value) -> SchemaError {
    SchemaError::validation_failed(ValidationDetails::type_mismatch(
        field_path,
        expected,
        json_type_name(actual),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> RootSchema {
        RootSchema::new()
            .with_property(SchemaProperty::string("name"))
            .with_property(SchemaProperty::integer("age"))
            .with_property(SchemaProperty::boolean("active"))
            .with_property(SchemaProperty::string("color").with_enum(["red", "green"]))
            .with_property(
                SchemaProperty::object("address").with_property(SchemaProperty::string("city")),
            )
            .with_property(
                SchemaProperty::array("scores").with_items(SchemaProperty::integer("score")),
            )
            .with_property(SchemaProperty::array("anything"))
    }

    #[test]
    fn test_valid_document_passes() {
        let schema = sample_schema();
        let validator = SchemaValidator::new(&schema);

        let data = json!({
            "name": "Alice",
            "age": 30,
            "active": true,
            "color": "red",
            "address": {"city": "Prague"},
            "scores": [1, 2, 3],
            "anything": ["x", 1, {"y": true}]
        });

        assert!(validator.validate(&data).is_ok());
    }

    #[test]
    fn test_missing_fields_allowed() {
        let schema = sample_schema();
        assert!(SchemaValidator::new(&schema).validate(&json!({})).is_ok());
    }

    #[test]
    fn test_non_object_document_fails() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema).validate(&json!([1])).unwrap_err();
        assert_eq!(err.details().unwrap().field, "$root");
    }

    #[test]
    fn test_extra_field_fails() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema)
            .validate(&json!({"address": {"street": "Main"}}))
            .unwrap_err();
        assert_eq!(err.code().code(), "SCHEMA_VALIDATION_FAILED");
        assert_eq!(err.details().unwrap().field, "address.street");
    }

    #[test]
    fn test_type_mismatch_fails() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema)
            .validate(&json!({"name": 123}))
            .unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details.field, "name");
        assert_eq!(details.expected, "string");
        assert_eq!(details.actual, "integer");
    }

    #[test]
    fn test_float_is_not_integer() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema)
            .validate(&json!({"age": 30.5}))
            .unwrap_err();
        assert_eq!(err.details().unwrap().actual, "number");
    }

    #[test]
    fn test_null_fails() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema)
            .validate(&json!({"active": null}))
            .unwrap_err();
        assert_eq!(err.details().unwrap().actual, "null");
    }

    #[test]
    fn test_enum_violation_fails() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema)
            .validate(&json!({"color": "blue"}))
            .unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details.expected, "one of [red, green]");
        assert_eq!(details.actual, "blue");
    }

    #[test]
    fn test_array_element_checked() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema)
            .validate(&json!({"scores": [1, "two"]}))
            .unwrap_err();
        assert_eq!(err.details().unwrap().field, "scores[1]");
    }

    #[test]
    fn test_untyped_array_rejects_null_element() {
        let schema = sample_schema();
        let err = SchemaValidator::new(&schema)
            .validate(&json!({"anything": [null]}))
            .unwrap_err();
        assert_eq!(err.details().unwrap().field, "anything[0]");
    }
}
