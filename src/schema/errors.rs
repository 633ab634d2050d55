//! Schema error types
//!
//! Error codes:
//! - SCHEMA_INVALID_OPERATION (REJECT)
//! - SCHEMA_PATH_NOT_FOUND (REJECT)
//! - SCHEMA_INVALID_PROPERTY (REJECT)
//! - SCHEMA_DUPLICATE_NAME (REJECT)
//! - SCHEMA_VALIDATION_FAILED (REJECT)
//! - SCHEMA_MALFORMED_DOCUMENT (FATAL)

use std::fmt;

use super::path::SchemaPath;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, store unchanged
    Reject,
    /// The session cannot start (bootstrap input unusable)
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Operation not permitted on this target (e.g. editing the root)
    InvalidOperation,
    /// A path step does not resolve to an existing child
    NotFound,
    /// A property payload breaks a structural invariant
    InvalidProperty,
    /// A rename collides with an existing sibling
    DuplicateName,
    /// Form data violates the schema
    ValidationFailed,
    /// Bootstrap document could not be read or parsed
    MalformedDocument,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidOperation => "SCHEMA_INVALID_OPERATION",
            SchemaErrorCode::NotFound => "SCHEMA_PATH_NOT_FOUND",
            SchemaErrorCode::InvalidProperty => "SCHEMA_INVALID_PROPERTY",
            SchemaErrorCode::DuplicateName => "SCHEMA_DUPLICATE_NAME",
            SchemaErrorCode::ValidationFailed => "SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::MalformedDocument => "SCHEMA_MALFORMED_DOCUMENT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::MalformedDocument => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Form-data validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "address.city" or "tags[2]")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn not_in_enum(field: impl Into<String>, allowed: &[String], actual: impl Into<String>) -> Self {
        Self::new(field, format!("one of [{}]", allowed.join(", ")), actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    path: Option<SchemaPath>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Editing the root mapping itself
    pub fn cannot_edit_root() -> Self {
        Self {
            code: SchemaErrorCode::InvalidOperation,
            message: "Cannot edit root".into(),
            path: Some(SchemaPath::root()),
            details: None,
        }
    }

    /// A step of `path` could not be resolved
    pub fn not_found(path: &SchemaPath, segment: &str) -> Self {
        Self {
            code: SchemaErrorCode::NotFound,
            message: format!("Property '{}' not found in path '{}'", segment, path),
            path: Some(path.clone()),
            details: None,
        }
    }

    /// A property payload is structurally invalid
    pub fn invalid_property(path: &SchemaPath, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::InvalidProperty,
            message: format!("Invalid property at '{}': {}", path, reason.into()),
            path: Some(path.clone()),
            details: None,
        }
    }

    /// Renaming onto an existing sibling
    pub fn duplicate_name(path: &SchemaPath, name: &str) -> Self {
        Self {
            code: SchemaErrorCode::DuplicateName,
            message: format!("Cannot rename '{}': sibling '{}' already exists", path, name),
            path: Some(path.clone()),
            details: None,
        }
    }

    /// Form data does not conform
    pub fn validation_failed(details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: format!("Form data validation failed: {}", details),
            path: None,
            details: Some(details),
        }
    }

    /// Bootstrap document could not be used
    pub fn malformed_document(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedDocument,
            message: format!("Malformed schema document '{}': {}", source.into(), reason.into()),
            path: None,
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the path the error refers to, if any
    pub fn path(&self) -> Option<&SchemaPath> {
        self.path.as_ref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
