//! # Form Errors
//!
//! Error types for editing form data.

use thiserror::Error;

/// Result type for form operations
pub type FormResult<T> = Result<T, FormError>;

/// Form data errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Path names no form field
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// Data at the path is not an object
    #[error("Expected an object at '{0}'")]
    NotAnObject(String),

    /// Data at the path is not a list
    #[error("Expected a list at '{0}'")]
    NotAList(String),

    /// Array property has no items descriptor
    #[error("No item type defined for '{0}'")]
    NoItemType(String),

    /// List index past the end
    #[error("Index {index} out of range for '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}

impl FormError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            FormError::UnknownField(_) => "FORM_UNKNOWN_FIELD",
            FormError::NotAnObject(_) => "FORM_NOT_AN_OBJECT",
            FormError::NotAList(_) => "FORM_NOT_A_LIST",
            FormError::NoItemType(_) => "FORM_NO_ITEM_TYPE",
            FormError::IndexOutOfRange { .. } => "FORM_INDEX_OUT_OF_RANGE",
        }
    }
}
