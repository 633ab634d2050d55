//! Schema tree model
//!
//! Defines the recursive property shape, typed paths, the bootstrap loader
//! and form-data validation.
//!
//! # Structural invariants
//!
//! - Every key of a `properties` mapping equals the `name` of its value
//! - Names are non-empty and unique among siblings
//! - An array has at most one items descriptor, addressed by `"items"`

mod errors;
mod loader;
mod path;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use loader::{
    export_json, from_document, normalize_document, normalize_property, parse_document,
    read_document, sort_keys, SchemaLoader,
};
pub use path::{PathStep, SchemaPath, ITEMS_SEGMENT};
pub use types::{PropertyKind, PropertyMap, PropertyUpdate, RootSchema, SchemaProperty, SchemaType};
pub use validator::SchemaValidator;
