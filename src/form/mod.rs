//! Form layer
//!
//! Turns a schema tree into a headless form description and manages the
//! data such a form edits:
//! - `build_form`: one field per property, with the control to render
//! - `initial_data` / `default_item`: values fields and list elements start with
//! - `append_item` / `remove_item`: "Add item" and "Remove" on list fields
//!
//! Submitted data is checked with [`crate::schema::SchemaValidator`].

mod data;
mod errors;
mod fields;

pub use data::{append_item, default_item, initial_data, remove_item};
pub use errors::{FormError, FormResult};
pub use fields::{build_field, build_form, FieldControl, FormField, ELEMENT_SEGMENT};
