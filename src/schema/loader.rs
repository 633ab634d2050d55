//! Bootstrap loader for schema documents
//!
//! The external document is `{ "properties": { <name>: <node> } }` where nodes
//! may omit their `name`. Loading normalizes the document before it is typed:
//! - every entry of a `properties` mapping gets `name` = its key
//! - an `items` descriptor without a name is called `items`
//!
//! Normalization is idempotent and recurses through any depth of nesting.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::path::ITEMS_SEGMENT;
use super::types::RootSchema;
use crate::observability::{log_event_with_fields, Event};

/// Reads a bootstrap document from disk and turns it into a [`RootSchema`].
pub struct SchemaLoader {
    path: PathBuf,
}

impl SchemaLoader {
    /// Creates a loader for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads, normalizes and validates the document.
    pub fn load(&self) -> SchemaResult<RootSchema> {
        let source = self.path.display().to_string();
        let content = fs::read_to_string(&self.path).map_err(|e| {
            SchemaError::malformed_document(&source, format!("Failed to read file: {}", e))
        })?;

        let schema = parse_document(&content, &source)?;

        let count = schema.len().to_string();
        log_event_with_fields(
            Event::SchemaLoaded,
            &[("path", source.as_str()), ("properties", count.as_str())],
        );

        Ok(schema)
    }
}

/// Parses a document from a string.
pub fn parse_document(content: &str, source: &str) -> SchemaResult<RootSchema> {
    let document: Value = serde_json::from_str(content)
        .map_err(|e| SchemaError::malformed_document(source, format!("Invalid JSON: {}", e)))?;
    from_document(document, source)
}

/// Parses a document from a reader.
pub fn read_document<R: Read>(reader: R, source: &str) -> SchemaResult<RootSchema> {
    let document: Value = serde_json::from_reader(reader)
        .map_err(|e| SchemaError::malformed_document(source, format!("Invalid JSON: {}", e)))?;
    from_document(document, source)
}

/// Normalizes an already parsed document and converts it to the typed tree.
pub fn from_document(mut document: Value, source: &str) -> SchemaResult<RootSchema> {
    if !document.is_object() {
        return Err(SchemaError::malformed_document(
            source,
            "Document root must be an object",
        ));
    }

    normalize_document(&mut document);

    let schema: RootSchema = serde_json::from_value(document)
        .map_err(|e| SchemaError::malformed_document(source, format!("Invalid schema: {}", e)))?;

    schema
        .validate_structure()
        .map_err(|e| SchemaError::malformed_document(source, e))?;

    Ok(schema)
}

/// Injects the redundant `name` fields the external format may omit.
pub fn normalize_document(document: &mut Value) {
    if let Some(Value::Object(properties)) = document.get_mut("properties") {
        normalize_properties(properties);
    }
}

fn normalize_properties(properties: &mut Map<String, Value>) {
    for (key, node) in properties.iter_mut() {
        normalize_node(node, Some(key));
    }
}

fn normalize_node(node: &mut Value, key: Option<&str>) {
    let Some(obj) = node.as_object_mut() else {
        return;
    };

    match key {
        Some(key) => {
            obj.insert("name".into(), Value::String(key.to_string()));
        }
        None => {
            let named = obj
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| !name.is_empty());
            if !named {
                obj.insert("name".into(), Value::String(ITEMS_SEGMENT.to_string()));
            }
        }
    }

    normalize_children(obj);
}

fn normalize_children(obj: &mut Map<String, Value>) {
    match obj.get("type").and_then(Value::as_str) {
        Some("object") => {
            if let Some(Value::Object(children)) = obj.get_mut("properties") {
                normalize_properties(children);
            }
        }
        Some("array") => {
            if let Some(items) = obj.get_mut("items") {
                normalize_node(items, None);
            }
        }
        _ => {}
    }
}

/// Normalizes everything below a single property node, leaving the node's
/// own `name` as given.
pub fn normalize_property(node: &mut Value) {
    if let Some(obj) = node.as_object_mut() {
        normalize_children(obj);
    }
}

/// Serializes the schema as pretty JSON, optionally with keys sorted at
/// every level.
pub fn export_json(schema: &RootSchema, sorted: bool) -> SchemaResult<String> {
    let mut value = serde_json::to_value(schema).map_err(|e| {
        SchemaError::malformed_document("<in-memory>", format!("Failed to serialize schema: {}", e))
    })?;

    if sorted {
        value = sort_keys(value);
    }

    serde_json::to_string_pretty(&value).map_err(|e| {
        SchemaError::malformed_document("<in-memory>", format!("Failed to serialize schema: {}", e))
    })
}

/// Recursively orders object keys alphabetically.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(elements) => Value::Array(elements.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
