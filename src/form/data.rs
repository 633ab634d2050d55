//! Form data: initial values and list editing
//!
//! Data paths are dotted; inside a list a segment is an element index, e.g.
//! `rows.0.tags`.

use serde_json::{Map, Value};

use super::errors::{FormError, FormResult};
use crate::schema::{PropertyKind, PropertyMap, RootSchema, SchemaProperty, SchemaType};

/// Value a fresh field (or a freshly added list element) starts with
pub fn default_item(property: &SchemaProperty) -> Value {
    match property.schema_type() {
        SchemaType::String => Value::String(String::new()),
        SchemaType::Integer => Value::from(0),
        SchemaType::Boolean => Value::Bool(false),
        SchemaType::Object => Value::Object(Map::new()),
        SchemaType::Array => Value::Array(Vec::new()),
    }
}

/// Form data before the user has typed anything
pub fn initial_data(schema: &RootSchema) -> Value {
    Value::Object(
        schema
            .properties
            .iter()
            .map(|(name, property)| (name.clone(), default_item(property)))
            .collect(),
    )
}

/// Appends a default element to the list at `path`. Returns the new length.
///
/// Fields missing along the path are filled in with their defaults.
pub fn append_item(schema: &RootSchema, data: &mut Value, path: &str) -> FormResult<usize> {
    let (property, value) = locate(schema, data, path)?;
    let item = property
        .items()
        .ok_or_else(|| FormError::NoItemType(path.to_string()))?;
    let list = value
        .as_array_mut()
        .ok_or_else(|| FormError::NotAList(path.to_string()))?;

    list.push(default_item(item));
    Ok(list.len())
}

/// Removes the element at `index` from the list at `path` and returns it
pub fn remove_item(
    schema: &RootSchema,
    data: &mut Value,
    path: &str,
    index: usize,
) -> FormResult<Value> {
    let (property, value) = locate(schema, data, path)?;
    if property.schema_type() != SchemaType::Array {
        return Err(FormError::NotAList(path.to_string()));
    }
    let list = value
        .as_array_mut()
        .ok_or_else(|| FormError::NotAList(path.to_string()))?;

    if index >= list.len() {
        return Err(FormError::IndexOutOfRange {
            path: path.to_string(),
            index,
            len: list.len(),
        });
    }
    Ok(list.remove(index))
}

fn locate<'s, 'd>(
    schema: &'s RootSchema,
    data: &'d mut Value,
    path: &str,
) -> FormResult<(&'s SchemaProperty, &'d mut Value)> {
    let mut segments = path.split('.');
    let first = segments
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| FormError::UnknownField(path.to_string()))?;

    let (mut property, mut value) = field_in(&schema.properties, data, first, path)?;
    for segment in segments {
        (property, value) = match &property.kind {
            PropertyKind::Object { properties } => field_in(properties, value, segment, path)?,
            PropertyKind::Array { .. } => element_in(property, value, segment, path)?,
            _ => return Err(FormError::UnknownField(path.to_string())),
        };
    }

    Ok((property, value))
}

fn field_in<'s, 'd>(
    properties: &'s PropertyMap,
    value: &'d mut Value,
    segment: &str,
    path: &str,
) -> FormResult<(&'s SchemaProperty, &'d mut Value)> {
    let property = properties
        .get(segment)
        .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
    let Value::Object(map) = value else {
        return Err(FormError::NotAnObject(path.to_string()));
    };

    let slot = map
        .entry(segment)
        .or_insert_with(|| default_item(property));
    Ok((property, slot))
}

fn element_in<'s, 'd>(
    property: &'s SchemaProperty,
    value: &'d mut Value,
    segment: &str,
    path: &str,
) -> FormResult<(&'s SchemaProperty, &'d mut Value)> {
    let item = property
        .items()
        .ok_or_else(|| FormError::NoItemType(path.to_string()))?;
    let index: usize = segment
        .parse()
        .map_err(|_| FormError::UnknownField(path.to_string()))?;
    let Value::Array(list) = value else {
        return Err(FormError::NotAList(path.to_string()));
    };

    let len = list.len();
    let slot = list.get_mut(index).ok_or_else(|| FormError::IndexOutOfRange {
        path: path.to_string(),
        index,
        len,
    })?;
    Ok((item, slot))
}
