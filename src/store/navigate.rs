//! Path resolution over the schema tree
//!
//! Two walking policies:
//! - tolerant (`vivify`): missing children are created as empty objects
//! - strict (`resolve_mut`): a missing child is a `NotFound` error
//!
//! At an object (or the root mapping) every step is a named lookup, so an
//! `Items` step there addresses the child called `items`. At an array only
//! the `Items` step resolves.

use crate::schema::{
    PathStep, PropertyKind, PropertyMap, SchemaError, SchemaPath, SchemaProperty, SchemaResult,
    ITEMS_SEGMENT,
};

/// Node created in place of a missing path segment
fn autovivified(name: &str) -> SchemaProperty {
    SchemaProperty::object(name)
}

/// Walks `steps` from the root mapping, creating missing children.
///
/// Returns `None` when a step lands on an existing node that cannot hold
/// children (a scalar, or a named step on an array). Such a node always
/// exists already, and every node created here is an object, so a blocked
/// walk never leaves freshly created nodes behind.
pub(crate) fn vivify<'a>(
    properties: &'a mut PropertyMap,
    steps: &[PathStep],
) -> Option<&'a mut SchemaProperty> {
    let (first, rest) = steps.split_first()?;
    let key = first.as_key();
    let node = properties
        .entry(key.to_string())
        .or_insert_with(|| autovivified(key));
    vivify_from(node, rest)
}

fn vivify_from<'a>(node: &'a mut SchemaProperty, steps: &[PathStep]) -> Option<&'a mut SchemaProperty> {
    let Some((step, rest)) = steps.split_first() else {
        return Some(node);
    };

    let child = match (&mut node.kind, step) {
        (PropertyKind::Object { properties }, step) => {
            let key = step.as_key();
            properties
                .entry(key.to_string())
                .or_insert_with(|| autovivified(key))
        }
        (PropertyKind::Array { items }, step) if step.is_items() => items
            .get_or_insert_with(|| Box::new(autovivified(ITEMS_SEGMENT)))
            .as_mut(),
        _ => return None,
    };

    vivify_from(child, rest)
}

/// Walks `steps` from the root mapping; every step must already exist.
///
/// `path` is only used for error reporting.
pub(crate) fn resolve_mut<'a>(
    properties: &'a mut PropertyMap,
    steps: &[PathStep],
    path: &SchemaPath,
) -> SchemaResult<&'a mut SchemaProperty> {
    let Some((first, rest)) = steps.split_first() else {
        return Err(SchemaError::cannot_edit_root());
    };

    let node = properties
        .get_mut(first.as_key())
        .ok_or_else(|| SchemaError::not_found(path, first.as_key()))?;
    resolve_from(node, rest, path)
}

fn resolve_from<'a>(
    node: &'a mut SchemaProperty,
    steps: &[PathStep],
    path: &SchemaPath,
) -> SchemaResult<&'a mut SchemaProperty> {
    let Some((step, rest)) = steps.split_first() else {
        return Ok(node);
    };

    let child = match (&mut node.kind, step) {
        (PropertyKind::Object { properties }, step) => properties.get_mut(step.as_key()),
        (PropertyKind::Array { items }, step) if step.is_items() => items.as_deref_mut(),
        _ => None,
    }
    .ok_or_else(|| SchemaError::not_found(path, step.as_key()))?;

    resolve_from(child, rest, path)
}

/// Read-only strict walk.
pub(crate) fn resolve<'a>(properties: &'a PropertyMap, steps: &[PathStep]) -> Option<&'a SchemaProperty> {
    let (first, rest) = steps.split_first()?;
    let mut node = properties.get(first.as_key())?;

    for step in rest {
        node = match (&node.kind, step) {
            (PropertyKind::Object { properties }, step) => properties.get(step.as_key())?,
            (PropertyKind::Array { items }, step) if step.is_items() => items.as_deref()?,
            _ => return None,
        };
    }

    Some(node)
}
