//! Schema tree type definitions
//!
//! Supported property types:
//! - string: free text, optionally restricted to an enum of values
//! - integer: whole number
//! - boolean: true/false
//! - object: ordered mapping of named child properties
//! - array: homogeneous list described by a single items descriptor
//!
//! The JSON shape is `{name, type, description?, enum?, properties?, items?}`.
//! Type-dependent fields live in [`PropertyKind`] so that, for example, an
//! array carrying a `properties` map cannot be represented.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping from property name to property. Keys always equal the
/// `name` of their value.
pub type PropertyMap = IndexMap<String, SchemaProperty>;

/// Property type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Boolean,
    Object,
    Array,
}

impl SchemaType {
    /// Returns the type name as it appears in JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-dependent part of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyKind {
    /// Free text, optionally limited to an ordered list of allowed values
    String {
        #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
        enum_values: Option<Vec<String>>,
    },
    /// Whole number
    Integer,
    /// True/false
    Boolean,
    /// Nested object with its own named properties
    Object {
        #[serde(default)]
        properties: PropertyMap,
    },
    /// Array with zero or one element descriptor (boxed for recursion)
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Box<SchemaProperty>>,
    },
}

impl PropertyKind {
    /// Returns the type tag of this kind
    pub fn schema_type(&self) -> SchemaType {
        match self {
            PropertyKind::String { .. } => SchemaType::String,
            PropertyKind::Integer => SchemaType::Integer,
            PropertyKind::Boolean => SchemaType::Boolean,
            PropertyKind::Object { .. } => SchemaType::Object,
            PropertyKind::Array { .. } => SchemaType::Array,
        }
    }

    /// Creates an empty kind for the given type tag
    pub fn empty(schema_type: SchemaType) -> Self {
        match schema_type {
            SchemaType::String => PropertyKind::String { enum_values: None },
            SchemaType::Integer => PropertyKind::Integer,
            SchemaType::Boolean => PropertyKind::Boolean,
            SchemaType::Object => PropertyKind::Object {
                properties: PropertyMap::new(),
            },
            SchemaType::Array => PropertyKind::Array { items: None },
        }
    }
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Identifier, unique among siblings
    pub name: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type tag plus type-dependent fields
    #[serde(flatten)]
    pub kind: PropertyKind,
}

impl SchemaProperty {
    /// Create a property of the given kind
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
        }
    }

    /// Create a string property
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::String { enum_values: None })
    }

    /// Create an integer property
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Integer)
    }

    /// Create a boolean property
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    /// Create an object property with no children
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::empty(SchemaType::Object))
    }

    /// Create an array property with no items descriptor
    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Array { items: None })
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the allowed values. Ignored unless this is a string property.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let PropertyKind::String { enum_values } = &mut self.kind {
            *enum_values = Some(values.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Add a child property keyed by its name. Ignored unless this is an object.
    pub fn with_property(mut self, child: SchemaProperty) -> Self {
        if let PropertyKind::Object { properties } = &mut self.kind {
            properties.insert(child.name.clone(), child);
        }
        self
    }

    /// Set the items descriptor. Ignored unless this is an array.
    pub fn with_items(mut self, item: SchemaProperty) -> Self {
        if let PropertyKind::Array { items } = &mut self.kind {
            *items = Some(Box::new(item));
        }
        self
    }

    /// Returns the type tag
    pub fn schema_type(&self) -> SchemaType {
        self.kind.schema_type()
    }

    /// Returns the child properties of an object
    pub fn properties(&self) -> Option<&PropertyMap> {
        match &self.kind {
            PropertyKind::Object { properties } => Some(properties),
            _ => None,
        }
    }

    /// Returns the items descriptor of an array
    pub fn items(&self) -> Option<&SchemaProperty> {
        match &self.kind {
            PropertyKind::Array { items } => items.as_deref(),
            _ => None,
        }
    }

    /// Returns the allowed values of a string
    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.kind {
            PropertyKind::String { enum_values } => enum_values.as_deref(),
            _ => None,
        }
    }

    /// Returns the summary label shown next to the property name,
    /// e.g. `string (red, green)` or `object`.
    pub fn type_label(&self) -> String {
        match self.enum_values() {
            Some(values) if !values.is_empty() => {
                format!("{} ({})", self.schema_type(), values.join(", "))
            }
            _ => self.schema_type().to_string(),
        }
    }

    /// Returns a copy with `updates` shallow-merged on top.
    ///
    /// Provided fields replace the current ones. When the type changes, only
    /// the fields meaningful for the new type survive.
    pub fn merged(&self, updates: &PropertyUpdate) -> SchemaProperty {
        let schema_type = updates.schema_type.unwrap_or_else(|| self.schema_type());

        let kind = match schema_type {
            SchemaType::String => PropertyKind::String {
                enum_values: updates
                    .enum_values
                    .clone()
                    .or_else(|| self.enum_values().map(<[String]>::to_vec)),
            },
            SchemaType::Integer => PropertyKind::Integer,
            SchemaType::Boolean => PropertyKind::Boolean,
            SchemaType::Object => PropertyKind::Object {
                properties: updates
                    .properties
                    .clone()
                    .or_else(|| self.properties().cloned())
                    .unwrap_or_default(),
            },
            SchemaType::Array => PropertyKind::Array {
                items: updates.items.clone().or_else(|| match &self.kind {
                    PropertyKind::Array { items } => items.clone(),
                    _ => None,
                }),
            },
        };

        SchemaProperty {
            name: updates.name.clone().unwrap_or_else(|| self.name.clone()),
            description: updates
                .description
                .clone()
                .or_else(|| self.description.clone()),
            kind,
        }
    }

    /// Validates the structure of this property and everything below it.
    pub fn validate_structure(&self) -> Result<(), String> {
        self.validate_at(&self.name)
    }

    fn validate_at(&self, location: &str) -> Result<(), String> {
        if self.name.is_empty() {
            return Err(format!("Property at '{}' has an empty name", location));
        }

        match &self.kind {
            PropertyKind::Object { properties } => validate_properties(properties, location),
            PropertyKind::Array { items: Some(item) } => {
                item.validate_at(&format!("{}.items", location))
            }
            _ => Ok(()),
        }
    }
}

/// Validates key/name consistency and non-empty names across a mapping.
pub(crate) fn validate_properties(properties: &PropertyMap, location: &str) -> Result<(), String> {
    for (key, property) in properties {
        let child = if location.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", location, key)
        };

        if key != &property.name {
            return Err(format!(
                "Key '{}' does not match property name '{}'",
                child, property.name
            ));
        }

        property.validate_at(&child)?;
    }
    Ok(())
}

/// The tree root: a bare mapping with no name or type of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSchema {
    #[serde(default)]
    pub properties: PropertyMap,
}

impl RootSchema {
    /// Create an empty root
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level property keyed by its name
    pub fn with_property(mut self, property: SchemaProperty) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Gets a top-level property
    pub fn get(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.get(name)
    }

    /// Returns the number of top-level properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true when the root has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Validates key/name consistency and names across the whole tree
    pub fn validate_structure(&self) -> Result<(), String> {
        validate_properties(&self.properties, "")
    }
}

/// Partial update applied by an edit. Omitted fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,
}

impl PropertyUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn schema_type(mut self, schema_type: SchemaType) -> Self {
        self.schema_type = Some(schema_type);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn properties(mut self, properties: PropertyMap) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn items(mut self, item: SchemaProperty) -> Self {
        self.items = Some(Box::new(item));
        self
    }

    /// Returns true when the update carries no field at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validates the nested structures carried by the update
    pub fn validate_structure(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err("New property name must not be empty".into());
            }
        }
        if let Some(properties) = &self.properties {
            validate_properties(properties, "")?;
        }
        if let Some(item) = &self.items {
            item.validate_structure()?;
        }
        Ok(())
    }
}
