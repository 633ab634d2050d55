//! Form layout derived from a schema tree
//!
//! One field per property, in property order. Nested objects become groups;
//! arrays become lists whose element template sits at `<path>.*`.

use serde::Serialize;

use crate::schema::{PropertyKind, PropertyMap, RootSchema, SchemaProperty};

/// Path segment standing for "any element" of a list
pub const ELEMENT_SEGMENT: &str = "*";

/// Input control rendered for a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "lowercase")]
pub enum FieldControl {
    /// Drop-down over a string enum
    Select {
        placeholder: String,
        options: Vec<String>,
    },
    /// Free-text input
    Text { placeholder: String },
    /// Numeric input
    Number { placeholder: String },
    /// On/off toggle
    Switch,
    /// Nested fields of an object; empty when it has no properties
    Group { fields: Vec<FormField> },
    /// Growable list; `item` is the element template, if an item type is defined
    List { item: Option<Box<FormField>> },
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Dotted data path, e.g. `address.city` or `tags.*`
    pub path: String,
    /// Label shown next to the control (the property name)
    pub label: String,
    #[serde(flatten)]
    pub control: FieldControl,
}

impl FormField {
    /// Returns the field at `path` in this field or below it
    pub fn find(&self, path: &str) -> Option<&FormField> {
        if self.path == path {
            return Some(self);
        }
        match &self.control {
            FieldControl::Group { fields } => fields.iter().find_map(|f| f.find(path)),
            FieldControl::List { item: Some(item) } => item.find(path),
            _ => None,
        }
    }
}

/// Builds the form layout of a schema
pub fn build_form(schema: &RootSchema) -> Vec<FormField> {
    fields_for(&schema.properties, None)
}

/// Builds the field for one property at the given data path
pub fn build_field(property: &SchemaProperty, path: &str) -> FormField {
    let control = match &property.kind {
        PropertyKind::String {
            enum_values: Some(options),
        } if !options.is_empty() => FieldControl::Select {
            placeholder: format!("Select {}", property.name),
            options: options.clone(),
        },
        PropertyKind::String { .. } => FieldControl::Text {
            placeholder: placeholder(property),
        },
        PropertyKind::Integer => FieldControl::Number {
            placeholder: placeholder(property),
        },
        PropertyKind::Boolean => FieldControl::Switch,
        PropertyKind::Object { properties } => FieldControl::Group {
            fields: fields_for(properties, Some(path)),
        },
        PropertyKind::Array { items } => FieldControl::List {
            item: items.as_deref().map(|item| {
                Box::new(build_field(item, &format!("{}.{}", path, ELEMENT_SEGMENT)))
            }),
        },
    };

    FormField {
        path: path.to_string(),
        label: property.name.clone(),
        control,
    }
}

fn fields_for(properties: &PropertyMap, parent: Option<&str>) -> Vec<FormField> {
    properties
        .values()
        .map(|property| {
            let path = match parent {
                Some(parent) => format!("{}.{}", parent, property.name),
                None => property.name.clone(),
            };
            build_field(property, &path)
        })
        .collect()
}

fn placeholder(property: &SchemaProperty) -> String {
    match &property.description {
        Some(description) if !description.is_empty() => description.clone(),
        _ => format!("Enter {}", property.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> RootSchema {
        RootSchema::new()
            .with_property(SchemaProperty::string("name").with_description("Full name"))
            .with_property(SchemaProperty::string("color").with_enum(["red", "green"]))
            .with_property(SchemaProperty::integer("age"))
            .with_property(SchemaProperty::boolean("active"))
            .with_property(
                SchemaProperty::object("address").with_property(SchemaProperty::string("city")),
            )
            .with_property(SchemaProperty::array("tags").with_items(SchemaProperty::string("tag")))
            .with_property(SchemaProperty::array("empty"))
    }

    #[test]
    fn test_controls_per_type() {
        let form = build_form(&schema());
        let labels: Vec<_> = form.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["name", "color", "age", "active", "address", "tags", "empty"]);

        assert_eq!(
            form[0].control,
            FieldControl::Text {
                placeholder: "Full name".into()
            }
        );
        assert_eq!(
            form[1].control,
            FieldControl::Select {
                placeholder: "Select color".into(),
                options: vec!["red".into(), "green".into()],
            }
        );
        assert_eq!(
            form[2].control,
            FieldControl::Number {
                placeholder: "Enter age".into()
            }
        );
        assert_eq!(form[3].control, FieldControl::Switch);
        assert_eq!(form[6].control, FieldControl::List { item: None });
    }

    #[test]
    fn test_nested_paths() {
        let form = build_form(&schema());
        let city = form[4].find("address.city").unwrap();
        assert_eq!(city.label, "city");

        let tag = form[5].find("tags.*").unwrap();
        assert_eq!(tag.label, "tag");
    }

    #[test]
    fn test_empty_enum_is_text() {
        let root = RootSchema::new()
            .with_property(SchemaProperty::string("s").with_enum(Vec::<String>::new()));
        assert_eq!(
            build_form(&root)[0].control,
            FieldControl::Text {
                placeholder: "Enter s".into()
            }
        );
    }

    #[test]
    fn test_empty_object_is_empty_group() {
        let root = RootSchema::new().with_property(SchemaProperty::object("meta"));
        assert_eq!(build_form(&root)[0].control, FieldControl::Group { fields: vec![] });
    }

    #[test]
    fn test_serialized_shape() {
        let root = RootSchema::new()
            .with_property(SchemaProperty::array("tags").with_items(SchemaProperty::boolean("on")));
        let value = serde_json::to_value(build_form(&root)).unwrap();
        assert_eq!(
            value,
            json!([{
                "path": "tags",
                "label": "tags",
                "control": "list",
                "item": {"path": "tags.*", "label": "on", "control": "switch"}
            }])
        );
    }
}
