//! Typed schema paths
//!
//! A path addresses a node by alternating "named child of an object" and
//! "items descriptor of an array" steps. On the wire a path is a list of
//! string segments in which the literal `"items"` selects the items
//! descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Segment that selects an array's items descriptor
pub const ITEMS_SEGMENT: &str = "items";

/// A single step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Child of a properties mapping
    Named(String),
    /// Items descriptor of an array
    Items,
}

impl PathStep {
    /// Parses one wire segment
    pub fn parse(segment: &str) -> Self {
        if segment == ITEMS_SEGMENT {
            PathStep::Items
        } else {
            PathStep::Named(segment.to_string())
        }
    }

    /// Key used when this step is resolved against a properties mapping.
    ///
    /// An `Items` step on an object is looked up as the child named `items`.
    pub fn as_key(&self) -> &str {
        match self {
            PathStep::Named(name) => name,
            PathStep::Items => ITEMS_SEGMENT,
        }
    }

    /// Returns true for the items step
    pub fn is_items(&self) -> bool {
        matches!(self, PathStep::Items)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

/// A sequence of steps from the root mapping. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SchemaPath {
    steps: Vec<PathStep>,
}

impl SchemaPath {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from wire segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            steps: segments
                .into_iter()
                .map(|s| PathStep::parse(s.as_ref()))
                .collect(),
        }
    }

    /// Returns a new path extended with a named child
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Named(name.into()));
        Self { steps }
    }

    /// Returns a new path extended with the items step
    pub fn items(&self) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep::Items);
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Splits into the parent steps and the final step
    pub fn split_last(&self) -> Option<(&PathStep, &[PathStep])> {
        self.steps.split_last()
    }

    /// Returns the wire segments
    pub fn segments(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.as_key().to_string()).collect()
    }
}

impl From<Vec<String>> for SchemaPath {
    fn from(segments: Vec<String>) -> Self {
        Self::from_segments(segments)
    }
}

impl From<&[&str]> for SchemaPath {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments)
    }
}

impl From<SchemaPath> for Vec<String> {
    fn from(path: SchemaPath) -> Self {
        path.segments()
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "$root");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
