//! Equality filters over documents.

use serde_json::Value;

use crate::docs::Document;

// == Filter ==
/// Conjunction of `field == value` conditions.
///
/// A condition on a field that holds an array matches when any element
/// equals the value, so `Filter::new().where_eq("topics", "Python")` matches
/// `{"topics": ["Python", "C"]}`. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Creates a filter that matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `field == value` condition.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Returns true if every condition holds for `doc`.
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| match doc.get(field) {
                Some(Value::Array(items)) if !expected.is_array() => {
                    items.iter().any(|item| item == expected)
                }
                Some(actual) => actual == expected,
                // A missing field only matches an explicit null
                None => expected.is_null(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
