//! Aggregation pipeline stages.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::docs::Document;

// == Stage ==
/// One step of an aggregation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Groups documents by the value of `by`, emitting `{"_id": value, "count": n}`.
    /// Documents without the field fall into the `null` group.
    Group { by: String },
    /// Orders documents by `field`; ties keep their incoming order.
    Sort { field: String, descending: bool },
    /// Keeps at most this many documents.
    Limit(usize),
}

impl Stage {
    fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        match self {
            Stage::Group { by } => group_count(docs, by),
            Stage::Sort { field, descending } => {
                let mut docs = docs;
                docs.sort_by(|a, b| {
                    let order = compare_values(a.get(field), b.get(field));
                    if *descending {
                        order.reverse()
                    } else {
                        order
                    }
                });
                docs
            }
            Stage::Limit(n) => docs.into_iter().take(*n).collect(),
        }
    }
}

// == Pipeline ==
/// Ordered list of stages applied to a collection's documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group-by-field-with-count stage.
    pub fn group_count(mut self, by: impl Into<String>) -> Self {
        self.stages.push(Stage::Group { by: by.into() });
        self
    }

    /// Appends a descending sort on `field`.
    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.stages.push(Stage::Sort {
            field: field.into(),
            descending: true,
        });
        self
    }

    /// Appends an ascending sort on `field`.
    pub fn sort_asc(mut self, field: impl Into<String>) -> Self {
        self.stages.push(Stage::Sort {
            field: field.into(),
            descending: false,
        });
        self
    }

    /// Appends a limit stage.
    pub fn limit(mut self, n: usize) -> Self {
        self.stages.push(Stage::Limit(n));
        self
    }

    /// Runs every stage in order over `docs`.
    pub fn run(&self, docs: Vec<Document>) -> Vec<Document> {
        self.stages
            .iter()
            .fold(docs, |docs, stage| stage.apply(docs))
    }
}

fn group_count(docs: Vec<Document>, by: &str) -> Vec<Document> {
    // Groups come out in order of first appearance
    let mut groups: Vec<(Value, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for doc in &docs {
        let key = doc.get(by).cloned().unwrap_or(Value::Null);
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            groups.push((key, 0));
            groups.len() - 1
        });
        groups[slot].1 += 1;
    }

    groups
        .into_iter()
        .map(|(id, count)| {
            let mut doc = Document::new();
            doc.insert("_id".to_string(), id);
            doc.insert("count".to_string(), Value::from(count));
            doc
        })
        .collect()
}

/// Orders missing < null < bool < number < string < other, then by value.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
