//! Queries over school documents.

use crate::docs::{Document, DocumentCollection, Filter};
use crate::error::Result;

/// Returns the schools whose `topics` list contains `topic`.
pub async fn schools_by_topic<C>(collection: &C, topic: &str) -> Result<Vec<Document>>
where
    C: DocumentCollection + ?Sized,
{
    collection.find(&Filter::new().where_eq("topics", topic)).await
}
