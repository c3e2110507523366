//! Document collection trait and in-process implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::docs::{Document, Filter, Pipeline};
use crate::error::{Result, StoreKitError};

// == Document Collection ==
/// Operations the document-store collaborator exposes for one collection.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Inserts `doc`, assigning an `_id` when it has none, and returns the id.
    async fn insert_one(&self, doc: Document) -> Result<Value>;

    /// Counts documents matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<u64>;

    /// Returns documents matching `filter`, in insertion order.
    async fn find(&self, filter: &Filter) -> Result<Vec<Document>>;

    /// Runs `pipeline` over every document.
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>>;
}

// == Memory Collection ==
/// In-process collection; clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    docs: Arc<RwLock<Vec<Document>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every JSON object in `values`, rejecting anything else.
    pub async fn insert_many(&self, values: impl IntoIterator<Item = Value>) -> Result<usize> {
        let mut inserted = 0;
        for value in values {
            let Value::Object(doc) = value else {
                return Err(StoreKitError::InvalidRequest(
                    "documents must be JSON objects".to_string(),
                ));
            };
            self.insert_one(doc).await?;
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert_one(&self, mut doc: Document) -> Result<Value> {
        let id = doc
            .entry("_id")
            .or_insert_with(|| Value::String(Uuid::new_v4().simple().to_string()))
            .clone();
        self.docs.write().await.push(doc);
        Ok(id)
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let docs = self.docs.read().await;
        Ok(docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>> {
        let docs = self.docs.read().await.clone();
        Ok(pipeline.run(docs))
    }
}
