//! In-process record store.
//!
//! Used when persistence is disabled and throughout the tests. Documents
//! are kept per collection in insertion order behind a single
//! [`tokio::sync::RwLock`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::models::{Document, Filter, Sort};
use crate::domain::{Collection, RecordId};

/// Volatile document store backed by a `HashMap` of vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `body` under a fresh identifier.
    pub async fn insert(&self, collection: Collection, body: Map<String, Value>) -> RecordId {
        let id = RecordId::generate();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(Document { id, body });
        id
    }

    /// Returns matching documents, optionally sorted and truncated.
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
        limit: Option<usize>,
    ) -> Vec<Document> {
        let map = self.collections.read().await;
        let mut docs: Vec<Document> = map
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(map);

        if let Some(sort) = sort {
            // Stable, so ties keep insertion order.
            docs.sort_by(|a, b| sort.compare(&a.body, &b.body));
        }
        if let Some(limit) = limit {
            docs.truncate(limit);
        }
        docs
    }

    /// Returns the document with the given identifier.
    pub async fn find_one(&self, collection: Collection, id: RecordId) -> Option<Document> {
        let map = self.collections.read().await;
        map.get(&collection)?
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
    }

    /// Merges `patch` into the document's top-level fields. Returns the
    /// number of matched documents (0 or 1).
    pub async fn update(
        &self,
        collection: Collection,
        id: RecordId,
        patch: Map<String, Value>,
    ) -> u64 {
        let mut map = self.collections.write().await;
        let Some(doc) = map
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            return 0;
        };
        doc.body.extend(patch);
        1
    }

    /// Deletes the document. Returns the number of deleted documents.
    pub async fn delete(&self, collection: Collection, id: RecordId) -> u64 {
        let mut map = self.collections.write().await;
        let Some(docs) = map.get_mut(&collection) else {
            return 0;
        };
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        (before - docs.len()) as u64
    }
}
