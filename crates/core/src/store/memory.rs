//! Process-local [`DocumentStore`] backed by a `RwLock`ed map.
//!
//! Used by tests and by the server when no database is configured. Data is
//! lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{resolve_fields, Document, DocumentStore, FieldMap, StoreError};
use crate::types::DocId;

struct StoredDocument {
    /// Insertion sequence, used to return documents oldest first.
    seq: u64,
    data: Map<String, Value>,
}

type Collection = HashMap<DocId, StoredDocument>;

/// In-memory document store.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Each call takes the lock once, so single
/// calls are atomic but sequences of calls are not.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    next_seq: AtomicU64,
}

impl InMemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    fn seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }
}

fn to_document(collection: &str, id: &str, stored: &StoredDocument) -> Document {
    Document {
        collection: collection.to_string(),
        id: id.to_string(),
        data: stored.data.clone(),
    }
}

fn sorted_documents<'a>(
    collection: &str,
    docs: impl Iterator<Item = (&'a DocId, &'a StoredDocument)>,
) -> Vec<Document> {
    let mut docs: Vec<_> = docs.collect();
    docs.sort_by_key(|(_, stored)| stored.seq);
    docs.into_iter()
        .map(|(id, stored)| to_document(collection, id, stored))
        .collect()
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|stored| to_document(collection, id, stored)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| sorted_documents(collection, docs.iter()))
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                sorted_documents(
                    collection,
                    docs.iter()
                        .filter(|(_, stored)| stored.data.get(field) == Some(value)),
                )
            })
            .unwrap_or_default())
    }

    async fn create(&self, collection: &str, fields: FieldMap) -> Result<DocId, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let stored = StoredDocument {
            seq: self.seq(),
            data: resolve_fields(fields, chrono::Utc::now()),
        };
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), stored);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: FieldMap,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let stored = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        stored
            .data
            .extend(resolve_fields(fields, chrono::Utc::now()));
        Ok(())
    }

    async fn set_merge(
        &self,
        collection: &str,
        id: &str,
        fields: FieldMap,
    ) -> Result<(), StoreError> {
        let resolved = resolve_fields(fields, chrono::Utc::now());
        let seq = self.seq();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.get_mut(id) {
            Some(stored) => stored.data.extend(resolved),
            None => {
                docs.insert(
                    id.to_string(),
                    StoredDocument {
                        seq,
                        data: resolved,
                    },
                );
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
