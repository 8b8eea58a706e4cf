//! Document store port.
//!
//! Domain code talks to persistence only through [`DocumentStore`]: named
//! collections of JSON documents keyed by store-assigned string ids. The
//! trait is object safe so callers hold an `Arc<dyn DocumentStore>` and pass
//! `&dyn DocumentStore` into domain operations.
//!
//! - [`memory::InMemoryStore`] -- process-local implementation.
//! - `govtrust_db::PgDocumentStore` -- PostgreSQL JSONB implementation.

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::types::{DocId, Timestamp};

/// Name of the collection holding projects.
pub const PROJECTS_COLLECTION: &str = "projects";

/// Name of the collection holding citizen feedback.
pub const FEEDBACK_COLLECTION: &str = "feedback";

/// Name of the collection holding user profiles.
pub const USERS_COLLECTION: &str = "users";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the round-trip.
    #[error("{0}")]
    Unavailable(String),

    /// An update targeted a document that does not exist.
    #[error("Document {collection}/{id} does not exist")]
    DocumentNotFound { collection: String, id: DocId },

    /// A stored document could not be decoded into the expected shape.
    #[error("Malformed document {collection}/{id}: {reason}")]
    Malformed {
        collection: String,
        id: DocId,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Field maps
// ---------------------------------------------------------------------------

/// A single field written to a document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A literal JSON value.
    Value(Value),
    /// Replaced with the store's clock at write time.
    ServerTimestamp,
}

impl FieldValue {
    pub fn json(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }
}

/// Fields to write, keyed by document field name.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Build a [`FieldMap`] from `(name, value)` pairs.
pub fn field_map<I, K>(fields: I) -> FieldMap
where
    I: IntoIterator<Item = (K, FieldValue)>,
    K: Into<String>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Replace every [`FieldValue::ServerTimestamp`] with `now`.
pub fn resolve_fields(fields: FieldMap, now: Timestamp) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::Value(v) => v,
                FieldValue::ServerTimestamp => Value::String(now.to_rfc3339()),
            };
            (name, value)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A document read back from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub collection: String,
    pub id: DocId,
    pub data: Map<String, Value>,
}

impl Document {
    /// Decode into a typed model. The document id is exposed to the model as
    /// an `id` field, overriding any stored field of that name.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let Document {
            collection,
            id,
            mut data,
        } = self;
        data.insert("id".into(), Value::String(id.clone()));
        serde_json::from_value(Value::Object(data)).map_err(|e| StoreError::Malformed {
            collection,
            id,
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Narrow contract over a managed document database.
///
/// Every call is an independent round-trip. No call spans more than one
/// document, and there is no compare-and-swap: read-then-write sequences
/// built on top of this trait are last-writer-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// All documents in a collection, oldest first.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Documents whose top-level `field` equals `value`, oldest first.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Create a document and return its store-assigned id.
    async fn create(&self, collection: &str, fields: FieldMap) -> Result<DocId, StoreError>;

    /// Overwrite the given fields of an existing document.
    ///
    /// Fails with [`StoreError::DocumentNotFound`] if the document is absent.
    async fn update(&self, collection: &str, id: &str, fields: FieldMap)
        -> Result<(), StoreError>;

    /// Create the document with the given id, or merge `fields` into it.
    async fn set_merge(
        &self,
        collection: &str,
        id: &str,
        fields: FieldMap,
    ) -> Result<(), StoreError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
