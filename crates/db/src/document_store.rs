//! PostgreSQL implementation of [`DocumentStore`] over the `documents` table.
//!
//! Every collection lives in the same table, keyed by `(collection, id)`.
//! Document bodies are JSONB; field updates are shallow merges (`||`), and
//! [`FieldValue::ServerTimestamp`] fields are filled from the database clock
//! inside the same statement.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

use govtrust_core::store::{Document, DocumentStore, FieldMap, FieldValue, StoreError};
use govtrust_core::types::DocId;

/// SQL expression building a JSONB object that maps each name in the
/// text-array parameter `param` to `now()`.
fn server_timestamps(param: &str) -> String {
    format!(
        "(SELECT COALESCE(jsonb_object_agg(k, to_jsonb(now())), '{{}}'::jsonb) \
         FROM unnest({param}::text[]) AS k)"
    )
}

/// Document store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Split a field map into literal values and the names of timestamp fields.
fn split_fields(fields: FieldMap) -> (Value, Vec<String>) {
    let mut values = Map::new();
    let mut stamps = Vec::new();
    for (name, value) in fields {
        match value {
            FieldValue::Value(v) => {
                values.insert(name, v);
            }
            FieldValue::ServerTimestamp => stamps.push(name),
        }
    }
    (Value::Object(values), stamps)
}

fn unavailable(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Document store query failed");
    StoreError::Unavailable(err.to_string())
}

fn to_document(collection: &str, (id, data): (DocId, Value)) -> Result<Document, StoreError> {
    match data {
        Value::Object(data) => Ok(Document {
            collection: collection.to_string(),
            id,
            data,
        }),
        other => Err(StoreError::Malformed {
            collection: collection.to_string(),
            id,
            reason: format!("expected a JSON object, found {other}"),
        }),
    }
}

fn to_documents(collection: &str, rows: Vec<(DocId, Value)>) -> Result<Vec<Document>, StoreError> {
    rows.into_iter()
        .map(|row| to_document(collection, row))
        .collect()
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, (DocId, Value)>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;
        row.map(|row| to_document(collection, row)).transpose()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (DocId, Value)>(
            "SELECT id, data FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;
        to_documents(collection, rows)
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (DocId, Value)>(
            "SELECT id, data FROM documents
             WHERE collection = $1 AND data -> $2 = $3::jsonb
             ORDER BY created_at, id",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;
        to_documents(collection, rows)
    }

    async fn create(&self, collection: &str, fields: FieldMap) -> Result<DocId, StoreError> {
        let (values, stamps) = split_fields(fields);
        let query = format!(
            "INSERT INTO documents (collection, data)
             VALUES ($1, $2::jsonb || {})
             RETURNING id",
            server_timestamps("$3")
        );
        let (id,): (DocId,) = sqlx::query_as(&query)
            .bind(collection)
            .bind(values)
            .bind(stamps)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: FieldMap,
    ) -> Result<(), StoreError> {
        let (values, stamps) = split_fields(fields);
        let query = format!(
            "UPDATE documents
             SET data = data || $3::jsonb || {}, updated_at = now()
             WHERE collection = $1 AND id = $2",
            server_timestamps("$4")
        );
        let result = sqlx::query(&query)
            .bind(collection)
            .bind(id)
            .bind(values)
            .bind(stamps)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn set_merge(
        &self,
        collection: &str,
        id: &str,
        fields: FieldMap,
    ) -> Result<(), StoreError> {
        let (values, stamps) = split_fields(fields);
        let query = format!(
            "INSERT INTO documents (collection, id, data)
             VALUES ($1, $2, $3::jsonb || {})
             ON CONFLICT (collection, id) DO UPDATE
             SET data = documents.data || EXCLUDED.data, updated_at = now()",
            server_timestamps("$4")
        );
        sqlx::query(&query)
            .bind(collection)
            .bind(id)
            .bind(values)
            .bind(stamps)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(unavailable)
    }
}
