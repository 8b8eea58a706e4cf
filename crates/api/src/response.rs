//! Response bodies shared by handlers.

use axum::Json;
use serde::Serialize;

/// Collection endpoints answer `{ "data": [...] }`, so an empty result is
/// still an object and never confused with an error body.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Wrap `items` in the collection envelope.
pub fn list<T: Serialize>(items: Vec<T>) -> Json<DataResponse<Vec<T>>> {
    Json(DataResponse { data: items })
}
