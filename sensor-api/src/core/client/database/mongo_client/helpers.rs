use std::future::Future;
use std::time::Instant;

use chrono::Utc;
use mongodb::bson::{self, Bson, DateTime, Document};
use serde::Serialize;
use tracing::{debug, error};

use crate::core::client::database::constant::{CREATED_AT_FIELD, UPDATED_AT_FIELD};
use crate::core::client::database::error::DatabaseError;

pub trait ToDocument {
    fn to_document(&self) -> Result<Document, DatabaseError>;
}

impl<T: Serialize> ToDocument for T {
    fn to_document(&self) -> Result<Document, DatabaseError> {
        let doc = bson::to_bson(self)?;

        if let Bson::Document(doc) = doc {
            Ok(doc)
        } else {
            Err(DatabaseError::FailedToSerializeDocument(format!("expected an object, got {}", doc)))
        }
    }
}

/// Runs a database operation, logging its latency and any failure.
pub async fn record_latency<T, F, Fut>(operation: &'static str, f: F) -> Result<T, DatabaseError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let start = Instant::now();
    let result = f().await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match &result {
        Ok(_) => debug!(operation, elapsed_ms, "Database operation completed"),
        Err(e) => error!(operation, elapsed_ms, error = %e, "Database operation failed"),
    }
    result
}

/// Stamps the `createdAt`/`updatedAt` audit fields on a document about to be inserted.
///
/// Fields the caller already provided are left untouched. `timestamp` is never defaulted:
/// a date there would outrank the numeric timestamps of raw records in latest-first ordering.
pub fn stamp_for_insert(mut document: Document) -> Document {
    let now = DateTime::from_chrono(Utc::now());
    for field in [CREATED_AT_FIELD, UPDATED_AT_FIELD] {
        if !document.contains_key(field) {
            document.insert(field, now);
        }
    }
    document
}
