use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use mongodb::bson::Bson;
use serde_json::Value;
use tracing::field::Empty;
use tracing::{error, info, instrument};

use super::super::error::RouteError;
use super::super::types::{ApiResponse, ExistsResponse, InsertResponse, NamespaceQuery, RouteResult};
use super::{record_namespace, resolve_collection};
use crate::core::client::database::mongo_client::helpers::ToDocument;
use crate::core::config::Config;
use crate::types::sample::SensorSample;

/// Handles catalog lookups for a `(database, collection)` pair.
///
/// A collection that exists but holds no documents still reports `exists: true`.
#[instrument(skip_all, fields(database = Empty, collection = Empty))]
async fn handle_check_db_collection_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
) -> RouteResult {
    let Query(params) = query?;
    let namespace = params.namespace()?;
    record_namespace(&namespace);

    match config.database().collection_exists(&namespace).await {
        Ok(exists) => {
            info!(exists, "Checked collection existence");
            Ok(Json(ExistsResponse { exists }).into_response())
        }
        Err(e) => {
            error!(error = %e, "Failed to check collection existence");
            Err(e.into())
        }
    }
}

/// Handles requests listing every collection of a database, sorted by name.
#[instrument(skip_all, fields(database = Empty))]
async fn handle_list_collections_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
) -> RouteResult {
    let Query(params) = query?;
    let database = params.database()?;
    tracing::Span::current().record("database", database);

    match config.database().list_collection_names(database).await {
        Ok(names) => Ok(Json(ApiResponse::success(names)).into_response()),
        Err(e) => {
            error!(error = %e, "Failed to list collections");
            Err(e.into())
        }
    }
}

/// Handles inserts of test records.
///
/// The body, when present, must be a JSON object and is stored as given. An empty body
/// inserts a generated [`SensorSample`].
#[instrument(skip_all, fields(database = Empty, collection = Empty))]
async fn handle_insert_test_data_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
    body: Bytes,
) -> RouteResult {
    let Query(params) = query?;
    let collection = resolve_collection(&config, &params)?;
    let document = if body.iter().all(u8::is_ascii_whitespace) {
        SensorSample::generate().into_document()
    } else {
        let value: Value = serde_json::from_slice(&body).map_err(|e| RouteError::InvalidPayload(e.to_string()))?;
        if !value.is_object() {
            return Err(RouteError::InvalidPayload("body must be a JSON object".to_string()));
        }
        // Values BSON cannot hold, such as integers above i64::MAX, are the client's to fix.
        value.to_document().map_err(|e| RouteError::InvalidPayload(e.to_string()))?
    };

    match collection.insert_one(document).await {
        Ok(inserted_id) => {
            let inserted_id = inserted_id_to_string(inserted_id);
            info!(inserted_id = %inserted_id, "Inserted test data");
            Ok(Json(InsertResponse { success: true, inserted_id }).into_response())
        }
        Err(e) => {
            error!(error = %e, "Failed to insert test data");
            Err(e.into())
        }
    }
}

fn inserted_id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

/// Creates the router for catalog and write-helper endpoints.
pub fn collection_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/check-db-collection", get(handle_check_db_collection_request))
        .route("/list-collections", get(handle_list_collections_request))
        .route("/insert-test-data", post(handle_insert_test_data_request))
        .with_state(config)
}
