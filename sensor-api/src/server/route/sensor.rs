use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::field::Empty;
use tracing::{error, info, instrument};

use super::super::error::RouteError;
use super::super::types::{ApiResponse, CountResponse, NamespaceQuery, RouteResult};
use super::resolve_collection;
use crate::core::client::database::constant::{COUNT_FIELD, TIMESTAMP_FIELD};
use crate::core::config::Config;
use crate::types::document::{document_to_json, documents_to_json};

/// Handles requests for the count-record of a collection.
///
/// Returns any one document carrying a `count` field.
///
/// # Errors
/// * `RouteError::MissingParameter` - `database` or `collection` absent
/// * `RouteError::NotFound` - no count-record in the collection
/// * `RouteError::Database` - the query failed
#[instrument(skip_all, fields(database = Empty, collection = Empty))]
async fn handle_get_count_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
) -> RouteResult {
    let Query(params) = query?;
    let collection = resolve_collection(&config, &params)?;

    match collection.find_one_where_field_exists(COUNT_FIELD).await {
        Ok(Some(document)) => Ok(Json(ApiResponse::success(document_to_json(document))).into_response()),
        Ok(None) => Err(RouteError::NotFound("count")),
        Err(e) => {
            error!(error = %e, "Failed to fetch count record");
            Err(e.into())
        }
    }
}

/// Handles requests for the most recent sensor record, ordered by `timestamp`.
///
/// # Errors
/// * `RouteError::MissingParameter` - `database` or `collection` absent
/// * `RouteError::NotFound` - the collection holds no documents
/// * `RouteError::Database` - the query failed
#[instrument(skip_all, fields(database = Empty, collection = Empty))]
async fn handle_get_emg_data_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
) -> RouteResult {
    let Query(params) = query?;
    let collection = resolve_collection(&config, &params)?;

    match collection.find_latest_by_timestamp().await {
        Ok(Some(document)) => Ok(Json(ApiResponse::success(document_to_json(document))).into_response()),
        Ok(None) => Err(RouteError::NotFound("EMG data")),
        Err(e) => {
            error!(error = %e, "Failed to fetch latest EMG data");
            Err(e.into())
        }
    }
}

/// Handles requests for every raw record, i.e. documents without a `count` field,
/// newest first. An empty collection answers with an empty list.
#[instrument(skip_all, fields(database = Empty, collection = Empty))]
async fn handle_get_raw_data_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
) -> RouteResult {
    let Query(params) = query?;
    let collection = resolve_collection(&config, &params)?;

    match collection.list_where_field_absent(COUNT_FIELD, TIMESTAMP_FIELD, true).await {
        Ok(documents) => {
            info!(count = documents.len(), "Fetched raw data");
            Ok(Json(ApiResponse::success(documents_to_json(documents))).into_response())
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch raw data");
            Err(e.into())
        }
    }
}

/// Handles lookups of a single document by its identifier.
///
/// A malformed identifier is reported as not found.
#[instrument(skip_all, fields(database = Empty, collection = Empty, id = Empty))]
async fn handle_get_specific_doc_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
) -> RouteResult {
    let Query(params) = query?;
    let collection = resolve_collection(&config, &params)?;
    let id = params.id()?;
    tracing::Span::current().record("id", id);

    match collection.find_by_id(id).await {
        Ok(Some(document)) => Ok(Json(ApiResponse::success(document_to_json(document))).into_response()),
        Ok(None) => Err(RouteError::NotFound("document")),
        Err(e) => {
            error!(error = %e, "Failed to fetch document");
            Err(e.into())
        }
    }
}

/// Handles requests for the number of count-records in a collection.
#[instrument(skip_all, fields(database = Empty, collection = Empty))]
async fn handle_get_record_count_request(
    State(config): State<Arc<Config>>,
    query: Result<Query<NamespaceQuery>, QueryRejection>,
) -> RouteResult {
    let Query(params) = query?;
    let collection = resolve_collection(&config, &params)?;

    match collection.count_where_field_exists(COUNT_FIELD).await {
        Ok(count) => Ok(Json(ApiResponse::success(CountResponse { count })).into_response()),
        Err(e) => {
            error!(error = %e, "Failed to count records");
            Err(e.into())
        }
    }
}

/// Creates the router for the sensor read endpoints.
pub fn sensor_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/get-count", get(handle_get_count_request))
        .route("/get-emg-data", get(handle_get_emg_data_request))
        .route("/get-raw-data", get(handle_get_raw_data_request))
        .route("/get-specific-doc", get(handle_get_specific_doc_request))
        .route("/get-record-count", get(handle_get_record_count_request))
        .with_state(config)
}
