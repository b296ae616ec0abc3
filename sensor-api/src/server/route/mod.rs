use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use collections::collection_router;
use public::local_route;
use sensor::sensor_router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::error::RouteError;
use super::types::{ApiResponse, NamespaceQuery};
use crate::core::client::{CollectionHandle, Namespace};
use crate::core::config::Config;

pub(super) mod collections;
pub(super) mod public;
pub(super) mod sensor;

/// Fallback for paths no route matches.
pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error("route not found".to_string())))
}

/// Records the namespace on the current span so log lines carry `database`/`collection`.
pub(super) fn record_namespace(namespace: &Namespace) {
    let span = Span::current();
    span.record("database", namespace.database.as_str());
    span.record("collection", namespace.collection.as_str());
}

/// Resolves the namespace named by the query onto a collection handle.
pub(super) fn resolve_collection(
    config: &Config,
    params: &NamespaceQuery,
) -> Result<Arc<dyn CollectionHandle>, RouteError> {
    let namespace = params.namespace()?;
    record_namespace(&namespace);
    Ok(config.database().collection(&namespace))
}

/// Builds the full application router: public routes, the `/api` surface, CORS and request tracing.
pub fn server_router(config: Arc<Config>) -> Router {
    let api_routes = Router::new().merge(sensor_router(config.clone())).merge(collection_router(config.clone()));

    Router::new()
        .merge(local_route(config))
        .nest("/api", api_routes)
        .fallback(handler_404)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
