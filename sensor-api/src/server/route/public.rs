use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tracing::{error, instrument};

use super::super::error::RouteError;
use crate::core::config::Config;

pub(super) fn local_route(config: Arc<Config>) -> Router {
    Router::new().route("/", get(root_handler)).route("/health", get(health_checker_handler)).with_state(config)
}

async fn root_handler() -> &'static str {
    "Hello from server"
}

/// Reports `UP` only when the database answers a ping.
#[instrument(skip(config))]
async fn health_checker_handler(State(config): State<Arc<Config>>) -> Result<&'static str, RouteError> {
    config.database().health_check().await.map_err(|e| {
        error!(error = %e, "Health check failed");
        RouteError::Unavailable(e)
    })?;
    Ok("UP")
}
