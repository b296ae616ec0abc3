use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::ApiResponse;
use crate::core::client::database::DatabaseError;

/// Represents errors that can occur while handling an API request.
///
/// # Status Code Mapping
/// * `MissingParameter` -> 400 Bad Request
/// * `InvalidQuery` -> 400 Bad Request
/// * `InvalidPayload` -> 400 Bad Request
/// * `NotFound` -> 404 Not Found
/// * `Database` -> 500 Internal Server Error
/// * `Unavailable` -> 503 Service Unavailable
///
/// All variants render the JSON envelope `{"success": false, "error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// A required query parameter was absent or empty
    #[error("{0} required")]
    MissingParameter(&'static str),

    /// The query string could not be parsed, e.g. a parameter given twice
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The request body could not be used as a document
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The single document asked for does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Any failure raised by the database driver, surfaced with its own message
    #[error("{0}")]
    Database(#[from] DatabaseError),

    /// The database did not answer a health probe
    #[error("database unavailable: {0}")]
    Unavailable(DatabaseError),
}

impl RouteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::MissingParameter(_) | RouteError::InvalidQuery(_) | RouteError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            RouteError::NotFound(_) => StatusCode::NOT_FOUND,
            RouteError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouteError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<QueryRejection> for RouteError {
    fn from(rejection: QueryRejection) -> Self {
        RouteError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ApiResponse::error(self.to_string()))).into_response()
    }
}
