use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::error::RouteError;
use crate::core::client::Namespace;

/// Query parameters naming the collection a request reads from.
///
/// Both the long (`database`, `collection`) and the camel-cased (`dbName`, `collectionName`)
/// spellings are accepted. Empty values are treated as missing.
#[derive(Debug, Default, Deserialize)]
pub struct NamespaceQuery {
    #[serde(default, alias = "dbName")]
    pub database: Option<String>,
    #[serde(default, alias = "collectionName")]
    pub collection: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl NamespaceQuery {
    pub fn database(&self) -> Result<&str, RouteError> {
        required(self.database.as_deref(), "database")
    }

    pub fn namespace(&self) -> Result<Namespace, RouteError> {
        let database = self.database()?;
        let collection = required(self.collection.as_deref(), "collection")?;
        Namespace::new(database, collection).ok_or(RouteError::MissingParameter("collection"))
    }

    pub fn id(&self) -> Result<&str, RouteError> {
        required(self.id.as_deref(), "id")
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, RouteError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RouteError::MissingParameter(name)),
    }
}

/// Represents a standardized API response structure.
///
/// Every data endpoint answers with this envelope: `data` on success, `error` on failure.
///
/// # Examples
/// ```
/// use sensor_api::server::types::ApiResponse;
/// let response = ApiResponse::success(5);
/// assert!(response.success);
/// assert_eq!(response.data, Some(5));
///
/// let response = ApiResponse::error("database required".to_string());
/// assert!(!response.success);
/// assert_eq!(response.error.as_deref(), Some("database required"));
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    /// Indicates if the operation was successful
    pub success: bool,
    /// Optional data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self { success: false, data: None, error: Some(message) }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub success: bool,
    pub inserted_id: String,
}

/// Result type shared by all route handlers.
pub type RouteResult = Result<Response<axum::body::Body>, RouteError>;
