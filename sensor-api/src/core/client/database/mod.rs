pub mod constant;
pub mod error;
pub mod mongo_client;
pub mod query;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
pub use error::DatabaseError;

/// A `(database, collection)` pair resolved from a request.
///
/// Collections are never declared ahead of time: any pair of non-empty names is a valid
/// namespace, and a namespace the server does not know simply behaves as an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub database: String,
    pub collection: String,
}

impl Namespace {
    /// Builds a namespace, returning `None` when either name is blank.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Option<Self> {
        let database = database.into();
        let collection = collection.into();
        if database.trim().is_empty() || collection.trim().is_empty() {
            return None;
        }
        Some(Self { database, collection })
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Query operations available on a single schema-less collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionHandle: Send + Sync {
    /// find_latest_by_timestamp - the document with the greatest `timestamp`, if any
    async fn find_latest_by_timestamp(&self) -> Result<Option<Document>, DatabaseError>;

    /// count_where_field_exists - number of documents carrying `field`
    async fn count_where_field_exists(&self, field: &str) -> Result<u64, DatabaseError>;

    /// find_one_where_field_exists - any one document carrying `field`
    async fn find_one_where_field_exists(&self, field: &str) -> Result<Option<Document>, DatabaseError>;

    /// list_where_field_absent - every document lacking `field`, ordered by `sort_by`
    async fn list_where_field_absent(
        &self,
        field: &str,
        sort_by: &str,
        descending: bool,
    ) -> Result<Vec<Document>, DatabaseError>;

    /// find_by_id - lookup by identifier. Malformed identifiers resolve to `None`.
    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, DatabaseError>;

    /// insert_one - insert a document and return the server assigned identifier
    async fn insert_one(&self, document: Document) -> Result<Bson, DatabaseError>;
}

/// Entry point to the document database.
///
/// Implementations own the single shared connection; handles returned by
/// [`DocumentStore::collection`] borrow that connection and are cheap to create per request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// collection - resolve a namespace to a query handle
    fn collection(&self, namespace: &Namespace) -> Arc<dyn CollectionHandle>;

    /// list_collection_names - names present in the catalog of `database`
    async fn list_collection_names(&self, database: &str) -> Result<Vec<String>, DatabaseError>;

    /// collection_exists - whether the namespace is present in the catalog
    async fn collection_exists(&self, namespace: &Namespace) -> Result<bool, DatabaseError>;

    /// health_check - ping the server
    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// disconnect - close the connection pool
    async fn disconnect(&self) -> Result<(), DatabaseError>;
}
