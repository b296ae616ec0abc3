pub mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::info;

use self::helpers::{record_latency, stamp_for_insert};
use super::constant::{ADMIN_DATABASE, TIMESTAMP_FIELD};
use super::error::DatabaseError;
use super::query;
use super::{CollectionHandle, DocumentStore, Namespace};
use crate::types::params::MongoConfig;

/// MongoDB backed [`DocumentStore`].
///
/// Holds the one client shared by every request. The driver pools connections internally,
/// so resolving a collection per request only builds a lightweight handle.
pub struct MongoClient {
    client: Client,
}

impl MongoClient {
    /// Create a new MongoClient connection
    ///
    /// The driver connects lazily, so this only fails on a malformed connection string.
    /// Use [`DocumentStore::health_check`] to verify the server is reachable.
    pub async fn new(config: &MongoConfig) -> Result<Self, DatabaseError> {
        let mut options = ClientOptions::parse(&config.connection_url).await?;
        options.app_name = Some(config.app_name.clone());
        let client = Client::with_options(options)?;
        Ok(Self { client })
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    fn raw_collection(&self, namespace: &Namespace) -> Collection<Document> {
        self.client.database(&namespace.database).collection::<Document>(&namespace.collection)
    }
}

#[async_trait]
impl DocumentStore for MongoClient {
    fn collection(&self, namespace: &Namespace) -> Arc<dyn CollectionHandle> {
        Arc::new(MongoCollection { inner: self.raw_collection(namespace) })
    }

    async fn list_collection_names(&self, database: &str) -> Result<Vec<String>, DatabaseError> {
        record_latency("list_collection_names", || async {
            let mut names = self.client.database(database).list_collection_names(None).await?;
            names.sort();
            Ok(names)
        })
        .await
    }

    async fn collection_exists(&self, namespace: &Namespace) -> Result<bool, DatabaseError> {
        record_latency("collection_exists", || async {
            let names = self
                .client
                .database(&namespace.database)
                .list_collection_names(query::collection_name_filter(&namespace.collection))
                .await?;
            Ok(names.iter().any(|name| name == &namespace.collection))
        })
        .await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        record_latency("health_check", || async {
            self.client.database(ADMIN_DATABASE).run_command(doc! { "ping": 1 }, None).await?;
            Ok(())
        })
        .await
    }

    async fn disconnect(&self) -> Result<(), DatabaseError> {
        // `shutdown` consumes the client; clones share the same pool.
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
        Ok(())
    }
}

/// Query handle bound to one namespace, treating its documents as schema-less.
pub struct MongoCollection {
    inner: Collection<Document>,
}

#[async_trait]
impl CollectionHandle for MongoCollection {
    async fn find_latest_by_timestamp(&self) -> Result<Option<Document>, DatabaseError> {
        record_latency("find_latest_by_timestamp", || async {
            Ok(self.inner.find_one(None, query::latest_by(TIMESTAMP_FIELD)).await?)
        })
        .await
    }

    async fn count_where_field_exists(&self, field: &str) -> Result<u64, DatabaseError> {
        record_latency("count_where_field_exists", || async {
            Ok(self.inner.count_documents(query::field_exists(field), None).await?)
        })
        .await
    }

    async fn find_one_where_field_exists(&self, field: &str) -> Result<Option<Document>, DatabaseError> {
        record_latency("find_one_where_field_exists", || async {
            Ok(self.inner.find_one(query::field_exists(field), None).await?)
        })
        .await
    }

    async fn list_where_field_absent(
        &self,
        field: &str,
        sort_by: &str,
        descending: bool,
    ) -> Result<Vec<Document>, DatabaseError> {
        record_latency("list_where_field_absent", || async {
            let cursor = self.inner.find(query::field_absent(field), query::sorted(sort_by, descending)).await?;
            Ok(cursor.try_collect().await?)
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>, DatabaseError> {
        let Some(filter) = query::id_filter(id) else {
            return Ok(None);
        };
        record_latency("find_by_id", || async { Ok(self.inner.find_one(filter, None).await?) }).await
    }

    async fn insert_one(&self, document: Document) -> Result<Bson, DatabaseError> {
        let document = stamp_for_insert(document);
        record_latency("insert_one", || async {
            let result = self.inner.insert_one(document, None).await?;
            Ok(result.inserted_id)
        })
        .await
    }
}
