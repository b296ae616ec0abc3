//! Store tests.
//!
//! Tests marked `#[ignore]` need a running MongoDB. Point `MONGODB_URI` at it and run them with
//! `--ignored`; each test works in its own randomly named collection and drops it afterwards.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rstest::*;

use crate::core::client::database::mongo_client::MongoClient;
use crate::core::client::{CollectionHandle, DocumentStore, Namespace};
use crate::types::params::MongoConfig;

const LIVE_DATABASE: &str = "sensor_api_test";

fn mongo_config() -> MongoConfig {
    let connection_url = std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    MongoConfig { connection_url, app_name: "sensor-api-test".to_string() }
}

fn random_namespace() -> Namespace {
    let suffix: String = rand::thread_rng().sample_iter(&Alphanumeric).take(12).map(char::from).collect();
    Namespace::new(LIVE_DATABASE, format!("sensor_{}", suffix.to_lowercase())).expect("valid namespace")
}

struct LiveCollection {
    client: MongoClient,
    namespace: Namespace,
    handle: Arc<dyn CollectionHandle>,
}

impl LiveCollection {
    async fn new() -> Self {
        let client = MongoClient::new(&mongo_config()).await.expect("valid connection string");
        client.health_check().await.expect("MongoDB reachable");
        let namespace = random_namespace();
        let handle = client.collection(&namespace);
        Self { client, namespace, handle }
    }

    async fn seed(&self, documents: Vec<Document>) {
        for document in documents {
            self.handle.insert_one(document).await.expect("insert seed document");
        }
    }

    async fn cleanup(self) {
        self.client
            .client()
            .database(&self.namespace.database)
            .collection::<Document>(&self.namespace.collection)
            .drop(None)
            .await
            .expect("drop test collection");
    }
}

#[rstest]
#[tokio::test]
async fn test_malformed_id_is_a_miss_without_a_server() {
    // The driver connects lazily, so nothing here touches the network.
    let client = MongoClient::new(&mongo_config()).await.unwrap();
    let handle = client.collection(&Namespace::new("robotics_hand", "sensor1").unwrap());

    assert!(handle.find_by_id("not-an-object-id").await.unwrap().is_none());
    assert!(handle.find_by_id("").await.unwrap().is_none());
}

#[rstest]
#[tokio::test]
async fn test_invalid_connection_string_is_rejected() {
    let config = MongoConfig { connection_url: "not-a-mongodb-url".to_string(), app_name: "sensor-api-test".to_string() };

    assert!(MongoClient::new(&config).await.is_err());
}

#[rstest]
#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn test_sensor_queries_against_seeded_collection() {
    let live = LiveCollection::new().await;
    live.seed(vec![
        doc! { "timestamp": 1, "emg_signals": [0.1] },
        doc! { "timestamp": 3, "emg_signals": [0.3] },
        doc! { "timestamp": 2, "emg_signals": [0.2] },
        doc! { "count": 5 },
    ])
    .await;
    let counted = live.handle.insert_one(doc! { "count": 6 }).await.unwrap();
    let counted = live.handle.find_by_id(&counted.as_object_id().expect("ObjectId").to_hex()).await.unwrap().unwrap();
    assert!(!counted.contains_key("timestamp"));

    let latest = live.handle.find_latest_by_timestamp().await.unwrap().expect("latest record");
    assert_eq!(latest.get_i32("timestamp").unwrap(), 3);

    let raw = live.handle.list_where_field_absent("count", "timestamp", true).await.unwrap();
    let timestamps: Vec<i32> = raw.iter().map(|d| d.get_i32("timestamp").unwrap()).collect();
    assert_eq!(timestamps, vec![3, 2, 1]);

    let count = live.handle.find_one_where_field_exists("count").await.unwrap().expect("count record");
    assert!(matches!(count.get_i32("count"), Ok(5) | Ok(6)));
    assert_eq!(live.handle.count_where_field_exists("count").await.unwrap(), 2);

    live.cleanup().await;
}

#[rstest]
#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn test_empty_collection_yields_misses() {
    let live = LiveCollection::new().await;

    assert!(live.handle.find_latest_by_timestamp().await.unwrap().is_none());
    assert!(live.handle.find_one_where_field_exists("count").await.unwrap().is_none());
    assert!(live.handle.list_where_field_absent("count", "timestamp", true).await.unwrap().is_empty());
    assert_eq!(live.handle.count_where_field_exists("count").await.unwrap(), 0);
    assert!(!live.client.collection_exists(&live.namespace).await.unwrap());

    live.cleanup().await;
}

#[rstest]
#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn test_inserted_document_round_trips_by_id() {
    let live = LiveCollection::new().await;

    let inserted = doc! { "timestamp": 4, "emg_signals": [0.5, 0.6], "ed_mvc": 12.5 };
    let inserted_id = live.handle.insert_one(inserted.clone()).await.unwrap();
    let Bson::ObjectId(oid) = inserted_id else { panic!("expected an ObjectId, got {inserted_id}") };

    let mut found = live.handle.find_by_id(&oid.to_hex()).await.unwrap().expect("inserted document");
    assert!(matches!(found.remove("createdAt"), Some(Bson::DateTime(_))));
    assert!(matches!(found.remove("updatedAt"), Some(Bson::DateTime(_))));
    assert_eq!(found.remove("_id"), Some(Bson::ObjectId(oid)));
    assert_eq!(found, inserted);

    assert!(live.handle.find_by_id(&ObjectId::new().to_hex()).await.unwrap().is_none());
    assert!(live.client.collection_exists(&live.namespace).await.unwrap());
    let names = live.client.list_collection_names(LIVE_DATABASE).await.unwrap();
    assert!(names.contains(&live.namespace.collection));

    live.cleanup().await;
}
