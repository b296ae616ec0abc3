use axum::http::StatusCode;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use rstest::*;
use serde_json::json;

use crate::core::client::database::{DatabaseError, MockCollectionHandle, MockDocumentStore};
use crate::tests::common::{build_config, get, namespace_query, store_with_collection};

fn sensor_record(oid: ObjectId, timestamp: i32) -> Document {
    doc! { "_id": oid, "timestamp": timestamp, "emg_signals": [0.1, 0.2, 0.3] }
}

#[rstest]
#[case("/api/get-count?collection=sensor1", "database required")]
#[case("/api/get-count?database=robotics_hand", "collection required")]
#[case("/api/get-emg-data", "database required")]
#[case("/api/get-emg-data?database=&collection=sensor1", "database required")]
#[case("/api/get-raw-data?database=robotics_hand&collection=", "collection required")]
#[case("/api/get-specific-doc?collection=sensor1&id=65f0c0ffee65f0c0ffee65f0", "database required")]
#[case("/api/get-record-count?dbName=robotics_hand", "collection required")]
#[tokio::test]
async fn test_missing_namespace_parameters_are_rejected(#[case] uri: &str, #[case] message: &str) {
    // No expectations: resolving a collection would panic the mock.
    let response = get(build_config(MockDocumentStore::new()), uri).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "success": false, "error": message }));
}

#[rstest]
#[tokio::test]
async fn test_get_count_returns_count_record() {
    let oid = ObjectId::new();
    let mut handle = MockCollectionHandle::new();
    handle
        .expect_find_one_where_field_exists()
        .withf(|field| field == "count")
        .times(1)
        .returning(move |_| Ok(Some(doc! { "_id": oid, "count": 42 })));

    let response = get(build_config(store_with_collection(handle)), &format!("/api/get-count?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "success": true, "data": { "_id": oid.to_hex(), "count": 42 } }));
}

#[rstest]
#[tokio::test]
async fn test_get_count_without_count_record_is_not_found() {
    let mut handle = MockCollectionHandle::new();
    handle.expect_find_one_where_field_exists().times(1).returning(|_| Ok(None));

    let response = get(build_config(store_with_collection(handle)), &format!("/api/get-count?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "success": false, "error": "count not found" }));
}

#[rstest]
#[tokio::test]
async fn test_get_emg_data_returns_latest_record() {
    let oid = ObjectId::new();
    let mut handle = MockCollectionHandle::new();
    handle.expect_find_latest_by_timestamp().times(1).returning(move || Ok(Some(sensor_record(oid, 3))));

    let response =
        get(build_config(store_with_collection(handle)), &format!("/api/get-emg-data?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["timestamp"], 3);
    assert_eq!(body["data"]["_id"], oid.to_hex());
}

#[rstest]
#[tokio::test]
async fn test_get_emg_data_on_empty_collection_is_not_found() {
    let mut handle = MockCollectionHandle::new();
    handle.expect_find_latest_by_timestamp().times(1).returning(|| Ok(None));

    let response =
        get(build_config(store_with_collection(handle)), &format!("/api/get-emg-data?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "success": false, "error": "EMG data not found" }));
}

#[rstest]
#[tokio::test]
async fn test_get_raw_data_lists_records_newest_first() {
    let (a, b, c) = (ObjectId::new(), ObjectId::new(), ObjectId::new());
    let mut handle = MockCollectionHandle::new();
    handle
        .expect_list_where_field_absent()
        .withf(|field, sort_by, descending| field == "count" && sort_by == "timestamp" && *descending)
        .times(1)
        .returning(move |_, _, _| Ok(vec![sensor_record(c, 3), sensor_record(b, 2), sensor_record(a, 1)]));

    let response =
        get(build_config(store_with_collection(handle)), &format!("/api/get-raw-data?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let timestamps: Vec<i64> =
        body["data"].as_array().unwrap().iter().map(|d| d["timestamp"].as_i64().unwrap()).collect();
    assert_eq!(timestamps, vec![3, 2, 1]);
}

#[rstest]
#[tokio::test]
async fn test_get_raw_data_on_empty_collection_is_an_empty_list() {
    let mut handle = MockCollectionHandle::new();
    handle.expect_list_where_field_absent().times(1).returning(|_, _, _| Ok(vec![]));

    let response =
        get(build_config(store_with_collection(handle)), &format!("/api/get-raw-data?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "success": true, "data": [] }));
}

#[rstest]
#[tokio::test]
async fn test_get_raw_data_surfaces_database_errors() {
    let mut handle = MockCollectionHandle::new();
    handle
        .expect_list_where_field_absent()
        .times(1)
        .returning(|_, _, _| Err(DatabaseError::FailedToSerializeDocument("connection reset".to_string())));

    let response =
        get(build_config(store_with_collection(handle)), &format!("/api/get-raw-data?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({ "success": false, "error": "Failed to serialize document: connection reset" })
    );
}

#[rstest]
#[tokio::test]
async fn test_get_specific_doc_returns_document() {
    let oid = ObjectId::new();
    let expected_id = oid.to_hex();
    let mut handle = MockCollectionHandle::new();
    handle
        .expect_find_by_id()
        .withf(move |id| id == expected_id)
        .times(1)
        .returning(move |_| Ok(Some(sensor_record(oid, 2))));

    let uri = format!("/api/get-specific-doc?{}&id={}", namespace_query(), oid.to_hex());
    let response = get(build_config(store_with_collection(handle)), &uri).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["data"]["_id"], oid.to_hex());
}

#[rstest]
#[case("65f0c0ffee65f0c0ffee65f0")]
#[case("not-an-object-id")]
#[tokio::test]
async fn test_get_specific_doc_unknown_or_malformed_id_is_not_found(#[case] id: &str) {
    let mut handle = MockCollectionHandle::new();
    handle.expect_find_by_id().times(1).returning(|_| Ok(None));

    let uri = format!("/api/get-specific-doc?{}&id={}", namespace_query(), id);
    let response = get(build_config(store_with_collection(handle)), &uri).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "success": false, "error": "document not found" }));
}

#[rstest]
#[tokio::test]
async fn test_get_specific_doc_requires_id() {
    let handle = MockCollectionHandle::new();

    let uri = format!("/api/get-specific-doc?{}", namespace_query());
    let response = get(build_config(store_with_collection(handle)), &uri).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "success": false, "error": "id required" }));
}

#[rstest]
#[case(0)]
#[case(3)]
#[tokio::test]
async fn test_get_record_count_reports_count_records(#[case] count: u64) {
    let mut handle = MockCollectionHandle::new();
    handle
        .expect_count_where_field_exists()
        .withf(|field| field == "count")
        .times(1)
        .returning(move |_| Ok(count));

    let response =
        get(build_config(store_with_collection(handle)), &format!("/api/get-record-count?{}", namespace_query())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "success": true, "data": { "count": count } }));
}

#[rstest]
#[tokio::test]
async fn test_camel_case_parameters_resolve_the_same_collection() {
    let mut handle = MockCollectionHandle::new();
    handle.expect_find_latest_by_timestamp().times(1).returning(|| Ok(Some(doc! { "timestamp": 1 })));

    let response = get(
        build_config(store_with_collection(handle)),
        "/api/get-emg-data?dbName=robotics_hand&collectionName=sensor1",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
}

fn driver_error() -> DatabaseError {
    DatabaseError::FailedToSerializeDocument("connection reset".to_string())
}

fn failing_count_lookup(handle: &mut MockCollectionHandle) {
    handle.expect_find_one_where_field_exists().times(1).returning(|_| Err(driver_error()));
}

fn failing_latest_lookup(handle: &mut MockCollectionHandle) {
    handle.expect_find_latest_by_timestamp().times(1).returning(|| Err(driver_error()));
}

fn failing_id_lookup(handle: &mut MockCollectionHandle) {
    handle.expect_find_by_id().times(1).returning(|_| Err(driver_error()));
}

fn failing_record_count(handle: &mut MockCollectionHandle) {
    handle.expect_count_where_field_exists().times(1).returning(|_| Err(driver_error()));
}

#[rstest]
#[case("/api/get-count", failing_count_lookup as fn(&mut MockCollectionHandle))]
#[case("/api/get-emg-data", failing_latest_lookup as fn(&mut MockCollectionHandle))]
#[case("/api/get-specific-doc?id=65f0c0ffee65f0c0ffee65f0", failing_id_lookup as fn(&mut MockCollectionHandle))]
#[case("/api/get-record-count", failing_record_count as fn(&mut MockCollectionHandle))]
#[tokio::test]
async fn test_database_errors_surface_as_500(#[case] path: &str, #[case] arrange: fn(&mut MockCollectionHandle)) {
    let mut handle = MockCollectionHandle::new();
    arrange(&mut handle);

    let separator = if path.contains('?') { '&' } else { '?' };
    let uri = format!("{}{}{}", path, separator, namespace_query());
    let response = get(build_config(store_with_collection(handle)), &uri).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({ "success": false, "error": "Failed to serialize document: connection reset" })
    );
}

#[rstest]
#[case("/api/get-emg-data?database=robotics_hand&dbName=other&collection=sensor1")]
#[case("/api/get-count?database=robotics_hand&collection=sensor1&collection=sensor2")]
#[case("/api/get-raw-data?collection=sensor1&collectionName=sensor2&database=robotics_hand")]
#[tokio::test]
async fn test_ambiguous_query_parameters_get_the_error_envelope(#[case] uri: &str) {
    let response = get(build_config(MockDocumentStore::new()), uri).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("invalid query:"), "unexpected error: {}", error);
    assert!(error.contains("duplicate field"), "unexpected error: {}", error);
}
