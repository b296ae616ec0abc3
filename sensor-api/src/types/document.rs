//! Conversion of stored BSON documents into the JSON sent to clients.
//!
//! Identifiers and dates are rendered the way web clients expect them: ObjectIds as bare hex
//! strings and datetimes as RFC 3339 strings, rather than extended JSON wrappers.

use chrono::SecondsFormat;
use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

pub fn document_to_json(document: Document) -> Value {
    let mut object = Map::with_capacity(document.len());
    for (key, value) in document {
        object.insert(key, bson_to_json(value));
    }
    Value::Object(object)
}

pub fn documents_to_json(documents: Vec<Document>) -> Value {
    Value::Array(documents.into_iter().map(document_to_json).collect())
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true)),
        Bson::Double(d) => Number::from_f64(d).map(Value::Number).unwrap_or(Value::Null),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        other => other.into_relaxed_extjson(),
    }
}
