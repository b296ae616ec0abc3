//! Fixed query shapes understood by the collection handles.
//!
//! Callers never send filters of their own; every read goes through one of the builders below.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneOptions, FindOptions};

use super::constant::ID_FIELD;

pub fn field_exists(field: &str) -> Document {
    doc! { field: { "$exists": true } }
}

pub fn field_absent(field: &str) -> Document {
    doc! { field: { "$exists": false } }
}

pub fn sort_by(field: &str, descending: bool) -> Document {
    let direction = if descending { -1 } else { 1 };
    doc! { field: direction }
}

/// Options selecting the single document with the greatest `field`.
pub fn latest_by(field: &str) -> FindOneOptions {
    FindOneOptions::builder().sort(sort_by(field, true)).build()
}

pub fn sorted(field: &str, descending: bool) -> FindOptions {
    FindOptions::builder().sort(sort_by(field, descending)).build()
}

/// Filter matching `id`, or `None` when `id` is not a well formed ObjectId.
pub fn id_filter(id: &str) -> Option<Document> {
    ObjectId::parse_str(id.trim()).ok().map(|oid| doc! { ID_FIELD: oid })
}

/// Catalog filter used to look a single collection up by name.
pub fn collection_name_filter(name: &str) -> Document {
    doc! { "name": name }
}
