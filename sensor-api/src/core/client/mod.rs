pub mod database;

pub use database::{CollectionHandle, DocumentStore, Namespace};
