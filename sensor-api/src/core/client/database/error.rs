use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("{0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Failed to serialize document: {0}")]
    FailedToSerializeDocument(String),

    #[error("Failed to convert value to BSON: {0}")]
    BsonSerError(#[from] bson::ser::Error),
}
