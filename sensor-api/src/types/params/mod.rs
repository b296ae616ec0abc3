pub mod database;
pub mod service;

pub use database::MongoConfig;
pub use service::ServerParams;
