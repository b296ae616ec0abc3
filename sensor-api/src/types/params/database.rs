use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::error::ApiError;

/// Validated MongoDB parameters
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub connection_url: String,
    pub app_name: String,
}

impl TryFrom<MongoDBCliArgs> for MongoConfig {
    type Error = ApiError;

    fn try_from(args: MongoDBCliArgs) -> Result<Self, Self::Error> {
        let connection_url = args.mongodb_connection_url.trim().to_string();
        if connection_url.is_empty() {
            return Err(ApiError::ConfigError("MongoDB connection url must not be empty".to_string()));
        }
        Ok(Self { connection_url, app_name: args.mongodb_app_name })
    }
}
