use clap::Args;

/// Parameters used to config MongoDB.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB server.
    #[arg(env = "MONGODB_URI", long, default_value = "mongodb://localhost:27017")]
    pub mongodb_connection_url: String,

    /// The application name reported to the server during the handshake.
    #[arg(env = "MONGODB_APP_NAME", long, default_value = "sensor-api")]
    pub mongodb_app_name: String,
}
