use std::sync::Arc;

use tracing::{error, info};

use crate::cli::RunCmd;
use crate::core::client::database::mongo_client::MongoClient;
use crate::core::client::DocumentStore;
use crate::types::params::{MongoConfig, ServerParams};
use crate::ApiResult;

/// Shared application state, handed to every request handler.
pub struct Config {
    server_config: ServerParams,
    database: Arc<dyn DocumentStore>,
}

impl Config {
    pub fn new(server_config: ServerParams, database: Arc<dyn DocumentStore>) -> Self {
        Self { server_config, database }
    }

    /// Builds the configuration from CLI arguments and connects to the database.
    ///
    /// An unreachable database is logged but not fatal: the service starts anyway and each
    /// request that needs the database fails on its own until the server comes back.
    pub async fn from_run_cmd(run_cmd: &RunCmd) -> ApiResult<Self> {
        let mongo_config = MongoConfig::try_from(run_cmd.mongodb_args.clone())?;
        let server_config = ServerParams::from(run_cmd.server_args.clone());

        let database = MongoClient::new(&mongo_config).await?;
        match database.health_check().await {
            Ok(()) => info!("Connected to MongoDB"),
            Err(e) => error!(error = %e, "Error connecting to MongoDB"),
        }

        Ok(Self::new(server_config, Arc::new(database)))
    }

    pub fn server_config(&self) -> &ServerParams {
        &self.server_config
    }

    pub fn database(&self) -> &Arc<dyn DocumentStore> {
        &self.database
    }
}
