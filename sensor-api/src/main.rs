use std::sync::Arc;

use clap::Parser as _;
use dotenvy::dotenv;
use sensor_api::cli::{Cli, Commands, RunCmd};
use sensor_api::core::config::Config;
use sensor_api::server::setup_server;
use sensor_api::utils::logging::init_logging;
use sensor_api::utils::signal_handler::SignalHandler;
use sensor_api::ApiResult;
use tracing::{debug, error, info};

/// Start the server
#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    info!("Starting sensor api");
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { run_command } => {
            debug!("Executing run command with args: {:?}", run_command);
            if let Err(e) = run_service(run_command).await {
                error!(
                    error = %e,
                    error_chain = ?e,
                    "Sensor api stopped with an error"
                );
                std::process::exit(1);
            }
        }
    }
}

async fn run_service(run_cmd: &RunCmd) -> ApiResult<()> {
    let config = Arc::new(Config::from_run_cmd(run_cmd).await?);
    debug!("Configuration initialized");

    let (_, server_handle) = setup_server(config.clone()).await?;

    let mut signal_handler = SignalHandler::new();
    signal_handler.wait_for_shutdown().await?;

    let timeout = config.server_config().graceful_shutdown_timeout;
    signal_handler
        .handle_graceful_shutdown(
            || async move {
                server_handle.shutdown().await?;
                config.database().disconnect().await?;
                Ok(())
            },
            timeout,
        )
        .await?;

    info!("Sensor api shut down");
    Ok(())
}
