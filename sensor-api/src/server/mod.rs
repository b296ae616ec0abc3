pub mod error;
pub mod route;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::config::Config;
use crate::server::route::server_router;
use crate::types::params::ServerParams;
use crate::ApiResult;

pub use error::RouteError;

/// Handle for managing the HTTP server lifecycle.
pub struct ServerHandle {
    shutdown_token: CancellationToken,
    task_handle: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Initiates graceful shutdown and waits for the server to stop.
    ///
    /// New connections are refused immediately; in-flight requests are allowed to finish.
    pub async fn shutdown(self) -> ApiResult<()> {
        info!("Initiating server graceful shutdown");
        self.shutdown_token.cancel();
        self.task_handle.await??;
        Ok(())
    }
}

/// Sets up and starts the HTTP server with configured routes.
///
/// The server runs on its own tokio task with graceful shutdown support.
///
/// # Returns
/// * `(SocketAddr, ServerHandle)` - The bound address and handle for managing the server
pub async fn setup_server(config: Arc<Config>) -> ApiResult<(SocketAddr, ServerHandle)> {
    let (api_server_url, listener) = get_server_url(config.server_config()).await?;

    let shutdown_token = CancellationToken::new();
    let server_token = shutdown_token.clone();

    let app = server_router(config);
    let task_handle =
        tokio::spawn(async move { axum::serve(listener, app).with_graceful_shutdown(server_token.cancelled_owned()).await });

    info!(address = %api_server_url, "Server running");
    Ok((api_server_url, ServerHandle { shutdown_token, task_handle }))
}

pub(crate) async fn get_server_url(server_params: &ServerParams) -> ApiResult<(SocketAddr, tokio::net::TcpListener)> {
    // In test mode, use port 0 to get a random available port
    let port = if cfg!(test) { 0 } else { server_params.port };

    let address = format!("{}:{}", server_params.host, port);
    let listener = tokio::net::TcpListener::bind(address).await?;
    let api_server_url = listener.local_addr()?;

    Ok((api_server_url, listener))
}
