use clap::Args;

/// Parameters used to config the server.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct ServerCliArgs {
    /// The host to listen on.
    #[arg(env = "HOST", long, default_value = "0.0.0.0")]
    pub host: String,

    /// The port to listen on.
    #[arg(env = "PORT", long, default_value = "8000")]
    pub port: u16,

    /// Seconds to wait for in-flight requests to finish on shutdown.
    #[arg(env = "GRACEFUL_SHUTDOWN_TIMEOUT", long, default_value = "30")]
    pub graceful_shutdown_timeout: u64,
}
