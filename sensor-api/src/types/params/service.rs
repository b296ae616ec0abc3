use crate::cli::server::ServerCliArgs;

#[derive(Debug, Clone)]
pub struct ServerParams {
    pub host: String,
    pub port: u16,
    pub graceful_shutdown_timeout: u64,
}

impl From<ServerCliArgs> for ServerParams {
    fn from(value: ServerCliArgs) -> Self {
        Self { host: value.host, port: value.port, graceful_shutdown_timeout: value.graceful_shutdown_timeout }
    }
}
