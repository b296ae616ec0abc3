use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::signal;
use tracing::{error, info, warn};

#[cfg(unix)]
use signal::unix::{signal, SignalKind};

/// Signal types that can trigger shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGTERM - Docker/Kubernetes graceful shutdown
    Terminate,
    /// SIGINT - Ctrl+C interactive shutdown
    Interrupt,
    /// SIGQUIT - Quit signal
    Quit,
}

impl std::fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownSignal::Terminate => write!(f, "SIGTERM"),
            ShutdownSignal::Interrupt => write!(f, "SIGINT"),
            ShutdownSignal::Quit => write!(f, "SIGQUIT"),
        }
    }
}

/// Signal handler for graceful shutdown
#[derive(Debug, Default)]
pub struct SignalHandler {
    shutdown_signal: Option<ShutdownSignal>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for any shutdown signal and return which one was received
    pub async fn wait_for_shutdown(&mut self) -> Result<ShutdownSignal> {
        let signal = self.wait_for_signal().await?;
        self.shutdown_signal = Some(signal);
        info!("Received shutdown signal: {}", signal);
        Ok(signal)
    }

    #[cfg(unix)]
    async fn wait_for_signal(&self) -> Result<ShutdownSignal> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigquit = signal(SignalKind::quit())?;

        info!("Signal handler initialized, listening for SIGTERM, SIGINT and SIGQUIT");

        let signal = tokio::select! {
            _ = sigterm.recv() => ShutdownSignal::Terminate,
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = sigquit.recv() => ShutdownSignal::Quit,
        };
        Ok(signal)
    }

    #[cfg(not(unix))]
    async fn wait_for_signal(&self) -> Result<ShutdownSignal> {
        info!("Signal handler initialized, listening for Ctrl+C");
        signal::ctrl_c().await?;
        Ok(ShutdownSignal::Interrupt)
    }

    /// Runs `shutdown_fn`, giving up after `timeout_secs`.
    ///
    /// On SIGQUIT a timeout exits the process immediately.
    pub async fn handle_graceful_shutdown<F, Fut>(&self, shutdown_fn: F, timeout_secs: u64) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let signal = self.shutdown_signal.unwrap_or(ShutdownSignal::Interrupt);

        info!(timeout_secs, "Starting graceful shutdown (triggered by: {})", signal);

        match tokio::time::timeout(Duration::from_secs(timeout_secs), shutdown_fn()).await {
            Ok(Ok(())) => {
                info!("Graceful shutdown completed successfully");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(error = %e, "Graceful shutdown failed");
                Err(e)
            }
            Err(_) => {
                error!("Graceful shutdown timed out after {} seconds", timeout_secs);
                if signal == ShutdownSignal::Quit {
                    warn!("SIGQUIT received - forcing immediate exit");
                    std::process::exit(1);
                }
                Err(anyhow!("Shutdown timeout exceeded"))
            }
        }
    }
}
