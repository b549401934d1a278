//! posterd - poster generation relay daemon
//!
//! Accepts a product photo and description, asks Gemini for a styled
//! advertisement poster, and returns the generated image.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gemini;
pub mod relay;
pub mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

pub use config::Config;
use gemini::{GeminiClient, ImageProvider};

/// The posterd server instance
pub struct Server {
    config: Config,
    provider: Arc<dyn ImageProvider>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Result<Self> {
        let client = GeminiClient::new(&config.gemini)?;
        if !client.is_configured() {
            warn!("Gemini API key not configured; poster requests will fail");
        }
        Ok(Self::with_provider(config, Arc::new(client)))
    }

    /// Create a server around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn ImageProvider>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            provider,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Build the router
    fn router(&self) -> Router {
        let state = api::AppState::new(self.provider.clone(), self.config.auth.clone());
        api::router(state, self.config.max_body_bytes)
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!(
            "posterd listening on {} (model {}, auth required: {})",
            local_addr,
            self.provider.model(),
            self.config.auth.required
        );

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("posterd shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
