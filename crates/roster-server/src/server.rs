//! Roster Server
//!
//! Binds the listener and serves the GraphQL router until Ctrl-C.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{build_router, AppState};
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::schema::RosterSchema;

/// Main server implementation
#[derive(Clone)]
pub struct RosterServer {
    /// Configuration
    pub config: ServerConfig,

    schema: RosterSchema,

    /// Bound address, known once `bind` has run
    address: Option<SocketAddr>,
}

impl std::fmt::Debug for RosterServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterServer")
            .field("config", &self.config)
            .field("address", &self.address)
            .finish()
    }
}

impl RosterServer {
    /// Create a new RosterServer
    pub fn new(config: ServerConfig, schema: RosterSchema) -> Self {
        Self {
            config,
            schema,
            address: None,
        }
    }

    /// Shared request state for the router
    pub fn app_state(&self) -> AppState {
        AppState {
            schema: self.schema.clone(),
            status_policy: self.config.status_policy,
        }
    }

    /// Binds the configured address
    pub async fn bind(&mut self) -> ServerResult<TcpListener> {
        let listener =
            TcpListener::bind((self.config.bind_address.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        self.address = Some(addr);
        Ok(listener)
    }

    /// Run the server
    pub async fn run(mut self) -> ServerResult<()> {
        info!("Starting Roster Server");

        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener until shutdown
    pub async fn serve(self, listener: TcpListener) -> ServerResult<()> {
        let addr = listener.local_addr()?;
        let app = build_router(self.app_state());

        info!("Listening on {}, GraphQL at http://{}/graphql", addr, addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Roster Server stopped");
        Ok(())
    }

    /// Get the server's bound address
    pub fn address(&self) -> SocketAddr {
        self.address
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], self.config.port)))
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
