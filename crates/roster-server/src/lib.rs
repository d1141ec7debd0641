//!
//! Roster Server - GraphQL over HTTP for persons and users
//!
//! This module exports all the components of the Roster Server.

use std::sync::Arc;
use tracing::{info, warn};

use roster_graph::{GraphStore, InMemoryGraphStore, Neo4jGraphStore, PersonClient, UserDirectory};

/// API module
pub mod api;

/// Configuration module
pub mod config;

/// Error module
pub mod error;

/// GraphQL schema module
pub mod schema;

/// Server module
pub mod server;

// Re-export key types
pub use api::{build_router, AppState, StatusPolicy};
pub use config::{LogFormat, LoggingConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use schema::{build_schema, execute_query, QueryResult, RosterSchema, SchemaContext};
pub use server::RosterServer;

/// Run function. Logging is expected to be initialized already.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    // Create dependencies
    let users = Arc::new(UserDirectory::load_or_empty(&config.users_file));
    let store = create_graph_store(&config)?;

    // A failed warm-up is not fatal, requests retry the connection
    match store.health_check().await {
        Ok(true) => info!("Graph store is reachable"),
        Ok(false) => warn!("Graph store health check returned false"),
        Err(e) => warn!("Graph store is not reachable yet: {}", e),
    }

    let schema = build_schema(SchemaContext {
        persons: PersonClient::new(store, config.person_client_config()),
        users,
        max_depth: config.max_query_depth,
    });

    // Create and run server
    RosterServer::new(config, schema).run().await
}

/// Initialize logging. Call before `ServerConfig::load`.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format {
        LogFormat::Text => fmt().with_env_filter(filter).with_target(true).try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    if result.is_err() {
        warn!("Logging was already initialized");
    }
}

/// Create the graph store selected by `NEO4J_URI`
pub fn create_graph_store(config: &ServerConfig) -> ServerResult<Arc<dyn GraphStore>> {
    if config.uses_memory_store() {
        let store = match &config.neo4j_seed_file {
            Some(path) => {
                let store = InMemoryGraphStore::from_seed_file(path)?;
                info!("Using in-memory graph store seeded from {}", path.display());
                store
            }
            None => {
                info!("Using empty in-memory graph store");
                InMemoryGraphStore::new()
            }
        };
        return Ok(Arc::new(store));
    }

    info!("Using Neo4j graph store at {}", config.neo4j_uri);
    Ok(Arc::new(Neo4jGraphStore::new(config.neo4j_config())))
}
