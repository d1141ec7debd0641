//! Configuration for the Roster Server
//!
//! Values come from environment variables (optionally via a `.env` file)
//! layered over defaults. Invalid values are logged and the default kept.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use roster_graph::{IdPolicy, Neo4jConfig, PersonClientConfig, QueryFailurePolicy};

use crate::api::StatusPolicy;
use crate::error::{ServerError, ServerResult};

/// URI scheme selecting the in-process graph store
pub const MEMORY_STORE_SCHEME: &str = "memory://";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Logging settings, read before the rest of the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Logging settings from environment variables and an optional `.env` file
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup("LOG_LEVEL") {
            config.level = level;
        }
        parse_into(&lookup, "LOG_FORMAT", &mut config.format);
        config
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub bind_address: String,

    pub logging: LoggingConfig,

    /// Static user directory file
    pub users_file: PathBuf,

    /// Graph database URI, or `memory://` for the in-process store
    pub neo4j_uri: String,
    pub neo4j_username: String,
    pub neo4j_password: String,
    pub neo4j_database: Option<String>,

    /// Person seed file for the in-memory store
    pub neo4j_seed_file: Option<PathBuf>,

    pub neo4j_pool_size: usize,
    pub neo4j_connect_retries: u32,
    pub neo4j_connection_timeout_ms: u64,
    pub neo4j_query_timeout_ms: u64,

    pub person_id_policy: IdPolicy,
    pub query_failure_policy: QueryFailurePolicy,
    pub status_policy: StatusPolicy,

    /// Maximum GraphQL selection depth
    pub max_query_depth: usize,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_users_file() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_neo4j_uri() -> String {
    "neo4j://localhost:7687".to_string()
}

fn default_neo4j_username() -> String {
    "neo4j".to_string()
}

fn default_neo4j_password() -> String {
    "neo4j".to_string()
}

fn default_pool_size() -> usize {
    10
}

fn default_connect_retries() -> u32 {
    1
}

fn default_connection_timeout_ms() -> u64 {
    5_000
}

fn default_query_timeout_ms() -> u64 {
    10_000
}

fn default_max_query_depth() -> usize {
    8
}

impl ServerConfig {
    /// Load configuration from environment variables and an optional `.env` file
    pub fn load() -> ServerResult<Self> {
        dotenv::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("Loaded server configuration");
        Ok(config)
    }

    /// Builds a configuration from any key lookup, over the defaults
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("SERVER_HOST") {
            config.bind_address = host;
        }
        parse_into(&lookup, "SERVER_PORT", &mut config.port);

        config.logging = LoggingConfig::from_lookup(&lookup);

        if let Some(users_file) = lookup("USERS_FILE") {
            config.users_file = PathBuf::from(users_file);
        }

        if let Some(uri) = lookup("NEO4J_URI") {
            config.neo4j_uri = uri;
        }
        if let Some(username) = lookup("NEO4J_USERNAME") {
            config.neo4j_username = username;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            config.neo4j_password = password;
        }
        config.neo4j_database = lookup("NEO4J_DATABASE").filter(|db| !db.is_empty());
        config.neo4j_seed_file = lookup("NEO4J_SEED_FILE")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        parse_into(&lookup, "NEO4J_POOL_SIZE", &mut config.neo4j_pool_size);
        parse_into(&lookup, "NEO4J_CONNECT_RETRIES", &mut config.neo4j_connect_retries);
        parse_into(&lookup, "NEO4J_CONNECTION_TIMEOUT_MS", &mut config.neo4j_connection_timeout_ms);
        parse_into(&lookup, "NEO4J_QUERY_TIMEOUT_MS", &mut config.neo4j_query_timeout_ms);

        parse_into(&lookup, "PERSON_ID_POLICY", &mut config.person_id_policy);
        parse_into(&lookup, "QUERY_FAILURE_POLICY", &mut config.query_failure_policy);
        parse_into(&lookup, "GRAPHQL_STATUS_POLICY", &mut config.status_policy);
        parse_into(&lookup, "GRAPHQL_MAX_DEPTH", &mut config.max_query_depth);

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ServerResult<()> {
        if self.neo4j_uri.trim().is_empty() {
            return Err(ServerError::ConfigError("NEO4J_URI must not be empty".to_string()));
        }

        if self.neo4j_pool_size == 0 {
            return Err(ServerError::ConfigError("NEO4J_POOL_SIZE must be at least 1".to_string()));
        }

        if self.neo4j_query_timeout_ms == 0 {
            return Err(ServerError::ConfigError(
                "NEO4J_QUERY_TIMEOUT_MS must be at least 1".to_string(),
            ));
        }

        if self.max_query_depth == 0 {
            return Err(ServerError::ConfigError("GRAPHQL_MAX_DEPTH must be at least 1".to_string()));
        }

        if self.uses_memory_store() {
            warn!("Using the in-memory graph store, person data is not persisted");
        } else if self.neo4j_password == default_neo4j_password() {
            warn!("NEO4J_PASSWORD is the default value");
        }

        Ok(())
    }

    /// True when `neo4j_uri` selects the in-process store
    pub fn uses_memory_store(&self) -> bool {
        self.neo4j_uri.starts_with(MEMORY_STORE_SCHEME)
    }

    /// Connection settings for the Neo4j adapter
    pub fn neo4j_config(&self) -> Neo4jConfig {
        Neo4jConfig {
            uri: self.neo4j_uri.clone(),
            username: self.neo4j_username.clone(),
            password: self.neo4j_password.clone(),
            database: self.neo4j_database.clone(),
            pool_size: self.neo4j_pool_size,
            connection_timeout: Duration::from_millis(self.neo4j_connection_timeout_ms),
            connection_retry_count: self.neo4j_connect_retries,
            ..Neo4jConfig::default()
        }
    }

    /// Request-level lookup settings
    pub fn person_client_config(&self) -> PersonClientConfig {
        PersonClientConfig {
            id_policy: self.person_id_policy,
            failure_policy: self.query_failure_policy,
            query_timeout: Duration::from_millis(self.neo4j_query_timeout_ms),
        }
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!("Invalid {} value: {}", key, raw),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_host(),
            logging: LoggingConfig::default(),
            users_file: default_users_file(),
            neo4j_uri: default_neo4j_uri(),
            neo4j_username: default_neo4j_username(),
            neo4j_password: default_neo4j_password(),
            neo4j_database: None,
            neo4j_seed_file: None,
            neo4j_pool_size: default_pool_size(),
            neo4j_connect_retries: default_connect_retries(),
            neo4j_connection_timeout_ms: default_connection_timeout_ms(),
            neo4j_query_timeout_ms: default_query_timeout_ms(),
            person_id_policy: IdPolicy::default(),
            query_failure_policy: QueryFailurePolicy::default(),
            status_policy: StatusPolicy::default(),
            max_query_depth: default_max_query_depth(),
        }
    }
}
