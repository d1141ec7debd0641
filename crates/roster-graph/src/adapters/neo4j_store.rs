use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    data::{entities::GraphRecord, errors::StoreError},
    traits::graph_store::GraphStore,
};

/// Single-person lookup. `head(collect(..))` keeps at most one activity per person.
pub const PERSON_BY_ID_QUERY: &str = "
    MATCH (n:Person {id: $id})
    OPTIONAL MATCH (n)-[:HAS_ACTIVITY]->(a:Activity)
    WITH n, head(collect(a { .* })) AS activity
    RETURN n { .*, activity: activity } AS person
";

/// All-persons lookup, same row shape as `PERSON_BY_ID_QUERY`.
pub const ALL_PERSONS_QUERY: &str = "
    MATCH (n:Person)
    OPTIONAL MATCH (n)-[:HAS_ACTIVITY]->(a:Activity)
    WITH n, head(collect(a { .* })) AS activity
    RETURN n { .*, activity: activity } AS person
    ORDER BY n.id
";

const PERSON_COLUMN: &str = "person";

/// Configuration for Neo4j connection
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub pool_size: usize,
    pub connection_timeout: Duration,
    pub connection_retry_count: u32,
    pub connection_retry_delay: Duration,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "neo4j://localhost:7687".to_string(),
            username: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: None,
            pool_size: 10,
            connection_timeout: Duration::from_secs(5),
            connection_retry_count: 1,
            connection_retry_delay: Duration::from_millis(250),
        }
    }
}

/// Neo4j implementation of the `GraphStore` trait.
///
/// The connection pool is created on first use. If the database is down,
/// that call fails with `StoreError::Connection` and the next call tries
/// again, so an outage never takes the process down.
pub struct Neo4jGraphStore {
    graph: OnceCell<Arc<Graph>>,
    config: Neo4jConfig,
}

impl Neo4jGraphStore {
    pub fn new(config: Neo4jConfig) -> Self {
        Self {
            graph: OnceCell::new(),
            config,
        }
    }

    /// Hands out the shared pool, connecting first if needed.
    async fn graph(&self) -> Result<&Arc<Graph>, StoreError> {
        self.graph.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Arc<Graph>, StoreError> {
        let config = &self.config;
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.username)
            .password(&config.password)
            .max_connections(config.pool_size);

        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }

        let neo4j_config = builder
            .build()
            .map_err(|e| StoreError::Connection(format!("Failed to build Neo4j config: {}", e)))?;

        let attempts = config.connection_retry_count.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match tokio::time::timeout(config.connection_timeout, Graph::connect(neo4j_config.clone())).await {
                Ok(Ok(graph)) => {
                    // Test the connection with a simple query
                    match graph.execute(query("RETURN 1 AS test")).await {
                        Ok(_) => {
                            info!("Connected to Neo4j at {} (attempt {})", config.uri, attempt);
                            return Ok(Arc::new(graph));
                        }
                        Err(e) => {
                            error!("Connection test failed (attempt {}): {}", attempt, e);
                            last_error = e.to_string();
                        }
                    }
                }
                Ok(Err(e)) => {
                    error!("Failed to connect to Neo4j (attempt {}): {}", attempt, e);
                    last_error = e.to_string();
                }
                Err(_) => {
                    error!(
                        "Timed out connecting to Neo4j after {:?} (attempt {})",
                        config.connection_timeout, attempt
                    );
                    last_error = format!("timed out after {:?}", config.connection_timeout);
                }
            }
            if attempt < attempts {
                tokio::time::sleep(config.connection_retry_delay).await;
            }
        }

        Err(StoreError::Connection(format!(
            "Failed to connect to Neo4j at {} after {} attempts: {}",
            config.uri, attempts, last_error
        )))
    }

    /// Runs a person query and collects the `person` column of every row.
    async fn run_person_query(&self, q: Query) -> Result<Vec<GraphRecord>, StoreError> {
        let graph = self.graph().await?;

        let mut result = graph
            .execute(q)
            .await
            .map_err(|e| classify(e, "Failed to execute query"))?;

        let mut records = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| classify(e, "Failed to stream rows"))?
        {
            records.push(row_to_record(&row)?);
        }

        debug!("Person query returned {} record(s)", records.len());
        Ok(records)
    }
}

/// Transport failures mean the pool lost the database; everything else is a query failure.
fn classify(e: neo4rs::Error, context: &str) -> StoreError {
    match e {
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError { .. } => {
            StoreError::Connection(format!("{}: {}", context, e))
        }
        other => StoreError::Query(format!("{}: {}", context, other)),
    }
}

/// Convert the `person` column of a neo4rs::Row into a generic record
fn row_to_record(row: &neo4rs::Row) -> Result<GraphRecord, StoreError> {
    let value = row
        .get::<serde_json::Value>(PERSON_COLUMN)
        .map_err(|e| StoreError::Row(format!("Could not read `{}` column: {}", PERSON_COLUMN, e)))?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => {
            warn!("Unexpected `{}` column value: {}", PERSON_COLUMN, other);
            Err(StoreError::Row(format!("`{}` column is not a map", PERSON_COLUMN)))
        }
    }
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    #[instrument(skip(self), fields(uri = %self.config.uri))]
    async fn fetch_person(&self, id: i64) -> Result<Option<GraphRecord>, StoreError> {
        let q = query(PERSON_BY_ID_QUERY).param("id", id);
        // The stream is drained so the pooled connection is returned clean
        let records = self.run_person_query(q).await?;
        Ok(records.into_iter().next())
    }

    #[instrument(skip(self), fields(uri = %self.config.uri))]
    async fn fetch_persons(&self) -> Result<Vec<GraphRecord>, StoreError> {
        self.run_person_query(query(ALL_PERSONS_QUERY)).await
    }

    #[instrument(skip(self), fields(uri = %self.config.uri))]
    async fn health_check(&self) -> Result<bool, StoreError> {
        let graph = self.graph().await?;
        let mut result = graph
            .execute(query("RETURN 1 AS test"))
            .await
            .map_err(|e| classify(e, "Health check failed"))?;

        match result.next().await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => Err(classify(e, "Health check failed")),
        }
    }
}
