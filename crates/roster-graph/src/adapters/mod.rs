//! Concrete `GraphStore` implementations backed by external services

pub mod neo4j_store;

pub use neo4j_store::{Neo4jConfig, Neo4jGraphStore};
