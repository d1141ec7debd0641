//! GraphStore trait definition for graph database interaction

use async_trait::async_trait;

use crate::data::{errors::StoreError, entities::GraphRecord};

/// Represents the interface for the two fixed person lookups.
/// This abstracts the underlying database technology (e.g., Neo4j).
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Looks up a single `Person` node by integer id.
    ///
    /// Contract: returns the first row's record (person properties merged with
    /// an `activity` key holding the activity's properties or null), or `None`
    /// when the query yields no rows. Any connection acquired for the call is
    /// released before returning, on every path.
    async fn fetch_person(&self, id: i64) -> Result<Option<GraphRecord>, StoreError>;

    /// Returns every `Person` node in the same shape as `fetch_person`.
    async fn fetch_persons(&self) -> Result<Vec<GraphRecord>, StoreError>;

    /// Verifies that the store can answer a trivial query.
    async fn health_check(&self) -> Result<bool, StoreError>;
}
