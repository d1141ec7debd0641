//! Roster graph layer
//!
//! Person and activity lookups against a graph database, the static user
//! directory, and the typed records both produce.

// Core modules
pub mod data;
pub mod directory;
pub mod services;
pub mod storage;
pub mod traits;

// Implementation adapters (optional, can be provided externally)
#[cfg(feature = "adapters")]
pub mod adapters;

// Re-export key types for convenient usage
pub use data::{
    decode_activity, decode_person, ActivityRecord, DecodeError, DirectoryError, FetchError,
    GraphRecord, PersonRecord, StoreError, UserRecord,
};
pub use directory::{import_json_file, UserDirectory};
pub use services::{IdPolicy, PersonClient, PersonClientConfig, QueryFailurePolicy};
pub use storage::InMemoryGraphStore;
pub use traits::GraphStore;

#[cfg(any(test, feature = "mocks"))]
pub use traits::MockGraphStore;

#[cfg(feature = "adapters")]
pub use adapters::{Neo4jConfig, Neo4jGraphStore};
