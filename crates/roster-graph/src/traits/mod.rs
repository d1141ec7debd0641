//! Core traits (interfaces) for the Roster graph layer

pub mod graph_store;

pub use graph_store::GraphStore;
#[cfg(any(test, feature = "mocks"))]
pub use graph_store::MockGraphStore;
