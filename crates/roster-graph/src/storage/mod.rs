//! In-process `GraphStore` implementations

pub mod memory;

pub use memory::InMemoryGraphStore;
