//! Request-level services built on the graph store

pub mod person_client;

pub use person_client::{
    parse_person_id, IdPolicy, PersonClient, PersonClientConfig, QueryFailurePolicy,
};
