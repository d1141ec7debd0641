//! API module for the Roster Server
//!
//! A single route, `/graphql`, on any HTTP method.

use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

pub mod graphql;

pub use graphql::{graphql_handler, query_param, status_for, StatusPolicy};

use crate::schema::RosterSchema;

/// State shared by every request. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub schema: RosterSchema,
    pub status_policy: StatusPolicy,
}

/// Build the router for API endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/graphql", any(graphql_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
