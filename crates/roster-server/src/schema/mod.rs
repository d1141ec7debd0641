//! GraphQL schema and execution for Roster.
//!
//! Parsing, validation and execution are done by async-graphql. This module
//! builds the schema once at startup, with the person client and the user
//! directory injected as schema data, and wraps execution results in the
//! `{"data": ..., "errors": [...]}` envelope.
//!
//! ```graphql
//! { person(id: "1") { name activity { name } } }
//! { persons { id name role } }
//! ```

pub mod query;
pub mod types;

use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use roster_graph::{PersonClient, UserDirectory};

pub use query::{to_graphql_error, QueryRoot};
pub use types::{Activity, Person, User};

/// The Roster GraphQL schema type
pub type RosterSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Everything resolvers can reach
#[derive(Clone, Debug)]
pub struct SchemaContext {
    pub persons: PersonClient,
    pub users: Arc<UserDirectory>,
    pub max_depth: usize,
}

/// Build the GraphQL schema with the lookup services as context
pub fn build_schema(ctx: SchemaContext) -> RosterSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .register_output_type::<User>()
        .data(ctx.persons)
        .data(ctx.users)
        .limit_depth(ctx.max_depth)
        .finish()
}

/// Result envelope returned to HTTP clients.
///
/// `errors` holds GraphQL error objects (`message`, `locations`, `path`,
/// `extensions.code`) and is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

impl QueryResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// `extensions.code` of every error, `None` for errors without one
    pub fn error_codes(&self) -> impl Iterator<Item = Option<&str>> {
        self.errors
            .iter()
            .map(|e| e.pointer("/extensions/code").and_then(Value::as_str))
    }

    /// Errors raised before any field ran (parse, validation, limits)
    pub fn has_request_error(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.get("path").is_none() && e.pointer("/extensions/code").is_none())
    }

    /// True when at least one root field resolved to a non-null value
    pub fn has_data(&self) -> bool {
        match &self.data {
            Value::Object(fields) => fields.values().any(|v| !v.is_null()),
            Value::Null => false,
            _ => true,
        }
    }
}

impl From<async_graphql::Response> for QueryResult {
    fn from(response: async_graphql::Response) -> Self {
        let data = response.data.into_json().unwrap_or(Value::Null);
        let errors = response
            .errors
            .iter()
            .map(|e| serde_json::to_value(e).unwrap_or_else(|_| serde_json::json!({ "message": e.message })))
            .collect();
        Self { data, errors }
    }
}

/// Executes one query string against the schema.
///
/// Errors are collected into the result and also logged; logging never
/// changes what is returned.
pub async fn execute_query(schema: &RosterSchema, query: &str) -> QueryResult {
    let response = schema.execute(query).await;

    for error in &response.errors {
        warn!("GraphQL error: {}", error.message);
    }

    QueryResult::from(response)
}
