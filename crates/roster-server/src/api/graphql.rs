//! The `/graphql` endpoint
//!
//! Reads `query` from the URL parameters on any method, executes it and
//! writes the result envelope as JSON.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::str::FromStr;
use tracing::debug;

use crate::schema::{execute_query, QueryResult};

use super::AppState;

/// How response status codes are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// 502 for upstream failures, 400 for bad requests, 404 for misses
    #[default]
    Mapped,
    /// 200 for everything, errors only in the body
    AlwaysOk,
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mapped" => Ok(StatusPolicy::Mapped),
            "always_ok" | "legacy" => Ok(StatusPolicy::AlwaysOk),
            other => Err(format!("unknown status policy: {}", other)),
        }
    }
}

/// Returns the first `query` value of a raw URL query string.
///
/// Never fails: a missing parameter, or a query string without one, gives an
/// empty query, which the engine reports as a parse error in the envelope.
pub fn query_param(raw: Option<&str>) -> String {
    raw.and_then(|raw| {
        form_urlencoded::parse(raw.as_bytes())
            .find(|(key, _)| key == "query")
            .map(|(_, value)| value.into_owned())
    })
    .unwrap_or_default()
}

/// GraphQL query handler
pub async fn graphql_handler(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> impl IntoResponse {
    let query = query_param(raw.as_deref());
    debug!("GraphQL query: {}", query);

    let result = execute_query(&state.schema, &query).await;
    let status = status_for(&result, state.status_policy);

    (status, Json(result))
}

/// Picks the response status for a result.
///
/// Under `Mapped`, upstream failures win over everything else, then request
/// errors. 404 and 400 for field errors only apply when no root field
/// produced data, so partial successes stay 200.
pub fn status_for(result: &QueryResult, policy: StatusPolicy) -> StatusCode {
    if policy == StatusPolicy::AlwaysOk || result.is_ok() {
        return StatusCode::OK;
    }

    let codes: Vec<Option<&str>> = result.error_codes().collect();

    if codes
        .iter()
        .any(|c| matches!(c, Some("UPSTREAM_UNAVAILABLE") | Some("UPSTREAM_TIMEOUT")))
    {
        return StatusCode::BAD_GATEWAY;
    }

    if result.has_request_error() {
        return StatusCode::BAD_REQUEST;
    }

    if result.has_data() {
        return StatusCode::OK;
    }

    if codes.iter().all(|c| *c == Some("NOT_FOUND")) {
        StatusCode::NOT_FOUND
    } else if codes.iter().all(|c| *c == Some("BAD_USER_INPUT")) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn field_error(code: &str) -> Value {
        json!({ "message": "x", "path": ["person"], "extensions": { "code": code } })
    }

    fn result(data: Value, errors: Vec<Value>) -> QueryResult {
        QueryResult { data, errors }
    }

    #[test]
    fn test_query_param_takes_first_value() {
        assert_eq!(query_param(Some("query=%7Ba%7D&query=%7Bb%7D")), "{a}");
        assert_eq!(query_param(Some("x=1&query={+persons+}")), "{ persons }");
    }

    #[test]
    fn test_query_param_missing() {
        assert_eq!(query_param(None), "");
        assert_eq!(query_param(Some("q=%7Ba%7D")), "");
        assert_eq!(query_param(Some("%zz&&=")), "");
    }

    #[test]
    fn test_no_errors_is_ok() {
        let r = result(json!({ "persons": [] }), vec![]);
        assert_eq!(status_for(&r, StatusPolicy::Mapped), StatusCode::OK);
    }

    #[test]
    fn test_upstream_failure_is_bad_gateway() {
        let r = result(json!({ "persons": null }), vec![field_error("UPSTREAM_UNAVAILABLE")]);
        assert_eq!(status_for(&r, StatusPolicy::Mapped), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&r, StatusPolicy::AlwaysOk), StatusCode::OK);
    }

    #[test]
    fn test_not_found_only() {
        let r = result(json!({ "person": null }), vec![field_error("NOT_FOUND")]);
        assert_eq!(status_for(&r, StatusPolicy::Mapped), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_partial_data_stays_ok() {
        let r = result(
            json!({ "person": null, "persons": [] }),
            vec![field_error("NOT_FOUND")],
        );
        assert_eq!(status_for(&r, StatusPolicy::Mapped), StatusCode::OK);
    }

    #[test]
    fn test_parse_error_is_bad_request() {
        let r = result(Value::Null, vec![json!({ "message": "Unexpected end of input" })]);
        assert_eq!(status_for(&r, StatusPolicy::Mapped), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_input_is_bad_request() {
        let r = result(json!({ "person": null }), vec![field_error("BAD_USER_INPUT")]);
        assert_eq!(status_for(&r, StatusPolicy::Mapped), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_decode_failure_without_data_stays_ok() {
        let r = result(json!({ "person": null }), vec![field_error("DECODE_FAILED")]);
        assert_eq!(status_for(&r, StatusPolicy::Mapped), StatusCode::OK);
    }
}
