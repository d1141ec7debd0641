//! Person lookups on top of a `GraphStore`.
//!
//! `PersonClient` owns the request-level rules: identifier parsing, the
//! per-call timeout, what a failed query turns into, and decoding.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::data::{
    decode::decode_person,
    entities::PersonRecord,
    errors::{FetchError, StoreError},
};
use crate::traits::GraphStore;

/// What to do with an identifier that is not an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Look the person up as id `0`
    #[default]
    Zero,
    /// Fail with `FetchError::InvalidIdentifier`
    Reject,
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zero" => Ok(IdPolicy::Zero),
            "reject" => Ok(IdPolicy::Reject),
            other => Err(format!("unknown identifier policy: {}", other)),
        }
    }
}

/// What to do when the database rejects or fails a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFailurePolicy {
    /// Log and continue with an empty result
    #[default]
    Degrade,
    /// Surface `FetchError::Query`
    Fail,
}

impl FromStr for QueryFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "degrade" => Ok(QueryFailurePolicy::Degrade),
            "fail" => Ok(QueryFailurePolicy::Fail),
            other => Err(format!("unknown query failure policy: {}", other)),
        }
    }
}

/// Request-level settings for `PersonClient`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonClientConfig {
    pub id_policy: IdPolicy,
    pub failure_policy: QueryFailurePolicy,
    pub query_timeout: Duration,
}

impl Default for PersonClientConfig {
    fn default() -> Self {
        Self {
            id_policy: IdPolicy::default(),
            failure_policy: QueryFailurePolicy::default(),
            query_timeout: Duration::from_secs(10),
        }
    }
}

/// Parses a person identifier according to `policy`.
///
/// Surrounding whitespace is ignored. A missing identifier is treated like
/// a non-numeric one.
pub fn parse_person_id(raw: Option<&str>, policy: IdPolicy) -> Result<i64, FetchError> {
    let raw = raw.unwrap_or_default();
    match raw.trim().parse::<i64>() {
        Ok(id) => Ok(id),
        Err(_) => match policy {
            IdPolicy::Zero => {
                debug!("Non-numeric person id {:?}, looking up id 0", raw);
                Ok(0)
            }
            IdPolicy::Reject => Err(FetchError::InvalidIdentifier(raw.to_string())),
        },
    }
}

/// FetchOne / FetchAll over a shared `GraphStore`.
#[derive(Clone)]
pub struct PersonClient {
    store: Arc<dyn GraphStore>,
    config: PersonClientConfig,
}

impl std::fmt::Debug for PersonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonClient")
            .field("config", &self.config)
            .finish()
    }
}

impl PersonClient {
    pub fn new(store: Arc<dyn GraphStore>, config: PersonClientConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &PersonClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Fetches one person by string identifier.
    #[instrument(skip(self))]
    pub async fn fetch_one(&self, id: Option<&str>) -> Result<PersonRecord, FetchError> {
        let numeric_id = parse_person_id(id, self.config.id_policy)?;

        let record = self
            .guarded("fetch_person", self.store.fetch_person(numeric_id))
            .await?
            .ok_or_else(|| FetchError::NotFound {
                id: numeric_id.to_string(),
            })?;

        Ok(decode_person(&record)?)
    }

    /// Fetches every person.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<PersonRecord>, FetchError> {
        let records = self
            .guarded("fetch_persons", self.store.fetch_persons())
            .await?;

        let persons = records
            .iter()
            .map(decode_person)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Fetched {} person(s)", persons.len());
        Ok(persons)
    }

    /// Applies the timeout and the failure policy to a store call.
    async fn guarded<T, F>(&self, op: &'static str, call: F) -> Result<T, FetchError>
    where
        T: Default,
        F: Future<Output = Result<T, StoreError>>,
    {
        let timeout = self.config.query_timeout;
        match tokio::time::timeout(timeout, call).await {
            Err(_) => {
                warn!("{} timed out after {:?}", op, timeout);
                Err(FetchError::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
            Ok(Ok(value)) => Ok(value),
            Ok(Err(StoreError::Connection(msg))) => {
                error!("{} could not reach the graph database: {}", op, msg);
                Err(FetchError::Unavailable(msg))
            }
            Ok(Err(e)) => match self.config.failure_policy {
                QueryFailurePolicy::Degrade => {
                    warn!("{} failed, continuing with an empty result: {}", op, e);
                    Ok(T::default())
                }
                QueryFailurePolicy::Fail => Err(FetchError::Query(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_person_id_numeric() {
        assert_eq!(parse_person_id(Some("17"), IdPolicy::Reject).unwrap(), 17);
        assert_eq!(parse_person_id(Some(" 3 "), IdPolicy::Reject).unwrap(), 3);
        assert_eq!(parse_person_id(Some("-2"), IdPolicy::Zero).unwrap(), -2);
    }

    #[test]
    fn test_parse_person_id_zero_policy() {
        assert_eq!(parse_person_id(Some("abc"), IdPolicy::Zero).unwrap(), 0);
        assert_eq!(parse_person_id(None, IdPolicy::Zero).unwrap(), 0);
        assert_eq!(parse_person_id(Some(""), IdPolicy::Zero).unwrap(), 0);
    }

    #[test]
    fn test_parse_person_id_reject_policy() {
        assert_eq!(
            parse_person_id(Some("abc"), IdPolicy::Reject).unwrap_err(),
            FetchError::InvalidIdentifier("abc".to_string())
        );
        assert!(parse_person_id(None, IdPolicy::Reject).is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("REJECT".parse::<IdPolicy>().unwrap(), IdPolicy::Reject);
        assert_eq!("fail".parse::<QueryFailurePolicy>().unwrap(), QueryFailurePolicy::Fail);
        assert!("maybe".parse::<QueryFailurePolicy>().is_err());
    }
}
