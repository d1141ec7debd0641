use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::data::{
    entities::{GraphRecord, PersonRecord},
    errors::{DirectoryError, StoreError},
};
use crate::traits::GraphStore;

/// In-memory person graph, selected with a `memory://` store URI.
///
/// Records are kept in the same generic shape the Neo4j queries return,
/// so the decoding path is exercised exactly as in production.
#[derive(Clone, Default)]
pub struct InMemoryGraphStore {
    records: Arc<RwLock<Vec<GraphRecord>>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store seeded with typed person records
    pub fn with_persons(persons: impl IntoIterator<Item = PersonRecord>) -> Self {
        let records = persons.into_iter().map(person_to_record).collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Loads a seed file holding a JSON array of person objects
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DirectoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<GraphRecord> =
            serde_json::from_str(&content).map_err(|source| DirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Seeded in-memory graph with {} person(s)", records.len());
        Ok(Self {
            records: Arc::new(RwLock::new(records)),
        })
    }

    pub async fn insert_person(&self, person: PersonRecord) {
        self.insert_record(person_to_record(person)).await;
    }

    /// Inserts a raw record, bypassing any shape checks
    pub async fn insert_record(&self, record: GraphRecord) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn person_to_record(person: PersonRecord) -> GraphRecord {
    let mut record = GraphRecord::new();
    // Numeric ids are stored as integers, like the Person.id property in Neo4j
    let id = match person.id.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(person.id),
    };
    record.insert("id".to_string(), id);
    record.insert("name".to_string(), Value::from(person.name));
    record.insert(
        "role".to_string(),
        person.role.map(Value::from).unwrap_or(Value::Null),
    );
    let activity = match person.activity {
        Some(activity) => serde_json::json!({ "id": activity.id, "name": activity.name }),
        None => Value::Null,
    };
    record.insert("activity".to_string(), activity);
    record
}

fn record_id(record: &GraphRecord) -> Option<i64> {
    match record.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn fetch_person(&self, id: i64) -> Result<Option<GraphRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| record_id(r) == Some(id)).cloned())
    }

    async fn fetch_persons(&self) -> Result<Vec<GraphRecord>, StoreError> {
        let mut records = self.records.read().await.clone();
        records.sort_by_key(record_id);
        Ok(records)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
