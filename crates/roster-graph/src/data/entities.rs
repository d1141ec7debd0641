//! Entity records served by Roster

use serde::{Deserialize, Serialize};

/// A generic entity record: one returned row before it is decoded.
pub type GraphRecord = serde_json::Map<String, serde_json::Value>;

/// A user entry from the static directory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// An activity linked to a person through `HAS_ACTIVITY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub name: String,
}

/// A person node, with at most one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub activity: Option<ActivityRecord>,
}

impl PersonRecord {
    /// Convenience constructor used by seeds and tests
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.map(str::to_string),
            activity: None,
        }
    }

    /// Attaches an activity
    pub fn with_activity(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.activity = Some(ActivityRecord {
            id: id.into(),
            name: name.into(),
        });
        self
    }
}
