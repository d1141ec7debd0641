//! Static user directory, loaded once at startup from a JSON file.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

use crate::data::{entities::UserRecord, errors::DirectoryError};

/// Reads `path` and parses it as JSON into `target`.
///
/// Returns `false` and logs the error when the file cannot be read or
/// parsed. `target` is only overwritten on success.
pub fn import_json_file<T: DeserializeOwned>(path: impl AsRef<Path>, target: &mut T) -> bool {
    match read_json(path.as_ref()) {
        Ok(value) => {
            *target = value;
            true
        }
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DirectoryError> {
    let content = std::fs::read_to_string(path).map_err(|source| DirectoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DirectoryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read-only mapping from user id to user record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    /// Loads the directory, failing on unreadable or malformed files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let raw: HashMap<String, UserRecord> = read_json(path.as_ref())?;
        Ok(Self::from_entries(raw))
    }

    /// Startup entry point: a failed load leaves the directory empty.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut raw: HashMap<String, UserRecord> = HashMap::new();
        if !import_json_file(path, &mut raw) {
            warn!("User directory {} not loaded, continuing with no users", path.display());
        }
        let directory = Self::from_entries(raw);
        info!("Loaded {} user(s) from {}", directory.len(), path.display());
        directory
    }

    /// Re-keys file entries by each record's own `id`.
    pub fn from_entries(entries: HashMap<String, UserRecord>) -> Self {
        let users = entries
            .into_iter()
            .map(|(key, user)| {
                if key != user.id {
                    warn!("User directory key {:?} does not match record id {:?}, using the id", key, user.id);
                }
                (user.id.clone(), user)
            })
            .collect();
        Self { users }
    }

    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.users.get(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_import_json_file_keeps_target_on_parse_failure() {
        let file = write_temp("{ not json");
        let mut target = vec![1, 2, 3];

        assert!(!import_json_file(file.path(), &mut target));
        assert_eq!(target, vec![1, 2, 3]);
    }

    #[test]
    fn test_import_json_file_missing_file() {
        let mut target: HashMap<String, UserRecord> = HashMap::new();
        assert!(!import_json_file("/definitely/not/here.json", &mut target));
        assert!(target.is_empty());
    }

    #[test]
    fn test_mismatched_key_uses_record_id() {
        let mut entries = HashMap::new();
        entries.insert(
            "alias".to_string(),
            UserRecord {
                id: "42".to_string(),
                name: "Dan".to_string(),
                role: "user".to_string(),
            },
        );

        let directory = UserDirectory::from_entries(entries);
        assert!(directory.get("alias").is_none());
        assert_eq!(directory.get("42").map(|u| u.name.as_str()), Some("Dan"));
    }
}
