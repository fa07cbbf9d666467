use log::debug;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::model::Project;

/// Durable home of the whole project collection, written in one piece.
pub trait Storage {
    /// The stored collection, or `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Project>>, StorageError>;

    /// Replace the stored collection.
    fn save(&self, projects: &[Project]) -> Result<(), StorageError>;
}

/// Parse a stored blob. Anything but a JSON array is rejected.
pub fn parse_projects(json: &str) -> Result<Vec<Project>, StorageError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(StorageError::InvalidPayload(format!(
            "expected an array of projects, found {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

pub fn to_json(projects: &[Project]) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(projects)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Stores the collection as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "projects.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<Project>>, StorageError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        parse_projects(&json).map(Some)
    }

    fn save(&self, projects: &[Project]) -> Result<(), StorageError> {
        let json = to_json(projects)?;
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        debug!(
            "event=storage_save module=io status=ok projects={} path={}",
            projects.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Keeps the serialized collection in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw stored blob, valid or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Project>>, StorageError> {
        match self.blob.borrow().as_deref() {
            Some(json) => parse_projects(json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, projects: &[Project]) -> Result<(), StorageError> {
        let json = to_json(projects)?;
        *self.blob.borrow_mut() = Some(json);
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn load(&self) -> Result<Option<Vec<Project>>, StorageError> {
        (**self).load()
    }

    fn save(&self, projects: &[Project]) -> Result<(), StorageError> {
        (**self).save(projects)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self) -> Result<Option<Vec<Project>>, StorageError> {
        (**self).load()
    }

    fn save(&self, projects: &[Project]) -> Result<(), StorageError> {
        (**self).save(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_array_payloads() {
        let err = parse_projects(r#"{"projects": []}"#).unwrap_err();
        assert!(matches!(err, StorageError::InvalidPayload(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = parse_projects("[{").unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)));
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse_projects("[]").unwrap().is_empty());
    }

    #[test]
    fn memory_storage_starts_empty() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        storage.save(&[]).unwrap();
        assert_eq!(storage.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn temp_path_sits_next_to_target() {
        let storage = JsonFileStorage::new("/data/projects.json");
        assert_eq!(storage.temp_path(), PathBuf::from("/data/projects.json.tmp"));
    }
}
