use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::errors::{BillingError, Result};
use crate::records::{Group, Student};

/// data access for the two file-backed collections
///
/// the engine owns no mutable state; every calculation re-reads through this
/// trait, and tests substitute an in-memory fixture
pub trait StudioStore {
    fn load_groups(&self) -> Result<Vec<Group>>;
    fn load_students(&self) -> Result<Vec<Student>>;

    fn group_by_id(&self, id: i64) -> Result<Group> {
        self.load_groups()?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or(BillingError::GroupNotFound { id })
    }

    fn group_by_name(&self, name: &str) -> Result<Group> {
        self.load_groups()?
            .into_iter()
            .find(|g| g.name == name)
            .ok_or_else(|| BillingError::GroupNameNotFound {
                name: name.to_string(),
            })
    }

    fn student_by_id(&self, id: &str) -> Result<Student> {
        self.load_students()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| BillingError::StudentNotFound { id: id.to_string() })
    }
}

/// filesystem-backed store reading `groups.json` and `students.json`
///
/// reads fresh on every call, no caching; a missing file is an empty
/// collection, a file that is not json at all is a storage error, and a
/// single malformed record inside an otherwise valid file is skipped with
/// a warning so it cannot take a batch calculation down with it
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    groups_path: PathBuf,
    students_path: PathBuf,
}

impl JsonFileStore {
    /// store over the conventional `data/` layout
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            groups_path: dir.join("groups.json"),
            students_path: dir.join("students.json"),
        }
    }

    /// store over explicit file paths
    pub fn with_paths(groups_path: PathBuf, students_path: PathBuf) -> Self {
        Self {
            groups_path,
            students_path,
        }
    }

    pub fn groups_path(&self) -> &Path {
        &self.groups_path
    }

    pub fn students_path(&self) -> &Path {
        &self.students_path
    }

    /// read the named array out of a collection file, one record at a time
    ///
    /// records are deserialized individually so one malformed entry degrades
    /// to a logged skip instead of failing the whole collection
    fn read_collection<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(path).map_err(|e| BillingError::Storage {
            message: format!("{}: {}", path.display(), e),
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| BillingError::Storage {
                message: format!("{}: {}", path.display(), e),
            })?;

        let entries = match value.get(key) {
            Some(serde_json::Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value(entry) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping malformed record");
                }
            }
        }
        Ok(records)
    }
}

impl StudioStore for JsonFileStore {
    fn load_groups(&self) -> Result<Vec<Group>> {
        Self::read_collection(&self.groups_path, "groups")
    }

    fn load_students(&self) -> Result<Vec<Student>> {
        Self::read_collection(&self.students_path, "students")
    }
}

/// in-memory store for tests and fixtures
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub groups: Vec<Group>,
    pub students: Vec<Student>,
}

impl MemoryStore {
    pub fn new(groups: Vec<Group>, students: Vec<Student>) -> Self {
        Self { groups, students }
    }
}

impl StudioStore for MemoryStore {
    fn load_groups(&self) -> Result<Vec<Group>> {
        Ok(self.groups.clone())
    }

    fn load_students(&self) -> Result<Vec<Student>> {
        Ok(self.students.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::decimal::Money;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_files_are_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load_groups().unwrap().is_empty());
        assert!(store.load_students().unwrap().is_empty());
    }

    #[test]
    fn test_loads_wire_format() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "groups.json",
            r#"{"groups": [
                {"id": 1, "name": "מתחילות א", "price": "180", "day_of_week": "שני"},
                {"id": 2, "name": "להקה", "price": "220", "day_of_week": "חמישי"}
            ]}"#,
        );
        write_file(
            dir.path(),
            "students.json",
            r#"{"students": [
                {"id": "123", "name": "דנה לוי", "group": "מתחילות א", "join_date": "01/03/2024"}
            ]}"#,
        );

        let store = JsonFileStore::new(dir.path());
        let group = store.group_by_id(2).unwrap();
        assert_eq!(group.name, "להקה");
        assert_eq!(group.price, Money::from_major(220));

        let student = store.student_by_id("123").unwrap();
        assert_eq!(student.name, "דנה לוי");
    }

    #[test]
    fn test_lookup_misses_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.group_by_id(9),
            Err(BillingError::GroupNotFound { id: 9 })
        ));
        assert!(matches!(
            store.group_by_name("אין"),
            Err(BillingError::GroupNameNotFound { .. })
        ));
        assert!(matches!(
            store.student_by_id("000"),
            Err(BillingError::StudentNotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "groups.json", "{not json");
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.load_groups(),
            Err(BillingError::Storage { .. })
        ));
    }

    #[test]
    fn test_malformed_record_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "students.json",
            r#"{"students": [
                {"id": "123", "name": "דנה לוי", "group": "מתחילות א", "join_date": "01/03/2024"},
                {"id": "456", "name": "נועה כהן", "group": "מתחילות א", "join_date": "????"}
            ]}"#,
        );

        let store = JsonFileStore::new(dir.path());
        let students = store.load_students().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "123");
    }

    #[test]
    fn test_reads_are_fresh_per_call() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "groups.json", r#"{"groups": []}"#);
        let store = JsonFileStore::new(dir.path());
        assert!(store.load_groups().unwrap().is_empty());

        write_file(
            dir.path(),
            "groups.json",
            r#"{"groups": [{"id": 1, "name": "חדשה", "price": "180"}]}"#,
        );
        assert_eq!(store.load_groups().unwrap().len(), 1);
    }
}
