//! In-memory acronym store.
//!
//! Records are kept in a map keyed by acronym, so iteration is always in
//! canonical order and keys are unique. Every mutation builds the complete
//! next collection, hands it to the [`Storage`] collaborator, and only
//! installs it once storage accepted it.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::codec::{self, DecodeError};
use crate::model::{AcronymRecord, RecordError};

/// Errors returned by store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load acronyms: {0}")]
    LoadFailure(#[from] DecodeError),

    #[error("Failed to save acronyms: {0}")]
    SaveFailure(#[source] io::Error),

    #[error("Acronym '{0}' not found")]
    NotFound(String),

    #[error("Acronym '{0}' already exists")]
    Duplicate(String),

    #[error(transparent)]
    InvalidRecord(#[from] RecordError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Where the acronym list is read from and written to.
pub trait Storage: fmt::Debug {
    /// Reads the raw acronym list.
    fn load(&self) -> io::Result<String>;

    /// Called with the complete next collection before it is installed.
    fn persist(&mut self, records: &[AcronymRecord]) -> io::Result<()>;

    /// Short description for logs and the status bar.
    fn describe(&self) -> String;
}

/// Reads the source file and keeps all changes in memory for the session.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    source: PathBuf,
}

impl SessionStorage {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Storage for SessionStorage {
    fn load(&self) -> io::Result<String> {
        fs::read_to_string(&self.source)
    }

    fn persist(&mut self, records: &[AcronymRecord]) -> io::Result<()> {
        // Session only: nothing is written
        debug!(count = records.len(), "session storage, changes kept in memory");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} (session only)", self.source.display())
    }
}

/// Reads the source file and writes every change back to it.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling file the new content is staged in before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn load(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn persist(&mut self, records: &[AcronymRecord]) -> io::Result<()> {
        let staging = self.staging_path();
        let written = fs::write(&staging, codec::encode(records))
            .and_then(|()| fs::rename(&staging, &self.path));
        if let Err(e) = written {
            // Leave no staging file behind; the original stays untouched
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        info!(count = records.len(), path = %self.path.display(), "acronyms written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// The session's acronym collection.
#[derive(Debug)]
pub struct RecordStore {
    records: BTreeMap<String, AcronymRecord>,
    storage: Box<dyn Storage>,
}

impl RecordStore {
    /// Creates an empty store backed by `storage`.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            records: BTreeMap::new(),
            storage,
        }
    }

    /// Reads and decodes the storage content, replacing the collection.
    ///
    /// On error the current collection is kept.
    pub fn load_initial(&mut self) -> StoreResult<usize> {
        let text = self.storage.load().map_err(DecodeError::from)?;
        let records = codec::decode(&text)?;
        self.replace_all(records)?;
        info!(count = self.len(), source = %self.storage.describe(), "acronyms loaded");
        Ok(self.len())
    }

    /// Installs `records` as the whole collection without persisting.
    pub fn replace_all(&mut self, records: Vec<AcronymRecord>) -> StoreResult<()> {
        let mut next = BTreeMap::new();
        for record in records {
            if next.contains_key(&record.acronym) {
                return Err(StoreError::Duplicate(record.acronym));
            }
            next.insert(record.acronym.clone(), record);
        }
        self.records = next;
        Ok(())
    }

    /// Adds a new record.
    pub fn add(&mut self, record: AcronymRecord) -> StoreResult<()> {
        record.validate()?;
        if self.records.contains_key(&record.acronym) {
            return Err(StoreError::Duplicate(record.acronym));
        }

        let mut next = self.records.clone();
        debug!(acronym = %record.acronym, "adding acronym");
        next.insert(record.acronym.clone(), record);
        self.persist(next)
    }

    /// Replaces the record stored under `old_key`.
    ///
    /// The acronym may change, as long as it does not collide with another record.
    pub fn update(&mut self, old_key: &str, record: AcronymRecord) -> StoreResult<()> {
        record.validate()?;
        if !self.records.contains_key(old_key) {
            return Err(StoreError::NotFound(old_key.to_string()));
        }
        if record.acronym != old_key && self.records.contains_key(&record.acronym) {
            return Err(StoreError::Duplicate(record.acronym));
        }

        let mut next = self.records.clone();
        debug!(from = old_key, to = %record.acronym, "updating acronym");
        next.remove(old_key);
        next.insert(record.acronym.clone(), record);
        self.persist(next)
    }

    /// Removes the record stored under `key`.
    pub fn delete(&mut self, key: &str) -> StoreResult<()> {
        if !self.records.contains_key(key) {
            return Err(StoreError::NotFound(key.to_string()));
        }

        let mut next = self.records.clone();
        debug!(acronym = key, "deleting acronym");
        next.remove(key);
        self.persist(next)
    }

    /// Hands `next` to storage and installs it on success.
    fn persist(&mut self, next: BTreeMap<String, AcronymRecord>) -> StoreResult<()> {
        let list: Vec<AcronymRecord> = next.values().cloned().collect();
        self.storage.persist(&list).map_err(StoreError::SaveFailure)?;
        self.records = next;
        info!(count = self.len(), "acronyms updated");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AcronymRecord> {
        self.records.get(key)
    }

    /// Records in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &AcronymRecord> {
        self.records.values()
    }

    /// An owned copy of the collection in canonical order.
    pub fn records(&self) -> Vec<AcronymRecord> {
        self.iter().cloned().collect()
    }

    /// Records matching `term`, see [`filter`].
    pub fn filtered(&self, term: &str) -> Vec<&AcronymRecord> {
        filter(self.iter(), term)
    }

    /// Where the store reads from and writes to.
    pub fn storage_description(&self) -> String {
        self.storage.describe()
    }
}

/// Keeps records whose acronym or description contains `term`, ignoring case.
///
/// Order is preserved. An empty term keeps everything.
pub fn filter<'a, I>(records: I, term: &str) -> Vec<&'a AcronymRecord>
where
    I: IntoIterator<Item = &'a AcronymRecord>,
{
    let needle = term.to_lowercase();
    records.into_iter().filter(|r| r.matches(&needle)).collect()
}

/// Opens the storage backend for `path`.
pub fn open_storage(path: &Path, write_back: bool) -> Box<dyn Storage> {
    if write_back {
        Box::new(FileStorage::new(path))
    } else {
        Box::new(SessionStorage::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory storage that can be told to reject writes.
    #[derive(Debug, Default)]
    struct MemoryStorage {
        content: String,
        fail_persist: bool,
    }

    impl Storage for MemoryStorage {
        fn load(&self) -> io::Result<String> {
            Ok(self.content.clone())
        }

        fn persist(&mut self, records: &[AcronymRecord]) -> io::Result<()> {
            if self.fail_persist {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.content = codec::encode(records);
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn rec(acronym: &str, description: &str) -> AcronymRecord {
        AcronymRecord::new(acronym, description)
    }

    fn loaded(content: &str) -> RecordStore {
        let storage = MemoryStorage {
            content: content.to_string(),
            fail_persist: false,
        };
        let mut store = RecordStore::new(Box::new(storage));
        store.load_initial().unwrap();
        store
    }

    fn keys(store: &RecordStore) -> Vec<&str> {
        store.iter().map(|r| r.acronym.as_str()).collect()
    }

    fn assert_sorted(store: &RecordStore) {
        let k = keys(store);
        let mut sorted = k.clone();
        sorted.sort();
        assert_eq!(k, sorted);
    }

    #[test]
    fn test_load_initial() {
        let store = loaded("NASA|National Aeronautics\nFBI|Federal Bureau");
        assert_eq!(
            store.records(),
            vec![rec("FBI", "Federal Bureau"), rec("NASA", "National Aeronautics")]
        );
    }

    #[test]
    fn test_load_failure_keeps_previous() {
        let mut store = loaded("FBI|Federal Bureau");
        store.storage = Box::new(MemoryStorage {
            content: "broken line".to_string(),
            fail_persist: false,
        });
        let result = store.load_initial();
        assert!(matches!(result, Err(StoreError::LoadFailure(DecodeError::MissingDelimiter { line: 1 }))));
        assert_eq!(keys(&store), vec!["FBI"]);
    }

    #[test]
    fn test_load_rejects_invalid_record() {
        let mut store = RecordStore::new(Box::new(MemoryStorage {
            content: "FBI|Federal Bureau\nCIA|".to_string(),
            fail_persist: false,
        }));
        let result = store.load_initial();
        assert!(matches!(
            result,
            Err(StoreError::LoadFailure(DecodeError::InvalidRecord {
                line: 2,
                source: RecordError::EmptyDescription,
            }))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::new(Box::new(SessionStorage::new(dir.path().join("none.txt"))));
        let result = store.load_initial();
        assert!(matches!(result, Err(StoreError::LoadFailure(DecodeError::IoError(_)))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_delete_update_scenario() {
        let mut store = loaded("NASA|National Aeronautics\nFBI|Federal Bureau");

        store.add(rec("CIA", "Central Intelligence")).unwrap();
        assert_eq!(keys(&store), vec!["CIA", "FBI", "NASA"]);

        store.delete("FBI").unwrap();
        assert_eq!(keys(&store), vec!["CIA", "NASA"]);

        store.update("CIA", rec("CIA", "Updated")).unwrap();
        assert_eq!(
            store.records(),
            vec![rec("CIA", "Updated"), rec("NASA", "National Aeronautics")]
        );
    }

    #[test]
    fn test_operations_keep_canonical_order() {
        let mut store = loaded("m|lower m\nB|upper b");
        store.add(rec("a", "lower a")).unwrap();
        assert_sorted(&store);
        store.add(rec("Z", "upper z")).unwrap();
        assert_sorted(&store);
        store.update("B", rec("y", "renamed")).unwrap();
        assert_sorted(&store);
        store.delete("m").unwrap();
        assert_sorted(&store);
        assert_eq!(keys(&store), vec!["Z", "a", "y"]);
    }

    #[test]
    fn test_add_duplicate() {
        let mut store = loaded("FBI|Federal Bureau");
        let result = store.add(rec("FBI", "Something else"));
        assert!(matches!(result, Err(StoreError::Duplicate(ref k)) if k == "FBI"));
        assert_eq!(store.get("FBI").unwrap().description, "Federal Bureau");
    }

    #[test]
    fn test_add_invalid() {
        let mut store = loaded("");
        let result = store.add(rec("A|B", "x"));
        assert!(matches!(result, Err(StoreError::InvalidRecord(RecordError::DelimiterInAcronym))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_missing_key() {
        let mut store = loaded("FBI|Federal Bureau");
        let result = store.update("CIA", rec("CIA", "Central Intelligence"));
        assert!(matches!(result, Err(StoreError::NotFound(ref k)) if k == "CIA"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_rename_collision() {
        let mut store = loaded("CIA|Central Intelligence\nFBI|Federal Bureau");
        let result = store.update("CIA", rec("FBI", "Clash"));
        assert!(matches!(result, Err(StoreError::Duplicate(ref k)) if k == "FBI"));
        assert_eq!(store.get("CIA").unwrap().description, "Central Intelligence");
    }

    #[test]
    fn test_update_rename() {
        let mut store = loaded("CIA|Central Intelligence\nFBI|Federal Bureau");
        store.update("CIA", rec("NSA", "National Security")).unwrap();
        assert_eq!(keys(&store), vec!["FBI", "NSA"]);
        assert!(store.get("CIA").is_none());
    }

    #[test]
    fn test_delete_missing_key() {
        let mut store = loaded("FBI|Federal Bureau");
        assert!(matches!(store.delete("CIA"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_save_failure_leaves_collection() {
        let storage = MemoryStorage {
            content: "FBI|Federal Bureau".to_string(),
            fail_persist: true,
        };
        let mut store = RecordStore::new(Box::new(storage));
        store.load_initial().unwrap();

        assert!(matches!(store.add(rec("CIA", "x")), Err(StoreError::SaveFailure(_))));
        assert!(matches!(store.delete("FBI"), Err(StoreError::SaveFailure(_))));
        assert!(matches!(store.update("FBI", rec("FBI", "y")), Err(StoreError::SaveFailure(_))));
        assert_eq!(store.records(), vec![rec("FBI", "Federal Bureau")]);
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let mut store = loaded("FBI|Federal Bureau");
        let result = store.replace_all(vec![rec("A", "1"), rec("A", "2")]);
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(keys(&store), vec!["FBI"]);
    }

    #[test]
    fn test_filter() {
        let records = vec![
            rec("API", "Application Programming Interface"),
            rec("FBI", "Federal Bureau"),
            rec("NASA", "National Aeronautics"),
        ];

        let all = filter(&records, "");
        assert_eq!(all, records.iter().collect::<Vec<_>>());

        let hits = filter(&records, "api");
        assert_eq!(hits, vec![&records[0]]);

        let hits = filter(&records, "NA");
        assert_eq!(hits, vec![&records[2]]);

        let hits = filter(&records, "a");
        assert_eq!(hits.len(), 3);

        assert!(filter(&records, "zzz").is_empty());
    }

    #[test]
    fn test_filter_matches_description_case_insensitively() {
        let store = loaded("FBI|Federal Bureau\nCIA|Central Intelligence");
        let hits: Vec<&str> = store.filtered("BUREAU").iter().map(|r| r.acronym.as_str()).collect();
        assert_eq!(hits, vec!["FBI"]);
    }

    #[test]
    fn test_session_storage_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MasterAcronym.txt");
        fs::write(&path, "FBI|Federal Bureau").unwrap();

        let mut store = RecordStore::new(open_storage(&path, false));
        store.load_initial().unwrap();
        store.add(rec("CIA", "Central Intelligence")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "FBI|Federal Bureau");
    }

    #[test]
    fn test_file_storage_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MasterAcronym.txt");
        fs::write(&path, "NASA|National Aeronautics\nFBI|Federal Bureau\n").unwrap();

        let mut store = RecordStore::new(open_storage(&path, true));
        store.load_initial().unwrap();
        store.add(rec("CIA", "Central Intelligence")).unwrap();
        store.delete("NASA").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "CIA|Central Intelligence\nFBI|Federal Bureau"
        );
        assert!(!dir.path().join("MasterAcronym.txt.tmp").exists());

        // A fresh session sees the written data
        let mut reopened = RecordStore::new(open_storage(&path, true));
        reopened.load_initial().unwrap();
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn test_file_storage_failure_is_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("MasterAcronym.txt");
        let mut store = RecordStore::new(Box::new(FileStorage::new(&path)));
        let result = store.add(rec("CIA", "Central Intelligence"));
        assert!(matches!(result, Err(StoreError::SaveFailure(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_storage_failed_rename_removes_staging() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let path = dir.path().join("MasterAcronym.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "").unwrap();

        let mut storage = FileStorage::new(&path);
        let result = storage.persist(&[rec("CIA", "Central Intelligence")]);
        assert!(result.is_err());
        assert!(!dir.path().join("MasterAcronym.txt.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
