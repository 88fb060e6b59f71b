//! Progress persistence for the extended questionnaire.
//!
//! Progress is the pair of (page cursor, answer map), persisted as one
//! record per user identity. The file-backed store writes atomically so an
//! interrupted save can never corrupt a previously good record.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::answers::AnswerStore;

/// Directory under the data dir holding one record per identity.
const PROGRESS_DIR_NAME: &str = "progress";

/// Errors that can occur during progress persistence.
#[derive(Error, Debug)]
pub enum PersistError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored record was written by a newer format version.
    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Persisted extended-questionnaire state for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProgress {
    /// Record format version for future compatibility.
    pub version: u32,
    /// When this record was written.
    pub updated_at: DateTime<Utc>,
    /// Current zero-based page index; equal to the page count once every
    /// page has been exhausted.
    pub page: usize,
    /// Answers recorded so far.
    pub answers: AnswerStore,
}

impl ExtendedProgress {
    /// Current record format version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Snapshot the given state with the current timestamp.
    pub fn new(page: usize, answers: AnswerStore) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            updated_at: Utc::now(),
            page,
            answers,
        }
    }

    /// A fresh record: page 0, no answers.
    pub fn fresh() -> Self {
        Self::new(0, AnswerStore::new())
    }
}

/// Storage contract the questionnaire controller depends on.
///
/// Implementations must be idempotent, immediately consistent within the
/// calling process, and must never leak progress across identities. Last
/// write wins.
pub trait ProgressStore {
    /// Persist the record for an identity, replacing any prior record.
    fn save(&self, identity: &str, progress: &ExtendedProgress) -> PersistResult<()>;

    /// Load the record for an identity, or `None` if absent.
    fn load(&self, identity: &str) -> PersistResult<Option<ExtendedProgress>>;

    /// Remove the record for an identity. Removing an absent record is not
    /// an error.
    fn clear(&self, identity: &str) -> PersistResult<()>;
}

/// File-backed store: one JSON file per identity under the data directory.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    dir: PathBuf,
}

impl FileProgressStore {
    /// Create a store rooted at `data_dir`, creating the progress
    /// directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> PersistResult<Self> {
        let dir = data_dir.into().join(PROGRESS_DIR_NAME);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// File path for an identity. Hex-encoding keeps arbitrary identity
    /// strings collision-free and filesystem-safe.
    fn path_for(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(identity)))
    }

    /// Whether a record exists for the identity.
    pub fn exists(&self, identity: &str) -> bool {
        self.path_for(identity).exists()
    }
}

impl ProgressStore for FileProgressStore {
    fn save(&self, identity: &str, progress: &ExtendedProgress) -> PersistResult<()> {
        let json = serde_json::to_string_pretty(progress)?;
        let path = self.path_for(identity);

        // Temp file in the same directory so the rename stays atomic.
        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn load(&self, identity: &str) -> PersistResult<Option<ExtendedProgress>> {
        match fs::read_to_string(self.path_for(identity)) {
            Ok(content) => {
                let progress: ExtendedProgress = serde_json::from_str(&content)?;
                if progress.version > ExtendedProgress::CURRENT_VERSION {
                    return Err(PersistError::VersionMismatch {
                        expected: ExtendedProgress::CURRENT_VERSION,
                        found: progress.version,
                    });
                }
                Ok(Some(progress))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Io(e)),
        }
    }

    fn clear(&self, identity: &str) -> PersistResult<()> {
        match fs::remove_file(self.path_for(identity)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Io(e)),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: Mutex<HashMap<String, ExtendedProgress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn save(&self, identity: &str, progress: &ExtendedProgress) -> PersistResult<()> {
        let mut records = self.records.lock().unwrap();
        records.insert(identity.to_string(), progress.clone());
        Ok(())
    }

    fn load(&self, identity: &str) -> PersistResult<Option<ExtendedProgress>> {
        let records = self.records.lock().unwrap();
        Ok(records.get(identity).cloned())
    }

    fn clear(&self, identity: &str) -> PersistResult<()> {
        let mut records = self.records.lock().unwrap();
        records.remove(identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_progress() -> ExtendedProgress {
        let mut answers = AnswerStore::new();
        answers.record(1, "오늘 해야 할 일과 일정");
        answers.record(4, "끝나지 않는 회의");
        ExtendedProgress::new(2, answers)
    }

    #[test]
    fn test_new_creates_progress_directory() {
        let temp_dir = TempDir::new().unwrap();
        let _store = FileProgressStore::new(temp_dir.path()).unwrap();
        assert!(temp_dir.path().join("progress").is_dir());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();

        let progress = sample_progress();
        store.save("user@example.com", &progress).unwrap();

        let loaded = store
            .load("user@example.com")
            .unwrap()
            .expect("record should exist");
        assert_eq!(loaded.page, progress.page);
        assert_eq!(loaded.answers, progress.answers);
    }

    #[test]
    fn test_load_absent_identity_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();
        assert!(store.load("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_no_cross_identity_leakage() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();

        store.save("a@example.com", &sample_progress()).unwrap();

        assert!(store.load("b@example.com").unwrap().is_none());
        assert!(store.exists("a@example.com"));
        assert!(!store.exists("b@example.com"));
    }

    #[test]
    fn test_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();

        store.save("u@example.com", &sample_progress()).unwrap();
        let second = ExtendedProgress::new(4, AnswerStore::new());
        store.save("u@example.com", &second).unwrap();

        let loaded = store.load("u@example.com").unwrap().unwrap();
        assert_eq!(loaded.page, 4);
        assert!(loaded.answers.is_empty());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();
        store.save("u@example.com", &sample_progress()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path().join("progress"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_clear_removes_record_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();

        store.save("u@example.com", &sample_progress()).unwrap();
        store.clear("u@example.com").unwrap();
        assert!(!store.exists("u@example.com"));

        // Clearing an absent record succeeds.
        store.clear("u@example.com").unwrap();
    }

    #[test]
    fn test_load_corrupt_record_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();

        let path = temp_dir
            .path()
            .join("progress")
            .join(format!("{}.json", hex::encode("u@example.com")));
        fs::write(&path, "{ not json }").unwrap();

        assert!(matches!(
            store.load("u@example.com"),
            Err(PersistError::Json(_))
        ));
    }

    #[test]
    fn test_load_future_version_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProgressStore::new(temp_dir.path()).unwrap();

        let mut progress = sample_progress();
        progress.version = ExtendedProgress::CURRENT_VERSION + 1;
        store.save("u@example.com", &progress).unwrap();

        assert!(matches!(
            store.load("u@example.com"),
            Err(PersistError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryProgressStore::new();
        store.save("u@example.com", &sample_progress()).unwrap();

        let loaded = store.load("u@example.com").unwrap().unwrap();
        assert_eq!(loaded.page, 2);
        assert!(store.load("other@example.com").unwrap().is_none());

        store.clear("u@example.com").unwrap();
        assert!(store.load("u@example.com").unwrap().is_none());
    }
}
