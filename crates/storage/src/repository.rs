use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizId, QuizSummary, SessionSnapshot};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Namespace shared by every snapshot key.
pub const SNAPSHOT_KEY_PREFIX: &str = "quiz-progress";

/// Key under which one quiz's in-progress session is stored.
///
/// Derived from the quiz id alone, so distinct quizzes never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey(String);

impl SnapshotKey {
    #[must_use]
    pub fn for_quiz(quiz_id: &QuizId) -> Self {
        Self(format!("{SNAPSHOT_KEY_PREFIX}:{quiz_id}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key-value store for session snapshots.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored payload is corrupt,
    /// or other storage errors.
    async fn get_snapshot(&self, key: &SnapshotKey)
    -> Result<Option<SessionSnapshot>, StorageError>;

    /// Store `snapshot` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    async fn put_snapshot(
        &self,
        key: &SnapshotKey,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StorageError>;

    /// Remove the snapshot under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn delete_snapshot(&self, key: &SnapshotKey) -> Result<(), StorageError>;
}

/// Source of validated question sets.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// List every available quiz, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, StorageError>;

    /// Load one quiz with its questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there is no such quiz, or other
    /// storage errors.
    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError>;
}

/// In-memory quiz catalog and snapshot store for tests and prototyping.
///
/// Snapshots are kept as JSON text, the same shape the SQLite store writes.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<BTreeMap<QuizId, Quiz>>>,
    snapshots: Arc<Mutex<HashMap<SnapshotKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a quiz in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_quiz(&self, quiz: Quiz) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id().clone(), quiz);
        Ok(())
    }

    /// Raw stored payload, for inspecting what was persisted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_snapshot(&self, key: &SnapshotKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    /// Store an arbitrary payload, bypassing serialization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw_snapshot(
        &self,
        key: &SnapshotKey,
        payload: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.clone(), payload.into());
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn get_snapshot(
        &self,
        key: &SnapshotKey,
    ) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(payload) = self.raw_snapshot(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn put_snapshot(
        &self,
        key: &SnapshotKey,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.put_raw_snapshot(key, payload)
    }

    async fn delete_snapshot(&self, key: &SnapshotKey) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().map(Quiz::summary).collect())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }
}

/// Question source and snapshot store behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Storage {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>, snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self { quizzes, snapshots }
    }
}
