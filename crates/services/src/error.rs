//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The quiz is missing, unreadable, or has no usable questions.
    #[error("quiz not found: {quiz_id}")]
    QuizUnavailable { quiz_id: QuizId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
