//! Quizzes stored as `<id>.json` files in one directory.

use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizId, QuizSummary};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::repository::{QuizRepository, StorageError};

mod raw;

use raw::{RawQuiz, RawQuizHeader};

const QUIZ_EXTENSION: &str = "json";

/// Read-only question source over a directory of quiz files.
#[derive(Debug, Clone)]
pub struct JsonQuizDirectory {
    root: PathBuf,
    shuffle_options: bool,
}

impl JsonQuizDirectory {
    /// Source reading from `root`, shuffling options on every load.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            shuffle_options: true,
        }
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle_options: bool) -> Self {
        self.shuffle_options = shuffle_options;
        self
    }

    /// Path of the file backing `id`, or `None` if the id could escape the
    /// directory.
    fn path_for(&self, id: &QuizId) -> Option<PathBuf> {
        let name = id.as_str();
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.root.join(format!("{name}.{QUIZ_EXTENSION}")))
    }
}

fn quiz_id_from_path(path: &Path) -> Option<QuizId> {
    if path.extension().and_then(|e| e.to_str()) != Some(QUIZ_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    QuizId::new(stem).ok()
}

async fn read_file(path: &Path) -> Result<String, StorageError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound,
            _ => StorageError::Io(e),
        })
}

#[async_trait]
impl QuizRepository for JsonQuizDirectory {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut quizzes = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(id) = quiz_id_from_path(&path) else {
                continue;
            };

            let header = read_file(&path).await.and_then(|text| {
                serde_json::from_str::<RawQuizHeader>(&text)
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            });
            match header {
                Ok(header) => quizzes.push(QuizSummary {
                    title: header.title.unwrap_or_else(|| id.to_string()),
                    description: header.description,
                    id,
                }),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable quiz file");
                }
            }
        }

        quizzes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(quizzes)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let path = self.path_for(id).ok_or(StorageError::NotFound)?;
        let text = read_file(&path).await?;
        let raw: RawQuiz =
            serde_json::from_str(&text).map_err(|e| StorageError::Serialization(e.to_string()))?;

        tracing::debug!(quiz_id = %id, questions = raw.questions.len(), "loaded quiz file");
        Ok(raw.into_quiz(id.clone(), self.shuffle_options))
    }
}
