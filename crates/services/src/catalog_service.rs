use std::sync::Arc;

use quiz_core::model::{Question, Quiz, QuizId, QuizSummary};
use storage::repository::QuizRepository;

/// Read access to the quiz catalog for the session layer and the UI.
///
/// Loading failures are logged and reported as "nothing there": callers only
/// see an empty result, never the storage error behind it.
#[derive(Clone)]
pub struct QuizCatalogService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizCatalogService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// Every quiz that can be listed, ordered by id.
    pub async fn list_quizzes(&self) -> Vec<QuizSummary> {
        match self.quizzes.list_quizzes().await {
            Ok(quizzes) => quizzes,
            Err(error) => {
                tracing::warn!(%error, "failed to list quizzes");
                Vec::new()
            }
        }
    }

    pub async fn quiz(&self, id: &QuizId) -> Option<Quiz> {
        match self.quizzes.get_quiz(id).await {
            Ok(quiz) => Some(quiz),
            Err(error) => {
                tracing::warn!(quiz_id = %id, %error, "failed to load quiz");
                None
            }
        }
    }

    /// The full question set of a quiz; empty when it cannot be loaded.
    pub async fn questions(&self, id: &QuizId) -> Vec<Question> {
        self.quiz(id).await.map(Quiz::into_questions).unwrap_or_default()
    }
}
