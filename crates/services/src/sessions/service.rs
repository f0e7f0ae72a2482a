use std::sync::Arc;

use quiz_core::model::{QuizId, Session, SessionSnapshot};
use storage::repository::{SnapshotKey, SnapshotRepository};

use super::persistence::SnapshotWriter;
use super::session::QuizSession;
use crate::Clock;
use crate::catalog_service::QuizCatalogService;
use crate::error::SessionError;
use crate::notifier::Notifier;

/// Opens quiz sessions, resuming stored progress when it still fits.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    catalog: QuizCatalogService,
    snapshots: Arc<dyn SnapshotRepository>,
    notifier: Arc<dyn Notifier>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: QuizCatalogService,
        snapshots: Arc<dyn SnapshotRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            clock,
            catalog,
            snapshots,
            notifier,
        }
    }

    /// Open a session for `quiz_id`.
    ///
    /// Stored progress is resumed against the current question set; anything
    /// unusable (unreadable, nothing resolving, index out of range) starts a
    /// fresh attempt instead. The opened session is written back right away.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizUnavailable` if the quiz cannot be loaded or
    /// has no questions.
    pub async fn open(&self, quiz_id: &QuizId) -> Result<QuizSession, SessionError> {
        let full_set = self.catalog.questions(quiz_id).await;
        if full_set.is_empty() {
            return Err(SessionError::QuizUnavailable {
                quiz_id: quiz_id.clone(),
            });
        }

        let key = SnapshotKey::for_quiz(quiz_id);
        let resumed = self
            .load_snapshot(&key)
            .await
            .and_then(|snapshot| snapshot.resume(&full_set));
        let session = match resumed {
            Some(session) => {
                tracing::info!(
                    quiz_id = %quiz_id,
                    index = session.current_index(),
                    pool = session.total_questions(),
                    "resumed stored progress"
                );
                session
            }
            None => {
                tracing::info!(quiz_id = %quiz_id, questions = full_set.len(), "starting fresh attempt");
                Session::fresh(full_set.clone())
            }
        };

        let writer = SnapshotWriter::spawn(key, Arc::clone(&self.snapshots));
        writer.save(session.snapshot());

        Ok(QuizSession::new(
            quiz_id.clone(),
            full_set,
            session,
            self.clock,
            writer,
            Arc::clone(&self.notifier),
        ))
    }

    /// Delete the stored progress for `quiz_id`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be reached.
    pub async fn discard_progress(&self, quiz_id: &QuizId) -> Result<(), SessionError> {
        let key = SnapshotKey::for_quiz(quiz_id);
        self.snapshots.delete_snapshot(&key).await?;
        tracing::info!(%key, "discarded quiz progress");
        Ok(())
    }

    async fn load_snapshot(&self, key: &SnapshotKey) -> Option<SessionSnapshot> {
        match self.snapshots.get_snapshot(key).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%key, %error, "stored progress is unreadable");
                None
            }
        }
    }
}
