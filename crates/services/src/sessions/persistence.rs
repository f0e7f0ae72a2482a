use std::sync::Arc;

use quiz_core::model::SessionSnapshot;
use storage::repository::{SnapshotKey, SnapshotRepository};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
enum Command {
    Save(SessionSnapshot),
    Discard,
    Flush(oneshot::Sender<()>),
}

/// Background writer that mirrors one quiz's session into the snapshot store.
///
/// Commands are applied in the order they were sent. Callers never wait for
/// a write; failures are logged and dropped. The task ends once every handle
/// is gone.
#[derive(Clone)]
pub struct SnapshotWriter {
    key: SnapshotKey,
    tx: mpsc::UnboundedSender<Command>,
}

impl SnapshotWriter {
    /// Start the writer task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(key: SnapshotKey, snapshots: Arc<dyn SnapshotRepository>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(key.clone(), snapshots, rx));
        Self { key, tx }
    }

    pub fn save(&self, snapshot: SessionSnapshot) {
        self.send(Command::Save(snapshot));
    }

    pub fn discard(&self) {
        self.send(Command::Discard);
    }

    /// Wait until every command sent before this call has been applied.
    pub async fn flush(&self) {
        let (done, applied) = oneshot::channel();
        if self.tx.send(Command::Flush(done)).is_ok() {
            let _ = applied.await;
        }
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::warn!(key = %self.key, "snapshot writer stopped, dropping write");
        }
    }
}

async fn run(
    key: SnapshotKey,
    snapshots: Arc<dyn SnapshotRepository>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Save(snapshot) => {
                if let Err(error) = snapshots.put_snapshot(&key, &snapshot).await {
                    tracing::warn!(%key, %error, "failed to save quiz progress");
                }
            }
            Command::Discard => {
                if let Err(error) = snapshots.delete_snapshot(&key).await {
                    tracing::warn!(%key, %error, "failed to discard quiz progress");
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!(%key, "snapshot writer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{QuestionId, QuizId};
    use std::collections::BTreeSet;
    use storage::repository::{InMemoryRepository, StorageError};

    fn snapshot(index: usize) -> SessionSnapshot {
        SessionSnapshot {
            status: None,
            active_question_ids: vec![QuestionId::new(1), QuestionId::new(2), QuestionId::new(3)],
            current_question_index: index,
            selected_answers: BTreeSet::new(),
            is_submitted: false,
            correct_count: 0,
            incorrect_count: 0,
            incorrectly_answered_ids: BTreeSet::new(),
        }
    }

    fn key() -> SnapshotKey {
        SnapshotKey::for_quiz(&QuizId::new("geo").unwrap())
    }

    #[tokio::test]
    async fn writes_apply_in_send_order() {
        let repo = InMemoryRepository::new();
        let writer = SnapshotWriter::spawn(key(), Arc::new(repo.clone()));

        writer.save(snapshot(0));
        writer.save(snapshot(1));
        writer.discard();
        writer.save(snapshot(2));
        writer.flush().await;

        let stored = repo.get_snapshot(&key()).await.unwrap();
        assert_eq!(stored, Some(snapshot(2)));
    }

    struct FailingStore;

    #[async_trait]
    impl SnapshotRepository for FailingStore {
        async fn get_snapshot(
            &self,
            _key: &SnapshotKey,
        ) -> Result<Option<SessionSnapshot>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn put_snapshot(
            &self,
            _key: &SnapshotKey,
            _snapshot: &SessionSnapshot,
        ) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn delete_snapshot(&self, _key: &SnapshotKey) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let writer = SnapshotWriter::spawn(key(), Arc::new(FailingStore));
        writer.save(snapshot(0));
        writer.discard();
        writer.flush().await;
        writer.save(snapshot(1));
        writer.flush().await;
    }
}
