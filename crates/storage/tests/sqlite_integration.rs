use std::collections::BTreeSet;

use quiz_core::model::{QuestionId, QuizId, SessionSnapshot, SessionStatus};
use storage::repository::{SnapshotKey, SnapshotRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn snapshot(index: usize, correct: u32) -> SessionSnapshot {
    SessionSnapshot {
        status: Some(SessionStatus::Active),
        active_question_ids: (1..=4).map(QuestionId::new).collect(),
        current_question_index: index,
        selected_answers: BTreeSet::from(["Lisbon".to_string()]),
        is_submitted: true,
        correct_count: correct,
        incorrect_count: 1,
        incorrectly_answered_ids: BTreeSet::from([QuestionId::new(2)]),
    }
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_snapshot_roundtrip_and_overwrite() {
    let repo = connect("memdb_snapshot_roundtrip").await;
    let key = SnapshotKey::for_quiz(&QuizId::new("capitals").unwrap());

    assert!(repo.get_snapshot(&key).await.unwrap().is_none());

    repo.put_snapshot(&key, &snapshot(1, 1)).await.unwrap();
    repo.put_snapshot(&key, &snapshot(3, 2)).await.unwrap();

    let stored = repo.get_snapshot(&key).await.unwrap().expect("snapshot");
    assert_eq!(stored, snapshot(3, 2));
}

#[tokio::test]
async fn sqlite_delete_only_touches_one_quiz() {
    let repo = connect("memdb_snapshot_delete").await;
    let capitals = SnapshotKey::for_quiz(&QuizId::new("capitals").unwrap());
    let rivers = SnapshotKey::for_quiz(&QuizId::new("rivers").unwrap());

    repo.put_snapshot(&capitals, &snapshot(0, 0)).await.unwrap();
    repo.put_snapshot(&rivers, &snapshot(2, 1)).await.unwrap();
    repo.delete_snapshot(&capitals).await.unwrap();

    assert!(repo.get_snapshot(&capitals).await.unwrap().is_none());
    assert_eq!(repo.get_snapshot(&rivers).await.unwrap(), Some(snapshot(2, 1)));
}

#[tokio::test]
async fn sqlite_corrupt_payload_is_reported() {
    let repo = connect("memdb_snapshot_corrupt").await;
    let key = SnapshotKey::for_quiz(&QuizId::new("capitals").unwrap());

    sqlx::query("INSERT INTO quiz_snapshots (key, payload, updated_at) VALUES (?1, ?2, ?3)")
        .bind(key.as_str())
        .bind("{\"activeQuestionIds\": oops")
        .bind("2024-01-01T00:00:00Z")
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.get_snapshot(&key).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
