use std::fs;

use quiz_core::model::{QuestionKind, QuizId};
use storage::files::JsonQuizDirectory;
use storage::repository::{QuizRepository, StorageError};

const CAPITALS: &str = r#"{
  "title": "Capitals",
  "description": "European capitals",
  "questions": [
    {
      "pregunta": "Capital of Portugal?",
      "opciones": ["Lisbon.", " Porto", "Faro"],
      "respuesta_correcta": "Lisbon"
    },
    {
      "pregunta": "Broken question",
      "opciones": ["a", "b"],
      "respuesta_correcta": "z"
    },
    {
      "pregunta": "Cities on the Danube?",
      "opciones": ["Vienna", "Budapest", "Prague"],
      "respuesta_correcta": ["Vienna", "Budapest."],
      "es_multiple_seleccion": true
    }
  ]
}"#;

fn quiz_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("capitals.json"), CAPITALS).unwrap();
    fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
    fs::write(
        dir.path().join("animals.json"),
        r#"{"title":"Animals","questions":[]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

#[tokio::test]
async fn loads_and_normalizes_questions() {
    let dir = quiz_dir();
    let source = JsonQuizDirectory::new(dir.path()).with_shuffle_options(false);

    let quiz = source
        .get_quiz(&QuizId::new("capitals").unwrap())
        .await
        .expect("quiz");
    assert_eq!(quiz.title(), "Capitals");
    assert_eq!(quiz.description(), Some("European capitals"));

    let questions = quiz.questions();
    assert_eq!(questions.len(), 2);

    assert_eq!(questions[0].id().value(), 1);
    assert_eq!(questions[0].kind(), QuestionKind::Single);
    assert_eq!(questions[0].options(), ["Lisbon", "Porto", "Faro"]);

    // The invalid second question is skipped without renumbering the third.
    assert_eq!(questions[1].id().value(), 3);
    assert_eq!(questions[1].kind(), QuestionKind::Multiple);
    assert!(questions[1].correct_answers().contains("Budapest"));
}

#[tokio::test]
async fn lists_readable_quizzes_sorted() {
    let dir = quiz_dir();
    let source = JsonQuizDirectory::new(dir.path());

    let ids: Vec<String> = source
        .list_quizzes()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.id.to_string())
        .collect();
    assert_eq!(ids, vec!["animals", "capitals"]);
}

#[tokio::test]
async fn missing_and_corrupt_files_are_errors() {
    let dir = quiz_dir();
    let source = JsonQuizDirectory::new(dir.path());

    let missing = source.get_quiz(&QuizId::new("rivers").unwrap()).await;
    assert!(matches!(missing, Err(StorageError::NotFound)));

    let corrupt = source.get_quiz(&QuizId::new("broken").unwrap()).await;
    assert!(matches!(corrupt, Err(StorageError::Serialization(_))));

    let escaping = source.get_quiz(&QuizId::new("../capitals").unwrap()).await;
    assert!(matches!(escaping, Err(StorageError::NotFound)));
}
