//! On-disk quiz file shape and its normalization into domain questions.

use quiz_core::model::{Question, QuestionError, QuestionId, QuestionKind, Quiz, QuizId};
use rand::seq::SliceRandom;
use serde::Deserialize;

/// Title and description only; used when listing the catalog.
#[derive(Debug, Deserialize)]
pub(crate) struct RawQuizHeader {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawQuiz {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawQuestion {
    #[serde(alias = "pregunta")]
    pub question: String,
    #[serde(alias = "opciones")]
    pub options: Vec<String>,
    #[serde(alias = "respuesta_correcta", alias = "correct_answers")]
    pub correct_answer: RawAnswer,
    #[serde(default, alias = "es_multiple_seleccion")]
    pub multiple: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAnswer {
    One(String),
    Many(Vec<String>),
}

/// Trims and drops a single trailing period, so `"Paris."` matches `"Paris"`.
pub(crate) fn normalize(text: &str) -> String {
    let trimmed = text.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_owned()
}

impl RawQuestion {
    pub(crate) fn into_question(
        self,
        id: QuestionId,
        shuffle_options: bool,
    ) -> Result<Question, QuestionError> {
        let (kind, answers) = match self.correct_answer {
            RawAnswer::One(answer) if !self.multiple => (QuestionKind::Single, vec![answer]),
            RawAnswer::One(answer) => (QuestionKind::Multiple, vec![answer]),
            RawAnswer::Many(answers) => (QuestionKind::Multiple, answers),
        };

        let mut options: Vec<String> = self.options.iter().map(|o| normalize(o)).collect();
        if shuffle_options {
            options.shuffle(&mut rand::rng());
        }

        Question::new(
            id,
            self.question.trim(),
            options,
            kind,
            answers.iter().map(|a| normalize(a)),
        )
    }
}

impl RawQuiz {
    /// Build a quiz, numbering questions by their 1-based position in the file.
    ///
    /// Invalid questions are skipped with a warning; the others keep their
    /// positional ids.
    pub(crate) fn into_quiz(self, id: QuizId, shuffle_options: bool) -> Quiz {
        let mut questions = Vec::with_capacity(self.questions.len());
        for (position, raw) in (1_u64..).zip(self.questions) {
            match raw.into_question(QuestionId::new(position), shuffle_options) {
                Ok(question) => questions.push(question),
                Err(error) => {
                    tracing::warn!(quiz_id = %id, %error, "skipping invalid question");
                }
            }
        }

        let title = self.title.unwrap_or_else(|| id.to_string());
        Quiz::new(id, title, self.description, questions)
    }
}
