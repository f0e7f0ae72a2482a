use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} has no correct answer")]
    NoCorrectAnswer { id: QuestionId },

    #[error("question {id}: correct answer {answer:?} is not one of the options")]
    AnswerNotAnOption { id: QuestionId, answer: String },

    #[error("single-choice question {id} must have exactly one correct answer, got {count}")]
    AmbiguousSingle { id: QuestionId, count: usize },
}

//
// ─── KIND & GRADE ──────────────────────────────────────────────────────────────
//

/// How answers are selected for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Picking an option replaces the previous pick.
    Single,
    /// Picking an option toggles it in the selection.
    Multiple,
}

/// Binary outcome of grading a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect,
}

impl Grade {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Grade::Correct)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated, immutable quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    kind: QuestionKind,
    correct_answers: BTreeSet<String>,
}

impl Question {
    /// Builds a question, checking that the correct answers are consistent
    /// with the options and the kind.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if there are no options, no correct answers,
    /// a correct answer missing from the options, or a `Single` question with
    /// more than one correct answer.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        kind: QuestionKind,
        correct_answers: impl IntoIterator<Item = String>,
    ) -> Result<Self, QuestionError> {
        let correct_answers: BTreeSet<String> = correct_answers.into_iter().collect();

        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }
        if correct_answers.is_empty() {
            return Err(QuestionError::NoCorrectAnswer { id });
        }
        if let Some(missing) = correct_answers.iter().find(|a| !options.contains(a)) {
            return Err(QuestionError::AnswerNotAnOption {
                id,
                answer: missing.clone(),
            });
        }
        if kind == QuestionKind::Single && correct_answers.len() != 1 {
            return Err(QuestionError::AmbiguousSingle {
                id,
                count: correct_answers.len(),
            });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            kind,
            correct_answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn correct_answers(&self) -> &BTreeSet<String> {
        &self.correct_answers
    }

    /// Grades a selection by exact set equality with the correct answers.
    ///
    /// Selection order is irrelevant; a superset or subset of the correct
    /// answers is incorrect.
    #[must_use]
    pub fn grade(&self, selected: &BTreeSet<String>) -> Grade {
        if *selected == self.correct_answers {
            Grade::Correct
        } else {
            Grade::Incorrect
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn selection(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn rejects_answer_outside_options() {
        let err = Question::new(
            QuestionId::new(1),
            "Q",
            opts(&["A", "B"]),
            QuestionKind::Single,
            opts(&["C"]),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::AnswerNotAnOption { .. }));
    }

    #[test]
    fn rejects_single_with_two_answers() {
        let err = Question::new(
            QuestionId::new(1),
            "Q",
            opts(&["A", "B"]),
            QuestionKind::Single,
            opts(&["A", "B"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuestionError::AmbiguousSingle {
                id: QuestionId::new(1),
                count: 2
            }
        );
    }

    #[test]
    fn rejects_empty_correct_set() {
        let err = Question::new(
            QuestionId::new(3),
            "Q",
            opts(&["A"]),
            QuestionKind::Multiple,
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::NoCorrectAnswer { .. }));
    }

    #[test]
    fn grading_ignores_selection_order() {
        let q = Question::new(
            QuestionId::new(1),
            "Q",
            opts(&["A", "B", "C"]),
            QuestionKind::Multiple,
            opts(&["C", "A"]),
        )
        .unwrap();

        assert_eq!(q.grade(&selection(&["A", "C"])), Grade::Correct);
        assert_eq!(q.grade(&selection(&["C", "A"])), Grade::Correct);
        assert_eq!(q.grade(&selection(&["A"])), Grade::Incorrect);
        assert_eq!(q.grade(&selection(&["A", "B", "C"])), Grade::Incorrect);
    }

    #[test]
    fn duplicate_options_do_not_break_grading() {
        let q = Question::new(
            QuestionId::new(9),
            "Q",
            opts(&["A", "A", "B"]),
            QuestionKind::Single,
            opts(&["A"]),
        )
        .unwrap();
        assert!(q.grade(&selection(&["A"])).is_correct());
    }
}
