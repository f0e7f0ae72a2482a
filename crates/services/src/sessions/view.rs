use quiz_core::model::{Session, SessionStatus};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    /// 1-based position of the current question, 0 for an empty pool.
    pub question_number: usize,
    pub total: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub answered: u32,
    pub percent_complete: f64,
}

impl SessionProgress {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn of(session: &Session) -> Self {
        let total = session.total_questions();
        let correct = session.correct_count();
        let incorrect = session.incorrect_count();
        let answered = correct.saturating_add(incorrect);
        let percent_complete = if total == 0 {
            0.0
        } else {
            (f64::from(answered) / total as f64 * 100.0).min(100.0)
        };

        Self {
            question_number: if total == 0 {
                0
            } else {
                (session.current_index() + 1).min(total)
            },
            total,
            correct,
            incorrect,
            answered,
            percent_complete,
        }
    }
}

/// Final score shown once an attempt is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    pub correct: u32,
    pub incorrect: u32,
    /// Size of the whole quiz, not of the pool that was just played.
    pub total_questions: usize,
    pub can_retry: bool,
}

impl CompletionSummary {
    /// `None` unless the session is completed.
    #[must_use]
    pub fn of(session: &Session, total_questions: usize) -> Option<Self> {
        if session.status() != SessionStatus::Completed {
            return None;
        }
        Some(Self {
            correct: session.correct_count(),
            incorrect: session.incorrect_count(),
            total_questions,
            can_retry: !session.incorrectly_answered_ids().is_empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Action, Question, QuestionId, QuestionKind};

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["yes".into(), "no".into()],
            QuestionKind::Single,
            ["yes".to_string()],
        )
        .unwrap()
    }

    fn answer(session: Session, choice: &str, full: &[Question]) -> Session {
        [Action::SelectAnswer(choice.into()), Action::Submit, Action::Advance]
            .iter()
            .fold(session, |s, action| s.apply(action, full).session)
    }

    #[test]
    fn progress_counts_answers_against_pool() {
        let full: Vec<Question> = (1..=4).map(question).collect();
        let mut s = Session::fresh(full.clone());
        s = answer(s, "yes", &full);
        s = answer(s, "no", &full);

        let progress = SessionProgress::of(&s);
        assert_eq!(progress.question_number, 3);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.answered, 2);
        assert!((progress.percent_complete - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_session_has_zero_progress() {
        let progress = SessionProgress::of(&Session::loading());
        assert_eq!(progress.question_number, 0);
        assert!(progress.percent_complete.abs() < f64::EPSILON);
    }

    #[test]
    fn summary_only_when_completed() {
        let full: Vec<Question> = (1..=2).map(question).collect();
        let mut s = Session::fresh(full.clone());
        s = answer(s, "no", &full);
        assert!(CompletionSummary::of(&s, full.len()).is_none());

        s = answer(s, "yes", &full);
        let summary = CompletionSummary::of(&s, full.len()).unwrap();
        assert_eq!(
            summary,
            CompletionSummary {
                correct: 1,
                incorrect: 1,
                total_questions: 2,
                can_retry: true,
            }
        );
    }
}
