use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::QuestionId;
use crate::model::question::{Grade, Question, QuestionKind};

/// How long the shake hint stays on after an incorrect answer, in milliseconds.
pub const SHAKE_DURATION_MS: i64 = 820;

//
// ─── STATUS, ACTIONS, EFFECTS ──────────────────────────────────────────────────
//

/// Lifecycle of a quiz attempt.
///
/// `Loading → Active → Completed`. `Active` is only re-entered through
/// [`Action::Reset`] and [`Action::RetryIncorrect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Loading,
    Active,
    Completed,
}

/// Everything that can move a session forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectAnswer(String),
    Submit,
    Advance,
    Reset,
    RetryIncorrect,
    /// Fired by the un-shake timer, never by the user.
    ClearShake,
}

/// Side effects requested by a transition, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Drop any pending un-shake timer.
    CancelShakeClear,
    /// Delete the persisted snapshot for this quiz.
    DiscardSnapshot,
    /// Mirror the new session into the snapshot store.
    Persist,
    /// A submission was graded.
    Feedback(Grade),
    /// Arm the timer that fires [`Action::ClearShake`].
    ScheduleShakeClear,
}

/// Result of applying an [`Action`]: the next session and what to do about it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Transition {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn silent(session: Session) -> Self {
        Self {
            session,
            effects: Vec::new(),
        }
    }

    fn with(session: Session, effects: Vec<Effect>) -> Self {
        Self { session, effects }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a quiz.
///
/// Transitions are pure: [`Session::apply`] consumes the current value and
/// returns the next one together with the effects to run. Every action is
/// total; actions that make no sense in the current state come back as a
/// silent transition with the session untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    status: SessionStatus,
    active_questions: Vec<Question>,
    current_index: usize,
    selected_answers: BTreeSet<String>,
    is_submitted: bool,
    correct_count: u32,
    incorrect_count: u32,
    incorrectly_answered_ids: BTreeSet<QuestionId>,
    is_shaking: bool,
}

impl Session {
    /// Placeholder used before the question set is available.
    #[must_use]
    pub fn loading() -> Self {
        Self::default()
    }

    /// Starts an active attempt over `pool` with every counter at zero.
    #[must_use]
    pub fn fresh(pool: Vec<Question>) -> Self {
        Self {
            status: SessionStatus::Active,
            active_questions: pool,
            ..Self::default()
        }
    }

    /// Rehydrate a session from persisted fields.
    ///
    /// The shake hint is always off after a reload.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_persisted(
        status: SessionStatus,
        active_questions: Vec<Question>,
        current_index: usize,
        selected_answers: BTreeSet<String>,
        is_submitted: bool,
        correct_count: u32,
        incorrect_count: u32,
        incorrectly_answered_ids: BTreeSet<QuestionId>,
    ) -> Self {
        Self {
            status,
            active_questions,
            current_index,
            selected_answers,
            is_submitted,
            correct_count,
            incorrect_count,
            incorrectly_answered_ids,
            is_shaking: false,
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn active_questions(&self) -> &[Question] {
        &self.active_questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question at the current index, if the pool has one there.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.active_questions.get(self.current_index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.active_questions.len()
    }

    /// True when advancing from here completes the attempt.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.active_questions.len()
    }

    #[must_use]
    pub fn selected_answers(&self) -> &BTreeSet<String> {
        &self.selected_answers
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    #[must_use]
    pub fn incorrectly_answered_ids(&self) -> &BTreeSet<QuestionId> {
        &self.incorrectly_answered_ids
    }

    #[must_use]
    pub fn is_shaking(&self) -> bool {
        self.is_shaking
    }

    /// Apply `action` and return the next session plus its effects.
    ///
    /// `full_set` is the complete question set of the quiz; reset and
    /// retry-incorrect build their pools from it, never from the current
    /// (possibly narrowed) pool.
    pub fn apply(self, action: &Action, full_set: &[Question]) -> Transition {
        match action {
            Action::SelectAnswer(answer) => self.select_answer(answer),
            Action::Submit => self.submit(),
            Action::Advance => self.advance(),
            Action::Reset => Self::reset(full_set),
            Action::RetryIncorrect => self.retry_incorrect(full_set),
            Action::ClearShake => self.clear_shake(),
        }
    }

    fn accepts_input(&self) -> bool {
        self.status == SessionStatus::Active && !self.is_submitted
    }

    fn select_answer(mut self, answer: &str) -> Transition {
        if !self.accepts_input() {
            return Transition::silent(self);
        }
        let Some(kind) = self.current_question().map(Question::kind) else {
            return Transition::silent(self);
        };

        match kind {
            QuestionKind::Single => {
                self.selected_answers.clear();
                self.selected_answers.insert(answer.to_owned());
            }
            QuestionKind::Multiple => {
                if !self.selected_answers.remove(answer) {
                    self.selected_answers.insert(answer.to_owned());
                }
            }
        }

        Transition::with(self, vec![Effect::Persist])
    }

    fn submit(mut self) -> Transition {
        if !self.accepts_input() || self.selected_answers.is_empty() {
            return Transition::silent(self);
        }
        let graded = self
            .current_question()
            .map(|q| (q.id(), q.grade(&self.selected_answers)));
        let Some((question_id, grade)) = graded else {
            return Transition::silent(self);
        };

        self.is_submitted = true;
        match grade {
            Grade::Correct => {
                self.correct_count = self.correct_count.saturating_add(1);
                Transition::with(self, vec![Effect::Persist, Effect::Feedback(grade)])
            }
            Grade::Incorrect => {
                self.incorrect_count = self.incorrect_count.saturating_add(1);
                self.incorrectly_answered_ids.insert(question_id);
                self.is_shaking = true;
                Transition::with(
                    self,
                    vec![
                        Effect::Persist,
                        Effect::Feedback(grade),
                        Effect::ScheduleShakeClear,
                    ],
                )
            }
        }
    }

    fn advance(mut self) -> Transition {
        if self.status != SessionStatus::Active || !self.is_submitted {
            return Transition::silent(self);
        }

        let next = self.current_index + 1;
        if next < self.active_questions.len() {
            self.current_index = next;
            self.selected_answers.clear();
            self.is_submitted = false;
        } else {
            self.status = SessionStatus::Completed;
        }

        Transition::with(self, vec![Effect::Persist])
    }

    fn reset(full_set: &[Question]) -> Transition {
        Transition::with(
            Self::fresh(full_set.to_vec()),
            vec![
                Effect::CancelShakeClear,
                Effect::DiscardSnapshot,
                Effect::Persist,
            ],
        )
    }

    fn retry_incorrect(self, full_set: &[Question]) -> Transition {
        if self.incorrectly_answered_ids.is_empty() {
            return Transition::silent(self);
        }

        let pool: Vec<Question> = full_set
            .iter()
            .filter(|q| self.incorrectly_answered_ids.contains(&q.id()))
            .cloned()
            .collect();
        if pool.is_empty() {
            return Transition::silent(self);
        }

        Transition::with(
            Self::fresh(pool),
            vec![
                Effect::CancelShakeClear,
                Effect::DiscardSnapshot,
                Effect::Persist,
            ],
        )
    }

    fn clear_shake(mut self) -> Transition {
        self.is_shaking = false;
        Transition::silent(self)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
