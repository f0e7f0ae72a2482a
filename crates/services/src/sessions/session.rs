use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use quiz_core::model::{
    Action, Effect, Grade, Question, QuestionId, QuizId, SHAKE_DURATION_MS, Session,
    SessionStatus, Transition,
};
use quiz_core::schedule::{Scheduler, TimerId};

use super::persistence::SnapshotWriter;
use super::view::{CompletionSummary, SessionProgress};
use crate::Clock;
use crate::notifier::{Notice, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    ClearShake,
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// A live attempt at one quiz.
///
/// Wraps the pure [`Session`] state machine and runs the effects of each
/// transition: snapshot writes, notices and the un-shake timer. The
/// in-memory session is always updated before any effect runs.
pub struct QuizSession {
    quiz_id: QuizId,
    full_set: Vec<Question>,
    session: Session,
    clock: Clock,
    timers: Scheduler<TimerEvent>,
    shake_timer: Option<TimerId>,
    writer: SnapshotWriter,
    notifier: Arc<dyn Notifier>,
}

impl QuizSession {
    pub(crate) fn new(
        quiz_id: QuizId,
        full_set: Vec<Question>,
        session: Session,
        clock: Clock,
        writer: SnapshotWriter,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            quiz_id,
            full_set,
            session,
            clock,
            timers: Scheduler::new(),
            shake_timer: None,
            writer,
            notifier,
        }
    }

    /// Select an option, or toggle it on a multiple-choice question.
    pub fn select_answer(&mut self, answer: impl Into<String>) {
        self.dispatch(Action::SelectAnswer(answer.into()));
    }

    pub fn submit(&mut self) {
        self.dispatch(Action::Submit);
    }

    /// Move to the next question, or complete the attempt after the last one.
    pub fn advance(&mut self) {
        self.dispatch(Action::Advance);
    }

    /// Throw away all progress and start over with the whole quiz.
    pub fn reset(&mut self) {
        self.dispatch(Action::Reset);
    }

    /// Start a new attempt over the questions answered incorrectly.
    pub fn retry_incorrect(&mut self) {
        self.dispatch(Action::RetryIncorrect);
    }

    /// Fire every timer due according to the session clock.
    ///
    /// Returns how many timers fired.
    pub fn poll_timers(&mut self) -> usize {
        let now = self.clock.now();
        self.poll_timers_at(now)
    }

    /// Fire every timer due at or before `now`.
    pub fn poll_timers_at(&mut self, now: DateTime<Utc>) -> usize {
        let due = self.timers.take_due(now);
        let fired = due.len();
        for (id, event) in due {
            if self.shake_timer == Some(id) {
                self.shake_timer = None;
            }
            match event {
                TimerEvent::ClearShake => self.dispatch(Action::ClearShake),
            }
        }
        fired
    }

    /// Deadline of the next pending timer, for runtimes that sleep until it.
    #[must_use]
    pub fn next_timer_at(&self) -> Option<DateTime<Utc>> {
        self.timers.next_due()
    }

    /// Wait until every snapshot write issued so far has been applied.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    fn dispatch(&mut self, action: Action) {
        let current = std::mem::take(&mut self.session);
        let Transition { session, effects } = current.apply(&action, &self.full_set);
        self.session = session;

        if !effects.is_empty() {
            tracing::debug!(quiz_id = %self.quiz_id, ?action, ?effects, "session transition");
        }
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CancelShakeClear => self.cancel_shake_timer(),
            Effect::DiscardSnapshot => self.writer.discard(),
            Effect::Persist => self.writer.save(self.session.snapshot()),
            Effect::Feedback(Grade::Correct) => self.notifier.notify(Notice::correct_answer()),
            Effect::Feedback(Grade::Incorrect) => {}
            Effect::ScheduleShakeClear => {
                self.cancel_shake_timer();
                let due_at = self.clock.after(Duration::milliseconds(SHAKE_DURATION_MS));
                self.shake_timer = Some(self.timers.schedule_at(due_at, TimerEvent::ClearShake));
            }
        }
    }

    fn cancel_shake_timer(&mut self) {
        if let Some(id) = self.shake_timer.take() {
            self.timers.cancel(id);
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    /// The underlying state machine value.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.session.current_index()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.session.is_last_question()
    }

    #[must_use]
    pub fn selected_answers(&self) -> &BTreeSet<String> {
        self.session.selected_answers()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.session.is_submitted()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.session.correct_count()
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.session.incorrect_count()
    }

    #[must_use]
    pub fn incorrectly_answered_ids(&self) -> &BTreeSet<QuestionId> {
        self.session.incorrectly_answered_ids()
    }

    #[must_use]
    pub fn is_shaking(&self) -> bool {
        self.session.is_shaking()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::of(&self.session)
    }

    /// Final score, once the attempt is completed.
    #[must_use]
    pub fn completion(&self) -> Option<CompletionSummary> {
        CompletionSummary::of(&self.session, self.full_set.len())
    }
}
