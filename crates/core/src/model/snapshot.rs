use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::model::ids::QuestionId;
use crate::model::question::Question;
use crate::model::session::{Session, SessionStatus};

/// Serializable projection of a [`Session`], written after every transition.
///
/// Questions are stored by id only: on resume they are looked up again in the
/// current question set, which stays authoritative. The shake hint is never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    pub active_question_ids: Vec<QuestionId>,
    #[serde(default)]
    pub current_question_index: usize,
    #[serde(default)]
    pub selected_answers: BTreeSet<String>,
    #[serde(default)]
    pub is_submitted: bool,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
    #[serde(default)]
    pub incorrectly_answered_ids: BTreeSet<QuestionId>,
}

impl SessionSnapshot {
    /// Rebuild a session against the current question set.
    ///
    /// Ids that no longer resolve are dropped. Returns `None` when nothing
    /// resolves or when the stored index does not point into the resolved
    /// pool; callers then start a fresh session instead. A missing (or
    /// `loading`) status resumes as `active`.
    #[must_use]
    pub fn resume(self, full_set: &[Question]) -> Option<Session> {
        let by_id: HashMap<QuestionId, &Question> = full_set.iter().map(|q| (q.id(), q)).collect();
        let pool: Vec<Question> = self
            .active_question_ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|q| (*q).clone()))
            .collect();

        if pool.is_empty() || self.current_question_index >= pool.len() {
            return None;
        }

        let status = match self.status {
            None | Some(SessionStatus::Loading) => SessionStatus::Active,
            Some(status) => status,
        };

        Some(Session::from_persisted(
            status,
            pool,
            self.current_question_index,
            self.selected_answers,
            self.is_submitted,
            self.correct_count,
            self.incorrect_count,
            self.incorrectly_answered_ids,
        ))
    }
}

impl Session {
    /// Snapshot of everything needed to resume this attempt.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: Some(self.status()),
            active_question_ids: self.active_questions().iter().map(Question::id).collect(),
            current_question_index: self.current_index(),
            selected_answers: self.selected_answers().clone(),
            is_submitted: self.is_submitted(),
            correct_count: self.correct_count(),
            incorrect_count: self.incorrect_count(),
            incorrectly_answered_ids: self.incorrectly_answered_ids().clone(),
        }
    }
}
