mod ids;
mod question;
mod quiz;
mod session;
mod snapshot;

pub use ids::{ParseIdError, QuestionId, QuizId};
pub use question::{Grade, Question, QuestionError, QuestionKind};
pub use quiz::{Quiz, QuizSummary};
pub use session::{Action, Effect, SHAKE_DURATION_MS, Session, SessionStatus, Transition};
pub use snapshot::SessionSnapshot;
