mod persistence;
mod service;
mod session;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use persistence::SnapshotWriter;
pub use service::QuizSessionService;
pub use session::QuizSession;
pub use view::{CompletionSummary, SessionProgress};
