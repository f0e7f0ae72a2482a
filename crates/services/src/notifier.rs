//! Transient user-facing notices.

use std::time::Duration;

/// How long the "correct answer" notice stays visible.
pub const CORRECT_NOTICE_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoticeKind {
    Success,
}

/// A short message for the presentation layer to show and dismiss on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    #[must_use]
    pub fn correct_answer() -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Correct!".to_string(),
            message: "Nice work!".to_string(),
            duration: CORRECT_NOTICE_DURATION,
        }
    }
}

/// Sink for notices. Implementations must return promptly.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Logs notices at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::info!(
            kind = ?notice.kind,
            title = %notice.title,
            message = %notice.message,
            duration_ms = notice.duration.as_millis(),
            "notice"
        );
    }
}

/// Drops every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answer_notice_is_a_two_second_success() {
        let notice = Notice::correct_answer();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.title, "Correct!");
        assert_eq!(notice.message, "Nice work!");
        assert_eq!(notice.duration, Duration::from_secs(2));
    }

    #[test]
    fn every_notifier_accepts_notices_as_trait_objects() {
        let sinks: [&dyn Notifier; 2] = [&TracingNotifier, &SilentNotifier];
        for sink in sinks {
            sink.notify(Notice::correct_answer());
        }
    }
}
