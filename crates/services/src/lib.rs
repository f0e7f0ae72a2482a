#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod notifier;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::{AppServices, StorageSettings};
pub use catalog_service::QuizCatalogService;
pub use error::{AppServicesError, SessionError};
pub use notifier::{Notice, NoticeKind, Notifier, SilentNotifier, TracingNotifier};
pub use sessions::{CompletionSummary, QuizSession, QuizSessionService, SessionProgress};
