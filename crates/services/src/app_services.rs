use std::path::PathBuf;
use std::sync::Arc;

use storage::files::JsonQuizDirectory;
use storage::repository::{QuizRepository, Storage};

use crate::Clock;
use crate::catalog_service::QuizCatalogService;
use crate::error::AppServicesError;
use crate::notifier::Notifier;
use crate::sessions::QuizSessionService;

/// Where quizzes come from and where progress goes.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_url: String,
    pub quizzes_dir: PathBuf,
    pub shuffle_options: bool,
}

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<QuizCatalogService>,
    sessions: Arc<QuizSessionService>,
}

impl AppServices {
    /// Build services that read quiz files from disk and keep progress in
    /// `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        settings: &StorageSettings,
        clock: Clock,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppServicesError> {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(
            JsonQuizDirectory::new(&settings.quizzes_dir)
                .with_shuffle_options(settings.shuffle_options),
        );
        let storage = Storage::sqlite(&settings.database_url, quizzes).await?;
        tracing::debug!(
            database_url = %settings.database_url,
            quizzes_dir = %settings.quizzes_dir.display(),
            "storage ready"
        );
        Ok(Self::from_storage(&storage, clock, notifier))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, notifier: Arc<dyn Notifier>) -> Self {
        let catalog = QuizCatalogService::new(Arc::clone(&storage.quizzes));
        let sessions = Arc::new(QuizSessionService::new(
            clock,
            catalog.clone(),
            Arc::clone(&storage.snapshots),
            notifier,
        ));
        Self {
            catalog: Arc::new(catalog),
            sessions,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.sessions)
    }
}
