use std::sync::Arc;

use storage::{CourseRepository, ProgressRepository, StorageBackend, StorageEngine, StorageError};

use crate::Clock;
use crate::catalog::CatalogSource;
use crate::course_service::CourseService;
use crate::progress_service::ProgressService;

/// Assembles app-facing services around one shared `StorageEngine`.
#[derive(Clone)]
pub struct AppServices {
    engine: Arc<StorageEngine>,
    courses: Arc<CourseService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Wire services to a new engine for `backend`. Nothing is opened yet;
    /// the first storage call (or [`Self::open`]) connects.
    #[must_use]
    pub fn new(backend: StorageBackend, clock: Clock, catalog: Arc<dyn CatalogSource>) -> Self {
        Self::with_engine(Arc::new(StorageEngine::new(backend)), clock, catalog)
    }

    #[must_use]
    pub fn with_engine(
        engine: Arc<StorageEngine>,
        clock: Clock,
        catalog: Arc<dyn CatalogSource>,
    ) -> Self {
        let course_repo: Arc<dyn CourseRepository> = engine.clone();
        let progress_repo: Arc<dyn ProgressRepository> = engine.clone();
        let courses = Arc::new(CourseService::new(Arc::clone(&course_repo), catalog));
        let progress = Arc::new(ProgressService::new(clock, course_repo, progress_repo));
        Self {
            engine,
            courses,
            progress,
        }
    }

    /// Open storage eagerly so an unusable database is reported up front.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the backend cannot be opened.
    pub async fn open(&self) -> Result<(), StorageError> {
        self.engine.open().await.map(|_| ())
    }

    #[must_use]
    pub fn engine(&self) -> Arc<StorageEngine> {
        Arc::clone(&self.engine)
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
