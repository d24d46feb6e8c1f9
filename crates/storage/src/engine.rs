//! Lazily opened, process-lifetime storage handle.
//!
//! `StorageEngine` is built explicitly and handed to services instead of
//! living in a global. The first `open()` connects and creates the
//! collections; every later call gets the same handle back. A failed open is
//! remembered too, so the rest of the session reports `Unavailable` instead
//! of silently retrying.

use std::fmt;

use async_trait::async_trait;
use pod_core::model::{Course, CourseId, LessonId, ProgressRecord};
use tokio::sync::OnceCell;

use crate::repository::{CourseRepository, ProgressRepository, Storage, StorageError};

/// Where the engine keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite { url: String },
    InMemory,
}

pub struct StorageEngine {
    backend: StorageBackend,
    handle: OnceCell<Result<Storage, StorageError>>,
}

impl fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageEngine")
            .field("backend", &self.backend)
            .field("open", &self.is_open())
            .finish()
    }
}

impl StorageEngine {
    #[must_use]
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            backend,
            handle: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn sqlite(url: impl Into<String>) -> Self {
        Self::new(StorageBackend::Sqlite { url: url.into() })
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(StorageBackend::InMemory)
    }

    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// True once a successful `open()` has completed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.handle.get(), Some(Ok(_)))
    }

    /// Return the open storage, connecting and migrating on first use.
    ///
    /// Concurrent first callers share a single initialization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the backend could not be opened,
    /// on this call or any earlier one.
    pub async fn open(&self) -> Result<&Storage, StorageError> {
        self.handle
            .get_or_init(|| connect(&self.backend))
            .await
            .as_ref()
            .map_err(Clone::clone)
    }
}

async fn connect(backend: &StorageBackend) -> Result<Storage, StorageError> {
    match backend {
        StorageBackend::Sqlite { url } => match Storage::sqlite(url).await {
            Ok(storage) => {
                tracing::info!(%url, "opened sqlite storage");
                Ok(storage)
            }
            Err(err) => {
                tracing::error!(%url, error = %err, "failed to open sqlite storage");
                Err(StorageError::Unavailable(err.to_string()))
            }
        },
        StorageBackend::InMemory => {
            tracing::debug!("opened in-memory storage");
            Ok(Storage::in_memory())
        }
    }
}

#[async_trait]
impl CourseRepository for StorageEngine {
    async fn put_course(&self, course: &Course) -> Result<(), StorageError> {
        self.open().await?.courses.put_course(course).await
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        self.open().await?.courses.get_course(id).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        self.open().await?.courses.list_courses().await
    }

    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError> {
        self.open().await?.courses.delete_course(id).await
    }
}

#[async_trait]
impl ProgressRepository for StorageEngine {
    async fn put_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        self.open().await?.progress.put_progress(record).await
    }

    async fn get_progress(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        self.open()
            .await?
            .progress
            .get_progress(course_id, lesson_id)
            .await
    }

    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StorageError> {
        self.open().await?.progress.list_progress().await
    }
}
