use async_trait::async_trait;
use pod_core::model::{Course, CourseId, LessonId, ProgressKey, ProgressRecord};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
///
/// A missing record is never an error; lookups return `Option`.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for downloaded courses.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert or fully replace the course stored under `course.id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored; in that case
    /// nothing of the new record is visible.
    async fn put_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing course is `Ok(None)`.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError>;

    /// List every stored course. Order carries no meaning.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Remove a course. Removing a missing course succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError>;
}

/// Repository contract for lesson completion records.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Upsert by synthetic key; the last completed write wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn put_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Look up the record for a `(course, lesson)` pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a pair never recorded is `Ok(None)`.
    async fn get_progress(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<ProgressRecord>, StorageError>;

    /// List every progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    progress: Arc<Mutex<BTreeMap<ProgressKey, ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn put_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        guard.insert(course.id().clone(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self.courses.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }

    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError> {
        let mut guard = self.courses.lock().map_err(poisoned)?;
        guard.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn put_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        guard.insert(record.key().clone(), record.clone());
        Ok(())
    }

    async fn get_progress(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard.get(&ProgressKey::new(course_id, lesson_id)).cloned())
    }

    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

/// Aggregates the two collections behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { courses, progress }
    }
}
