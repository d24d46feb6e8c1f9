use std::collections::BTreeSet;
use std::sync::Arc;

use pod_core::model::{Course, CourseId, LessonId, ProgressKey, ProgressRecord};
use storage::{CourseRepository, ProgressRepository};

use crate::Clock;
use crate::error::ProgressServiceError;
use crate::export::{ProgressExport, export_file_name, join_rows, render_csv};
use crate::guard::ToggleGuard;

/// Completion state of one course, derived from its progress records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCompletion {
    completed: BTreeSet<LessonId>,
    completed_count: usize,
    total: usize,
}

impl CourseCompletion {
    /// Lesson ids with a `done` record, including ids the course no longer has.
    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed
    }

    #[must_use]
    pub fn is_lesson_complete(&self, lesson_id: &LessonId) -> bool {
        self.completed.contains(lesson_id)
    }

    /// Number of the course's current lessons that are complete.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed_count == self.total
    }

    /// Percentage rounded to the nearest whole number (halves up), 0 for a
    /// course without lessons.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let rounded = (self.completed_count * 200 + self.total) / (2 * self.total);
        u8::try_from(rounded).unwrap_or(100)
    }
}

/// Completion tracking and CSV export on top of the two stores.
///
/// Holds no state of its own beyond the toggle guard.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
    guard: ToggleGuard,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            progress,
            guard: ToggleGuard::new(),
        }
    }

    #[must_use]
    pub fn toggle_guard(&self) -> &ToggleGuard {
        &self.guard
    }

    /// All progress records belonging to `course_id`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the records cannot be listed.
    pub async fn course_progress(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<ProgressRecord>, ProgressServiceError> {
        let all = self.progress.list_progress().await?;
        Ok(all
            .into_iter()
            .filter(|record| record.course_id() == course_id)
            .collect())
    }

    /// Completed-lesson set and "N of M" counts for a course.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the records cannot be listed.
    pub async fn completion(
        &self,
        course: &Course,
    ) -> Result<CourseCompletion, ProgressServiceError> {
        let completed: BTreeSet<LessonId> = self
            .course_progress(course.id())
            .await?
            .into_iter()
            .filter(ProgressRecord::done)
            .map(|record| record.lesson_id().clone())
            .collect();
        let completed_count = course
            .lessons()
            .iter()
            .filter(|lesson| completed.contains(lesson.id()))
            .count();
        Ok(CourseCompletion {
            completed,
            completed_count,
            total: course.lesson_count(),
        })
    }

    /// Whether a lesson is marked complete; never-recorded reads as `false`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the lookup fails.
    pub async fn lesson_done(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<bool, ProgressServiceError> {
        let record = self.progress.get_progress(course_id, lesson_id).await?;
        Ok(record.is_some_and(|r| r.done()))
    }

    /// Flip the completion flag of a lesson and return the new value.
    ///
    /// Read and write are separate storage calls, so two concurrent toggles of
    /// the same lesson can interleave. Callers that may double-fire should go
    /// through [`Self::toggle_lesson_complete_guarded`].
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the read or the write fails.
    pub async fn toggle_lesson_complete(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<bool, ProgressServiceError> {
        let current = self.lesson_done(course_id, lesson_id).await?;
        let done = !current;
        let record = ProgressRecord::new(course_id.clone(), lesson_id.clone(), done, self.clock.now());
        self.progress.put_progress(&record).await?;
        tracing::debug!(key = %record.key(), done, "toggled lesson completion");
        Ok(done)
    }

    /// Like [`Self::toggle_lesson_complete`], but returns `Ok(None)` without
    /// touching storage when a toggle for the same lesson is still running.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the read or the write fails.
    pub async fn toggle_lesson_complete_guarded(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<bool>, ProgressServiceError> {
        let Some(_permit) = self.guard.try_acquire(ProgressKey::new(course_id, lesson_id)) else {
            tracing::debug!(%course_id, %lesson_id, "toggle already in flight; ignored");
            return Ok(None);
        };
        self.toggle_lesson_complete(course_id, lesson_id)
            .await
            .map(Some)
    }

    /// Every progress record joined with course and lesson titles, as CSV.
    ///
    /// With no records the result is the header line alone.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if either store cannot be listed.
    pub async fn export_progress_csv(&self) -> Result<String, ProgressServiceError> {
        Ok(self.export_progress().await?.csv)
    }

    /// The CSV report together with its row count and download file name.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if either store cannot be listed.
    pub async fn export_progress(&self) -> Result<ProgressExport, ProgressServiceError> {
        let records = self.progress.list_progress().await?;
        let courses = self.courses.list_courses().await?;
        let rows = join_rows(&records, &courses);
        tracing::info!(rows = rows.len(), "exported progress report");
        Ok(ProgressExport {
            csv: render_csv(&rows),
            row_count: rows.len(),
            file_name: export_file_name(self.clock.today()),
        })
    }
}
