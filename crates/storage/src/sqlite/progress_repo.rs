use async_trait::async_trait;
use pod_core::model::{CourseId, LessonId, ProgressKey, ProgressRecord};

use super::SqliteRepository;
use super::mapping::{conn, map_progress_row};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn put_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress (key, course_id, lesson_id, done, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(key) DO UPDATE SET
                course_id = excluded.course_id,
                lesson_id = excluded.lesson_id,
                done = excluded.done,
                timestamp = excluded.timestamp
            ",
        )
        .bind(record.key().as_str())
        .bind(record.course_id().as_str())
        .bind(record.lesson_id().as_str())
        .bind(i64::from(record.done()))
        .bind(record.timestamp_ms())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn get_progress(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let key = ProgressKey::new(course_id, lesson_id);
        let row = sqlx::query(
            r"
            SELECT key, course_id, lesson_id, done, timestamp
            FROM progress WHERE key = ?1
            ",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT key, course_id, lesson_id, done, timestamp
            FROM progress
            ORDER BY key ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_progress_row).collect()
    }
}
