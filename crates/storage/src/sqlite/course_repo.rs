use std::collections::HashMap;

use async_trait::async_trait;
use pod_core::model::{Course, CourseId, Lesson};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, map_course_row, map_lesson_row, position_to_i64, ser};
use crate::repository::{CourseRepository, StorageError};

#[async_trait]
impl CourseRepository for SqliteRepository {
    async fn put_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO courses (id, title, description)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description
            ",
        )
        .bind(course.id().as_str())
        .bind(course.title())
        .bind(course.description())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Replace, never merge: drop the previous lesson list first.
        sqlx::query("DELETE FROM lessons WHERE course_id = ?1")
            .bind(course.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, lesson) in course.lessons().iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO lessons (course_id, position, id, title, content, media_url)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(course.id().as_str())
            .bind(position_to_i64(position)?)
            .bind(lesson.id().as_str())
            .bind(lesson.title())
            .bind(lesson.content())
            .bind(lesson.media_url())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let row = sqlx::query("SELECT id, title, description FROM courses WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let lesson_rows = sqlx::query(
            r"
            SELECT id, title, content, media_url
            FROM lessons
            WHERE course_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(&mut *tx)
        .await
        .map_err(conn)?;
        tx.commit().await.map_err(conn)?;

        let lessons = lesson_rows
            .iter()
            .map(map_lesson_row)
            .collect::<Result<Vec<_>, _>>()?;
        map_course_row(&row, lessons).map(Some)
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let course_rows = sqlx::query("SELECT id, title, description FROM courses ORDER BY id ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(conn)?;
        let lesson_rows = sqlx::query(
            r"
            SELECT course_id, id, title, content, media_url
            FROM lessons
            ORDER BY course_id ASC, position ASC
            ",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(conn)?;
        tx.commit().await.map_err(conn)?;

        let mut by_course: HashMap<String, Vec<Lesson>> = HashMap::new();
        for row in &lesson_rows {
            let course_id: String = row.try_get("course_id").map_err(ser)?;
            by_course
                .entry(course_id)
                .or_default()
                .push(map_lesson_row(row)?);
        }

        let mut courses = Vec::with_capacity(course_rows.len());
        for row in &course_rows {
            let id: String = row.try_get("id").map_err(ser)?;
            let lessons = by_course.remove(&id).unwrap_or_default();
            courses.push(map_course_row(row, lessons)?);
        }
        Ok(courses)
    }

    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError> {
        // Lessons go with it through ON DELETE CASCADE.
        sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
