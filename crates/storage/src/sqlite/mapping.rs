use pod_core::model::{Course, CourseId, Lesson, LessonId, ProgressKey, ProgressRecord};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn position_to_i64(position: usize) -> Result<i64, StorageError> {
    i64::try_from(position).map_err(|_| StorageError::Serialization("lesson position overflow".into()))
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    Ok(Lesson::new(
        LessonId::new(row.try_get::<String, _>("id").map_err(ser)?),
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("content").map_err(ser)?,
        row.try_get::<Option<String>, _>("media_url").map_err(ser)?,
    ))
}

pub(crate) fn map_course_row(row: &SqliteRow, lessons: Vec<Lesson>) -> Result<Course, StorageError> {
    Ok(Course::from_persisted(
        CourseId::new(row.try_get::<String, _>("id").map_err(ser)?),
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        lessons,
    ))
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<ProgressRecord, StorageError> {
    let done: i64 = row.try_get("done").map_err(ser)?;
    let done = match done {
        0 => false,
        1 => true,
        other => {
            return Err(StorageError::Serialization(format!(
                "invalid done flag: {other}"
            )));
        }
    };
    Ok(ProgressRecord::from_persisted(
        ProgressKey::from_persisted(row.try_get::<String, _>("key").map_err(ser)?),
        CourseId::new(row.try_get::<String, _>("course_id").map_err(ser)?),
        LessonId::new(row.try_get::<String, _>("lesson_id").map_err(ser)?),
        done,
        row.try_get::<i64, _>("timestamp").map_err(ser)?,
    ))
}
