use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{CourseId, LessonId};

/// Synthetic primary key of a progress record: `progress:{courseId}:{lessonId}`.
///
/// Ids containing `:` are not escaped, so the key is only unique when the
/// pair is read back from the record's own columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressKey(String);

impl ProgressKey {
    pub const PREFIX: &'static str = "progress";

    #[must_use]
    pub fn new(course_id: &CourseId, lesson_id: &LessonId) -> Self {
        Self(format!("{}:{course_id}:{lesson_id}", Self::PREFIX))
    }

    /// Wraps a key read back from storage.
    #[must_use]
    pub fn from_persisted(raw: String) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion fact for one `(course, lesson)` pair.
///
/// The referenced course or lesson may no longer exist; nothing enforces the
/// link between the two stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    key: ProgressKey,
    course_id: CourseId,
    lesson_id: LessonId,
    done: bool,
    /// Milliseconds since the Unix epoch of the last mutation.
    timestamp: i64,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(course_id: CourseId, lesson_id: LessonId, done: bool, at: DateTime<Utc>) -> Self {
        Self {
            key: ProgressKey::new(&course_id, &lesson_id),
            course_id,
            lesson_id,
            done,
            timestamp: at.timestamp_millis(),
        }
    }

    #[must_use]
    pub fn from_persisted(
        key: ProgressKey,
        course_id: CourseId,
        lesson_id: LessonId,
        done: bool,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            key,
            course_id,
            lesson_id,
            done,
            timestamp: timestamp_ms,
        }
    }

    #[must_use]
    pub fn key(&self) -> &ProgressKey {
        &self.key
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }

    /// Last mutation time, or `None` if the stored value is out of range.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
    }

    /// ISO-8601 rendering with millisecond precision, e.g. `2023-11-14T22:13:20.000Z`.
    #[must_use]
    pub fn timestamp_iso(&self) -> String {
        self.updated_at().map_or_else(
            || self.timestamp.to_string(),
            |at| at.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }
}
