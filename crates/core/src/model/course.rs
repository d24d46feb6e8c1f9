use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course id cannot be empty")]
    EmptyId,

    #[error("course title cannot be empty")]
    EmptyTitle,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single content step within a course.
///
/// Lessons have no storage identity of their own; they are written and
/// removed together with their parent `Course`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(default)]
    id: LessonId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_url: Option<String>,
}

impl Lesson {
    #[must_use]
    pub fn new(
        id: impl Into<LessonId>,
        title: impl Into<String>,
        content: impl Into<String>,
        media_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            media_url,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Opaque markup text; this layer never interprets it.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn media_url(&self) -> Option<&str> {
        self.media_url.as_deref()
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// The top-level unit of learning content.
///
/// `id` is the primary key in the course store. Lesson order is significant:
/// it drives lesson numbering and next/previous navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
    #[serde(default)]
    description: String,
    lessons: Vec<Lesson>,
}

impl Course {
    /// Creates a validated course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyId` or `CourseError::EmptyTitle` when the
    /// respective field is blank.
    pub fn new(
        id: impl Into<CourseId>,
        title: impl Into<String>,
        description: impl Into<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CourseError> {
        let id = id.into();
        let title = title.into();
        if id.as_str().trim().is_empty() {
            return Err(CourseError::EmptyId);
        }
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        Ok(Self {
            id,
            title,
            description: description.into(),
            lessons,
        })
    }

    /// Rehydrates a course from storage without re-running validation.
    #[must_use]
    pub fn from_persisted(
        id: CourseId,
        title: String,
        description: String,
        lessons: Vec<Lesson>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            lessons,
        }
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    /// First lesson with the given id.
    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    fn position(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|lesson| lesson.id() == id)
    }

    /// 1-based lesson number as shown to the learner.
    #[must_use]
    pub fn lesson_number(&self, id: &LessonId) -> Option<usize> {
        self.position(id).map(|idx| idx + 1)
    }

    #[must_use]
    pub fn next_lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.position(id).and_then(|idx| self.lessons.get(idx + 1))
    }

    #[must_use]
    pub fn previous_lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.position(id)
            .and_then(|idx| idx.checked_sub(1))
            .and_then(|idx| self.lessons.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Course {
        Course::new(
            "rust-101",
            "Rust 101",
            "Basics",
            vec![
                Lesson::new("intro", "Intro", "hello", None),
                Lesson::new("owner", "Ownership", "moves", Some("https://x/v.mp4".into())),
                Lesson::new("borrow", "Borrowing", "refs", None),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_blank_id_and_title() {
        assert_eq!(
            Course::new("  ", "T", "", vec![]).unwrap_err(),
            CourseError::EmptyId
        );
        assert_eq!(
            Course::new("c1", "", "", vec![]).unwrap_err(),
            CourseError::EmptyTitle
        );
    }

    #[test]
    fn navigation_follows_lesson_order() {
        let course = sample();
        let owner = LessonId::new("owner");
        assert_eq!(course.lesson_number(&owner), Some(2));
        assert_eq!(course.next_lesson(&owner).unwrap().title(), "Borrowing");
        assert_eq!(course.previous_lesson(&owner).unwrap().title(), "Intro");

        let first = LessonId::new("intro");
        assert!(course.previous_lesson(&first).is_none());
        let last = LessonId::new("borrow");
        assert!(course.next_lesson(&last).is_none());
        assert!(course.lesson_number(&LessonId::new("missing")).is_none());
    }

    #[test]
    fn json_uses_camel_case_media_url() {
        let course = sample();
        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["lessons"][1]["mediaUrl"], "https://x/v.mp4");
        assert!(json["lessons"][0].get("mediaUrl").is_none());

        let back: Course = serde_json::from_value(json).unwrap();
        assert_eq!(back, course);
    }
}
