//! Validation of user-supplied course JSON.
//!
//! Input is checked in two steps so the caller can tell a syntax problem from
//! a schema problem: first the text must parse as JSON at all, then the
//! parsed value must look like a course.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Course, Lesson};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseImportError {
    #[error("no course JSON supplied")]
    EmptyInput,

    #[error("invalid JSON format: {0}")]
    MalformedInput(String),

    #[error("invalid course structure ({0}). Must have id, title, and lessons array.")]
    InvalidCourseStructure(String),
}

/// Parse and validate a single course object.
///
/// The object needs a non-empty string `id`, a non-empty string `title` and an
/// array `lessons`. Lesson elements are taken as they come: fields that are
/// missing or not scalar fall back to empty values, and a non-object element
/// becomes an empty lesson.
///
/// # Errors
///
/// Returns `CourseImportError::EmptyInput` for blank text,
/// `CourseImportError::MalformedInput` if the text is not JSON, and
/// `CourseImportError::InvalidCourseStructure` if the shape is wrong.
pub fn parse_course_json(text: &str) -> Result<Course, CourseImportError> {
    if text.trim().is_empty() {
        return Err(CourseImportError::EmptyInput);
    }
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CourseImportError::MalformedInput(e.to_string()))?;
    validate_course_value(&value)
}

/// Validate an already-parsed JSON value as a course.
///
/// # Errors
///
/// Returns `CourseImportError::InvalidCourseStructure` if the shape is wrong.
pub fn validate_course_value(value: &Value) -> Result<Course, CourseImportError> {
    let invalid = |reason: &str| CourseImportError::InvalidCourseStructure(reason.to_owned());

    let Some(obj) = value.as_object() else {
        return Err(invalid("expected a JSON object"));
    };
    match obj.get("id") {
        Some(Value::String(id)) if !id.is_empty() => {}
        _ => return Err(invalid("missing or empty string `id`")),
    }
    match obj.get("title") {
        Some(Value::String(title)) if !title.is_empty() => {}
        _ => return Err(invalid("missing or empty string `title`")),
    }
    if !matches!(obj.get("lessons"), Some(Value::Array(_))) {
        return Err(invalid("`lessons` must be an array"));
    }

    Ok(course_from_object(obj))
}

/// Parse the bulk catalog format: a JSON array of courses.
///
/// Elements are not held to the import rules. Missing fields default to
/// empty values and elements that are not objects are skipped, so one odd
/// entry does not cost the rest of the catalog.
///
/// # Errors
///
/// Returns `CourseImportError::MalformedInput` if the document is not a JSON
/// array.
pub fn parse_catalog_json(text: &str) -> Result<Vec<Course>, CourseImportError> {
    let elements: Vec<Value> =
        serde_json::from_str(text).map_err(|e| CourseImportError::MalformedInput(e.to_string()))?;
    Ok(elements
        .iter()
        .filter_map(Value::as_object)
        .map(course_from_object)
        .collect())
}

fn course_from_object(obj: &Map<String, Value>) -> Course {
    let lessons = match obj.get("lessons") {
        Some(Value::Array(items)) => items.iter().map(lesson_from_value).collect(),
        _ => Vec::new(),
    };
    Course::from_persisted(
        text_field(obj, "id").into(),
        text_field(obj, "title"),
        text_field(obj, "description"),
        lessons,
    )
}

fn lesson_from_value(value: &Value) -> Lesson {
    let Some(obj) = value.as_object() else {
        return Lesson::new("", "", "", None);
    };
    let media_url = Some(text_field(obj, "mediaUrl")).filter(|url| !url.is_empty());
    Lesson::new(
        text_field(obj, "id"),
        text_field(obj, "title"),
        text_field(obj, "content"),
        media_url,
    )
}

// Scalars keep their JSON text (`7` -> "7"); null, arrays and objects read as empty.
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonId;

    const STRUCTURE_HINT: &str = "Must have id, title, and lessons array.";

    #[test]
    fn accepts_minimal_course() {
        let course =
            parse_course_json(r#"{"id":"c1","title":"Course","lessons":[]}"#).expect("valid");
        assert_eq!(course.id().as_str(), "c1");
        assert_eq!(course.description(), "");
        assert_eq!(course.lesson_count(), 0);
    }

    #[test]
    fn lessons_default_missing_fields() {
        let course = parse_course_json(
            r#"{"id":"c1","title":"Course","description":"d","lessons":[{"id":"l1"},{"title":"Two","mediaUrl":"m"}]}"#,
        )
        .unwrap();
        assert_eq!(course.lessons()[0].id(), &LessonId::new("l1"));
        assert_eq!(course.lessons()[0].title(), "");
        assert_eq!(course.lessons()[1].media_url(), Some("m"));
    }

    #[test]
    fn syntax_errors_are_malformed_input() {
        let err = parse_course_json(r#"{"id": "c1", "#).unwrap_err();
        assert!(matches!(err, CourseImportError::MalformedInput(_)));
    }

    #[test]
    fn blank_text_is_empty_input() {
        assert_eq!(
            parse_course_json("   \n").unwrap_err(),
            CourseImportError::EmptyInput
        );
    }

    #[test]
    fn missing_or_non_array_lessons_is_invalid_structure() {
        for text in [
            r#"{"id":"c1","title":"T"}"#,
            r#"{"id":"c1","title":"T","lessons":"nope"}"#,
            r#"{"id":"c1","title":"T","lessons":{"0":{}}}"#,
        ] {
            let err = parse_course_json(text).unwrap_err();
            assert!(
                matches!(err, CourseImportError::InvalidCourseStructure(_)),
                "{text}: {err:?}"
            );
        }
    }

    #[test]
    fn id_and_title_must_be_non_empty_strings() {
        for text in [
            r#"{"id":7,"title":"T","lessons":[]}"#,
            r#"{"id":"","title":"T","lessons":[]}"#,
            r#"{"id":"c1","lessons":[]}"#,
            r#"[{"id":"c1","title":"T","lessons":[]}]"#,
        ] {
            assert!(matches!(
                parse_course_json(text),
                Err(CourseImportError::InvalidCourseStructure(_))
            ));
        }
    }

    #[test]
    fn structure_error_message_is_corrective() {
        let err = parse_course_json(r#"{"id":"c1","title":"T"}"#).unwrap_err();
        assert!(err.to_string().ends_with(STRUCTURE_HINT));
    }

    #[test]
    fn lesson_elements_are_not_schema_checked() {
        let course = parse_course_json(
            r#"{"id":"c1","title":"T","lessons":[1,"x",{"id":"l1","title":"One","content":null,"mediaUrl":7}]}"#,
        )
        .expect("lessons are accepted as array elements");
        assert_eq!(course.lesson_count(), 3);
        assert_eq!(course.lessons()[0], Lesson::new("", "", "", None));
        assert_eq!(course.lessons()[1].title(), "");
        let third = &course.lessons()[2];
        assert_eq!(third.id(), &LessonId::new("l1"));
        assert_eq!(third.title(), "One");
        assert_eq!(third.content(), "");
        assert_eq!(third.media_url(), Some("7"));
    }

    #[test]
    fn catalog_is_an_array_of_courses() {
        let courses = parse_catalog_json(
            r#"[{"id":"a","title":"A","description":"","lessons":[]},{"id":"b","title":"B","lessons":[{"id":"l","title":"L","content":"c"}]}]"#,
        )
        .unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[1].lessons()[0].content(), "c");

        assert!(matches!(
            parse_catalog_json(r#"{"id":"a"}"#),
            Err(CourseImportError::MalformedInput(_))
        ));
    }

    #[test]
    fn catalog_keeps_entries_with_missing_fields() {
        let courses =
            parse_catalog_json(r#"[{"id":"a","title":"A","lessons":[]},{"id":"b","title":"B"},42]"#)
                .unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[1].id().as_str(), "b");
        assert_eq!(courses[1].title(), "B");
        assert_eq!(courses[1].lesson_count(), 0);
    }
}
