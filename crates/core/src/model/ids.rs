use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-assigned identifier of a course.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Creates a new `CourseId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a lesson, unique only within its parent course.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a new `LessonId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CourseId({:?})", self.0)
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({:?})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CourseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LessonId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LessonId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(CourseId::new("rust-101").to_string(), "rust-101");
        assert_eq!(LessonId::from("l-1").to_string(), "l-1");
    }

    #[test]
    fn display_honours_width_and_alignment() {
        assert_eq!(format!("[{:<6}]", CourseId::new("c1")), "[c1    ]");
        assert_eq!(format!("[{:>4}]", LessonId::new("l1")), "[  l1]");
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", CourseId::new("c1")), "CourseId(\"c1\")");
        assert_eq!(format!("{:?}", LessonId::new("l1")), "LessonId(\"l1\")");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&CourseId::new("c1")).unwrap();
        assert_eq!(json, "\"c1\"");
        let back: LessonId = serde_json::from_str("\"l9\"").unwrap();
        assert_eq!(back, LessonId::new("l9"));
    }
}
