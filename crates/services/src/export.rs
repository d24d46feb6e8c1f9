//! Flat CSV report of every progress record.
//!
//! Cells are wrapped in double quotes and joined with commas; rows are joined
//! with `\n`. Quotes or newlines inside a cell are written through unescaped,
//! which existing consumers of the file rely on.

use std::collections::HashMap;

use chrono::NaiveDate;
use pod_core::model::{Course, CourseId, ProgressRecord};

pub const CSV_HEADER: [&str; 6] = [
    "Course ID",
    "Course Title",
    "Lesson ID",
    "Lesson Title",
    "Completed",
    "Timestamp",
];

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Label used when a record points at a course or lesson that is not stored.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One joined line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRow {
    pub course_id: String,
    pub course_title: String,
    pub lesson_id: String,
    pub lesson_title: String,
    pub completed: bool,
    pub timestamp: String,
}

impl ProgressRow {
    fn cells(&self) -> [&str; 6] {
        [
            self.course_id.as_str(),
            self.course_title.as_str(),
            self.lesson_id.as_str(),
            self.lesson_title.as_str(),
            if self.completed { "Yes" } else { "No" },
            self.timestamp.as_str(),
        ]
    }
}

fn label_or_unknown(title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => title.to_owned(),
        _ => UNKNOWN_LABEL.to_owned(),
    }
}

/// Join each record against the course list. Missing courses or lessons never
/// fail the join; their titles become `UNKNOWN_LABEL`.
#[must_use]
pub fn join_rows(records: &[ProgressRecord], courses: &[Course]) -> Vec<ProgressRow> {
    let by_id: HashMap<&CourseId, &Course> =
        courses.iter().map(|course| (course.id(), course)).collect();

    records
        .iter()
        .map(|record| {
            let course = by_id.get(record.course_id()).copied();
            let lesson = course.and_then(|c| c.lesson(record.lesson_id()));
            ProgressRow {
                course_id: record.course_id().to_string(),
                course_title: label_or_unknown(course.map(Course::title)),
                lesson_id: record.lesson_id().to_string(),
                lesson_title: label_or_unknown(lesson.map(|l| l.title())),
                completed: record.done(),
                timestamp: record.timestamp_iso(),
            }
        })
        .collect()
}

fn quote_line<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    cells
        .into_iter()
        .map(|cell| format!("\"{cell}\""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line followed by one line per row; no trailing newline.
#[must_use]
pub fn render_csv(rows: &[ProgressRow]) -> String {
    std::iter::once(quote_line(CSV_HEADER))
        .chain(rows.iter().map(|row| quote_line(row.cells())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `learningpod-progress-<YYYY-MM-DD>.csv`
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("learningpod-progress-{}.csv", date.format("%Y-%m-%d"))
}

/// A rendered report ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressExport {
    pub csv: String,
    pub row_count: usize,
    pub file_name: String,
}

impl ProgressExport {
    /// Header only: there is nothing worth handing to the user.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        CSV_MIME_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_core::model::Lesson;
    use pod_core::time::fixed_now;

    #[test]
    fn empty_report_is_the_header_line() {
        assert_eq!(
            render_csv(&[]),
            r#""Course ID","Course Title","Lesson ID","Lesson Title","Completed","Timestamp""#
        );
    }

    #[test]
    fn unresolvable_references_render_unknown() {
        let course = Course::new("c1", "Rust", "", vec![Lesson::new("l1", "Intro", "", None)])
            .unwrap();
        let records = vec![
            ProgressRecord::new("c1".into(), "l1".into(), true, fixed_now()),
            ProgressRecord::new("c1".into(), "gone".into(), false, fixed_now()),
            ProgressRecord::new("ghost".into(), "l1".into(), true, fixed_now()),
        ];
        let rows = join_rows(&records, &[course]);

        assert_eq!(rows[0].course_title, "Rust");
        assert_eq!(rows[0].lesson_title, "Intro");
        assert_eq!(rows[1].course_title, "Rust");
        assert_eq!(rows[1].lesson_title, UNKNOWN_LABEL);
        assert_eq!(rows[2].course_title, UNKNOWN_LABEL);
        assert_eq!(rows[2].lesson_title, UNKNOWN_LABEL);
    }

    #[test]
    fn rows_are_quoted_and_newline_joined() {
        let rows = vec![ProgressRow {
            course_id: "c1".into(),
            course_title: "Rust".into(),
            lesson_id: "l1".into(),
            lesson_title: "Intro".into(),
            completed: false,
            timestamp: "2023-11-14T22:13:20.000Z".into(),
        }];
        let csv = render_csv(&rows);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            r#""c1","Rust","l1","Intro","No","2023-11-14T22:13:20.000Z""#
        );
    }

    #[test]
    fn embedded_quotes_pass_through_unescaped() {
        let rows = vec![ProgressRow {
            course_id: "c1".into(),
            course_title: r#"The "Best" Course"#.into(),
            lesson_id: "l1".into(),
            lesson_title: "Intro".into(),
            completed: true,
            timestamp: "t".into(),
        }];
        assert!(render_csv(&rows).contains(r#""The "Best" Course""#));
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "learningpod-progress-2024-03-07.csv");
    }
}
