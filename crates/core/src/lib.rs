#![forbid(unsafe_code)]

pub mod import;
pub mod model;
pub mod time;

pub use import::{CourseImportError, parse_catalog_json, parse_course_json};
pub use time::Clock;
