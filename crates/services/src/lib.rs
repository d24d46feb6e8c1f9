#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod course_service;
pub mod error;
pub mod export;
pub mod guard;
pub mod progress_service;

pub use pod_core::Clock;

pub use app_services::AppServices;
pub use catalog::{CatalogSource, FileCatalog, HttpCatalog, InMemoryCatalog, catalog_source_for};
pub use course_service::{Catalog, CatalogEntry, CatalogOrigin, CourseService};
pub use error::{CatalogError, CourseServiceError, ProgressServiceError};
pub use export::{CSV_HEADER, ProgressExport, ProgressRow, UNKNOWN_LABEL};
pub use guard::{TogglePermit, ToggleGuard};
pub use progress_service::{CourseCompletion, ProgressService};
