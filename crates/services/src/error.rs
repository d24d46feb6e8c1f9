//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use pod_core::CourseImportError;
use pod_core::model::CourseId;
use storage::StorageError;

/// Errors emitted while fetching the bulk course catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed catalog: {0}")]
    Malformed(#[from] CourseImportError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error(transparent)]
    Import(#[from] CourseImportError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("course {0} is not in the catalog")]
    NotInCatalog(CourseId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
