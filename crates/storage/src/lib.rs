#![forbid(unsafe_code)]

pub mod engine;
pub mod repository;
pub mod sqlite;

pub use engine::{StorageBackend, StorageEngine};
pub use repository::{CourseRepository, InMemoryRepository, ProgressRepository, Storage, StorageError};
