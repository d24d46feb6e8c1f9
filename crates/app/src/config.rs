use std::path::{Path, PathBuf};

use services::{CatalogSource, catalog_source_for};
use storage::StorageBackend;

use crate::cli::Cli;

pub const DEFAULT_DB_URL: &str = "sqlite://learnpod.sqlite3";
pub const DEFAULT_CATALOG: &str = "courses.json";

/// Settings resolved from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    pub catalog: String,
}

impl AppConfig {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            db_url: normalize_sqlite_url(&cli.db),
            catalog: cli.catalog.clone(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> StorageBackend {
        if self.db_url == "memory" {
            return StorageBackend::InMemory;
        }
        StorageBackend::Sqlite {
            url: self.db_url.clone(),
        }
    }

    #[must_use]
    pub fn catalog_source(&self) -> std::sync::Arc<dyn CatalogSource> {
        catalog_source_for(&self.catalog)
    }
}

/// Turn a bare or relative path into an absolute `sqlite://` URL.
///
/// In-memory URLs and `memory` pass through untouched.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "memory"
        || trimmed == "sqlite::memory:"
        || trimmed.contains("mode=memory")
    {
        return trimmed.to_string();
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}
