//! Sources for the bulk course catalog shown before anything is downloaded.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use pod_core::model::Course;
use pod_core::parse_catalog_json;
use reqwest::Client;

use crate::error::CatalogError;

/// Fetches the full remote catalog as a list of courses.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog cannot be read or parsed.
    async fn fetch_catalog(&self) -> Result<Vec<Course>, CatalogError>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Catalog read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Course>, CatalogError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(parse_catalog_json(&text)?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Catalog fetched with a plain GET.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    url: String,
}

impl HttpCatalog {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Course>, CatalogError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status()));
        }
        let text = response.text().await?;
        Ok(parse_catalog_json(&text)?)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Fixed catalog, for tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    courses: Vec<Course>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Course>, CatalogError> {
        Ok(self.courses.clone())
    }

    fn location(&self) -> String {
        "memory".to_owned()
    }
}

/// Pick an HTTP source for `http(s)://` locations and a file source otherwise.
#[must_use]
pub fn catalog_source_for(location: &str) -> Arc<dyn CatalogSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpCatalog::new(location))
    } else {
        Arc::new(FileCatalog::new(location))
    }
}
