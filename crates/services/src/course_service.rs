use std::collections::HashSet;
use std::sync::Arc;

use pod_core::model::{Course, CourseId};
use pod_core::parse_course_json;
use serde::Serialize;
use storage::CourseRepository;

use crate::catalog::CatalogSource;
use crate::error::CourseServiceError;

/// Where the catalog listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrigin {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub course: Course,
    pub downloaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub origin: CatalogOrigin,
    pub entries: Vec<CatalogEntry>,
}

/// Course upload, download and lookup.
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    catalog: Arc<dyn CatalogSource>,
}

impl CourseService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>, catalog: Arc<dyn CatalogSource>) -> Self {
        Self { courses, catalog }
    }

    /// Validate pasted course JSON and save it, replacing any course with the
    /// same id. Nothing is written when validation fails.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Import` for empty, malformed or
    /// mis-shaped input, and `CourseServiceError::Storage` if saving fails.
    pub async fn import_course_json(&self, text: &str) -> Result<Course, CourseServiceError> {
        let course = parse_course_json(text)?;
        self.courses.put_course(&course).await?;
        tracing::info!(course_id = %course.id(), lessons = course.lesson_count(), "imported course");
        Ok(course)
    }

    /// Save a catalog course for offline use.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if saving fails.
    pub async fn download_course(&self, course: &Course) -> Result<(), CourseServiceError> {
        self.courses.put_course(course).await?;
        tracing::info!(course_id = %course.id(), "downloaded course");
        Ok(())
    }

    /// Look `course_id` up in the remote catalog and save it.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Catalog` if the catalog cannot be fetched,
    /// `CourseServiceError::NotInCatalog` if it lacks the course, and
    /// `CourseServiceError::Storage` if saving fails.
    pub async fn download_from_catalog(
        &self,
        course_id: &CourseId,
    ) -> Result<Course, CourseServiceError> {
        let course = self
            .catalog
            .fetch_catalog()
            .await?
            .into_iter()
            .find(|course| course.id() == course_id)
            .ok_or_else(|| CourseServiceError::NotInCatalog(course_id.clone()))?;
        self.download_course(&course).await?;
        Ok(course)
    }

    /// Downloaded courses when there are any, otherwise the remote catalog
    /// (which is not saved).
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if local courses cannot be listed
    /// and `CourseServiceError::Catalog` if the remote fallback fails.
    pub async fn load_catalog(&self) -> Result<Catalog, CourseServiceError> {
        let local = self.courses.list_courses().await?;
        if !local.is_empty() {
            return Ok(Catalog {
                origin: CatalogOrigin::Local,
                entries: local
                    .into_iter()
                    .map(|course| CatalogEntry {
                        course,
                        downloaded: true,
                    })
                    .collect(),
            });
        }

        tracing::debug!(location = %self.catalog.location(), "no local courses; fetching catalog");
        let remote = self.catalog.fetch_catalog().await?;
        Ok(Catalog {
            origin: CatalogOrigin::Remote,
            entries: remote
                .into_iter()
                .map(|course| CatalogEntry {
                    course,
                    downloaded: false,
                })
                .collect(),
        })
    }

    /// Ids of every downloaded course.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if listing fails.
    pub async fn downloaded_ids(&self) -> Result<HashSet<CourseId>, CourseServiceError> {
        let courses = self.courses.list_courses().await?;
        Ok(courses.into_iter().map(|c| c.id().clone()).collect())
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the lookup fails.
    pub async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, CourseServiceError> {
        Ok(self.courses.get_course(id).await?)
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if listing fails.
    pub async fn list_courses(&self) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.courses.list_courses().await?)
    }

    /// Remove a downloaded course. Its progress records are kept.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the delete fails.
    pub async fn delete_course(&self, id: &CourseId) -> Result<(), CourseServiceError> {
        self.courses.delete_course(id).await?;
        tracing::info!(course_id = %id, "deleted course");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pod_core::CourseImportError;
    use pod_core::model::Lesson;
    use storage::InMemoryRepository;

    use crate::catalog::InMemoryCatalog;

    fn remote_course(id: &str) -> Course {
        Course::new(id, format!("Remote {id}"), "", vec![Lesson::new("l1", "L", "", None)])
            .unwrap()
    }

    fn service(repo: &InMemoryRepository) -> CourseService {
        CourseService::new(
            Arc::new(repo.clone()),
            Arc::new(InMemoryCatalog::new(vec![remote_course("r1"), remote_course("r2")])),
        )
    }

    #[tokio::test]
    async fn import_saves_valid_course() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        let course = service
            .import_course_json(r#"{"id":"c1","title":"T","lessons":[{"id":"l1","title":"One"}]}"#)
            .await
            .unwrap();
        assert_eq!(service.get_course(course.id()).await.unwrap(), Some(course));
    }

    #[tokio::test]
    async fn rejected_imports_leave_store_unchanged() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);

        let err = service
            .import_course_json(r#"{"id":"c1","title":"T"}"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CourseServiceError::Import(CourseImportError::InvalidCourseStructure(_))
        ));

        let err = service
            .import_course_json(r#"{"id":"c1","title":"T","lessons":"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CourseServiceError::Import(CourseImportError::MalformedInput(_))
        ));

        assert!(repo.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_falls_back_to_remote_when_nothing_downloaded() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);

        let catalog = service.load_catalog().await.unwrap();
        assert_eq!(catalog.origin, CatalogOrigin::Remote);
        assert_eq!(catalog.entries.len(), 2);
        assert!(catalog.entries.iter().all(|e| !e.downloaded));
        assert!(repo.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_prefers_local_courses() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        service
            .download_from_catalog(&CourseId::new("r2"))
            .await
            .unwrap();

        let catalog = service.load_catalog().await.unwrap();
        assert_eq!(catalog.origin, CatalogOrigin::Local);
        assert_eq!(catalog.entries.len(), 1);
        assert!(catalog.entries[0].downloaded);
        assert!(service.downloaded_ids().await.unwrap().contains(&CourseId::new("r2")));
    }

    #[tokio::test]
    async fn download_of_unknown_course_fails() {
        let repo = InMemoryRepository::new();
        let err = service(&repo)
            .download_from_catalog(&CourseId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, CourseServiceError::NotInCatalog(_)));
    }

    #[tokio::test]
    async fn delete_keeps_service_usable_for_missing_ids() {
        let repo = InMemoryRepository::new();
        let service = service(&repo);
        service.delete_course(&CourseId::new("missing")).await.unwrap();
        assert!(service.list_courses().await.unwrap().is_empty());
    }
}
