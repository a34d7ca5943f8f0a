use std::sync::Arc;

use skillforge_core::catalog::CatalogStore;
use skillforge_core::model::{Course, CourseId};
use storage::repository::CourseRepository;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// Fetches the catalog into a [`CatalogStore`].
#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Load every published course and the category list.
    ///
    /// A failing category lookup is not fatal: the store falls back to the
    /// categories of the loaded courses.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the courses cannot be fetched.
    pub async fn load(&self) -> Result<CatalogStore, CatalogError> {
        let mut store = CatalogStore::new();
        store.set_courses(self.courses.list_courses(None).await?);
        match self.courses.list_categories().await {
            Ok(categories) => store.set_categories(categories),
            Err(err) => warn!(error = %err, "category list unavailable"),
        }
        debug!(courses = store.courses().len(), "catalog loaded");
        Ok(store)
    }

    /// Replace the store's courses with search results.
    ///
    /// A blank query reloads the full list and clears the search text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the request fails; the store is left
    /// unchanged in that case.
    pub async fn search(&self, store: &mut CatalogStore, query: &str) -> Result<(), CatalogError> {
        if query.trim().is_empty() {
            let courses = self.courses.list_courses(None).await?;
            store.set_courses(courses);
            store.set_search_query("");
            return Ok(());
        }
        let courses = self.courses.search_courses(query).await?;
        store.set_courses(courses);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the course cannot be fetched.
    pub async fn course(&self, id: &CourseId) -> Result<Course, CatalogError> {
        Ok(self.courses.get_course(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn blank_search_restores_full_catalog() {
        let repo = InMemoryRepository::with_demo_data().unwrap();
        let service = CatalogService::new(Arc::new(repo));
        let mut store = service.load().await.unwrap();
        assert_eq!(store.courses().len(), 2);
        assert_eq!(store.categories(), vec!["Art".to_string(), "Programming".to_string()]);

        service.search(&mut store, "watercolor").await.unwrap();
        assert_eq!(store.courses().len(), 1);

        service.search(&mut store, "   ").await.unwrap();
        assert_eq!(store.courses().len(), 2);
    }
}
