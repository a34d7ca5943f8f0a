use std::collections::BTreeSet;

use skillforge_core::model::{Course, CourseId};

use super::HttpRepository;
use super::mapping::{course_from, courses_from};
use crate::repository::{CourseRepository, StorageError};

#[async_trait::async_trait]
impl CourseRepository for HttpRepository {
    async fn list_courses(&self, category: Option<&str>) -> Result<Vec<Course>, StorageError> {
        let mut request = self.get("course")?;
        if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
            request = request.query(&[("category", category)]);
        }
        let body = self.send(request).await?;
        courses_from(body, self.base_url())
    }

    async fn search_courses(&self, query: &str) -> Result<Vec<Course>, StorageError> {
        let request = self.get("course/search")?.query(&[("q", query.trim())]);
        let body = self.send(request).await?;
        courses_from(body, self.base_url())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Course, StorageError> {
        let body = self.send(self.get(&format!("course/{id}"))?).await?;
        course_from(body, self.base_url())
    }

    // The API has no category endpoint; derive them from the published list.
    async fn list_categories(&self) -> Result<Vec<String>, StorageError> {
        let courses = self.list_courses(None).await?;
        Ok(courses
            .iter()
            .filter_map(Course::category)
            .map(str::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }
}
