use serde::Serialize;
use skillforge_core::model::{CourseId, Review, ReviewDraft, ReviewId};

use super::HttpRepository;
use super::mapping::reviews_from;
use crate::repository::{ReviewRepository, StorageError};

#[derive(Debug, Serialize)]
struct ReviewBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    course_id: Option<&'a str>,
    rating: u8,
    review: &'a str,
}

impl<'a> ReviewBody<'a> {
    fn new(course_id: Option<&'a CourseId>, draft: &'a ReviewDraft) -> Self {
        Self {
            course_id: course_id.map(CourseId::as_str),
            rating: draft.rating.stars(),
            review: draft.text.as_deref().unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl ReviewRepository for HttpRepository {
    async fn course_reviews(&self, course_id: &CourseId) -> Result<Vec<Review>, StorageError> {
        let request = self.get(&format!("review/course/{course_id}"))?;
        reviews_from(self.send(request).await?, Some(course_id), self.base_url())
    }

    async fn my_reviews(&self) -> Result<Vec<Review>, StorageError> {
        let request = self.get("review/myreviews")?;
        reviews_from(self.send(request).await?, None, self.base_url())
    }

    async fn create_review(
        &self,
        course_id: &CourseId,
        draft: &ReviewDraft,
    ) -> Result<(), StorageError> {
        let request = self
            .post("review")?
            .json(&ReviewBody::new(Some(course_id), draft));
        self.send(request).await?;
        Ok(())
    }

    async fn update_review(&self, id: &ReviewId, draft: &ReviewDraft) -> Result<(), StorageError> {
        let request = self
            .patch(&format!("review/{id}"))?
            .json(&ReviewBody::new(None, draft));
        self.send(request).await?;
        Ok(())
    }

    async fn delete_review(&self, id: &ReviewId) -> Result<(), StorageError> {
        let request = self.delete(&format!("review/{id}"))?;
        self.send(request).await?;
        Ok(())
    }
}
