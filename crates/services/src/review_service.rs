use std::sync::Arc;

use skillforge_core::model::{CourseId, Rating, RatingSummary, Review, ReviewDraft, ReviewId};
use storage::repository::ReviewRepository;
use tracing::info;

use crate::auth::SessionContext;
use crate::error::ReviewServiceError;

/// A course's public reviews with their aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseReviews {
    pub summary: RatingSummary,
    pub reviews: Vec<Review>,
}

/// Posting, editing and listing course reviews.
#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    session: SessionContext,
}

impl ReviewService {
    #[must_use]
    pub fn new(reviews: Arc<dyn ReviewRepository>, session: SessionContext) -> Self {
        Self { reviews, session }
    }

    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if the listing fails.
    pub async fn course_reviews(
        &self,
        course_id: &CourseId,
    ) -> Result<CourseReviews, ReviewServiceError> {
        let reviews = self.reviews.course_reviews(course_id).await?;
        Ok(CourseReviews {
            summary: RatingSummary::from_reviews(&reviews),
            reviews,
        })
    }

    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if the listing fails, including
    /// `StorageError::Unauthorized` when signed out.
    pub async fn my_reviews(&self) -> Result<Vec<Review>, ReviewServiceError> {
        Ok(self
            .reviews
            .my_reviews()
            .await
            .inspect_err(|err| self.session.note_error(err))?)
    }

    /// # Errors
    ///
    /// Returns `ReviewServiceError::InvalidRating` outside one to five stars,
    /// `ReviewServiceError::AlreadyReviewed` for a second review of the same
    /// course, or `ReviewServiceError::Storage`.
    pub async fn post(
        &self,
        course_id: &CourseId,
        stars: u8,
        text: &str,
    ) -> Result<(), ReviewServiceError> {
        let draft = ReviewDraft::new(Rating::new(stars)?, text);
        self.reviews
            .create_review(course_id, &draft)
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        info!(course = %course_id, stars, "review posted");
        Ok(())
    }

    /// Returns the accepted edit so callers can apply it to what they show.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::InvalidRating` or
    /// `ReviewServiceError::Storage`.
    pub async fn update(
        &self,
        id: &ReviewId,
        stars: u8,
        text: &str,
    ) -> Result<ReviewDraft, ReviewServiceError> {
        let draft = ReviewDraft::new(Rating::new(stars)?, text);
        self.reviews
            .update_review(id, &draft)
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        info!(review = %id, "review updated");
        Ok(draft)
    }

    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if the review cannot be deleted.
    pub async fn delete(&self, id: &ReviewId) -> Result<(), ReviewServiceError> {
        self.reviews
            .delete_review(id)
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        info!(review = %id, "review deleted");
        Ok(())
    }
}
