use std::sync::Arc;

use skillforge_core::model::{CourseId, Payment, enrolled_courses};
use storage::repository::{EnrollmentRepository, StorageError};
use tracing::info;
use url::Url;

use crate::auth::SessionContext;
use crate::error::EnrollmentError;

#[derive(Clone)]
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentRepository>,
    session: SessionContext,
}

impl EnrollmentService {
    #[must_use]
    pub fn new(enrollments: Arc<dyn EnrollmentRepository>, session: SessionContext) -> Self {
        Self {
            enrollments,
            session,
        }
    }

    /// Whether the signed-in user owns the course. Signed out means no.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::Storage` for failures other than a missing
    /// session.
    pub async fn is_enrolled(&self, course_id: &CourseId) -> Result<bool, EnrollmentError> {
        match self.enrollments.is_enrolled(course_id).await {
            Ok(enrolled) => Ok(enrolled),
            Err(StorageError::Unauthorized) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Courses the signed-in user paid for, one entry per course.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::Storage`, `StorageError::Unauthorized`
    /// included when signed out.
    pub async fn my_courses(&self) -> Result<Vec<Payment>, EnrollmentError> {
        let payments = self
            .enrollments
            .list_payments()
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        Ok(enrolled_courses(&payments).into_iter().cloned().collect())
    }

    /// Start checkout and return the page to open.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::Storage` if no session can be created.
    pub async fn checkout(&self, course_id: &CourseId) -> Result<Url, EnrollmentError> {
        let url = self
            .enrollments
            .create_checkout_session(course_id)
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        info!(course = %course_id, "checkout session created");
        Ok(url)
    }

    /// # Errors
    ///
    /// Returns `EnrollmentError::NotVerified` if the payment is not confirmed,
    /// or `EnrollmentError::Storage` if the check fails.
    pub async fn verify(&self, session_id: &str) -> Result<(), EnrollmentError> {
        let verified = self
            .enrollments
            .verify_payment(session_id)
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        if verified {
            Ok(())
        } else {
            Err(EnrollmentError::NotVerified(session_id.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use skillforge_core::model::UserProfile;
    use storage::repository::{InMemoryRepository, SessionToken};

    fn service(repo: &InMemoryRepository) -> EnrollmentService {
        let session = SessionContext::new(SessionToken::default(), EventBus::new());
        EnrollmentService::new(Arc::new(repo.clone()), session)
    }

    #[tokio::test]
    async fn signed_out_user_is_not_enrolled() {
        let repo = InMemoryRepository::new();
        let course = CourseId::new("1").unwrap();
        assert!(!service(&repo).is_enrolled(&course).await.unwrap());
    }

    #[tokio::test]
    async fn checkout_and_verify_enrolls() {
        let repo = InMemoryRepository::new();
        repo.set_current_profile(Some(UserProfile::new(Some("Ada".into()), None)))
            .unwrap();
        let service = service(&repo);
        let course = CourseId::new("1").unwrap();

        let url = service.checkout(&course).await.unwrap();
        let session_id = url.path().trim_start_matches('/');
        assert!(matches!(
            service.verify("cs_unknown").await,
            Err(EnrollmentError::NotVerified(_))
        ));
        service.verify(session_id).await.unwrap();
        assert!(service.is_enrolled(&course).await.unwrap());
    }

    #[tokio::test]
    async fn purchased_course_is_listed_once() {
        let repo = InMemoryRepository::new();
        repo.set_current_profile(Some(UserProfile::new(Some("Ada".into()), None)))
            .unwrap();
        let service = service(&repo);
        let course = CourseId::new("1").unwrap();
        for _ in 0..2 {
            let url = service.checkout(&course).await.unwrap();
            service
                .verify(url.path().trim_start_matches('/'))
                .await
                .unwrap();
        }

        let courses = service.my_courses().await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course_id, course);
    }

    #[tokio::test]
    async fn signed_out_user_cannot_list_purchases() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            service(&repo).my_courses().await,
            Err(EnrollmentError::Storage(StorageError::Unauthorized))
        ));
    }
}
