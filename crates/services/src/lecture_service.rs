use std::sync::Arc;

use skillforge_core::certificate::is_course_complete;
use skillforge_core::model::{CourseId, LectureWithProgress};
use storage::repository::ProgressRepository;

use crate::auth::SessionContext;
use crate::error::LectureServiceError;

/// Lectures of a course with the user's progress, plus certificate eligibility.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseLectures {
    pub course_id: CourseId,
    pub lectures: Vec<LectureWithProgress>,
    pub certificate_eligible: bool,
}

#[derive(Clone)]
pub struct LectureService {
    progress: Arc<dyn ProgressRepository>,
    session: SessionContext,
}

impl LectureService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>, session: SessionContext) -> Self {
        Self { progress, session }
    }

    /// Fetch the lecture list. Eligibility is recomputed on every load.
    ///
    /// # Errors
    ///
    /// Returns `LectureServiceError::Storage` if the list cannot be fetched.
    pub async fn load(&self, course_id: &CourseId) -> Result<CourseLectures, LectureServiceError> {
        let lectures = self
            .progress
            .list_lectures(course_id)
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        Ok(CourseLectures {
            course_id: course_id.clone(),
            certificate_eligible: is_course_complete(&lectures),
            lectures,
        })
    }
}
