use serde::Serialize;
use skillforge_core::model::{CourseId, LectureId, LectureWithProgress, ProgressUpdate};

use super::HttpRepository;
use super::mapping::lectures_from;
use crate::repository::{ProgressRepository, StorageError};

#[derive(Debug, Serialize)]
struct ProgressBody {
    status: &'static str,
    watched_seconds: u32,
}

#[async_trait::async_trait]
impl ProgressRepository for HttpRepository {
    async fn list_lectures(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<LectureWithProgress>, StorageError> {
        let request = self.get(&format!("video/course/{course_id}/progress"))?;
        let body = self.send(request).await?;
        lectures_from(body, self.base_url())
    }

    async fn update_progress(
        &self,
        lecture_id: &LectureId,
        update: ProgressUpdate,
    ) -> Result<(), StorageError> {
        let payload = ProgressBody {
            status: update.status.as_str(),
            watched_seconds: update.watched_seconds,
        };
        let request = self
            .patch(&format!("video/{lecture_id}/progress"))?
            .json(&payload);
        self.send(request).await?;
        Ok(())
    }
}
