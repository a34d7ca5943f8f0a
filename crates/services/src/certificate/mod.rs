//! Certificate issuing: eligibility check, lookups, rendering and saving.

mod layout;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use skillforge_core::certificate::{CertificateDetails, certificate_filename, is_course_complete};
use skillforge_core::model::{Course, CourseId, LectureWithProgress, UserProfile};
use storage::repository::{AuthRepository, CourseRepository};
use tracing::info;
use uuid::Uuid;

pub use layout::certificate_svg;
pub use render::render_png;

use crate::Clock;
use crate::auth::SessionContext;
use crate::error::CertificateError;

/// A rendered certificate ready to be saved or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateFile {
    pub file_name: String,
    pub png: Vec<u8>,
}

impl CertificateFile {
    /// Write the PNG into `dir`, creating it if needed. Returns the final path.
    ///
    /// Bytes go to a temporary file first and are renamed into place, so a
    /// failed write never leaves a truncated certificate behind.
    ///
    /// # Errors
    ///
    /// Returns `CertificateError::Io` if the directory or file cannot be written.
    pub async fn save_in(&self, dir: &Path) -> Result<PathBuf, CertificateError> {
        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(&self.file_name);
        let partial = dir.join(format!(".{}.part", self.file_name));
        tokio::fs::write(&partial, &self.png).await?;
        if let Err(err) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err.into());
        }
        Ok(target)
    }
}

/// Human length of a course, e.g. `1h 05m` or `12m`.
#[must_use]
pub fn format_course_length(total_seconds: u64) -> String {
    let minutes = total_seconds.div_ceil(60);
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m:02}m"),
    }
}

/// Certificate content for `profile` finishing `course` on `issued_on`.
#[must_use]
pub fn certificate_details(
    platform: &str,
    profile: &UserProfile,
    course: &Course,
    lectures: &[LectureWithProgress],
    issued_on: NaiveDate,
) -> CertificateDetails {
    let mut details = CertificateDetails::new(
        platform,
        course.title(),
        profile.certificate_name(),
        issued_on,
    );
    if let Some(instructor) = course.instructor() {
        details = details.with_instructor(instructor);
    }
    if let Some(description) = course.description() {
        details = details.with_description(description);
    }
    let total: u64 = lectures
        .iter()
        .map(|l| u64::from(l.lecture.duration_seconds()))
        .sum();
    if total > 0 {
        details = details.with_course_length(format_course_length(total));
    }
    details
}

/// Issues completion certificates for the signed-in user.
#[derive(Clone)]
pub struct CertificateService {
    clock: Clock,
    platform: String,
    auth: Arc<dyn AuthRepository>,
    courses: Arc<dyn CourseRepository>,
    session: SessionContext,
}

impl CertificateService {
    #[must_use]
    pub fn new(
        clock: Clock,
        platform: impl Into<String>,
        auth: Arc<dyn AuthRepository>,
        courses: Arc<dyn CourseRepository>,
        session: SessionContext,
    ) -> Self {
        Self {
            clock,
            platform: platform.into(),
            auth,
            courses,
            session,
        }
    }

    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Build the certificate for a course every lecture of which is completed.
    ///
    /// Eligibility comes from the lecture list the caller already holds; only
    /// the profile and the course are fetched. Nothing is written to the
    /// server; calling again renders a new copy.
    ///
    /// # Errors
    ///
    /// Returns `CertificateError::NotEligible` if a lecture is unfinished,
    /// `CertificateError::Storage` if a lookup fails, or
    /// `CertificateError::Render` if the image cannot be produced.
    pub async fn issue(
        &self,
        course_id: &CourseId,
        lectures: &[LectureWithProgress],
    ) -> Result<CertificateFile, CertificateError> {
        if !is_course_complete(lectures) {
            return Err(CertificateError::NotEligible(course_id.clone()));
        }
        let profile = self
            .auth
            .current_profile()
            .await
            .inspect_err(|err| self.session.note_error(err))?;
        let course = self.courses.get_course(course_id).await?;

        let details = certificate_details(
            &self.platform,
            &profile,
            &course,
            lectures,
            self.clock.today(),
        )
        .with_certificate_id(Uuid::new_v4());
        let svg = certificate_svg(&details);
        let png = tokio::task::spawn_blocking(move || render_png(&svg))
            .await
            .map_err(|e| CertificateError::Render(e.to_string()))??;

        let file_name = certificate_filename(profile.certificate_name(), course_id);
        info!(course = %course_id, file = %file_name, "certificate issued");
        Ok(CertificateFile { file_name, png })
    }
}
