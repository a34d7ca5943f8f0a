//! Course-completion certificates: eligibility, naming and printed content.
//!
//! Rendering lives with the services; this module only decides *whether* a
//! certificate can be issued and *what* it says.

use chrono::NaiveDate;
use url::Url;
use uuid::Uuid;

use crate::model::{CourseId, LectureWithProgress};

/// Raster size of the certificate image.
pub const CERTIFICATE_WIDTH: u32 = 1600;
pub const CERTIFICATE_HEIGHT: u32 = 1150;

pub const DEFAULT_PLATFORM_NAME: &str = "SkillForge";

const DEFAULT_SUBTITLE: &str = "Awarded for successfully completing";
const WATERMARK_FALLBACK: &str = "S";

/// True when the course has lectures and every one of them is completed.
#[must_use]
pub fn is_course_complete(lectures: &[LectureWithProgress]) -> bool {
    !lectures.is_empty() && lectures.iter().all(|l| l.status().is_completed())
}

/// Lowercase the name and replace every non-alphanumeric ASCII character by `_`.
#[must_use]
pub fn slugify_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// `certificate-<slug(name)>-<courseId>.png`
#[must_use]
pub fn certificate_filename(student_name: &str, course_id: &CourseId) -> String {
    format!("certificate-{}-{}.png", slugify_name(student_name), course_id)
}

/// Uppercased first character of the course title, `S` for an empty title.
#[must_use]
pub fn watermark_glyph(course_title: &str) -> String {
    course_title
        .trim()
        .chars()
        .next()
        .map_or_else(|| WATERMARK_FALLBACK.to_owned(), |c| c.to_uppercase().collect())
}

/// Everything printed on a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDetails {
    platform: String,
    course_title: String,
    student_name: String,
    issued_on: NaiveDate,
    subtitle: Option<String>,
    instructor: Option<String>,
    course_length: Option<String>,
    description: Option<String>,
    certificate_id: Option<Uuid>,
    reference_url: Option<Url>,
}

impl CertificateDetails {
    #[must_use]
    pub fn new(
        platform: impl Into<String>,
        course_title: impl Into<String>,
        student_name: impl Into<String>,
        issued_on: NaiveDate,
    ) -> Self {
        Self {
            platform: platform.into(),
            course_title: course_title.into(),
            student_name: student_name.into(),
            issued_on,
            subtitle: None,
            instructor: None,
            course_length: None,
            description: None,
            certificate_id: None,
            reference_url: None,
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    #[must_use]
    pub fn with_course_length(mut self, length: impl Into<String>) -> Self {
        self.course_length = Some(length.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_certificate_id(mut self, id: Uuid) -> Self {
        self.certificate_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_reference_url(mut self, url: Url) -> Self {
        self.reference_url = Some(url);
        self
    }

    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    #[must_use]
    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn issued_on(&self) -> NaiveDate {
        self.issued_on
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        self.subtitle.as_deref().unwrap_or(DEFAULT_SUBTITLE)
    }

    #[must_use]
    pub fn certificate_id_line(&self) -> Option<String> {
        self.certificate_id.map(|id| format!("Certificate ID: {id}"))
    }

    #[must_use]
    pub fn reference_line(&self) -> Option<String> {
        self.reference_url.as_ref().map(|url| format!("Verify: {url}"))
    }

    /// Issue date as printed, e.g. `November 14, 2023`.
    #[must_use]
    pub fn issued_on_label(&self) -> String {
        self.issued_on.format("%B %-d, %Y").to_string()
    }

    /// Centered detail lines under the divider, optional ones first.
    #[must_use]
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);
        if let Some(length) = &self.course_length {
            lines.push(format!("Course Length: {length}"));
        }
        if let Some(instructor) = &self.instructor {
            lines.push(format!("Instructor: {instructor}"));
        }
        lines.push(format!("Issued by {}", self.platform));
        lines.push(format!("Awarded on {}", self.issued_on_label()));
        lines
    }

    #[must_use]
    pub fn certifying_sentence(&self) -> String {
        format!(
            "This is to certify that {} has demonstrated successful mastery of \"{}\".",
            self.student_name, self.course_title
        )
    }

    #[must_use]
    pub fn footer_line(&self) -> String {
        format!(
            "This certificate is issued digitally and can be verified via {}.",
            self.platform
        )
    }

    #[must_use]
    pub fn watermark(&self) -> String {
        watermark_glyph(&self.course_title)
    }
}
