use url::Url;

use crate::model::ids::CourseId;

/// A completed course purchase. The student's enrolled courses are read
/// from these.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub course_id: CourseId,
    pub amount: Option<f64>,
    pub course_title: Option<String>,
    pub course_image: Option<Url>,
}

impl Payment {
    /// Course title, or the bare id when the API sent none.
    #[must_use]
    pub fn course_label(&self) -> &str {
        self.course_title
            .as_deref()
            .unwrap_or_else(|| self.course_id.as_str())
    }
}

/// One entry per course, in purchase order. A course bought twice is listed
/// once.
#[must_use]
pub fn enrolled_courses(payments: &[Payment]) -> Vec<&Payment> {
    let mut seen = Vec::new();
    payments
        .iter()
        .filter(|payment| {
            if seen.contains(&&payment.course_id) {
                false
            } else {
                seen.push(&payment.course_id);
                true
            }
        })
        .collect()
}
