mod course;
mod ids;
mod lecture;
mod payment;
mod profile;
mod progress;
mod review;

pub use ids::{CourseId, LectureId, ParseIdError, ReviewId};

pub use course::{Course, CourseError, normalize_category};
pub use lecture::{Lecture, LectureError, LectureListFilter, LectureWithProgress, select_lecture};
pub use profile::{FALLBACK_STUDENT_NAME, UserProfile};
pub use progress::{ProgressError, ProgressUpdate, WatchProgress, WatchStatus, whole_seconds};
pub use payment::{Payment, enrolled_courses};
pub use review::{Rating, RatingSummary, Review, ReviewDraft, ReviewError};
