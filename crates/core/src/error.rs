use thiserror::Error;

use crate::model::{CourseError, LectureError, ParseIdError, ProgressError, ReviewError};
use crate::playback::MediaError;

/// Any domain validation failure from this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Lecture(#[from] LectureError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Media(#[from] MediaError),
}
