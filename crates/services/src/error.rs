//! Shared error types for the services crate.

use thiserror::Error;

use skillforge_core::model::{CourseId, ReviewError};
use storage::repository::StorageError;
use storage::HttpInitError;

/// Errors emitted by `CertificateService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CertificateError {
    #[error("course {0} is not completed yet")]
    NotEligible(CourseId),
    #[error("certificate rendering failed: {0}")]
    Render(String),
    #[error("could not write certificate: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LectureService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LectureServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `EnrollmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnrollmentError {
    #[error("payment for checkout {0} was not confirmed")]
    NotVerified(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ReviewService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewServiceError {
    #[error(transparent)]
    InvalidRating(#[from] ReviewError),
    #[error("you have already reviewed this course")]
    AlreadyReviewed,
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ReviewServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict => ReviewServiceError::AlreadyReviewed,
            other => ReviewServiceError::Storage(other),
        }
    }
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    AlreadyRegistered,
    #[error("not signed in")]
    SignedOut,
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unauthorized => AuthError::SignedOut,
            StorageError::Conflict => AuthError::AlreadyRegistered,
            other => AuthError::Storage(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Http(#[from] HttpInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
