use dioxus::prelude::*;
use services::{
    AuthError, CatalogError, CertificateError, EnrollmentError, LectureServiceError,
    ReviewServiceError,
};
use storage::repository::StorageError;

/// What a view can tell the user about a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    SignedOut,
    MissingCredentials,
    InvalidCredentials,
    AlreadyRegistered,
    NotEligible,
    PaymentNotConfirmed,
    InvalidRating,
    AlreadyReviewed,
    Unreachable,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ViewError::NotFound => "We couldn't find that course.",
            ViewError::SignedOut => "Please sign in to continue.",
            ViewError::MissingCredentials => "Email and password are required.",
            ViewError::InvalidCredentials => "Invalid email or password.",
            ViewError::AlreadyRegistered => "An account with this email already exists.",
            ViewError::NotEligible => "Finish every lecture to claim your certificate.",
            ViewError::PaymentNotConfirmed => "Payment hasn't been confirmed yet.",
            ViewError::InvalidRating => "Pick a rating from 1 to 5 stars.",
            ViewError::AlreadyReviewed => "You have already reviewed this course.",
            ViewError::Unreachable => "The server can't be reached right now.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

fn classify(err: &StorageError) -> ViewError {
    match err {
        StorageError::NotFound => ViewError::NotFound,
        StorageError::Unauthorized => ViewError::SignedOut,
        StorageError::Connection(_) => ViewError::Unreachable,
        _ => ViewError::Unknown,
    }
}

impl From<&CatalogError> for ViewError {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::Storage(err) => classify(err),
            _ => ViewError::Unknown,
        }
    }
}

impl From<&LectureServiceError> for ViewError {
    fn from(err: &LectureServiceError) -> Self {
        match err {
            LectureServiceError::Storage(err) => classify(err),
            _ => ViewError::Unknown,
        }
    }
}

impl From<&EnrollmentError> for ViewError {
    fn from(err: &EnrollmentError) -> Self {
        match err {
            EnrollmentError::NotVerified(_) => ViewError::PaymentNotConfirmed,
            EnrollmentError::Storage(err) => classify(err),
            _ => ViewError::Unknown,
        }
    }
}

impl From<&AuthError> for ViewError {
    fn from(err: &AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ViewError::MissingCredentials,
            AuthError::InvalidCredentials => ViewError::InvalidCredentials,
            AuthError::AlreadyRegistered => ViewError::AlreadyRegistered,
            AuthError::SignedOut => ViewError::SignedOut,
            AuthError::Storage(err) => classify(err),
            _ => ViewError::Unknown,
        }
    }
}

impl From<&CertificateError> for ViewError {
    fn from(err: &CertificateError) -> Self {
        match err {
            CertificateError::NotEligible(_) => ViewError::NotEligible,
            CertificateError::Storage(err) => classify(err),
            _ => ViewError::Unknown,
        }
    }
}

impl From<&ReviewServiceError> for ViewError {
    fn from(err: &ReviewServiceError) -> Self {
        match err {
            ReviewServiceError::InvalidRating(_) => ViewError::InvalidRating,
            ReviewServiceError::AlreadyReviewed => ViewError::AlreadyReviewed,
            ReviewServiceError::Storage(err) => classify(err),
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    /// Keep showing `last` while a reload is in flight, so mounted children
    /// survive a refresh.
    #[must_use]
    pub fn or_last(self, last: Option<T>) -> Self {
        match (self, last) {
            (ViewState::Loading, Some(last)) => ViewState::Ready(last),
            (state, _) => state,
        }
    }
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
