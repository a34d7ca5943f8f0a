#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod catalog_service;
pub mod certificate;
pub mod enrollment_service;
pub mod error;
pub mod events;
pub mod lecture_service;
pub mod player;
pub mod review_service;

pub use skillforge_core::Clock;

pub use app_services::AppServices;
pub use auth::{AuthService, SessionContext};
pub use catalog_service::CatalogService;
pub use certificate::{CertificateFile, CertificateService};
pub use enrollment_service::EnrollmentService;
pub use error::{
    AppServicesError, AuthError, CatalogError, CertificateError, EnrollmentError,
    LectureServiceError, ReviewServiceError,
};
pub use events::{AuthEvent, EventBus};
pub use lecture_service::{CourseLectures, LectureService};
pub use player::{InFlightReports, PlayerController, ProgressReporter};
pub use review_service::{CourseReviews, ReviewService};
