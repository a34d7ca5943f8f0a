#![forbid(unsafe_code)]

pub mod demo;
pub mod http;
pub mod repository;

pub use http::{ApiConfig, HttpInitError, HttpRepository};
pub use repository::{
    AuthGrant, AuthRepository, CourseRepository, Credentials, EnrollmentRepository,
    InMemoryRepository, NewAccount, ProgressRepository, ReviewRepository, SessionToken, Storage,
    StorageError,
};
