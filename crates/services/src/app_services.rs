use std::sync::Arc;

use storage::repository::{InMemoryRepository, Storage};
use storage::ApiConfig;
use tracing::info;

use crate::Clock;
use crate::auth::{AuthService, SessionContext};
use crate::catalog_service::CatalogService;
use crate::certificate::CertificateService;
use crate::enrollment_service::EnrollmentService;
use crate::error::AppServicesError;
use crate::events::EventBus;
use crate::lecture_service::LectureService;
use crate::player::ProgressReporter;
use crate::review_service::ReviewService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    session: SessionContext,
    auth: Arc<AuthService>,
    catalog: Arc<CatalogService>,
    lectures: Arc<LectureService>,
    enrollment: Arc<EnrollmentService>,
    certificates: Arc<CertificateService>,
    reviews: Arc<ReviewService>,
    reporter: ProgressReporter,
}

impl AppServices {
    /// Build services backed by the learning API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Http` if the HTTP client cannot be created.
    pub fn new_http(
        config: &ApiConfig,
        clock: Clock,
        platform: &str,
    ) -> Result<Self, AppServicesError> {
        info!(api = %config.base_url, "using learning API");
        let storage = Storage::http(config)?;
        Ok(Self::from_storage(storage, clock, platform))
    }

    /// Build services over the bundled demo catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the demo data cannot be seeded.
    pub fn new_offline(clock: Clock, platform: &str) -> Result<Self, AppServicesError> {
        info!("using offline demo data");
        let repo = InMemoryRepository::with_demo_data()?;
        let storage = Storage::from_memory(repo);
        storage.token.set(Some("offline".into()));
        Ok(Self::from_storage(storage, clock, platform))
    }

    #[must_use]
    pub fn from_storage(storage: Storage, clock: Clock, platform: &str) -> Self {
        let session = SessionContext::new(storage.token.clone(), EventBus::new());
        let auth = Arc::new(AuthService::new(Arc::clone(&storage.auth), session.clone()));
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.courses)));
        let lectures = Arc::new(LectureService::new(
            Arc::clone(&storage.progress),
            session.clone(),
        ));
        let enrollment = Arc::new(EnrollmentService::new(
            Arc::clone(&storage.enrollments),
            session.clone(),
        ));
        let certificates = Arc::new(CertificateService::new(
            clock,
            platform,
            Arc::clone(&storage.auth),
            Arc::clone(&storage.courses),
            session.clone(),
        ));
        let reviews = Arc::new(ReviewService::new(
            Arc::clone(&storage.reviews),
            session.clone(),
        ));
        let reporter =
            ProgressReporter::new(Arc::clone(&storage.progress)).with_session(session.clone());

        Self {
            session,
            auth,
            catalog,
            lectures,
            enrollment,
            certificates,
            reviews,
            reporter,
        }
    }

    #[must_use]
    pub fn session(&self) -> SessionContext {
        self.session.clone()
    }

    #[must_use]
    pub fn events(&self) -> EventBus {
        self.session.events().clone()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn lectures(&self) -> Arc<LectureService> {
        Arc::clone(&self.lectures)
    }

    #[must_use]
    pub fn enrollment(&self) -> Arc<EnrollmentService> {
        Arc::clone(&self.enrollment)
    }

    #[must_use]
    pub fn certificates(&self) -> Arc<CertificateService> {
        Arc::clone(&self.certificates)
    }

    #[must_use]
    pub fn reviews(&self) -> Arc<ReviewService> {
        Arc::clone(&self.reviews)
    }

    #[must_use]
    pub fn progress_reporter(&self) -> ProgressReporter {
        self.reporter.clone()
    }
}
