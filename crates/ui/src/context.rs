use std::path::PathBuf;
use std::sync::Arc;

use services::{
    AuthService, CatalogService, CertificateService, EnrollmentService, LectureService,
    ProgressReporter, ReviewService, SessionContext,
};

use crate::platform::LinkOpenerRef;

pub trait UiApp: Send + Sync {
    fn session(&self) -> SessionContext;
    fn auth(&self) -> Arc<AuthService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn lectures(&self) -> Arc<LectureService>;
    fn enrollment(&self) -> Arc<EnrollmentService>;
    fn certificates(&self) -> Arc<CertificateService>;
    fn reviews(&self) -> Arc<ReviewService>;
    fn progress_reporter(&self) -> ProgressReporter;

    /// Where claimed certificates are saved.
    fn download_dir(&self) -> PathBuf;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    session: SessionContext,
    auth: Arc<AuthService>,
    catalog: Arc<CatalogService>,
    lectures: Arc<LectureService>,
    enrollment: Arc<EnrollmentService>,
    certificates: Arc<CertificateService>,
    reviews: Arc<ReviewService>,
    reporter: ProgressReporter,
    download_dir: PathBuf,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session: app.session(),
            auth: app.auth(),
            catalog: app.catalog(),
            lectures: app.lectures(),
            enrollment: app.enrollment(),
            certificates: app.certificates(),
            reviews: app.reviews(),
            reporter: app.progress_reporter(),
            download_dir: app.download_dir(),
            link_opener: app.link_opener(),
        }
    }

    #[must_use]
    pub fn session(&self) -> SessionContext {
        self.session.clone()
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

    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone()
    }

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
