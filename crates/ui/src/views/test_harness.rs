use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    AppServices, AuthService, CatalogService, CertificateService, EnrollmentService,
    LectureService, ProgressReporter, ReviewService, SessionContext,
};
use skillforge_core::time::fixed_clock;
use storage::repository::{InMemoryRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::{
    CatalogView, CourseView, LearnView, LoginView, MyCoursesView, MyReviewsView, PostReviewView,
};

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UiLinkOpener for RecordingOpener {
    fn open_url(&self, url: &str) {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_owned());
        }
    }
}

struct TestApp {
    services: AppServices,
    opener: Arc<RecordingOpener>,
}

impl UiApp for TestApp {
    fn session(&self) -> SessionContext {
        self.services.session()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn lectures(&self) -> Arc<LectureService> {
        self.services.lectures()
    }

    fn enrollment(&self) -> Arc<EnrollmentService> {
        self.services.enrollment()
    }

    fn certificates(&self) -> Arc<CertificateService> {
        self.services.certificates()
    }

    fn reviews(&self) -> Arc<ReviewService> {
        self.services.reviews()
    }

    fn progress_reporter(&self) -> ProgressReporter {
        self.services.progress_reporter()
    }

    fn download_dir(&self) -> PathBuf {
        std::env::temp_dir().join("skillforge-ui-tests")
    }

    fn link_opener(&self) -> LinkOpenerRef {
        self.opener.clone()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    Course(String),
    Login,
    Learn(String),
    PostReview(String),
    MyReviews,
    MyCourses,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Catalog => rsx! { CatalogView {} },
        ViewKind::Course(course_id) => rsx! { CourseView { course_id } },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Learn(course_id) => rsx! { LearnView { course_id } },
        ViewKind::PostReview(course_id) => rsx! { PostReviewView { course_id } },
        ViewKind::MyReviews => rsx! { MyReviewsView {} },
        ViewKind::MyCourses => rsx! { MyCoursesView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub services: AppServices,
    pub opener: Arc<RecordingOpener>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Harness over the demo catalog, signed in as the demo student.
pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let repo = InMemoryRepository::with_demo_data().expect("demo data");
    setup_view_harness_with_repo(view, repo)
}

pub fn setup_view_harness_with_repo(view: ViewKind, repo: InMemoryRepository) -> ViewHarness {
    let storage = Storage::from_memory(repo.clone());
    storage.token.set(Some("test-token".into()));
    let services = AppServices::from_storage(storage, fixed_clock(), "SkillForge");
    let opener = Arc::new(RecordingOpener::default());
    let app = Arc::new(TestApp {
        services: services.clone(),
        opener: Arc::clone(&opener),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        repo,
        services,
        opener,
    }
}
