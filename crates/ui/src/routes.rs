use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use services::AuthEvent;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::context::AppContext;
use crate::views::{
    CatalogView, CourseView, LearnView, LoginView, MyCoursesView, MyReviewsView, PostReviewView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Catalog {},
        #[route("/course/:course_id", CourseView)] Course { course_id: String },
        #[route("/login", LoginView)] Login {},
        #[route("/learn/:course_id", LearnView)] Learn { course_id: String },
        #[route("/course/:course_id/review", PostReviewView)] PostReview { course_id: String },
        #[route("/my-courses", MyCoursesView)] MyCourses {},
        #[route("/reviews", MyReviewsView)] MyReviews {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let session = ctx.session();
    let mut signed_in_as = use_signal(|| session.profile().map(|p| p.certificate_name().to_owned()));

    let events = session.events().clone();
    use_future(move || {
        let mut rx = events.subscribe();
        async move {
            loop {
                match rx.recv().await {
                    Ok(AuthEvent::SignedIn(profile)) => {
                        signed_in_as.set(Some(profile.certificate_name().to_owned()));
                    }
                    Ok(AuthEvent::SignedOut) => signed_in_as.set(None),
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        }
    });

    // A token from the environment or the offline store has no profile yet.
    let refresher = ctx.auth();
    use_future(move || {
        let auth = refresher.clone();
        async move {
            if !auth.session().is_signed_in() || auth.session().profile().is_some() {
                return;
            }
            match auth.refresh_profile().await {
                Ok(profile) => signed_in_as.set(Some(profile.certificate_name().to_owned())),
                Err(err) => debug!(error = %err, "no profile for the stored session"),
            }
        }
    });

    let auth = ctx.auth();
    let navigator = use_navigator();
    let on_logout = move |_| {
        auth.logout();
        navigator.push(Route::Catalog {});
    };

    rsx! {
        nav { class: "sidebar",
            h1 { "SkillForge" }
            ul {
                li { Link { to: Route::Catalog {}, "Courses" } }
                if signed_in_as.read().is_none() {
                    li { Link { to: Route::Login {}, "Sign in" } }
                } else {
                    li { Link { to: Route::MyCourses {}, "My courses" } }
                    li { Link { to: Route::MyReviews {}, "My reviews" } }
                }
            }
            if let Some(name) = signed_in_as() {
                div { class: "sidebar-account",
                    p { class: "sidebar-user", "Signed in as {name}" }
                    button { class: "btn btn-secondary", r#type: "button", onclick: on_logout, "Sign out" }
                }
            }
        }
    }
}
