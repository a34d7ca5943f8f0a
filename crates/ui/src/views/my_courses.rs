use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_enrolled_courses;

/// Courses the signed-in student has paid for.
#[component]
pub fn MyCoursesView() -> Element {
    let ctx = use_context::<AppContext>();
    let enrollment = ctx.enrollment();

    let mut resource = use_resource(move || {
        let enrollment = enrollment.clone();
        async move {
            let payments = enrollment
                .my_courses()
                .await
                .map_err(|err| ViewError::from(&err))?;
            Ok::<_, ViewError>(map_enrolled_courses(&payments))
        }
    });

    rsx! {
        div { class: "page my-courses",
            h2 { "Enrolled Courses" }
            match view_state_from_resource(&resource) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading your courses..." }
                },
                ViewState::Error(ViewError::SignedOut) => rsx! {
                    p { "{ViewError::SignedOut.message()}" }
                    Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
                ViewState::Ready(courses) => rsx! {
                    if courses.is_empty() {
                        p { class: "my-courses-empty", "You have not enrolled in any courses." }
                        Link { class: "btn btn-secondary", to: Route::Catalog {}, "Browse courses" }
                    } else {
                        div { class: "course-grid",
                            for course in courses {
                                article { key: "{course.course_id}", class: "course-card",
                                    if let Some(src) = course.image_url.clone() {
                                        img { src, alt: "{course.title}" }
                                    }
                                    h3 { "{course.title}" }
                                    p { class: "course-paid", "{course.paid_label}" }
                                    Link {
                                        class: "btn btn-primary",
                                        to: Route::Learn { course_id: course.course_id.clone() },
                                        "Open course"
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
