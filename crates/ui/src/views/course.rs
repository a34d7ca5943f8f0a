use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use skillforge_core::model::CourseId;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{CourseFeedback, ViewError, ViewState, view_state_from_resource};
use crate::vm::{CourseDetailVm, checkout_session_id};

#[component]
pub fn CourseView(course_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let enrollment = ctx.enrollment();

    let route_id = course_id.clone();
    let loader = enrollment.clone();
    let mut resource = use_resource(move || {
        let catalog = catalog.clone();
        let enrollment = loader.clone();
        let raw = route_id.clone();
        async move {
            let id = CourseId::new(raw).map_err(|_| ViewError::NotFound)?;
            let course = catalog.course(&id).await.map_err(|err| ViewError::from(&err))?;
            let enrolled = enrollment
                .is_enrolled(&id)
                .await
                .map_err(|err| ViewError::from(&err))?;
            Ok::<_, ViewError>(CourseDetailVm::new(&course, enrolled))
        }
    });

    let mut pending_checkout = use_signal(|| None::<String>);
    let mut action_error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);

    let navigator = use_navigator();
    let session = ctx.session();
    let opener = ctx.link_opener();
    let checkout_service = enrollment.clone();
    let checkout_course = course_id.clone();
    let on_enroll = move |_| {
        if !session.is_signed_in() {
            navigator.push(Route::Login {});
            return;
        }
        let Ok(id) = CourseId::new(checkout_course.clone()) else {
            return;
        };
        let enrollment = checkout_service.clone();
        let opener = opener.clone();
        busy.set(true);
        spawn(async move {
            match enrollment.checkout(&id).await {
                Ok(url) => {
                    if matches!(url.scheme(), "http" | "https") {
                        opener.open_url(url.as_str());
                    } else {
                        debug!(%url, "checkout handled without a browser");
                    }
                    match checkout_session_id(&url) {
                        Some(session_id) => {
                            action_error.set(None);
                            pending_checkout.set(Some(session_id));
                        }
                        None => action_error.set(Some(ViewError::Unknown)),
                    }
                }
                Err(err) => action_error.set(Some(ViewError::from(&err))),
            }
            busy.set(false);
        });
    };

    let on_verify = move |_| {
        let Some(session_id) = pending_checkout() else {
            return;
        };
        let enrollment = enrollment.clone();
        busy.set(true);
        spawn(async move {
            match enrollment.verify(&session_id).await {
                Ok(()) => {
                    info!(session = %session_id, "enrollment confirmed");
                    pending_checkout.set(None);
                    action_error.set(None);
                    resource.restart();
                }
                Err(err) => action_error.set(Some(ViewError::from(&err))),
            }
            busy.set(false);
        });
    };

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page course",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading course..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    Link { class: "btn btn-secondary", to: Route::Catalog {}, "Back to courses" }
                },
                ViewState::Ready(course) => rsx! {
                    if let Some(src) = course.image_url.clone() {
                        img { class: "course-hero", src, alt: "{course.title}" }
                    }
                    h2 { "{course.title}" }
                    div { class: "course-meta",
                        if let Some(category) = course.category.clone() {
                            span { class: "course-category", "{category}" }
                        }
                        if let Some(instructor) = course.instructor.clone() {
                            span { class: "course-instructor", "By {instructor}" }
                        }
                        span { class: "course-price", "{course.price_label}" }
                    }
                    p { class: "course-description", "{course.description}" }
                    if course.enrolled {
                        Link {
                            class: "btn btn-primary",
                            to: Route::Learn { course_id: course.id.clone() },
                            "Continue learning"
                        }
                        Link {
                            class: "btn btn-secondary",
                            to: Route::PostReview { course_id: course.id.clone() },
                            "Leave a review"
                        }
                    } else if pending_checkout.read().is_some() {
                        p { "Complete the payment in your browser, then confirm here." }
                        button {
                            id: "confirm-payment",
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: busy(),
                            onclick: on_verify,
                            "I've completed payment"
                        }
                    } else {
                        button {
                            id: "enroll",
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: busy(),
                            onclick: on_enroll,
                            "Enroll now"
                        }
                    }
                    if let Some(err) = action_error() {
                        p { class: "course-error", "{err.message()}" }
                    }
                    CourseFeedback { course_id: course.id.clone() }
                },
            }
        }
    }
}
