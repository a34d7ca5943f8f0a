use dioxus::prelude::*;
use dioxus_router::Link;
use services::CourseLectures;
use skillforge_core::model::{
    CourseId, LectureId, LectureListFilter, LectureWithProgress, select_lecture,
};
use tracing::{info, warn};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::player::{PlayerPanel, WebPlayer};
use crate::views::toast::{Toast, ToastHost};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{completion_summary, map_lecture_rows, tab_label};

#[derive(Clone, Debug, PartialEq)]
struct LearnData {
    course_title: String,
    lectures: CourseLectures,
}

#[component]
pub fn LearnView(course_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let lecture_service = ctx.lectures();
    let catalog = ctx.catalog();

    let mut resource = use_resource(move || {
        let lecture_service = lecture_service.clone();
        let catalog = catalog.clone();
        let raw = course_id.clone();
        async move {
            let id = CourseId::new(raw).map_err(|_| ViewError::NotFound)?;
            let lectures = lecture_service
                .load(&id)
                .await
                .map_err(|err| ViewError::from(&err))?;
            let course_title = catalog
                .course(&id)
                .await
                .map_or_else(|_| "Course".to_owned(), |course| course.title().to_owned());
            Ok::<_, ViewError>(LearnData {
                course_title,
                lectures,
            })
        }
    });

    let mut filter = use_signal(LectureListFilter::default);
    let mut loaded = use_signal(|| None::<LearnData>);
    let mut current = use_signal(|| None::<LectureWithProgress>);
    let mut player = use_signal(|| None::<WebPlayer>);
    let mut toast = use_signal(|| None::<Toast>);
    let mut claiming = use_signal(|| false);

    // Keep the latest list, and the open lecture's row in step with it. The
    // first lecture opens once the list arrives.
    use_effect(move || {
        let Some(Ok(data)) = resource.value().read().as_ref().cloned() else {
            return;
        };
        let open = current.peek().as_ref().map(|item| item.lecture.id().clone());
        if let Some(item) = select_lecture(&data.lectures.lectures, open.as_ref()) {
            current.set(Some(item.clone()));
        }
        loaded.set(Some(data));
    });

    let mut open_lecture = move |id: LectureId| {
        let found = loaded
            .peek()
            .as_ref()
            .and_then(|data| select_lecture(&data.lectures.lectures, Some(&id)).cloned());
        let Some(item) = found else {
            return;
        };
        if let Some(controller) = player.write().as_mut() {
            controller.load_lecture(item.lecture.clone(), item.progress.as_ref());
        }
        current.set(Some(item));
    };

    let certificates = ctx.certificates();
    let download_dir = ctx.download_dir();
    let on_claim = move |_| {
        if claiming() {
            return;
        }
        let Some(data) = loaded.peek().clone() else {
            return;
        };
        let certificates = certificates.clone();
        let download_dir = download_dir.clone();
        claiming.set(true);
        spawn(async move {
            let course_id = &data.lectures.course_id;
            let saved = match certificates.issue(course_id, &data.lectures.lectures).await {
                Ok(file) => file.save_in(&download_dir).await,
                Err(err) => Err(err),
            };
            match saved {
                Ok(path) => {
                    info!(path = %path.display(), "certificate saved");
                    toast.set(Some(Toast::success(format!(
                        "Certificate saved to {}",
                        path.display()
                    ))));
                }
                Err(err) => {
                    warn!(error = %err, "certificate not saved");
                    toast.set(Some(Toast::error(ViewError::from(&err).message())));
                }
            }
            claiming.set(false);
        });
    };

    // Reloads in place: the last list stays on screen so the player is not
    // torn down while the new one is fetched.
    let on_finished = move |()| resource.restart();
    let state = view_state_from_resource(&resource).or_last(loaded());
    let selected_id = current.read().as_ref().map(|item| item.lecture.id().clone());

    rsx! {
        div { class: "page learn",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading lectures..." }
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
                ViewState::Ready(data) => {
                    let rows = map_lecture_rows(&data.lectures.lectures, filter(), selected_id.as_ref());
                    let summary = completion_summary(&data.lectures.lectures);
                    rsx! {
                        header { class: "learn-header",
                            h2 { "{data.course_title}" }
                            p { class: "learn-summary", "{summary}" }
                            if data.lectures.certificate_eligible {
                                button {
                                    id: "claim-certificate",
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    disabled: claiming(),
                                    onclick: on_claim.clone(),
                                    if claiming() { "Preparing certificate..." } else { "Claim Certificate" }
                                }
                                Link {
                                    class: "btn btn-secondary",
                                    to: Route::PostReview { course_id: data.lectures.course_id.as_str().to_owned() },
                                    "Leave a review"
                                }
                            }
                        }
                        div { class: "learn-body",
                            if current.read().is_some() {
                                PlayerPanel { player, current, on_finished }
                            } else {
                                p { class: "learn-empty", "This course has no lectures yet." }
                            }
                            aside { class: "lecture-list",
                                div { class: "tabs", role: "tablist",
                                    for tab in [LectureListFilter::All, LectureListFilter::Started] {
                                        button {
                                            class: if filter() == tab { "tab tab-active" } else { "tab" },
                                            r#type: "button",
                                            role: "tab",
                                            onclick: move |_| filter.set(tab),
                                            "{tab_label(tab)}"
                                        }
                                    }
                                }
                                if rows.is_empty() {
                                    p { class: "lecture-list-empty", "Nothing here yet." }
                                } else {
                                    ul {
                                        for row in rows {
                                            li { key: "{row.id}",
                                                button {
                                                    class: if row.selected { "lecture-row selected" } else { "lecture-row" },
                                                    r#type: "button",
                                                    onclick: {
                                                        let id = row.id.clone();
                                                        move |_| open_lecture(id.clone())
                                                    },
                                                    span { class: "lecture-title", "{row.title}" }
                                                    span { class: "lecture-duration", "{row.duration_label}" }
                                                    span { class: "lecture-status status-{row.status_class}", "{row.status_label}" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            ToastHost { toast }
        }
    }
}
