use dioxus::prelude::*;
use dioxus_router::Link;
use skillforge_core::model::{CourseId, Review, ReviewId};
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::toast::{Toast, ToastHost};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    FEEDBACK_PREVIEW, RatingSummaryVm, ReviewCardVm, map_review_cards, rating_options,
};

#[component]
fn RatingSelect(value: Signal<u8>) -> Element {
    let mut value = value;
    rsx! {
        select {
            class: "review-rating",
            onchange: move |evt: FormEvent| {
                if let Ok(stars) = evt.value().parse() {
                    value.set(stars);
                }
            },
            for choice in rating_options(value()) {
                option { value: "{choice.value}", selected: choice.selected, "{choice.label}" }
            }
        }
    }
}

#[component]
fn ReviewCard(card: ReviewCardVm) -> Element {
    rsx! {
        article { class: "review-card",
            header {
                span { class: "review-author", "{card.author}" }
                span { class: "review-stars", title: "{card.rating} of 5", "{card.stars}" }
                if let Some(date) = card.posted_on.clone() {
                    span { class: "review-date", "{date}" }
                }
            }
            if let Some(text) = card.text.clone() {
                p { class: "review-text", "{text}" }
            }
        }
    }
}

/// Rating summary and the first few reviews of a course.
#[component]
pub fn CourseFeedback(course_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let reviews = ctx.reviews();

    let resource = use_resource(move || {
        let reviews = reviews.clone();
        let raw = course_id.clone();
        async move {
            let id = CourseId::new(raw).map_err(|_| ViewError::NotFound)?;
            let listing = reviews
                .course_reviews(&id)
                .await
                .map_err(|err| ViewError::from(&err))?;
            Ok::<_, ViewError>((
                RatingSummaryVm::new(&listing.summary),
                map_review_cards(&listing.reviews, Some(FEEDBACK_PREVIEW)),
            ))
        }
    });

    rsx! {
        section { class: "course-feedback",
            match view_state_from_resource(&resource) {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "feedback-loading", "Loading reviews..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "feedback-error", "{err.message()}" }
                },
                ViewState::Ready((summary, cards)) => rsx! {
                    div { class: "rating-summary",
                        span { class: "rating-average", "{summary.average}" }
                        span { class: "rating-total", "{summary.total_label}" }
                    }
                    h3 { "Ratings breakdown" }
                    ul { class: "rating-breakdown",
                        for row in summary.rows.iter() {
                            li { key: "{row.label}",
                                span { class: "rating-label", "{row.label}" }
                                div { class: "rating-bar",
                                    div { class: "rating-bar-fill", style: "width: {row.percent}%;" }
                                }
                                span { class: "rating-percent", "{row.percent}%" }
                            }
                        }
                    }
                    h3 { "Student feedback" }
                    if cards.is_empty() {
                        p { class: "feedback-empty", "No reviews yet." }
                    } else {
                        for card in cards {
                            ReviewCard { key: "{card.id}", card }
                        }
                    }
                },
            }
        }
    }
}

#[component]
pub fn PostReviewView(course_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let reviews = ctx.reviews();

    let stars = use_signal(|| 5_u8);
    let mut text = use_signal(String::new);
    let mut error = use_signal(|| None::<ViewError>);
    let mut submitting = use_signal(|| false);
    let mut posted = use_signal(|| false);
    let mut toast = use_signal(|| None::<Toast>);

    let target = course_id.clone();
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let Ok(id) = CourseId::new(target.clone()) else {
            error.set(Some(ViewError::NotFound));
            return;
        };
        let reviews = reviews.clone();
        let (rating, body) = (stars(), text());
        submitting.set(true);
        spawn(async move {
            match reviews.post(&id, rating, &body).await {
                Ok(()) => {
                    error.set(None);
                    posted.set(true);
                    toast.set(Some(Toast::success("Review posted")));
                }
                Err(err) => {
                    warn!(course = %id, error = %err, "review not posted");
                    error.set(Some(ViewError::from(&err)));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        div { class: "page post-review",
            h2 { "Leave a review" }
            if posted() {
                p { "Thanks for your feedback." }
                Link { class: "btn btn-primary", to: Route::Course { course_id: course_id.clone() }, "Back to course" }
            } else {
                form { class: "review-form", onsubmit: on_submit,
                    label { "Rating"
                        RatingSelect { value: stars }
                    }
                    label { "Review"
                        textarea {
                            id: "review-text",
                            rows: "5",
                            placeholder: "What did you think of the course?",
                            value: "{text}",
                            oninput: move |evt: FormEvent| text.set(evt.value()),
                        }
                    }
                    if let Some(err) = error() {
                        p { class: "review-error", "{err.message()}" }
                        if err == ViewError::SignedOut {
                            Link { class: "btn btn-link", to: Route::Login {}, "Sign in" }
                        }
                    }
                    div { class: "review-actions",
                        Link { class: "btn btn-secondary", to: Route::Course { course_id: course_id.clone() }, "Skip review" }
                        button {
                            class: "btn btn-primary",
                            r#type: "submit",
                            disabled: submitting(),
                            if submitting() { "Posting..." } else { "Post review" }
                        }
                    }
                }
            }
            ToastHost { toast }
        }
    }
}

#[component]
pub fn MyReviewsView() -> Element {
    let ctx = use_context::<AppContext>();
    let loader = ctx.reviews();

    let mut resource = use_resource(move || {
        let reviews = loader.clone();
        async move {
            reviews
                .my_reviews()
                .await
                .map_err(|err| ViewError::from(&err))
        }
    });

    // Edits and deletes land here so the list does not reload after each one.
    let mut mine = use_signal(|| None::<Vec<Review>>);
    use_effect(move || {
        if let Some(Ok(list)) = resource.value().read().as_ref() {
            mine.set(Some(list.clone()));
        }
    });

    let mut editing = use_signal(|| None::<String>);
    let edit_stars = use_signal(|| 5_u8);
    let mut edit_text = use_signal(String::new);
    let mut toast = use_signal(|| None::<Toast>);
    let mut busy = use_signal(|| false);

    let mut start_edit = move |card: &ReviewCardVm| {
        let mut edit_stars = edit_stars;
        edit_stars.set(card.rating);
        edit_text.set(card.text.clone().unwrap_or_default());
        editing.set(Some(card.id.clone()));
    };

    let updater = ctx.reviews();
    let on_save = move |_| {
        let Some(Ok(id)) = editing().map(ReviewId::new) else {
            return;
        };
        let reviews = updater.clone();
        let (rating, body) = (edit_stars(), edit_text());
        busy.set(true);
        spawn(async move {
            match reviews.update(&id, rating, &body).await {
                Ok(draft) => {
                    if let Some(list) = mine.write().as_mut() {
                        if let Some(review) = list.iter_mut().find(|review| review.id == id) {
                            review.apply(&draft);
                        }
                    }
                    editing.set(None);
                    toast.set(Some(Toast::success("Review updated")));
                }
                Err(err) => toast.set(Some(Toast::error(ViewError::from(&err).message()))),
            }
            busy.set(false);
        });
    };

    let deleter = ctx.reviews();
    let on_delete = move |raw: String| {
        let Ok(id) = ReviewId::new(raw) else {
            return;
        };
        let reviews = deleter.clone();
        busy.set(true);
        spawn(async move {
            match reviews.delete(&id).await {
                Ok(()) => {
                    if let Some(list) = mine.write().as_mut() {
                        list.retain(|review| review.id != id);
                    }
                    toast.set(Some(Toast::success("Review deleted")));
                }
                Err(err) => toast.set(Some(Toast::error(ViewError::from(&err).message()))),
            }
            busy.set(false);
        });
    };

    let state = match view_state_from_resource(&resource) {
        ViewState::Ready(_) | ViewState::Loading => {
            mine().map_or(ViewState::Loading, ViewState::Ready)
        }
        other => other,
    };

    rsx! {
        div { class: "page my-reviews",
            h2 { "Your Reviews" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading reviews..." }
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
                ViewState::Ready(list) => {
                    let cards = map_review_cards(&list, None);
                    rsx! {
                        if cards.is_empty() {
                            p { class: "reviews-empty", "You haven't posted any reviews yet." }
                        } else {
                            for card in cards {
                                article { key: "{card.id}", class: "review-card",
                                    header {
                                        Link { to: Route::Course { course_id: card.course_id.clone() }, "{card.course_title}" }
                                        span { class: "review-stars", "{card.stars}" }
                                    }
                                    if editing().as_deref() == Some(card.id.as_str()) {
                                        RatingSelect { value: edit_stars }
                                        textarea {
                                            rows: "4",
                                            value: "{edit_text}",
                                            oninput: move |evt: FormEvent| edit_text.set(evt.value()),
                                        }
                                        div { class: "review-actions",
                                            button {
                                                class: "btn btn-primary",
                                                r#type: "button",
                                                disabled: busy(),
                                                onclick: on_save.clone(),
                                                "Save"
                                            }
                                            button {
                                                class: "btn btn-secondary",
                                                r#type: "button",
                                                onclick: move |_| editing.set(None),
                                                "Cancel"
                                            }
                                        }
                                    } else {
                                        if let Some(text) = card.text.clone() {
                                            p { class: "review-text", "{text}" }
                                        } else {
                                            p { class: "review-text review-text-empty", "(No review text)" }
                                        }
                                        div { class: "review-actions",
                                            button {
                                                class: "btn btn-secondary",
                                                r#type: "button",
                                                onclick: {
                                                    let card = card.clone();
                                                    move |_| start_edit(&card)
                                                },
                                                "Edit"
                                            }
                                            button {
                                                class: "btn btn-danger",
                                                r#type: "button",
                                                disabled: busy(),
                                                onclick: {
                                                    let id = card.id.clone();
                                                    let mut on_delete = on_delete.clone();
                                                    move |_| on_delete(id.clone())
                                                },
                                                "Delete"
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
