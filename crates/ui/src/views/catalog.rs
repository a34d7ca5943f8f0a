use dioxus::prelude::*;
use dioxus_router::Link;
use skillforge_core::catalog::{CatalogStore, CategoryFilter};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CourseCardVm, category_options, map_course_cards};

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let mut store = use_signal(CatalogStore::new);
    let mut query = use_signal(String::new);
    let mut search_error = use_signal(|| None::<ViewError>);

    let loader = catalog.clone();
    let mut resource = use_resource(move || {
        let catalog = loader.clone();
        async move {
            let loaded = catalog.load().await.map_err(|err| ViewError::from(&err))?;
            store.set(loaded);
            Ok::<_, ViewError>(())
        }
    });

    let on_search = move |evt: FormEvent| {
        evt.prevent_default();
        let catalog = catalog.clone();
        let text = query.peek().clone();
        spawn(async move {
            let mut next = store.peek().clone();
            match catalog.search(&mut next, &text).await {
                Ok(()) => {
                    search_error.set(None);
                    store.set(next);
                }
                Err(err) => search_error.set(Some(ViewError::from(&err))),
            }
        });
    };

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page catalog",
            h2 { "Courses" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading courses..." }
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
                ViewState::Ready(()) => {
                    let cards = map_course_cards(&store.read());
                    let options = category_options(&store.read());
                    rsx! {
                        form { class: "catalog-toolbar", onsubmit: on_search,
                            select {
                                class: "catalog-category",
                                onchange: move |evt: FormEvent| {
                                    store.write().set_category(CategoryFilter::parse(&evt.value()));
                                },
                                for choice in options {
                                    option { value: "{choice.value}", selected: choice.selected, "{choice.label}" }
                                }
                            }
                            input {
                                class: "catalog-search",
                                r#type: "search",
                                placeholder: "Search courses",
                                value: "{query}",
                                oninput: move |evt: FormEvent| {
                                    let text = evt.value();
                                    store.write().set_search_query(text.clone());
                                    query.set(text);
                                },
                            }
                            button { class: "btn btn-primary", r#type: "submit", "Search" }
                        }
                        if let Some(err) = search_error() {
                            p { class: "catalog-error", "{err.message()}" }
                        }
                        if cards.is_empty() {
                            p { class: "catalog-empty", "No courses match your filters." }
                        } else {
                            div { class: "course-grid",
                                for card in cards {
                                    CourseCard { key: "{card.id}", card }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CourseCard(card: CourseCardVm) -> Element {
    rsx! {
        Link { class: "course-card", to: Route::Course { course_id: card.id.clone() },
            if let Some(src) = card.image_url.clone() {
                img { class: "course-image", src, alt: "{card.title}" }
            }
            h3 { class: "course-title", "{card.title}" }
            if let Some(instructor) = card.instructor.clone() {
                p { class: "course-instructor", "{instructor}" }
            }
            div { class: "course-meta",
                if let Some(category) = card.category.clone() {
                    span { class: "course-category", "{category}" }
                }
                span { class: "course-price", "{card.price_label}" }
            }
        }
    }
}
