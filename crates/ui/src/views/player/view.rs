use dioxus::prelude::*;
use services::PlayerController;
use skillforge_core::model::LectureWithProgress;
use tracing::debug;

use super::scripts::{CONTAINER_ID, VIDEO_ID, bridge_script};
use super::surface::WebMediaSurface;
use crate::context::AppContext;
use crate::vm::{MediaEvent, PlayerEffect, PlayerVm, apply_media_event, rebind_player};

pub type WebPlayer = PlayerController<WebMediaSurface>;

/// Video element plus custom controls.
///
/// The controller is created once the bridge reports the element is ready;
/// later lecture switches reuse it through `load_lecture` so volume and
/// fullscreen carry over. If the panel is mounted again with a controller
/// already in place, the new element is bound to the open lecture.
#[component]
pub fn PlayerPanel(
    player: Signal<Option<WebPlayer>>,
    current: Signal<Option<LectureWithProgress>>,
    on_finished: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let reporter = ctx.progress_reporter();
    let mut player = player;

    use_future(move || {
        let reporter = reporter.clone();
        async move {
            let mut bridge = document::eval(&bridge_script(VIDEO_ID, CONTAINER_ID));
            loop {
                let event = match bridge.recv::<MediaEvent>().await {
                    Ok(event) => event,
                    Err(err) => {
                        debug!(error = ?err, "media bridge closed");
                        break;
                    }
                };
                if event == MediaEvent::Ready {
                    let Some(item) = current.peek().clone() else {
                        continue;
                    };
                    let existing = player.peek().is_some();
                    if existing {
                        if let Some(controller) = player.write().as_mut() {
                            rebind_player(controller, &item);
                        }
                    } else {
                        let surface = WebMediaSurface::new(VIDEO_ID, CONTAINER_ID);
                        player.set(Some(PlayerController::new(
                            surface,
                            item.lecture,
                            item.progress.as_ref(),
                            reporter.clone(),
                        )));
                    }
                    continue;
                }
                let effect = player
                    .write()
                    .as_mut()
                    .map(|controller| apply_media_event(controller, event));
                if effect == Some(PlayerEffect::LectureFinished) {
                    let pending = player.write().as_mut().map(PlayerController::take_in_flight);
                    if let Some(pending) = pending {
                        pending.wait().await;
                    }
                    on_finished.call(());
                }
            }
        }
    });

    let vm = player
        .read()
        .as_ref()
        .map(|controller| PlayerVm::from_session(controller.session()));
    let title = vm.as_ref().map_or_else(
        || {
            current
                .read()
                .as_ref()
                .map(|item| item.lecture.title().to_owned())
                .unwrap_or_default()
        },
        |vm| vm.title.clone(),
    );

    rsx! {
        section { id: CONTAINER_ID, class: "player",
            video { id: VIDEO_ID, class: "player-video", preload: "metadata", playsinline: true }
            div { class: "player-controls",
                h3 { class: "player-title", "{title}" }
                if let Some(vm) = vm {
                    div { class: "player-row",
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| {
                                if let Some(controller) = player.write().as_mut() {
                                    controller.toggle_play();
                                }
                            },
                            "{vm.play_label()}"
                        }
                        span { class: "player-time", "{vm.position_label} / {vm.duration_label}" }
                        input {
                            class: "player-seek",
                            r#type: "range",
                            min: "0",
                            max: "{vm.duration}",
                            step: "1",
                            value: "{vm.position}",
                            onchange: move |evt: FormEvent| {
                                if let Ok(target) = evt.value().parse::<f64>()
                                    && let Some(controller) = player.write().as_mut()
                                {
                                    controller.seek(target);
                                }
                            },
                        }
                        label { class: "player-volume",
                            "Volume"
                            input {
                                r#type: "range",
                                min: "0",
                                max: "1",
                                step: "0.05",
                                value: "{vm.volume}",
                                oninput: move |evt: FormEvent| {
                                    if let Ok(volume) = evt.value().parse::<f64>()
                                        && let Some(controller) = player.write().as_mut()
                                    {
                                        controller.set_volume(volume);
                                    }
                                },
                            }
                        }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                if let Some(controller) = player.write().as_mut() {
                                    controller.toggle_fullscreen();
                                }
                            },
                            "{vm.fullscreen_label()}"
                        }
                    }
                } else {
                    p { class: "player-loading", "Loading video..." }
                }
            }
        }
    }
}
