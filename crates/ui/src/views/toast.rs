use std::time::Duration;

use dioxus::prelude::*;

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Transient notification; clears itself after a few seconds.
#[component]
pub fn ToastHost(toast: Signal<Option<Toast>>) -> Element {
    let mut toast = toast;
    let shown = toast.read().clone();

    use_effect(move || {
        if let Some(posted) = toast.read().clone() {
            spawn(async move {
                tokio::time::sleep(TOAST_LIFETIME).await;
                // A newer toast keeps its own timer.
                if toast.peek().as_ref() == Some(&posted) {
                    toast.set(None);
                }
            });
        }
    });

    let Some(shown) = shown else {
        return rsx! {};
    };
    let class = match shown.kind {
        ToastKind::Success => "toast toast-success",
        ToastKind::Error => "toast toast-error",
    };
    rsx! {
        div { class, role: "status",
            span { "{shown.message}" }
            button {
                class: "toast-close",
                r#type: "button",
                onclick: move |_| toast.set(None),
                "×"
            }
        }
    }
}
