use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthMode {
    SignIn,
    SignUp,
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let navigator = use_navigator();

    let mut mode = use_signal(|| AuthMode::SignIn);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<ViewError>);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let auth = auth.clone();
        let (name, email, password) = (name(), email(), password());
        let mode = mode();
        submitting.set(true);
        spawn(async move {
            let result = match mode {
                AuthMode::SignIn => auth.login(&email, &password).await,
                AuthMode::SignUp => auth.signup(&name, &email, &password).await,
            };
            submitting.set(false);
            match result {
                Ok(_) => {
                    error.set(None);
                    navigator.push(Route::Catalog {});
                }
                Err(err) => error.set(Some(ViewError::from(&err))),
            }
        });
    };

    let (heading, submit_label, switch_label) = match mode() {
        AuthMode::SignIn => ("Sign in", "Sign in", "Need an account? Sign up"),
        AuthMode::SignUp => ("Create account", "Sign up", "Have an account? Sign in"),
    };

    rsx! {
        div { class: "page login",
            h2 { "{heading}" }
            form { class: "login-form", onsubmit: on_submit,
                if mode() == AuthMode::SignUp {
                    label { "Name"
                        input {
                            r#type: "text",
                            value: "{name}",
                            oninput: move |evt: FormEvent| name.set(evt.value()),
                        }
                    }
                }
                label { "Email"
                    input {
                        id: "login-email",
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }
                label { "Password"
                    input {
                        id: "login-password",
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                }
                if let Some(err) = error() {
                    p { class: "login-error", "{err.message()}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    "{submit_label}"
                }
            }
            button {
                class: "btn btn-link",
                r#type: "button",
                onclick: move |_| {
                    error.set(None);
                    mode.set(match mode() {
                        AuthMode::SignIn => AuthMode::SignUp,
                        AuthMode::SignUp => AuthMode::SignIn,
                    });
                },
                "{switch_label}"
            }
        }
    }
}
