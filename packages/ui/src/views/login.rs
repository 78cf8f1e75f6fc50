//! Email + password login screen.

use api::AuthClient;
use dioxus::prelude::*;

use crate::gate::{home_for, Destination};
use crate::session::{sign_in, use_session};

use super::{claim, VIEWS_CSS};

#[component]
pub fn LoginView(on_redirect: EventHandler<Destination>) -> Element {
    let state = use_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    // Already signed in: straight to the dashboard
    if let Some(destination) = state.peek().authorize_guest() {
        on_redirect.call(destination);
        return rsx! {};
    }

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if !claim(busy) {
            return;
        }
        spawn(async move {
            error.set(None);
            let client = AuthClient::new(state.peek().transport());
            match client.login(&email(), &password()).await {
                Ok(session) => {
                    let home = home_for(session.role);
                    sign_in(state, session);
                    on_redirect.call(home);
                }
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        });
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "login-container",
            h1 { class: "view-title", "Notes" }
            p { class: "view-muted", "Sign in to your workspace" }

            form {
                class: "login-form",
                onsubmit: handle_submit,

                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    placeholder: "you@company.com",
                    autocomplete: "username",
                    disabled: busy(),
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    disabled: busy(),
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                if let Some(message) = error() {
                    p { class: "view-error", "{message}" }
                }

                button {
                    class: "primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
