use dioxus::prelude::*;
use store::Session;

use crate::gate::Destination;
use crate::session::{sign_out, use_session};

use super::admin_dashboard::UpgradePlanButton;

/// Top bar with the signed-in user and a sign-out button.
#[component]
pub fn Header(
    session: Session,
    on_redirect: EventHandler<Destination>,
    #[props(default)] admin: bool,
) -> Element {
    let state = use_session();

    rsx! {
        header {
            class: "app-header",
            div { class: "app-brand", "Notes" }
            div {
                class: "app-header-actions",
                if admin {
                    UpgradePlanButton { session: session.clone(), on_redirect }
                    button {
                        class: "secondary",
                        onclick: move |_| on_redirect.call(Destination::AddMember),
                        "Add member"
                    }
                }
                span { class: "app-user",
                    "{session.display_name()}"
                    span { class: "role-badge", "{session.role}" }
                }
                button {
                    class: "secondary",
                    onclick: move |_| {
                        sign_out(state);
                        on_redirect.call(Destination::Login);
                    },
                    "Sign out"
                }
            }
        }
    }
}
