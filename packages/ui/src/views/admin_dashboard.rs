use api::MemberAdminClient;
use dioxus::prelude::*;
use store::{Role, Session};

use crate::gate::{Destination, GateDecision};
use crate::session::use_session;

use super::{claim, report_error, NotesDashboard};

/// Admin dashboard: the notes workspace plus tenant administration.
#[component]
pub fn AdminDashboardView(on_redirect: EventHandler<Destination>) -> Element {
    let state = use_session();
    let decision = state.peek().authorize(Some(Role::Admin));

    match decision {
        GateDecision::Allow(session) => rsx! {
            NotesDashboard { session, on_redirect, admin: true }
        },
        GateDecision::RedirectTo(destination) => {
            on_redirect.call(destination);
            rsx! {}
        }
    }
}

/// Moves the admin's tenant to the PRO plan.
#[component]
pub fn UpgradePlanButton(session: Session, on_redirect: EventHandler<Destination>) -> Element {
    let state = use_session();
    let mut upgrading = use_signal(|| false);
    let mut message = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);

    let handle_upgrade = move |_| {
        if !claim(upgrading) {
            return;
        }
        let session = session.clone();
        spawn(async move {
            message.set(None);
            error.set(None);
            let client = MemberAdminClient::new(state.peek().transport());
            match client.upgrade_own_tenant(&session).await {
                Ok(change) => {
                    let tenant = change.tenant_name.unwrap_or_else(|| "Your tenant".to_string());
                    message.set(Some(format!(
                        "{tenant} upgraded from {} to {}",
                        change.previous_plan, change.new_plan
                    )));
                }
                Err(e) => report_error(&e, state, on_redirect, error),
            }
            upgrading.set(false);
        });
    };

    rsx! {
        div {
            class: "upgrade-plan",
            button {
                class: "primary",
                disabled: upgrading(),
                onclick: handle_upgrade,
                if upgrading() { "Upgrading..." } else { "Upgrade to Pro" }
            }
            if let Some(text) = message() {
                span { class: "view-success", "{text}" }
            }
            if let Some(text) = error() {
                span { class: "view-error", "{text}" }
            }
        }
    }
}
