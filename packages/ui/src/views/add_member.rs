use api::{MemberAdminClient, NewMember};
use dioxus::prelude::*;
use store::{Role, Session};

use crate::gate::{Destination, GateDecision};
use crate::session::use_session;

use super::{claim, report_error, Header, VIEWS_CSS};

/// Screen where an admin registers a new member of their tenant.
#[component]
pub fn AddMemberView(on_redirect: EventHandler<Destination>) -> Element {
    let state = use_session();
    let decision = state.peek().authorize(Some(Role::Admin));

    match decision {
        GateDecision::Allow(session) => rsx! {
            AddMemberForm { session, on_redirect }
        },
        GateDecision::RedirectTo(destination) => {
            on_redirect.call(destination);
            rsx! {}
        }
    }
}

#[component]
fn AddMemberForm(session: Session, on_redirect: EventHandler<Destination>) -> Element {
    let state = use_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut name = use_signal(String::new);
    let mut role = use_signal(|| Role::Member);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut added = use_signal(|| Option::<String>::None);

    let admin = session.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if !claim(busy) {
            return;
        }
        let admin = admin.clone();
        spawn(async move {
            error.set(None);
            added.set(None);
            let member = NewMember {
                email: email(),
                password: password(),
                name: name(),
                role: role(),
            };
            let client = MemberAdminClient::new(state.peek().transport());
            match client.add_member(&admin, &member).await {
                Ok(()) => {
                    added.set(Some(format!("{} was added as {}", member.email.trim(), member.role)));
                    email.set(String::new());
                    password.set(String::new());
                    name.set(String::new());
                    role.set(Role::Member);
                }
                Err(e) => report_error(&e, state, on_redirect, error),
            }
            busy.set(false);
        });
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        Header { session: session.clone(), on_redirect }

        main {
            class: "view-page narrow",
            button {
                class: "link",
                onclick: move |_| on_redirect.call(Destination::AdminDashboard),
                "Back to dashboard"
            }
            h1 { class: "view-title", "Add Member" }
            p { class: "view-muted", "Invite someone to your organization." }

            form {
                class: "member-form",
                onsubmit: handle_submit,

                label { r#for: "member-name", "Name" }
                input {
                    id: "member-name",
                    r#type: "text",
                    disabled: busy(),
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }

                label { r#for: "member-email", "Email" }
                input {
                    id: "member-email",
                    r#type: "email",
                    disabled: busy(),
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                label { r#for: "member-password", "Password" }
                input {
                    id: "member-password",
                    r#type: "password",
                    autocomplete: "new-password",
                    placeholder: "At least 6 characters",
                    disabled: busy(),
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                label { r#for: "member-role", "Role" }
                select {
                    id: "member-role",
                    disabled: busy(),
                    value: role().as_str(),
                    onchange: move |evt: FormEvent| {
                        if let Ok(parsed) = evt.value().parse::<Role>() {
                            role.set(parsed);
                        }
                    },
                    option { value: "MEMBER", "Member" }
                    option { value: "ADMIN", "Admin" }
                }

                if let Some(message) = error() {
                    p { class: "view-error", "{message}" }
                }
                if let Some(message) = added() {
                    p { class: "view-success", "{message}" }
                }

                button {
                    class: "primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Adding..." } else { "Add Member" }
                }
            }
        }
    }
}
