//! Screens shared by every platform.
//!
//! Views never navigate on their own: they report a [`Destination`] through
//! `on_redirect` and the platform crate maps it onto its router.

use api::ApiError;
use dioxus::prelude::*;

use crate::gate::{AuthGate, Destination};
use crate::session::{sign_out, SessionState};

mod add_member;
pub use add_member::AddMemberView;

mod admin_dashboard;
pub use admin_dashboard::AdminDashboardView;

mod confirm_dialog;
pub use confirm_dialog::ConfirmDialog;

mod dashboard;
pub use dashboard::{DashboardView, NotesDashboard};

mod header;
pub use header::Header;

mod login;
pub use login::LoginView;

mod note_card;
pub use note_card::NoteCard;

mod note_form;
pub use note_form::NoteForm;

pub(crate) const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Take a screen's busy flag. Returns `false`, leaving the flag alone, while
/// an earlier submission still holds it.
pub(crate) fn claim(mut busy: Signal<bool>) -> bool {
    if *busy.peek() {
        return false;
    }
    busy.set(true);
    true
}

/// Redirect for errors that need one, inline message for the rest.
pub(crate) fn report_error(
    err: &ApiError,
    state: Signal<SessionState>,
    on_redirect: EventHandler<Destination>,
    mut message: Signal<Option<String>>,
) {
    let redirect = AuthGate::new(&state.peek().store()).resolve_error(err);
    match redirect {
        Some(Destination::Login) => {
            sign_out(state);
            on_redirect.call(Destination::Login);
        }
        Some(destination) => on_redirect.call(destination),
        None => message.set(Some(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dioxus::dioxus_core::VirtualDom;

    use super::*;

    type Claims = Rc<RefCell<Vec<bool>>>;

    #[component]
    fn DoubleSubmit() -> Element {
        let claims = use_context::<Claims>();
        let mut busy = use_signal(|| false);
        use_hook(move || {
            // Two submits in one event batch, before any task has run
            claims.borrow_mut().push(claim(busy));
            claims.borrow_mut().push(claim(busy));
            busy.set(false);
            claims.borrow_mut().push(claim(busy));
        });
        rsx! {}
    }

    #[test]
    fn test_second_claim_is_refused_until_released() {
        let claims = Claims::default();
        let mut dom = VirtualDom::new(DoubleSubmit).with_root_context(claims.clone());
        dom.rebuild_in_place();
        assert_eq!(*claims.borrow(), vec![true, false, true]);
    }
}
