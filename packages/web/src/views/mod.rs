//! Route components. Each wraps a shared screen from `ui` and turns the
//! screen's [`Destination`] redirects into router navigation.

use dioxus::prelude::*;
use ui::Destination;

use crate::Route;

mod login;
pub use login::Login;

mod dashboard;
pub use dashboard::{AdminDashboard, Dashboard};

mod add_member;
pub use add_member::AddMember;

/// Navigate without leaving the protected screen in history.
pub(crate) fn use_redirect() -> impl FnMut(Destination) + Copy + 'static {
    let nav = use_navigator();
    move |destination: Destination| {
        tracing::debug!("Redirecting to {:?}", destination);
        nav.replace(Route::from(destination));
    }
}
