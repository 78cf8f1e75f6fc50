use dioxus::prelude::*;
use ui::views::{AdminDashboardView, DashboardView};

use super::use_redirect;

#[component]
pub fn Dashboard() -> Element {
    let redirect = use_redirect();

    rsx! {
        DashboardView { on_redirect: redirect }
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    let redirect = use_redirect();

    rsx! {
        AdminDashboardView { on_redirect: redirect }
    }
}
