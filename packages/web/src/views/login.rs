use dioxus::prelude::*;
use ui::views::LoginView;

use super::use_redirect;

#[component]
pub fn Login() -> Element {
    let redirect = use_redirect();

    rsx! {
        LoginView { on_redirect: redirect }
    }
}
