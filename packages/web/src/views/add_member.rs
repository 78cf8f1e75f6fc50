use dioxus::prelude::*;
use ui::views::AddMemberView;

use super::use_redirect;

#[component]
pub fn AddMember() -> Element {
    let redirect = use_redirect();

    rsx! {
        AddMemberView { on_redirect: redirect }
    }
}
