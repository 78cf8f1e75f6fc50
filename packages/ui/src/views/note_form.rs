use dioxus::prelude::*;

use crate::collection::Action;
use crate::controller::CollectionCell;

use super::dashboard::{action_message, AppController};

/// Form for creating a note.
#[component]
pub fn NoteForm() -> Element {
    let controller = use_context::<AppController>();
    let mut title = use_signal(String::new);
    let mut body = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);

    let busy = controller.cell().read_with(|c| c.is_busy(&Action::Create));

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let controller = controller.clone();
        spawn(async move {
            error.set(None);
            match controller.create(&title(), &body()).await {
                Ok(_) => {
                    title.set(String::new());
                    body.set(String::new());
                }
                Err(e) => error.set(action_message(&e)),
            }
        });
    };

    rsx! {
        form {
            class: "note-form",
            onsubmit: handle_submit,
            h2 { class: "view-section-title", "New Note" }

            label { r#for: "note-title", "Title" }
            input {
                id: "note-title",
                r#type: "text",
                placeholder: "Enter note title...",
                disabled: busy,
                value: title(),
                oninput: move |evt: FormEvent| title.set(evt.value()),
            }

            label { r#for: "note-body", "Content" }
            textarea {
                id: "note-body",
                rows: "6",
                placeholder: "Write your note content here...",
                disabled: busy,
                value: body(),
                oninput: move |evt: FormEvent| body.set(evt.value()),
            }

            if let Some(message) = error() {
                p { class: "view-error", "{message}" }
            }

            button {
                class: "primary",
                r#type: "submit",
                disabled: busy,
                if busy { "Creating..." } else { "Create Note" }
            }
        }
    }
}
