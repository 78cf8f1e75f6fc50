use api::Note;
use chrono::Utc;
use dioxus::prelude::*;

use crate::collection::Action;
use crate::controller::CollectionCell;
use crate::format::format_relative;

use super::dashboard::{action_message, AppController, NoteActions};
use super::ConfirmDialog;

/// One note with inline editing and a confirmed delete.
#[component]
pub fn NoteCard(note: Note) -> Element {
    let controller = use_context::<AppController>();
    let actions = use_context::<NoteActions>();
    let mut editing = use_signal(|| false);
    let mut title = use_signal(|| note.title.clone());
    let mut body = use_signal(|| note.body.clone());
    let mut confirm_delete = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let local_id = note.local_id.clone();
    let (saving, deleting, failure) = controller.cell().read_with(|c| {
        (
            c.is_busy(&Action::Update(local_id.clone())),
            c.is_busy(&Action::Delete(local_id.clone())),
            c.failure(&local_id).map(str::to_string),
        )
    });
    let busy = saving || deleting;
    let updated = format_relative(note.updated_at, Utc::now());

    let saver = controller.clone();
    let save_id = local_id.clone();
    let handle_save = move |_| {
        let controller = saver.clone();
        let local_id = save_id.clone();
        spawn(async move {
            error.set(None);
            match controller.update(&local_id, &title(), &body()).await {
                Ok(_) => editing.set(false),
                Err(e) => error.set(action_message(&e)),
            }
        });
    };

    // Runs on the dashboard: a successful delete unmounts this card
    let delete_id = local_id.clone();
    let handle_delete = move |_| {
        error.set(None);
        confirm_delete.set(false);
        actions.delete.call(delete_id.clone());
    };

    let original_title = note.title.clone();
    let original_body = note.body.clone();

    rsx! {
        article {
            class: "note-card",
            if editing() {
                input {
                    r#type: "text",
                    placeholder: "Note title...",
                    disabled: saving,
                    value: title(),
                    oninput: move |evt: FormEvent| title.set(evt.value()),
                }
                textarea {
                    rows: "4",
                    placeholder: "Note content...",
                    disabled: saving,
                    value: body(),
                    oninput: move |evt: FormEvent| body.set(evt.value()),
                }
                div { class: "form-actions",
                    button {
                        class: "secondary",
                        disabled: saving,
                        onclick: move |_| {
                            error.set(None);
                            editing.set(false);
                        },
                        "Cancel"
                    }
                    button {
                        class: "primary",
                        disabled: saving,
                        onclick: handle_save,
                        if saving { "Saving..." } else { "Save" }
                    }
                }
            } else {
                div { class: "note-card-header",
                    h3 { class: "note-title", "{note.title}" }
                    span { class: "note-id", "{note.display_id}" }
                }
                p { class: "note-body", "{note.body}" }
                div { class: "note-card-footer",
                    span { class: "view-muted", "Updated {updated}" }
                    div { class: "form-actions",
                        button {
                            class: "secondary",
                            disabled: busy || note.is_pending(),
                            onclick: move |_| {
                                title.set(original_title.clone());
                                body.set(original_body.clone());
                                editing.set(true);
                            },
                            "Edit"
                        }
                        button {
                            class: "danger",
                            disabled: busy || note.is_pending(),
                            onclick: move |_| confirm_delete.set(true),
                            if deleting { "Deleting..." } else { "Delete" }
                        }
                    }
                }
            }

            if let Some(message) = error().or(failure) {
                p { class: "view-error", "{message}" }
            }
        }

        if confirm_delete() {
            ConfirmDialog {
                title: "Delete Note",
                message: "Are you sure you want to delete \"{note.title}\"? This cannot be undone.",
                confirm_label: "Delete",
                busy: deleting,
                on_confirm: handle_delete,
                on_cancel: move |_| confirm_delete.set(false),
            }
        }
    }
}
