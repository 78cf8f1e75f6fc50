use api::{NotesClient, ReqwestTransport, Resolution, Transport};
use dioxus::prelude::*;
use store::Session;

use crate::collection::{LoadState, NoteCollection};
use crate::controller::{CollectionCell, NotesCollectionController};
use crate::error::ActionError;
use crate::gate::{Destination, GateDecision};
use crate::session::{sign_out, use_session};

use super::{Header, NoteCard, NoteForm, VIEWS_CSS};

/// Controller shared with the dashboard's children through context.
pub type AppController = NotesCollectionController<ReqwestTransport, Signal<NoteCollection>>;

/// Message to show next to the control that failed. Sign-outs are handled by
/// the dashboard itself.
pub(super) fn action_message(err: &ActionError) -> Option<String> {
    match err.resolution() {
        Resolution::SignOut => None,
        _ => Some(err.to_string()),
    }
}

/// Note actions that must finish after the card that started them is gone.
#[derive(Clone, Copy)]
pub struct NoteActions {
    /// Delete by `local_id`. Failures land on the collection, see
    /// [`NoteCollection::failure`].
    pub delete: Callback<String>,
}

/// Build the dashboard's [`NoteActions`]. Their tasks run on the calling
/// component's scope, so a deleted card unmounting does not cut short the
/// re-list that follows.
pub(crate) fn use_note_actions<T, C>(controller: NotesCollectionController<T, C>) -> NoteActions
where
    T: Transport + Clone + 'static,
    C: CollectionCell + 'static,
{
    let delete = use_callback(move |local_id: String| {
        let controller = controller.clone();
        spawn(async move {
            controller.cell().update(|c| c.clear_failure(&local_id));
            if let Err(e) = controller.delete(&local_id).await {
                if let Some(message) = action_message(&e) {
                    controller.cell().update(|c| c.set_failure(&local_id, message));
                }
            }
        });
    });
    NoteActions { delete }
}

/// Member dashboard, open to every signed-in user.
#[component]
pub fn DashboardView(on_redirect: EventHandler<Destination>) -> Element {
    let state = use_session();
    let decision = state.peek().authorize(None);

    match decision {
        GateDecision::Allow(session) => rsx! {
            NotesDashboard { session, on_redirect }
        },
        GateDecision::RedirectTo(destination) => {
            on_redirect.call(destination);
            rsx! {}
        }
    }
}

/// Notes workspace: create form, search and the note list.
///
/// With `admin` set the header also offers the tenant administration actions.
#[component]
pub fn NotesDashboard(
    session: Session,
    on_redirect: EventHandler<Destination>,
    #[props(default)] admin: bool,
) -> Element {
    let state = use_session();
    let mut collection = use_signal(NoteCollection::new);
    let controller: AppController = use_hook(|| {
        let client = NotesClient::for_session(state.peek().transport(), &session);
        NotesCollectionController::new(client, collection)
    });
    use_context_provider(|| controller.clone());
    let actions = use_note_actions(controller.clone());
    use_context_provider(|| actions);

    // Initial load
    let loader = controller.clone();
    use_hook(move || {
        spawn(async move {
            // Failures land on the collection's load state
            let _ = loader.refresh().await;
        });
    });

    use_effect(move || {
        if collection.read().sign_out_requested() {
            sign_out(state);
            on_redirect.call(Destination::Login);
        }
    });

    let current = collection.read();
    let profile = current.profile().cloned().unwrap_or_else(|| session.clone());
    let visible: Vec<_> = current.visible().into_iter().cloned().collect();
    let total = current.notes().len();
    let query = current.query().to_string();
    let summary = current.summary();
    let load_state = current.state().clone();
    drop(current);

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        Header { session: profile.clone(), on_redirect, admin }

        main {
            class: "view-page",
            h1 { class: "view-title", "Welcome back, {profile.display_name()}!" }
            p { class: "view-muted", "Ready to organize your thoughts and ideas?" }

            div {
                class: "dashboard-grid",
                aside { NoteForm {} }

                section {
                    class: "notes-section",
                    h2 { class: "view-section-title", "Your Notes" }
                    p { class: "view-muted", "{summary}" }

                    div {
                        class: "search-row",
                        input {
                            r#type: "search",
                            placeholder: "Search by title or note id",
                            value: "{query}",
                            oninput: move |evt: FormEvent| collection.write().set_query(evt.value()),
                        }
                        if !query.is_empty() {
                            button {
                                class: "secondary",
                                onclick: move |_| collection.write().clear_query(),
                                "Clear"
                            }
                        }
                    }

                    if let LoadState::Failed(e) = &load_state {
                        p { class: "view-error", "Could not refresh notes: {e}" }
                    }

                    if load_state == LoadState::Loading && total == 0 {
                        p { class: "view-muted", "Loading notes..." }
                    } else if visible.is_empty() && total == 0 {
                        div { class: "empty-state",
                            h3 { "No notes yet" }
                            p { "Create your first note to get started." }
                        }
                    } else if visible.is_empty() {
                        div { class: "empty-state",
                            h3 { "No matching notes" }
                            p { "Nothing matches \"{query}\"." }
                        }
                    } else {
                        div {
                            class: "note-list",
                            for note in visible {
                                NoteCard { key: "{note.local_id}", note }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use api::testing::FakeBackend;
    use api::{ApiError, ApiRequest, ApiResponse, Method};
    use dioxus::dioxus_core::VirtualDom;

    use super::*;

    /// Lets the UI render between a mutation and the list that follows it.
    #[derive(Clone)]
    struct SlowLists(FakeBackend);

    impl Transport for SlowLists {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            if request.method == Method::Get {
                tokio::task::yield_now().await;
            }
            self.0.send(request).await
        }
    }

    #[derive(Clone)]
    struct Harness {
        backend: FakeBackend,
        renders: Rc<RefCell<Vec<(LoadState, usize)>>>,
    }

    #[component]
    fn DeleteEveryCard() -> Element {
        let harness = use_context::<Harness>();
        let collection = use_signal(NoteCollection::new);
        let controller = use_hook(|| {
            let client =
                NotesClient::new(SlowLists(harness.backend.clone())).with_author("ada@acme.test");
            NotesCollectionController::new(client, collection)
        });
        let actions = use_note_actions(controller.clone());
        use_context_provider(|| actions);

        let loader = controller.clone();
        use_hook(move || {
            spawn(async move {
                let _ = loader.refresh().await;
            });
        });

        let current = collection.read();
        harness
            .renders
            .borrow_mut()
            .push((current.state().clone(), current.notes().len()));
        let ids: Vec<String> = current.notes().iter().map(|n| n.local_id.clone()).collect();
        drop(current);

        rsx! {
            for local_id in ids {
                DeletingCard { key: "{local_id}", local_id }
            }
        }
    }

    #[component]
    fn DeletingCard(local_id: String) -> Element {
        let actions = use_context::<NoteActions>();
        use_hook(|| actions.delete.call(local_id.clone()));
        rsx! { "{local_id}" }
    }

    #[tokio::test]
    async fn test_list_after_delete_outlives_the_card() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        backend.seed_note_with_id("ada@acme.test", "N-1", "Only", "x");
        let harness = Harness {
            backend: backend.clone(),
            renders: Rc::default(),
        };

        let mut dom = VirtualDom::new(DeleteEveryCard).with_root_context(harness.clone());
        dom.rebuild_in_place();
        for _ in 0..20 {
            let work = tokio::time::timeout(Duration::from_millis(100), dom.wait_for_work());
            if work.await.is_err() {
                break;
            }
            dom.render_immediate_to_vec();
        }

        assert_eq!(backend.note_count(), 0);
        let lists = backend
            .requests()
            .into_iter()
            .filter(|r| r.path == "api/userNotes")
            .count();
        assert_eq!(lists, 2);
        let renders = harness.renders.borrow();
        assert!(renders.iter().any(|(_, count)| *count == 1));
        assert_eq!(renders.last(), Some(&(LoadState::Ready, 0)));
    }
}
