//! # Reconciling the dashboard with the backend
//!
//! [`NotesCollectionController`] runs every note action the same way:
//!
//! 1. take the action's busy flag (duplicates fail with [`ActionError::Busy`]),
//! 2. await the backend's answer,
//! 3. apply the matching local change by `local_id`,
//! 4. re-list the notes so the backend's copy replaces the local one.
//!
//! The re-list starts only once the mutation has answered. A failed re-list
//! leaves the previous notes on screen, and a re-list overtaken by a newer one
//! is dropped. Auth failures anywhere raise the
//! collection's sign-out flag, which the screen turns into a redirect.
//!
//! The controller is generic over where the [`NoteCollection`] lives
//! ([`CollectionCell`]): a Dioxus signal in the app, a [`SharedCollection`] in
//! tests.

use std::sync::{Arc, Mutex, PoisonError};

use api::{ApiError, Note, NoteRevision, NotesClient, Transport};
use dioxus::prelude::{Readable, Signal, Writable};
use tracing::{debug, warn};

use crate::collection::{Action, NoteCollection};
use crate::error::ActionError;

/// Somewhere a [`NoteCollection`] can be read and updated in place.
pub trait CollectionCell: Clone {
    fn read_with<R>(&self, f: impl FnOnce(&NoteCollection) -> R) -> R;
    fn update<R>(&self, f: impl FnOnce(&mut NoteCollection) -> R) -> R;
}

impl CollectionCell for Signal<NoteCollection> {
    fn read_with<R>(&self, f: impl FnOnce(&NoteCollection) -> R) -> R {
        f(&self.read())
    }

    fn update<R>(&self, f: impl FnOnce(&mut NoteCollection) -> R) -> R {
        let mut signal = *self;
        let mut collection = signal.write();
        f(&mut collection)
    }
}

/// Thread-safe cell for headless use.
#[derive(Clone, Debug, Default)]
pub struct SharedCollection(Arc<Mutex<NoteCollection>>);

impl SharedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> NoteCollection {
        self.read_with(NoteCollection::clone)
    }
}

impl CollectionCell for SharedCollection {
    fn read_with<R>(&self, f: impl FnOnce(&NoteCollection) -> R) -> R {
        f(&self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn update<R>(&self, f: impl FnOnce(&mut NoteCollection) -> R) -> R {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[derive(Clone)]
pub struct NotesCollectionController<T, C> {
    client: NotesClient<T>,
    cell: C,
}

impl<T: Transport, C: CollectionCell> NotesCollectionController<T, C> {
    pub fn new(client: NotesClient<T>, cell: C) -> Self {
        Self { client, cell }
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    pub fn client(&self) -> &NotesClient<T> {
        &self.client
    }

    /// Replace the collection with the backend's list, unless a newer list
    /// started while this one was in flight.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let ticket = self.cell.update(NoteCollection::begin_loading);
        match self.client.list_notes().await {
            Ok(page) => {
                let count = page.notes.len();
                if self.cell.update(|c| c.finish_loading(ticket, page)) {
                    debug!("Listed {} notes", count);
                } else {
                    debug!("Discarding list #{}, a newer one started", ticket);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Keeping previous notes, refresh failed: {}", e);
                self.cell.update(|c| c.fail_loading(ticket, e.clone()));
                Err(e)
            }
        }
    }

    pub async fn create(&self, title: &str, body: &str) -> Result<Note, ActionError> {
        let action = Action::Create;
        self.cell.update(|c| c.try_begin(action.clone()))?;
        let result = self.client.create_note(title, body).await;
        self.cell.update(|c| c.end(&action));

        let note = self.settle(result).await?;
        self.cell.update(|c| c.insert(note.clone()));
        self.reconcile().await;
        Ok(note)
    }

    /// Save a new title and body for the note keyed by `local_id`.
    pub async fn update(
        &self,
        local_id: &str,
        title: &str,
        body: &str,
    ) -> Result<NoteRevision, ActionError> {
        let display_id = self.display_id(local_id)?;
        let action = Action::Update(local_id.to_string());
        self.cell.update(|c| c.try_begin(action.clone()))?;
        let result = self.client.update_note(&display_id, title, body).await;
        self.cell.update(|c| c.end(&action));

        let revision = self.settle(result).await?;
        self.cell.update(|c| c.apply(local_id, &revision));
        self.reconcile().await;
        Ok(revision)
    }

    pub async fn delete(&self, local_id: &str) -> Result<(), ActionError> {
        let display_id = self.display_id(local_id)?;
        let action = Action::Delete(local_id.to_string());
        self.cell.update(|c| c.try_begin(action.clone()))?;
        let result = self.client.delete_note(&display_id).await;
        self.cell.update(|c| c.end(&action));

        self.settle(result).await?;
        self.cell.update(|c| c.remove(local_id));
        self.reconcile().await;
        Ok(())
    }

    fn display_id(&self, local_id: &str) -> Result<String, ActionError> {
        self.cell
            .read_with(|c| c.get(local_id).map(|n| n.display_id.clone()))
            .ok_or_else(|| ActionError::UnknownNote(local_id.to_string()))
    }

    /// Record a failed mutation. A vanished note triggers a re-list, which is
    /// what removes it from the screen.
    async fn settle<R>(&self, result: Result<R, ApiError>) -> Result<R, ActionError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                self.cell.update(|c| c.note_failure(&e));
                if e.is_not_found() {
                    self.reconcile().await;
                }
                Err(e.into())
            }
        }
    }

    async fn reconcile(&self) {
        // Failures are recorded on the collection.
        let _ = self.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use api::testing::FakeBackend;
    use api::{ApiRequest, ApiResponse, Method};
    use tokio::sync::Notify;

    use crate::collection::LoadState;

    /// Answers through a [`FakeBackend`] but can hold back the next list
    /// response, already computed, until released.
    #[derive(Clone)]
    struct HoldingTransport {
        backend: FakeBackend,
        hold_next_list: Rc<std::cell::Cell<bool>>,
        held: Rc<Notify>,
        release: Rc<Notify>,
    }

    impl HoldingTransport {
        fn new(backend: FakeBackend) -> Self {
            Self {
                backend,
                hold_next_list: Rc::default(),
                held: Rc::new(Notify::new()),
                release: Rc::new(Notify::new()),
            }
        }
    }

    impl Transport for HoldingTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            let is_list = request.method == Method::Get && request.path == "api/userNotes";
            let response = self.backend.send(request).await;
            if is_list && self.hold_next_list.replace(false) {
                self.held.notify_one();
                self.release.notified().await;
            }
            response
        }
    }

    fn controller(backend: &FakeBackend) -> NotesCollectionController<FakeBackend, SharedCollection> {
        backend.sign_in_as("ada@acme.test");
        let client = NotesClient::new(backend.clone()).with_author("ada@acme.test");
        NotesCollectionController::new(client, SharedCollection::new())
    }

    #[tokio::test]
    async fn test_initial_refresh() {
        let backend = FakeBackend::seeded();
        backend.seed_note("ada@acme.test", "First", "one");
        let controller = controller(&backend);

        controller.refresh().await.unwrap();
        let collection = controller.cell().snapshot();
        assert_eq!(collection.state(), &LoadState::Ready);
        assert_eq!(collection.notes().len(), 1);
        assert_eq!(collection.profile().unwrap().user_name, "Ada");
    }

    #[tokio::test]
    async fn test_create_refreshes_after_response() {
        let backend = FakeBackend::seeded();
        let controller = controller(&backend);

        let note = controller.create("T", "C").await.unwrap();
        let collection = controller.cell().snapshot();
        assert_eq!(collection.notes().len(), 1);
        assert_eq!(collection.notes()[0].local_id, note.local_id);
        assert!(!collection.is_busy(&Action::Create));

        let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["api/addnotes", "api/userNotes"]);
    }

    #[tokio::test]
    async fn test_pending_note_replaced_by_refresh() {
        let backend = FakeBackend::seeded();
        let controller = controller(&backend);
        backend.respond_next(201, r#"{"success":true}"#);

        let note = controller.create("T", "C").await.unwrap();
        assert!(note.is_pending());
        // The backend never stored it, so the reconciling list drops it
        assert!(controller.cell().snapshot().notes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_local_id() {
        let backend = FakeBackend::seeded();
        let local_id = backend.seed_note_with_id("ada@acme.test", "N-42", "Bye", "x");
        backend.seed_note("ada@acme.test", "Stay", "y");
        let controller = controller(&backend);
        controller.refresh().await.unwrap();

        controller.delete(&local_id).await.unwrap();
        let collection = controller.cell().snapshot();
        assert!(collection.get(&local_id).is_none());
        assert_eq!(collection.notes().len(), 1);
    }

    #[tokio::test]
    async fn test_update_not_found_keeps_note_until_refresh_confirms() {
        let backend = FakeBackend::seeded();
        let local_id = backend.seed_note_with_id("ada@acme.test", "N-9", "Old", "x");
        let controller = controller(&backend);
        controller.refresh().await.unwrap();

        // The backend answers 404 but still lists the note
        backend.fail_next(404, "Note not found");
        let err = controller.update(&local_id, "New", "y").await.unwrap_err();
        assert!(err.api().unwrap().is_not_found());
        let collection = controller.cell().snapshot();
        assert_eq!(collection.get(&local_id).unwrap().title, "Old");

        // Now it is really gone
        backend.remove_note("N-9");
        let err = controller.update(&local_id, "New", "y").await.unwrap_err();
        assert_eq!(err.resolution(), api::Resolution::InlineAndRefresh);
        assert!(controller.cell().snapshot().get(&local_id).is_none());
    }

    #[tokio::test]
    async fn test_update_applies_revision() {
        let backend = FakeBackend::seeded();
        let local_id = backend.seed_note_with_id("ada@acme.test", "N-5", "Old", "x");
        let controller = controller(&backend);
        controller.refresh().await.unwrap();

        let revision = controller.update(&local_id, "New", "body").await.unwrap();
        assert_eq!(revision.display_id, "N-5");
        let collection = controller.cell().snapshot();
        let note = collection.get(&local_id).unwrap();
        assert_eq!(note.title, "New");
        assert_eq!(note.body, "body");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_notes() {
        let backend = FakeBackend::seeded();
        backend.seed_note("ada@acme.test", "Kept", "x");
        let controller = controller(&backend);
        controller.refresh().await.unwrap();

        backend.disconnect_next();
        assert!(controller.refresh().await.is_err());
        let collection = controller.cell().snapshot();
        assert_eq!(collection.notes().len(), 1);
        assert!(!collection.sign_out_requested());
    }

    #[tokio::test]
    async fn test_expired_session_requests_sign_out() {
        let backend = FakeBackend::seeded();
        backend.seed_note("ada@acme.test", "Kept", "x");
        let controller = controller(&backend);
        controller.refresh().await.unwrap();

        backend.sign_out();
        let err = controller.create("T", "C").await.unwrap_err();
        assert_eq!(err.resolution(), api::Resolution::SignOut);
        assert!(controller.cell().snapshot().sign_out_requested());
    }

    #[tokio::test]
    async fn test_busy_action_is_rejected() {
        let backend = FakeBackend::seeded();
        let controller = controller(&backend);
        controller
            .cell()
            .update(|c| c.try_begin(Action::Create))
            .unwrap();

        let err = controller.create("T", "C").await.unwrap_err();
        assert_eq!(err, ActionError::Busy(Action::Create));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_local_id() {
        let backend = FakeBackend::seeded();
        let controller = controller(&backend);
        let err = controller.delete("missing").await.unwrap_err();
        assert_eq!(err, ActionError::UnknownNote("missing".into()));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_overtaken_list_does_not_restore_deleted_note() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        let doomed = backend.seed_note_with_id("ada@acme.test", "N-7", "Doomed", "x");
        let transport = HoldingTransport::new(backend.clone());
        let client = NotesClient::new(transport.clone()).with_author("ada@acme.test");
        let controller = NotesCollectionController::new(client, SharedCollection::new());
        controller.refresh().await.unwrap();

        // The list after the create is computed while N-7 still exists, then
        // held until the delete's own list has landed.
        transport.hold_next_list.set(true);
        let create = controller.create("Fresh", "y");
        let delete = async {
            transport.held.notified().await;
            controller.delete(&doomed).await.unwrap();
            transport.release.notify_one();
        };
        let (created, ()) = tokio::join!(create, delete);
        created.unwrap();

        let collection = controller.cell().snapshot();
        let titles: Vec<&str> = collection.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Fresh"]);
        assert!(collection.get(&doomed).is_none());
        assert_eq!(collection.state(), &LoadState::Ready);
    }
}
