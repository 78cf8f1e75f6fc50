//! # Note collection state
//!
//! [`NoteCollection`] is the dashboard's in-memory copy of the user's notes
//! plus everything derived from it: the search query, the load state, which
//! actions are in flight, and whether an auth failure asked for a sign-out.
//!
//! The backend is the source of truth. Local changes (insert, replace, remove
//! by `local_id`) only bridge the gap until the next full list replaces
//! `notes` wholesale.
//!
//! Lists can overlap when actions on different notes run at once. Each list
//! takes a ticket from [`NoteCollection::begin_loading`] and only the newest
//! ticket may replace `notes`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use api::{ApiError, Note, NoteRevision, NotesPage};
use store::Session;

use crate::error::ActionError;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(ApiError),
}

/// A user action that holds a busy flag while its request is in flight.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update(String),
    Delete(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => f.write_str("Creating a note"),
            Action::Update(_) => f.write_str("Saving this note"),
            Action::Delete(_) => f.write_str("Deleting this note"),
        }
    }
}

/// Notes matching `query`, in their original order.
///
/// The query is trimmed and compared case-insensitively against the display
/// id and the title. An empty query matches everything.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return notes.iter().collect();
    }
    notes
        .iter()
        .filter(|n| {
            n.display_id.to_lowercase().contains(&query) || n.title.to_lowercase().contains(&query)
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteCollection {
    notes: Vec<Note>,
    query: String,
    state: LoadState,
    busy: HashSet<Action>,
    sign_out_requested: bool,
    profile: Option<Session>,
    generation: u64,
    /// Messages for failed actions, keyed by `local_id`.
    failures: HashMap<String, String>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, local_id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.local_id == local_id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The backend's view of the signed-in user from the last list.
    pub fn profile(&self) -> Option<&Session> {
        self.profile.as_ref()
    }

    pub fn sign_out_requested(&self) -> bool {
        self.sign_out_requested
    }

    pub fn is_busy(&self, action: &Action) -> bool {
        self.busy.contains(action)
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn visible(&self) -> Vec<&Note> {
        filter_notes(&self.notes, &self.query)
    }

    /// "2 of 5 notes matching \"plan\""
    pub fn summary(&self) -> String {
        let total = self.notes.len();
        let noun = if total == 1 { "note" } else { "notes" };
        let mut summary = format!("{} of {} {}", self.visible().len(), total, noun);
        if !self.query.is_empty() {
            summary.push_str(&format!(" matching \"{}\"", self.query));
        }
        summary
    }

    /// Start a list and return its ticket.
    pub fn begin_loading(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.generation
    }

    fn is_current(&self, ticket: u64) -> bool {
        ticket == self.generation
    }

    /// Replace the collection with a freshly listed one. Returns `false`, and
    /// changes nothing, when a newer list has started since `ticket`.
    pub fn finish_loading(&mut self, ticket: u64, page: NotesPage) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.notes = page.notes;
        if page.session.is_some() {
            self.profile = page.session;
        }
        self.failures
            .retain(|local_id, _| self.notes.iter().any(|n| &n.local_id == local_id));
        self.state = LoadState::Ready;
        true
    }

    /// Record a failed list. Previously listed notes stay visible. An auth
    /// failure requests a sign-out even when the list is stale.
    pub fn fail_loading(&mut self, ticket: u64, err: ApiError) -> bool {
        self.note_failure(&err);
        if !self.is_current(ticket) {
            return false;
        }
        self.state = LoadState::Failed(err);
        true
    }

    /// Message left by the last failed action on a note.
    pub fn failure(&self, local_id: &str) -> Option<&str> {
        self.failures.get(local_id).map(String::as_str)
    }

    pub fn set_failure(&mut self, local_id: &str, message: impl Into<String>) {
        self.failures.insert(local_id.to_string(), message.into());
    }

    pub fn clear_failure(&mut self, local_id: &str) {
        self.failures.remove(local_id);
    }

    pub(crate) fn note_failure(&mut self, err: &ApiError) {
        if err.is_auth() {
            self.sign_out_requested = true;
        }
    }

    /// Take the busy flag for `action`, refusing a duplicate submission.
    pub fn try_begin(&mut self, action: Action) -> Result<(), ActionError> {
        if self.busy.contains(&action) {
            return Err(ActionError::Busy(action));
        }
        self.busy.insert(action);
        Ok(())
    }

    pub fn end(&mut self, action: &Action) {
        self.busy.remove(action);
    }

    pub fn insert(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.local_id == note.local_id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }

    pub fn apply(&mut self, local_id: &str, revision: &NoteRevision) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.local_id == local_id) {
            note.apply(revision);
        }
    }

    pub fn remove(&mut self, local_id: &str) {
        self.notes.retain(|n| n.local_id != local_id);
    }
}
