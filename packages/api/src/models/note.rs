//! # Note model
//!
//! A [`Note`] has two identifiers with different jobs:
//!
//! - `local_id`: the backend's internal record id (`_id`). Stable for the life
//!   of the note and used only to key notes in the UI.
//! - `display_id`: the human-facing id the backend assigns (`noteId`, e.g.
//!   `"N-42"`). Every update/delete is addressed by it.
//!
//! [`NoteRevision`] is what an update yields: the backend only acknowledges the
//! edit, so the new title/body are echoed back together with a local
//! `updated_at`.

use chrono::{DateTime, Utc};
use store::Session;

const PENDING_PREFIX: &str = "pending-";

/// A note as shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub local_id: String,
    pub display_id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Placeholder for a created note the backend did not echo back.
    pub fn pending(title: &str, body: &str, now: DateTime<Utc>) -> Self {
        Self {
            local_id: format!("{PENDING_PREFIX}{}", uuid::Uuid::new_v4()),
            display_id: "NA".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this note only exists locally until the next refresh.
    pub fn is_pending(&self) -> bool {
        self.local_id.starts_with(PENDING_PREFIX)
    }

    pub fn apply(&mut self, revision: &NoteRevision) {
        self.title = revision.title.clone();
        self.body = revision.body.clone();
        self.updated_at = revision.updated_at;
    }
}

/// Acknowledged edit of a note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRevision {
    pub display_id: String,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// Result of listing notes: the notes plus the backend's view of the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub session: Option<Session>,
}
