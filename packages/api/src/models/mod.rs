//! Data models returned by the API façades.

mod member;
mod note;

pub use member::{NewMember, PlanChange};
pub use note::{Note, NoteRevision, NotesPage};
