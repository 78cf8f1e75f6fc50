//! This crate contains all shared UI for the workspace: the screen-entry
//! gate, the note collection and its controller, the session context and the
//! Dioxus screens the platform crates route to.

pub mod collection;
pub mod controller;
pub mod error;
pub mod format;
pub mod gate;
pub mod session;
pub mod views;

pub use collection::{filter_notes, Action, LoadState, NoteCollection};
pub use controller::{CollectionCell, NotesCollectionController, SharedCollection};
pub use error::ActionError;
pub use format::format_relative;
pub use gate::{decide, home_for, AuthGate, Destination, GateDecision};
pub use session::{
    make_session_store, sign_in, sign_out, use_session, PlatformStorage, SessionProvider,
    SessionState,
};
