//! # API crate: typed client for the multi-tenant notes backend
//!
//! Every backend endpoint the frontends use is reached through one of three
//! façades. None of them hold state beyond their transport; the session lives
//! in the `store` crate and note collections live in the UI.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Login / logout against the cookie session |
//! | [`notes`] | — | List, create, update and delete notes |
//! | [`admin`] | — | Add tenant members, upgrade the tenant plan (admin only) |
//! | [`error`] | — | [`ApiError`] taxonomy and its UI [`Resolution`] |
//! | [`transport`] | — | [`Transport`] trait and the `reqwest` implementation |
//! | [`models`] | — | Notes, revisions, new members, plan changes |
//! | [`testing`] | `testing` | [`testing::FakeBackend`], an in-memory backend |
//!
//! ## Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | Login | POST | `api/login` |
//! | Logout | POST | `logout` |
//! | List notes | GET | `api/userNotes` |
//! | Create note | POST | `api/addnotes` |
//! | Update note | PUT | `api/notes/{displayId}` |
//! | Delete note | DELETE | `notes/{displayId}` |
//! | Add member | POST | `adduser` |
//! | Upgrade plan | POST | `api/tenants/{slug}/upgrade` |

pub mod admin;
pub mod auth;
pub mod error;
pub mod models;
pub mod notes;
pub mod transport;
mod wire;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use admin::MemberAdminClient;
pub use auth::AuthClient;
pub use error::{ApiError, Endpoint, Resolution};
pub use models::{NewMember, Note, NoteRevision, NotesPage, PlanChange};
pub use notes::NotesClient;
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
