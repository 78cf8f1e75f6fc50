//! # Error taxonomy shared by every API call
//!
//! [`ApiError`] is the only error the façades in this crate return. Each variant
//! corresponds to one way the client reacts:
//!
//! | Variant | Raised by | UI consequence ([`Resolution`]) |
//! |---------|-----------|--------------------------------|
//! | `Auth` | 401, missing session, missing admin email | clear the session, go to login |
//! | `Authorization` | 403, non-admin calling an admin operation | go to the member dashboard, keep the session |
//! | `Validation` | empty or too-short fields (no request sent), 400 | inline message |
//! | `Conflict` | 409 (duplicate email), 400 on plan upgrade | inline message |
//! | `NotFound` | 404 on note update/delete | inline message, then refresh |
//! | `Network` | transport failure | inline message, no state change |
//! | `Unexpected` | any other status or an unreadable body | inline message, no state change |
//!
//! HTTP statuses are turned into variants by [`ApiError::from_status`], which
//! knows the per-[`Endpoint`] quirks of the backend (e.g. a 400 on the plan
//! upgrade endpoint means "already upgraded").

use std::fmt;

/// The backend operation a response belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Logout,
    ListNotes,
    CreateNote,
    UpdateNote,
    DeleteNote,
    AddMember,
    UpgradePlan,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Login => "login",
            Endpoint::Logout => "logout",
            Endpoint::ListNotes => "list notes",
            Endpoint::CreateNote => "create note",
            Endpoint::UpdateNote => "update note",
            Endpoint::DeleteNote => "delete note",
            Endpoint::AddMember => "add member",
            Endpoint::UpgradePlan => "upgrade plan",
        };
        f.write_str(name)
    }
}

/// Error returned by every API façade.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },
}

/// What the UI does with an [`ApiError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Clear the session and redirect to login.
    SignOut,
    /// Redirect to the user's own dashboard, keeping the session.
    RedirectToDashboard,
    /// Show the message next to the form.
    Inline,
    /// Show the message and reload the note list.
    InlineAndRefresh,
}

impl ApiError {
    /// Map a non-success HTTP status to an error, preferring the backend's message.
    pub fn from_status(endpoint: Endpoint, status: u16, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.trim().is_empty());
        let or = |fallback: &str| message.clone().unwrap_or_else(|| fallback.to_string());

        match (endpoint, status) {
            (Endpoint::Login, 401) => ApiError::Auth(or("Invalid credentials. Please try again.")),
            (Endpoint::AddMember, 401) => {
                ApiError::Auth(or("Unauthorized. Only admins can add members."))
            }
            (Endpoint::UpgradePlan, 401) => ApiError::Auth(or("Only admins can upgrade the plan.")),
            (_, 401) => ApiError::Auth(or("Your session has expired. Please sign in again.")),
            (_, 403) => ApiError::Authorization(or("You do not have permission to do that.")),
            (Endpoint::UpdateNote | Endpoint::DeleteNote, 404) => {
                ApiError::NotFound(or("Note not found."))
            }
            (Endpoint::AddMember, 409) => {
                ApiError::Conflict(or("User already exists with this email."))
            }
            (_, 409) => ApiError::Conflict(or("The request conflicts with existing data.")),
            (Endpoint::UpgradePlan, 400) => ApiError::Conflict(or("Tenant is already on PRO plan.")),
            (Endpoint::AddMember, 400) => {
                ApiError::Validation(or("Invalid data provided. Please check all fields."))
            }
            (_, 400 | 422) => ApiError::Validation(or("Invalid request.")),
            _ => ApiError::Unexpected {
                status,
                message: or(&format!("Failed to {endpoint}. Please try again.")),
            },
        }
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            ApiError::Auth(_) => Resolution::SignOut,
            ApiError::Authorization(_) => Resolution::RedirectToDashboard,
            ApiError::NotFound(_) => Resolution::InlineAndRefresh,
            ApiError::Validation(_)
            | ApiError::Conflict(_)
            | ApiError::Network(_)
            | ApiError::Unexpected { .. } => Resolution::Inline,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    pub(crate) fn unreadable(status: u16, endpoint: Endpoint, detail: impl fmt::Display) -> Self {
        ApiError::Unexpected {
            status,
            message: format!("Unreadable {endpoint} response: {detail}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Network(value.to_string())
    }
}
