//! # Notes façade
//!
//! [`NotesClient`] maps each notes endpoint to one async method. It holds no
//! note state; the collection lives in the UI's controller. Credentials travel
//! with the transport (cookies), so the client never reads the session token.
//! The only session detail it uses is the author email, which the create
//! endpoint expects in the body.

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, Endpoint};
use crate::models::{Note, NoteRevision, NotesPage};
use crate::transport::{dispatch, ApiRequest, ApiResponse, Transport};
use crate::wire::{self, CreateNoteRequest, ListNotesBody, StatusBody, UpdateNoteRequest};

#[derive(Clone, Debug)]
pub struct NotesClient<T> {
    transport: T,
    author_email: Option<String>,
}

fn validated<'a>(title: &'a str, body: &'a str) -> Result<(&'a str, &'a str), ApiError> {
    let (title, body) = (title.trim(), body.trim());
    if title.is_empty() || body.is_empty() {
        return Err(ApiError::Validation(
            "Please fill in both title and content".to_string(),
        ));
    }
    Ok((title, body))
}

fn acknowledged(response: &ApiResponse, endpoint: Endpoint) -> Result<(), ApiError> {
    let body: StatusBody = response
        .json()
        .map_err(|e| ApiError::unreadable(response.status, endpoint, e))?;
    if body.success {
        Ok(())
    } else {
        Err(ApiError::Unexpected {
            status: response.status,
            message: body
                .message
                .unwrap_or_else(|| format!("Failed to {endpoint}. Please try again.")),
        })
    }
}

impl<T: Transport> NotesClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            author_email: None,
        }
    }

    /// Client acting for a signed-in user.
    pub fn for_session(transport: T, session: &store::Session) -> Self {
        Self {
            transport,
            author_email: session.email.clone(),
        }
    }

    pub fn with_author(mut self, email: impl Into<String>) -> Self {
        self.author_email = Some(email.into());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every note owned by the caller.
    pub async fn list_notes(&self) -> Result<NotesPage, ApiError> {
        let endpoint = Endpoint::ListNotes;
        let response = dispatch(&self.transport, endpoint, ApiRequest::get("api/userNotes")).await?;
        let body: ListNotesBody = response
            .json()
            .map_err(|e| ApiError::unreadable(response.status, endpoint, e))?;

        if !body.success {
            return Err(ApiError::Unexpected {
                status: response.status,
                message: body
                    .message
                    .unwrap_or_else(|| "Failed to fetch notes".to_string()),
            });
        }

        let now = Utc::now();
        let (notes, session) = match body.data {
            Some(data) => {
                let session = data.session();
                let notes = data.notes.into_iter().map(|n| n.into_note(now)).collect();
                (notes, session)
            }
            None => (Vec::new(), None),
        };
        Ok(NotesPage { notes, session })
    }

    pub async fn create_note(&self, title: &str, body: &str) -> Result<Note, ApiError> {
        let (title, body) = validated(title, body)?;
        let endpoint = Endpoint::CreateNote;
        let request = CreateNoteRequest {
            email: self.author_email.as_deref(),
            title,
            content: body,
        };
        let response = dispatch(
            &self.transport,
            endpoint,
            ApiRequest::post("api/addnotes", json!(request)),
        )
        .await?;

        let value: serde_json::Value = response
            .json()
            .map_err(|e| ApiError::unreadable(response.status, endpoint, e))?;
        if value.get("success").is_some_and(|s| *s == false || *s == "false") {
            return Err(ApiError::Unexpected {
                status: response.status,
                message: response
                    .message()
                    .unwrap_or_else(|| "Failed to create note".to_string()),
            });
        }

        let now = Utc::now();
        let note = match wire::created_note(&value) {
            Some(note) => note.into_note(now),
            None => Note::pending(title, body, now),
        };
        info!("Created note {}", note.display_id);
        Ok(note)
    }

    /// Replace title and body of the note addressed by `display_id`.
    pub async fn update_note(
        &self,
        display_id: &str,
        title: &str,
        body: &str,
    ) -> Result<NoteRevision, ApiError> {
        let (title, body) = validated(title, body)?;
        let endpoint = Endpoint::UpdateNote;
        let request = UpdateNoteRequest {
            title,
            content: body,
        };
        let response = dispatch(
            &self.transport,
            endpoint,
            ApiRequest::put(format!("api/notes/{display_id}"), json!(request)),
        )
        .await?;
        acknowledged(&response, endpoint)?;

        Ok(NoteRevision {
            display_id: display_id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            updated_at: Utc::now(),
        })
    }

    pub async fn delete_note(&self, display_id: &str) -> Result<(), ApiError> {
        let endpoint = Endpoint::DeleteNote;
        let response = dispatch(
            &self.transport,
            endpoint,
            ApiRequest::delete(format!("notes/{display_id}")),
        )
        .await?;
        acknowledged(&response, endpoint)?;
        info!("Deleted note {}", display_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use crate::transport::Method;

    fn client(backend: &FakeBackend) -> NotesClient<FakeBackend> {
        NotesClient::new(backend.clone()).with_author("ada@acme.test")
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        let notes = client(&backend);

        let created = notes.create_note("T", "C").await.unwrap();
        assert!(created.display_id.starts_with("N-"));
        assert!(!created.is_pending());

        let page = notes.list_notes().await.unwrap();
        assert!(page.notes.iter().any(|n| n.title == "T" && n.body == "C"));
        assert_eq!(page.session.unwrap().user_name, "Ada");
    }

    #[tokio::test]
    async fn test_create_trims_and_validates_locally() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        let notes = client(&backend);

        let err = notes.create_note("   ", "body").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = notes.create_note("title", "\n").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(backend.request_count(), 0);

        let created = notes.create_note("  Padded  ", " body ").await.unwrap();
        assert_eq!(created.title, "Padded");
        assert_eq!(created.body, "body");
    }

    #[tokio::test]
    async fn test_unauthenticated_calls_fail_with_auth() {
        let backend = FakeBackend::seeded();
        let notes = client(&backend);

        assert!(notes.list_notes().await.unwrap_err().is_auth());
        assert!(notes.create_note("T", "C").await.unwrap_err().is_auth());
    }

    #[tokio::test]
    async fn test_delete_removes_note_from_next_list() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        let local_id = backend.seed_note_with_id("ada@acme.test", "N-42", "Doomed", "bye");
        let notes = client(&backend);

        notes.delete_note("N-42").await.unwrap();

        let page = notes.list_notes().await.unwrap();
        assert!(page.notes.iter().all(|n| n.local_id != local_id));
        let last = backend.requests().into_iter().rev().nth(1).unwrap();
        assert_eq!(last.method, Method::Delete);
        assert_eq!(last.path, "notes/N-42");
    }

    #[tokio::test]
    async fn test_update_unknown_note_is_not_found() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        let notes = client(&backend);

        let err = notes.update_note("N-999", "T", "C").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_returns_revision() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        backend.seed_note_with_id("ada@acme.test", "N-7", "Old", "old");
        let notes = client(&backend);

        let revision = notes.update_note("N-7", " New ", "new").await.unwrap();
        assert_eq!(revision.display_id, "N-7");
        assert_eq!(revision.title, "New");

        let page = notes.list_notes().await.unwrap();
        let note = page.notes.iter().find(|n| n.display_id == "N-7").unwrap();
        assert_eq!(note.title, "New");
        assert_eq!(note.body, "new");
    }

    #[tokio::test]
    async fn test_create_without_echo_yields_pending_note() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        backend.respond_next(201, r#"{"success":true,"message":"Note created"}"#);
        let notes = client(&backend);

        let created = notes.create_note("T", "C").await.unwrap();
        assert!(created.is_pending());
        assert_eq!(created.title, "T");
    }

    #[tokio::test]
    async fn test_success_false_is_unexpected() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        backend.respond_next(200, r#"{"success":false,"message":"DB down"}"#);
        let notes = client(&backend);

        let err = notes.list_notes().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Unexpected {
                status: 200,
                message: "DB down".into()
            }
        );
    }

    #[tokio::test]
    async fn test_injected_failure_keeps_backend_message() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        backend.fail_next(500, "boom");
        let notes = client(&backend);

        let err = notes.delete_note("N-1").await.unwrap_err();
        assert!(matches!(err, ApiError::Unexpected { status: 500, .. }));
        assert_eq!(err.to_string(), "Unexpected response (500): boom");
    }
}
