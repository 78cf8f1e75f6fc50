//! JSON bodies exchanged with the backend.
//!
//! The backend is loose about types (`success` is sometimes `true`, sometimes
//! `"true"`) and about nesting (a created note may sit under `data` or
//! `data.data`), so readers here are deliberately forgiving.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use store::Session;

use crate::models::Note;

/// Accept `true`, `"true"` or nothing for a success flag.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateNoteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateNoteRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddMemberRequest<'a> {
    /// The acting admin's email.
    pub email: &'a str,
    pub useremail: &'a str,
    #[serde(rename = "userPassword")]
    pub user_password: &'a str,
    #[serde(rename = "userName")]
    pub user_name: &'a str,
    pub userrole: &'a str,
}

/// `{success, message}` acknowledgement.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListNotesBody {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<ListNotesData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListNotesData {
    #[serde(default)]
    pub notes: Vec<WireNote>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

impl ListNotesData {
    /// The caller's identity as the backend sees it, if it sent a usable one.
    pub fn session(&self) -> Option<Session> {
        let user = self.user.as_ref()?;
        Session::from_json(&user.to_string()).ok()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireNote {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub note_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn timestamp(value: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(fallback)
}

impl WireNote {
    /// Whether the body looks like a note at all.
    pub fn is_identified(&self) -> bool {
        self.id.as_deref().is_some_and(|v| !v.is_empty())
            || self.note_id.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn into_note(self, now: DateTime<Utc>) -> Note {
        let created_at = timestamp(self.created_at.as_deref(), now);
        let updated_at = timestamp(self.updated_at.as_deref(), now);
        Note {
            local_id: non_empty(self.id).unwrap_or_else(|| "NA".to_string()),
            display_id: non_empty(self.note_id).unwrap_or_else(|| "NA".to_string()),
            title: non_empty(self.title).unwrap_or_else(|| "Untitled".to_string()),
            body: self.content.unwrap_or_default(),
            created_at,
            updated_at,
        }
    }
}

/// Find the note in a create response: `data.data`, `data`, or the body itself.
pub(crate) fn created_note(body: &serde_json::Value) -> Option<WireNote> {
    let candidates = [body.get("data").and_then(|d| d.get("data")), body.get("data"), Some(body)];
    candidates
        .into_iter()
        .flatten()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value::<WireNote>(v.clone()).ok())
        .find(WireNote::is_identified)
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpgradeBody {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<UpgradeData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpgradeData {
    pub new_plan: String,
    pub previous_plan: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_flag_variants() {
        let body: StatusBody = serde_json::from_str(r#"{"success":"true"}"#).unwrap();
        assert!(body.success);
        let body: StatusBody = serde_json::from_str(r#"{"success":true,"message":"ok"}"#).unwrap();
        assert!(body.success);
        assert_eq!(body.message.as_deref(), Some("ok"));
        let body: StatusBody = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
        assert!(!body.success);
    }

    #[test]
    fn test_wire_note_defaults() {
        let now = Utc::now();
        let note = WireNote::default().into_note(now);
        assert_eq!(note.local_id, "NA");
        assert_eq!(note.display_id, "NA");
        assert_eq!(note.title, "Untitled");
        assert_eq!(note.body, "");
        assert_eq!(note.created_at, now);

        let note: WireNote = serde_json::from_value(json!({
            "_id": "65f0", "noteId": "N-7", "title": "", "content": "Body",
            "createdAt": "2024-03-01T10:00:00Z", "updatedAt": "garbage"
        }))
        .unwrap();
        let note = note.into_note(now);
        assert_eq!(note.local_id, "65f0");
        assert_eq!(note.display_id, "N-7");
        assert_eq!(note.title, "Untitled");
        assert_eq!(note.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert_eq!(note.updated_at, now);
    }

    #[test]
    fn test_created_note_nesting() {
        let doubly = json!({"data": {"data": {"_id": "a", "noteId": "N-1"}}});
        assert_eq!(created_note(&doubly).unwrap().note_id.as_deref(), Some("N-1"));

        let singly = json!({"data": {"_id": "b", "noteId": "N-2"}});
        assert_eq!(created_note(&singly).unwrap().id.as_deref(), Some("b"));

        let bare = json!({"_id": "c", "title": "T"});
        assert_eq!(created_note(&bare).unwrap().id.as_deref(), Some("c"));

        assert!(created_note(&json!({"success": true})).is_none());
    }

    #[test]
    fn test_list_user_becomes_session() {
        let data: ListNotesData = serde_json::from_value(json!({
            "notes": [],
            "user": {"name": "Ada", "email": "ada@acme.test", "role": "ADMIN"}
        }))
        .unwrap();
        assert_eq!(data.session().unwrap().user_name, "Ada");

        let data: ListNotesData = serde_json::from_value(json!({"user": {"name": "Ada"}})).unwrap();
        assert!(data.session().is_none());
    }
}
