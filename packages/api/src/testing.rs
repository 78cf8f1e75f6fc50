//! # In-memory backend for tests
//!
//! [`FakeBackend`] implements [`Transport`] by answering requests from shared
//! in-memory state instead of the network. It speaks the same routes and JSON
//! shapes as the real backend, keeps a cookie-style signed-in user, and logs
//! every request it receives so tests can assert how many calls were made.
//!
//! Clones share state, so a test keeps one handle for assertions and gives
//! another to the client under test.
//!
//! ```ignore
//! let backend = FakeBackend::seeded();
//! backend.sign_in_as("ada@acme.test");
//! backend.fail_next(500, "boom");
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde_json::{json, Value};
use store::Role;

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

#[derive(Clone, Debug)]
struct Account {
    name: String,
    password: String,
    role: Role,
    tenant: String,
}

#[derive(Clone, Debug)]
struct Tenant {
    id: String,
    name: String,
    plan: String,
}

#[derive(Clone, Debug)]
struct StoredNote {
    local_id: String,
    display_id: String,
    owner: String,
    title: String,
    content: String,
    created_at: String,
    updated_at: String,
}

impl StoredNote {
    fn to_json(&self) -> Value {
        json!({
            "_id": self.local_id,
            "noteId": self.display_id,
            "title": self.title,
            "content": self.content,
            "createdAt": self.created_at,
            "updatedAt": self.updated_at,
        })
    }
}

#[derive(Debug, Default)]
struct BackendState {
    accounts: BTreeMap<String, Account>,
    tenants: BTreeMap<String, Tenant>,
    notes: Vec<StoredNote>,
    next_note: u64,
    signed_in: Option<String>,
    requests: Vec<ApiRequest>,
    scripted: VecDeque<Result<ApiResponse, ApiError>>,
}

fn reply(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn failure(status: u16, message: &str) -> ApiResponse {
    reply(status, json!({ "success": false, "message": message }))
}

fn field<'a>(body: &'a Option<Value>, name: &str) -> &'a str {
    body.as_ref()
        .and_then(|b| b.get(name))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

impl BackendState {
    fn insert_note(&mut self, owner: &str, display_id: Option<&str>, title: &str, content: &str) -> &StoredNote {
        self.next_note += 1;
        let now = Utc::now().to_rfc3339();
        let display_id = display_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("N-{}", self.next_note));
        self.notes.push(StoredNote {
            local_id: uuid::Uuid::new_v4().simple().to_string(),
            display_id,
            owner: owner.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now.clone(),
            updated_at: now,
        });
        &self.notes[self.notes.len() - 1]
    }

    fn user_json(&self, email: &str) -> Value {
        match self.accounts.get(email) {
            Some(account) => json!({
                "name": account.name,
                "email": email,
                "role": account.role.as_str(),
            }),
            None => Value::Null,
        }
    }

    fn current(&self) -> Option<(String, Account)> {
        let email = self.signed_in.clone()?;
        let account = self.accounts.get(&email)?.clone();
        Some((email, account))
    }

    fn route(&mut self, request: &ApiRequest) -> ApiResponse {
        let segments: Vec<&str> = request.path.split('/').collect();
        match (request.method, segments.as_slice()) {
            (Method::Post, ["api", "login"]) => self.login(&request.body),
            (Method::Post, ["logout"]) => {
                self.signed_in = None;
                reply(200, json!({ "success": true, "message": "Logged out" }))
            }
            (Method::Get, ["api", "userNotes"]) => self.list_notes(),
            (Method::Post, ["api", "addnotes"]) => self.create_note(&request.body),
            (Method::Put, ["api", "notes", id]) => self.update_note(id, &request.body),
            (Method::Delete, ["notes", id]) => self.delete_note(id),
            (Method::Post, ["adduser"]) => self.add_member(&request.body),
            (Method::Post, ["api", "tenants", slug, "upgrade"]) => self.upgrade(slug),
            _ => failure(404, "Route not found"),
        }
    }

    fn login(&mut self, body: &Option<Value>) -> ApiResponse {
        let email = field(body, "email");
        let password = field(body, "password");
        let Some(account) = self.accounts.get(email).filter(|a| a.password == password) else {
            return reply(401, json!({ "success": false }));
        };
        let tenant_id = self.tenants.get(&account.tenant).map(|t| t.id.clone());
        let body = json!({
            "success": true,
            "data": {
                "user": self.user_json(email),
                "token": format!("token-{}", uuid::Uuid::new_v4().simple()),
                "tenantId": tenant_id,
                "tenant": { "slug": account.tenant },
            }
        });
        self.signed_in = Some(email.to_string());
        reply(200, body)
    }

    fn list_notes(&self) -> ApiResponse {
        let Some((email, _)) = self.current() else {
            return failure(401, "Not authenticated");
        };
        let notes: Vec<Value> = self
            .notes
            .iter()
            .filter(|n| n.owner == email)
            .map(StoredNote::to_json)
            .collect();
        reply(
            200,
            json!({
                "success": true,
                "data": { "notes": notes, "user": self.user_json(&email) }
            }),
        )
    }

    fn create_note(&mut self, body: &Option<Value>) -> ApiResponse {
        let Some((email, _)) = self.current() else {
            return failure(401, "Not authenticated");
        };
        let (title, content) = (field(body, "title"), field(body, "content"));
        if title.is_empty() || content.is_empty() {
            return failure(400, "Title and content are required");
        }
        let note = self.insert_note(&email, None, title, content).to_json();
        reply(201, json!({ "success": true, "data": note }))
    }

    fn owned_note(&mut self, display_id: &str) -> Result<usize, ApiResponse> {
        let Some((email, _)) = self.current() else {
            return Err(failure(401, "Not authenticated"));
        };
        self.notes
            .iter()
            .position(|n| n.owner == email && n.display_id == display_id)
            .ok_or_else(|| failure(404, "Note not found"))
    }

    fn update_note(&mut self, display_id: &str, body: &Option<Value>) -> ApiResponse {
        let index = match self.owned_note(display_id) {
            Ok(index) => index,
            Err(response) => return response,
        };
        let note = &mut self.notes[index];
        note.title = field(body, "title").to_string();
        note.content = field(body, "content").to_string();
        note.updated_at = Utc::now().to_rfc3339();
        reply(200, json!({ "success": true, "message": "Note updated" }))
    }

    fn delete_note(&mut self, display_id: &str) -> ApiResponse {
        match self.owned_note(display_id) {
            Ok(index) => {
                self.notes.remove(index);
                reply(200, json!({ "success": true, "message": "Note deleted" }))
            }
            Err(response) => response,
        }
    }

    fn add_member(&mut self, body: &Option<Value>) -> ApiResponse {
        let Some((_, admin)) = self.current().filter(|(_, a)| a.role.is_admin()) else {
            return failure(401, "Unauthorized. Only admins can add members.");
        };
        let email = field(body, "useremail");
        let password = field(body, "userPassword");
        let name = field(body, "userName");
        let Ok(role) = field(body, "userrole").parse::<Role>() else {
            return failure(400, "Invalid role");
        };
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return failure(400, "Missing fields");
        }
        if self.accounts.contains_key(email) {
            return failure(409, "User already exists with this email.");
        }
        self.accounts.insert(
            email.to_string(),
            Account {
                name: name.to_string(),
                password: password.to_string(),
                role,
                tenant: admin.tenant,
            },
        );
        reply(201, json!({ "success": "true", "message": "User created" }))
    }

    fn upgrade(&mut self, slug: &str) -> ApiResponse {
        let Some((_, admin)) = self.current().filter(|(_, a)| a.role.is_admin()) else {
            return failure(401, "Only admins can upgrade the plan.");
        };
        if admin.tenant != slug {
            return failure(403, "Cannot upgrade another tenant");
        }
        let Some(tenant) = self.tenants.get_mut(slug) else {
            return failure(404, "Tenant not found");
        };
        if tenant.plan == "PRO" {
            return failure(400, "Tenant is already on PRO plan.");
        }
        let previous = std::mem::replace(&mut tenant.plan, "PRO".to_string());
        reply(
            200,
            json!({
                "success": true,
                "data": { "newPlan": tenant.plan, "previousPlan": previous, "name": tenant.name }
            }),
        )
    }
}

/// Shared, cloneable in-memory backend.
#[derive(Clone, Debug, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    /// Empty backend: no tenants, accounts or notes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tenant `acme` on the FREE plan with an admin `root@acme.test` and a
    /// member `ada@acme.test`, both with password `password`.
    pub fn seeded() -> Self {
        Self::new()
            .with_tenant("acme", "Acme Corp", "FREE")
            .with_account("root@acme.test", "password", "Root", Role::Admin, "acme")
            .with_account("ada@acme.test", "password", "Ada", Role::Member, "acme")
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_tenant(self, slug: &str, name: &str, plan: &str) -> Self {
        {
            let mut state = self.state();
            let id = format!("t-{}", state.tenants.len() + 1);
            state.tenants.insert(
                slug.to_string(),
                Tenant {
                    id,
                    name: name.to_string(),
                    plan: plan.to_string(),
                },
            );
        }
        self
    }

    pub fn with_account(self, email: &str, password: &str, name: &str, role: Role, tenant: &str) -> Self {
        self.state().accounts.insert(
            email.to_string(),
            Account {
                name: name.to_string(),
                password: password.to_string(),
                role,
                tenant: tenant.to_string(),
            },
        );
        self
    }

    /// Act as if `email` had logged in and holds the session cookie.
    pub fn sign_in_as(&self, email: &str) {
        self.state().signed_in = Some(email.to_string());
    }

    pub fn sign_out(&self) {
        self.state().signed_in = None;
    }

    pub fn signed_in(&self) -> Option<String> {
        self.state().signed_in.clone()
    }

    /// Store a note for `owner` and return its display id.
    pub fn seed_note(&self, owner: &str, title: &str, content: &str) -> String {
        self.state()
            .insert_note(owner, None, title, content)
            .display_id
            .clone()
    }

    /// Store a note under a fixed display id and return its local id.
    pub fn seed_note_with_id(&self, owner: &str, display_id: &str, title: &str, content: &str) -> String {
        self.state()
            .insert_note(owner, Some(display_id), title, content)
            .local_id
            .clone()
    }

    /// Delete a note behind the client's back.
    pub fn remove_note(&self, display_id: &str) {
        self.state().notes.retain(|n| n.display_id != display_id);
    }

    pub fn note_count(&self) -> usize {
        self.state().notes.len()
    }

    /// Answer the next request with `status` and `{success:false, message}`.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.state().scripted.push_back(Ok(failure(status, message)));
    }

    /// Answer the next request with a raw body.
    pub fn respond_next(&self, status: u16, body: &str) {
        self.state()
            .scripted
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Fail the next request before any response arrives.
    pub fn disconnect_next(&self) {
        self.state()
            .scripted
            .push_back(Err(ApiError::Network("connection refused".to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn plan_of(&self, slug: &str) -> Option<String> {
        self.state().tenants.get(slug).map(|t| t.plan.clone())
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.state().accounts.contains_key(email)
    }
}

impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut state = self.state();
        state.requests.push(request.clone());
        if let Some(scripted) = state.scripted.pop_front() {
            return scripted;
        }
        Ok(state.route(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notes_are_scoped_to_the_signed_in_user() {
        let backend = FakeBackend::seeded();
        backend.seed_note("root@acme.test", "Admin only", "x");
        backend.seed_note("ada@acme.test", "Mine", "y");
        backend.sign_in_as("ada@acme.test");

        let response = backend.send(ApiRequest::get("api/userNotes")).await.unwrap();
        let body: Value = response.json().unwrap();
        let notes = body["data"]["notes"].as_array().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0]["title"], "Mine");
        assert_eq!(body["data"]["user"]["role"], "MEMBER");
    }

    #[tokio::test]
    async fn test_scripted_responses_come_first() {
        let backend = FakeBackend::seeded();
        backend.disconnect_next();
        backend.fail_next(503, "maintenance");

        let first = backend.send(ApiRequest::get("api/userNotes")).await;
        assert!(matches!(first, Err(ApiError::Network(_))));
        let second = backend.send(ApiRequest::get("api/userNotes")).await.unwrap();
        assert_eq!(second.status, 503);
        let third = backend.send(ApiRequest::get("api/userNotes")).await.unwrap();
        assert_eq!(third.status, 401);
        assert_eq!(backend.request_count(), 3);
    }

    #[tokio::test]
    async fn test_display_ids_are_sequential() {
        let backend = FakeBackend::seeded();
        assert_eq!(backend.seed_note("ada@acme.test", "a", "a"), "N-1");
        assert_eq!(backend.seed_note("ada@acme.test", "b", "b"), "N-2");
        backend.remove_note("N-1");
        assert_eq!(backend.note_count(), 1);
    }
}
