//! # Email + password login
//!
//! [`AuthClient::login`] posts the credentials and turns the response into a
//! [`Session`] with the same tolerant parser the session store reads snapshots
//! with, so whatever login returns can be persisted as-is. The backend sets its
//! session cookie on the same response; the transport keeps it.
//!
//! [`AuthClient::logout`] is best-effort: the caller clears the local session
//! no matter what the backend answers.

use serde_json::json;
use store::Session;
use tracing::{info, warn};

use crate::error::{ApiError, Endpoint};
use crate::transport::{dispatch, ApiRequest, Transport};
use crate::wire::LoginRequest;

#[derive(Clone, Debug)]
pub struct AuthClient<T> {
    transport: T,
}

impl<T: Transport> AuthClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign in and return the session to persist.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Please enter your email and password".to_string(),
            ));
        }

        let endpoint = Endpoint::Login;
        let request = LoginRequest { email, password };
        let response =
            dispatch(&self.transport, endpoint, ApiRequest::post("api/login", json!(request)))
                .await?;

        let session = Session::from_json(&response.body)
            .map_err(|e| ApiError::unreadable(response.status, endpoint, e))?;
        info!("Signed in as {} ({})", session.display_name(), session.role);
        Ok(session)
    }

    pub async fn logout(&self) {
        let request = ApiRequest::post("logout", json!({}));
        match dispatch(&self.transport, Endpoint::Logout, request).await {
            Ok(_) => info!("Signed out"),
            Err(e) => warn!("Ignoring failed logout: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use store::Role;

    #[tokio::test]
    async fn test_login_returns_session() {
        let backend = FakeBackend::seeded();
        let auth = AuthClient::new(backend.clone());

        let session = auth.login("root@acme.test", "password").await.unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.email.as_deref(), Some("root@acme.test"));
        assert_eq!(session.tenant_slug.as_deref(), Some("acme"));
        assert!(session.token.is_some());
        assert_eq!(backend.signed_in().as_deref(), Some("root@acme.test"));
    }

    #[tokio::test]
    async fn test_bad_credentials_are_auth_errors() {
        let backend = FakeBackend::seeded();
        let auth = AuthClient::new(backend.clone());

        let err = auth.login("ada@acme.test", "wrong").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Auth("Invalid credentials. Please try again.".into())
        );
        assert!(backend.signed_in().is_none());
    }

    #[tokio::test]
    async fn test_blank_fields_never_reach_backend() {
        let backend = FakeBackend::seeded();
        let auth = AuthClient::new(backend.clone());

        assert!(matches!(
            auth.login("  ", "password").await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            auth.login("ada@acme.test", "").await,
            Err(ApiError::Validation(_))
        ));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_ignores_failures() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        let auth = AuthClient::new(backend.clone());

        backend.fail_next(500, "down");
        auth.logout().await;
        assert_eq!(backend.signed_in().as_deref(), Some("ada@acme.test"));

        auth.logout().await;
        assert!(backend.signed_in().is_none());
    }

    #[tokio::test]
    async fn test_logout_posts_to_root_path() {
        let backend = FakeBackend::seeded();
        backend.sign_in_as("ada@acme.test");
        AuthClient::new(backend.clone()).logout().await;

        let request = backend.requests().pop().unwrap();
        assert_eq!(request.method, crate::transport::Method::Post);
        assert_eq!(request.path, "logout");
    }
}
