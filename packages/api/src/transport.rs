//! # Transport: how requests reach the backend
//!
//! The façades ([`crate::NotesClient`], [`crate::AuthClient`],
//! [`crate::MemberAdminClient`]) build [`ApiRequest`]s and hand them to a
//! [`Transport`]. A transport returns an [`ApiResponse`] for any HTTP status and
//! only fails with [`ApiError::Network`] when no response arrived at all;
//! turning statuses into errors happens in [`dispatch`].
//!
//! [`ReqwestTransport`] is the production implementation. It carries the
//! session via cookies: a cookie jar on native targets, `credentials: include`
//! on wasm. It never adds an `Authorization` header.
//!
//! Calls are single-shot: no retry and no timeout.

use std::fmt;
use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, Endpoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A request relative to the backend root.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the endpoint root: "api/notes/N-1"
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Put, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path, None)
    }

    fn new(method: Method, path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method,
            path: path.into().trim_start_matches('/').to_string(),
            body,
        }
    }
}

/// Raw status and body of a backend reply.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// The `message` field of a JSON body, if any.
    pub fn message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        value.get("message")?.as_str().map(str::to_string)
    }
}

/// Async interface for sending requests to the backend.
pub trait Transport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

/// Send a request and turn a non-2xx status into the endpoint's error.
pub(crate) async fn dispatch<T: Transport>(
    transport: &T,
    endpoint: Endpoint,
    request: ApiRequest,
) -> Result<ApiResponse, ApiError> {
    debug!("{} {} ({})", request.method, request.path, endpoint);
    let response = transport.send(request).await.map_err(|e| {
        warn!("Failed to {}: {}", endpoint, e);
        e
    })?;

    if response.is_success() {
        Ok(response)
    } else {
        let err = ApiError::from_status(endpoint, response.status, response.message());
        warn!("Failed to {} ({}): {}", endpoint, response.status, err);
        Err(err)
    }
}

/// Join a path onto the endpoint root with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// HTTP transport backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::new();

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &store::ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.backend.url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = join_url(&self.base_url, &request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        let mut builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h/", "api/login"), "http://h/api/login");
        assert_eq!(join_url("http://h", "/api/login"), "http://h/api/login");
        assert_eq!(join_url("http://h//", "//adduser"), "http://h/adduser");
    }

    #[test]
    fn test_request_paths_are_relative() {
        assert_eq!(ApiRequest::delete("/notes/N-1").path, "notes/N-1");
        assert_eq!(ApiRequest::get("api/userNotes").path, "api/userNotes");
    }

    #[test]
    fn test_response_message() {
        let response = ApiResponse::new(409, r#"{"success":false,"message":"Email taken"}"#);
        assert!(!response.is_success());
        assert_eq!(response.message().as_deref(), Some("Email taken"));
        assert!(ApiResponse::new(500, "<html>").message().is_none());
    }
}
