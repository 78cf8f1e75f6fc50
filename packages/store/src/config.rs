//! # Client configuration: `notes-client.toml`
//!
//! Defines the TOML configuration file that tells the client where the backend
//! lives and which storage key holds the session snapshot.
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! url = "https://notes.example.com/"   # endpoint root; paths are joined onto it
//!
//! [session]
//! key = "user"                          # storage slot of the session snapshot
//! ```
//!
//! ## Sources
//!
//! [`ClientConfig::load`] (native) layers defaults, the optional TOML file and
//! the environment (`NOTES_BACKEND_URL`, `NOTES_SESSION_KEY`; a `.env` file is
//! honoured). [`ClientConfig::for_web`] uses the `NOTES_BACKEND_URL` baked in at
//! compile time, since a browser has no process environment.
//!
//! All structs derive `Default`, so a missing or empty file is equivalent to
//! the default configuration.

use serde::{Deserialize, Serialize};

use crate::session_store::SESSION_KEY;

pub const BACKEND_URL_ENV: &str = "NOTES_BACKEND_URL";
pub const SESSION_KEY_ENV: &str = "NOTES_SESSION_KEY";

/// Top-level configuration stored in `notes-client.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Endpoint root every API path is joined onto.
    #[serde(default = "default_backend_url")]
    pub url: String,
}

/// Session section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_key")]
    pub key: String,
}

fn default_backend_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_session_key() -> String {
    SESSION_KEY.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key: default_session_key(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at the given backend.
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend: BackendConfig {
                url: backend_url.into(),
            },
            session: SessionConfig::default(),
        }
    }

    /// Builder method to set the session storage key.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session.key = key.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "notes-client.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply overrides from a variable lookup. Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.url = url.trim().to_string();
        }
        if let Some(key) = lookup(SESSION_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.session.key = key.trim().to_string();
        }
        self
    }

    /// Defaults, then `notes-client.toml` in the working directory, then the environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let from_file = match std::fs::read_to_string(Self::filename()) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid {}: {}", Self::filename(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        from_file.with_overrides(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by the compile-time backend URL.
    pub fn for_web() -> Self {
        Self::default().with_overrides(|name| match name {
            BACKEND_URL_ENV => option_env!("NOTES_BACKEND_URL").map(str::to_string),
            _ => None,
        })
    }
}
