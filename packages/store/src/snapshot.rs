//! # Persisted session snapshot: tolerant parse, canonical write
//!
//! The client has historically stored the login response verbatim, so two
//! shapes exist in the wild and both must be accepted on read:
//!
//! ```json
//! {"data": {"user": {"name": "Ada", "email": "ada@acme.test", "role": "ADMIN"},
//!           "token": "…", "tenantId": "t-1", "tenant": {"slug": "acme"}}}
//! ```
//!
//! ```json
//! {"name": "Ada", "email": "ada@acme.test", "role": "ADMIN"}
//! ```
//!
//! [`Session::from_json`] is the single place where either shape is turned into
//! a [`Session`]. Anything that does not yield at least a non-empty name and a
//! known role is rejected with a [`SnapshotError`]. The backend's login
//! response uses the nested shape too, so the API crate runs it through the
//! same parser.
//!
//! [`Session::to_json`] always writes the nested shape.

use serde::{Deserialize, Serialize};

use crate::models::{Role, Session, UnknownRole};

/// Why a stored snapshot could not be turned into a [`Session`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot has no user name and role")]
    MissingIdentity,
    #[error("snapshot has an empty user name")]
    EmptyName,
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawTenant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<RawUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tenant: Option<RawTenant>,
}

/// Superset of the nested and the flat layout.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    data: Option<RawEnvelope>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default)]
    tenant: Option<RawTenant>,
}

/// Canonical on-disk layout.
#[derive(Serialize)]
struct StoredSnapshot {
    data: RawEnvelope,
}

impl Session {
    /// Parse either accepted snapshot layout.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: RawSnapshot = serde_json::from_str(raw)?;

        let (user, token, tenant_id, tenant) = match snapshot.data {
            Some(RawEnvelope {
                user: Some(user),
                token,
                tenant_id,
                tenant,
            }) => (user, token, tenant_id, tenant),
            // Flat layout; tenant details may still sit on the envelope
            _ if snapshot.name.is_some() && snapshot.role.is_some() => (
                RawUser {
                    name: snapshot.name,
                    email: snapshot.email,
                    role: snapshot.role,
                },
                snapshot.token,
                snapshot.tenant_id,
                snapshot.tenant,
            ),
            _ => return Err(SnapshotError::MissingIdentity),
        };

        let (Some(name), Some(role)) = (user.name, user.role) else {
            return Err(SnapshotError::MissingIdentity);
        };
        if name.trim().is_empty() {
            return Err(SnapshotError::EmptyName);
        }
        let role: Role = role.parse()?;

        Ok(Session {
            user_name: name,
            email: user.email.filter(|e| !e.trim().is_empty()),
            role,
            tenant_id,
            tenant_slug: tenant.and_then(|t| t.slug).filter(|s| !s.trim().is_empty()),
            token,
        })
    }

    /// Serialise to the nested layout.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let stored = StoredSnapshot {
            data: RawEnvelope {
                user: Some(RawUser {
                    name: Some(self.user_name.clone()),
                    email: self.email.clone(),
                    role: Some(self.role.as_str().to_string()),
                }),
                token: self.token.clone(),
                tenant_id: self.tenant_id.clone(),
                tenant: self.tenant_slug.clone().map(|slug| RawTenant { slug: Some(slug) }),
            },
        };
        serde_json::to_string(&stored)
    }
}
