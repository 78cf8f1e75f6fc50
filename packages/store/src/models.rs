//! # Session identity model
//!
//! Defines the record the client keeps about the currently authenticated user.
//! A [`Session`] is either present with at least a display name and a [`Role`],
//! or absent altogether; partially populated records never leave the parser in
//! [`crate::snapshot`].
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Role`] | The tenant role of the user. Serialised as `"MEMBER"` / `"ADMIN"`, exactly as the backend sends it. |
//! | [`Session`] | The signed-in identity: name, optional email, role, optional tenant id/slug and an optional bearer token. |
//!
//! Sessions are never patched in place: a login produces a new value that
//! overwrites the stored one wholesale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of a user inside their tenant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "MEMBER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is neither `"MEMBER"` nor `"ADMIN"`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEMBER" => Ok(Role::Member),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The locally held record of the authenticated identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Display name: "Ada Lovelace"
    pub user_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub tenant_id: Option<String>,
    /// Tenant slug used for plan management: Some("acme")
    pub tenant_slug: Option<String>,
    /// Bearer token handed out at login. Notes calls rely on cookies instead.
    pub token: Option<String>,
}

impl Session {
    /// Create a session with the two mandatory fields.
    pub fn new(user_name: impl Into<String>, role: Role) -> Self {
        Self {
            user_name: user_name.into(),
            email: None,
            role,
            tenant_id: None,
            tenant_slug: None,
            token: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tenant(mut self, id: Option<String>, slug: Option<String>) -> Self {
        self.tenant_id = id;
        self.tenant_slug = slug;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Name to greet the user with, falling back to their email.
    pub fn display_name(&self) -> &str {
        if self.user_name.trim().is_empty() {
            self.email.as_deref().unwrap_or(&self.user_name)
        } else {
            &self.user_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("MEMBER".parse::<Role>(), Ok(Role::Member));
        assert!("admin".parse::<Role>().is_err());
        assert!("OWNER".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "ADMIN");
    }

    #[test]
    fn test_builder() {
        let session = Session::new("Ada", Role::Admin)
            .with_email("ada@acme.test")
            .with_tenant(Some("t-1".into()), Some("acme".into()))
            .with_token("tok");
        assert!(session.is_admin());
        assert_eq!(session.email.as_deref(), Some("ada@acme.test"));
        assert_eq!(session.tenant_slug.as_deref(), Some("acme"));
        assert_eq!(session.display_name(), "Ada");
    }
}
