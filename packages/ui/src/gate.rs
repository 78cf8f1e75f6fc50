//! # Screen-entry authorization
//!
//! Every protected screen asks [`AuthGate::authorize`] before it renders or
//! fires a request. The decision is a pure function of the stored session and
//! the role the screen needs ([`decide`]), so it can be tested without a DOM.
//!
//! | Session | Required role | Outcome |
//! |---------|---------------|---------|
//! | absent or malformed | any | redirect to login |
//! | MEMBER | ADMIN | redirect to the member dashboard |
//! | present | none, or satisfied | allow, with the session |

use api::ApiError;
use store::{Role, Session, SessionStorage, SessionStore};
use tracing::{info, warn};

/// Where a redirect sends the visitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Login,
    Dashboard,
    AdminDashboard,
    AddMember,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow(Session),
    RedirectTo(Destination),
}

impl GateDecision {
    pub fn session(&self) -> Option<&Session> {
        match self {
            GateDecision::Allow(session) => Some(session),
            GateDecision::RedirectTo(_) => None,
        }
    }
}

/// The dashboard a user lands on after login.
pub fn home_for(role: Role) -> Destination {
    match role {
        Role::Admin => Destination::AdminDashboard,
        Role::Member => Destination::Dashboard,
    }
}

pub fn decide(session: Option<&Session>, required: Option<Role>) -> GateDecision {
    let Some(session) = session else {
        return GateDecision::RedirectTo(Destination::Login);
    };
    match required {
        Some(Role::Admin) if !session.is_admin() => {
            GateDecision::RedirectTo(Destination::Dashboard)
        }
        _ => GateDecision::Allow(session.clone()),
    }
}

pub struct AuthGate<'a, S: SessionStorage> {
    store: &'a SessionStore<S>,
}

impl<'a, S: SessionStorage> AuthGate<'a, S> {
    pub fn new(store: &'a SessionStore<S>) -> Self {
        Self { store }
    }

    /// Decide whether the current visitor may enter a screen needing `required`.
    pub fn authorize(&self, required: Option<Role>) -> GateDecision {
        decide(self.store.load().as_ref(), required)
    }

    /// Gate for the login screen: signed-in visitors go to their dashboard.
    /// `None` lets the visitor in.
    pub fn authorize_guest(&self) -> Option<Destination> {
        self.store.load().map(|session| home_for(session.role))
    }

    /// Turn an API error into the redirect it calls for, if any.
    ///
    /// An [`ApiError::Auth`] also erases the stored session.
    pub fn resolve_error(&self, err: &ApiError) -> Option<Destination> {
        match err {
            ApiError::Auth(_) => {
                info!("Session rejected, signing out: {}", err);
                if let Err(e) = self.store.clear() {
                    warn!("Failed to clear session: {}", e);
                }
                Some(Destination::Login)
            }
            ApiError::Authorization(_) => Some(Destination::Dashboard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStorage;

    fn store_with(session: Option<Session>) -> SessionStore<MemoryStorage> {
        let store = SessionStore::new(MemoryStorage::new());
        if let Some(session) = session {
            store.save(&session).unwrap();
        }
        store
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        let store = store_with(None);
        let gate = AuthGate::new(&store);
        for required in [None, Some(Role::Member), Some(Role::Admin)] {
            assert_eq!(
                gate.authorize(required),
                GateDecision::RedirectTo(Destination::Login)
            );
        }
    }

    #[test]
    fn test_members_never_pass_admin_gate() {
        let store = store_with(Some(Session::new("Ada", Role::Member)));
        let gate = AuthGate::new(&store);
        assert_eq!(
            gate.authorize(Some(Role::Admin)),
            GateDecision::RedirectTo(Destination::Dashboard)
        );
        let allowed = gate.authorize(None);
        assert_eq!(allowed.session().unwrap().user_name, "Ada");
    }

    #[test]
    fn test_admin_passes_every_gate() {
        let store = store_with(Some(Session::new("Root", Role::Admin)));
        let gate = AuthGate::new(&store);
        assert!(gate.authorize(Some(Role::Admin)).session().is_some());
        assert!(gate.authorize(Some(Role::Member)).session().is_some());
    }

    #[test]
    fn test_malformed_snapshot_redirects_and_heals() {
        let storage = MemoryStorage::new();
        storage.write("user", r#"{"name":"Ada","role":"OWNER"}"#).unwrap();
        let store = SessionStore::new(storage.clone());

        let gate = AuthGate::new(&store);
        assert_eq!(gate.authorize(None), GateDecision::RedirectTo(Destination::Login));
        assert_eq!(storage.read("user").unwrap(), None);
    }

    #[test]
    fn test_home_depends_on_role() {
        assert_eq!(home_for(Role::Admin), Destination::AdminDashboard);
        assert_eq!(home_for(Role::Member), Destination::Dashboard);

        let store = store_with(Some(Session::new("Root", Role::Admin)));
        assert_eq!(
            AuthGate::new(&store).authorize_guest(),
            Some(Destination::AdminDashboard)
        );
        assert_eq!(AuthGate::new(&store_with(None)).authorize_guest(), None);
    }

    #[test]
    fn test_resolve_error() {
        let store = store_with(Some(Session::new("Ada", Role::Member)));
        let gate = AuthGate::new(&store);

        assert_eq!(
            gate.resolve_error(&ApiError::Authorization("no".into())),
            Some(Destination::Dashboard)
        );
        assert!(store.is_signed_in());
        assert_eq!(gate.resolve_error(&ApiError::Network("down".into())), None);

        assert_eq!(
            gate.resolve_error(&ApiError::Auth("expired".into())),
            Some(Destination::Login)
        );
        assert!(!store.is_signed_in());
    }
}
