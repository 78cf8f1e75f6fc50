//! Session context for the UI.
//!
//! [`SessionProvider`] reads the client configuration and the persisted
//! session once, builds the HTTP transport the whole app shares (its cookie
//! jar is the backend session), and exposes both as `Signal<SessionState>`.
//! Screens go through [`SessionState::authorize`] and the [`sign_in`] /
//! [`sign_out`] helpers; nothing else touches the platform storage.

use api::{ApiError, AuthClient, ReqwestTransport};
use dioxus::prelude::*;
use store::{ClientConfig, Role, Session, SessionStore};
use tracing::{error, info, warn};

use crate::gate::{AuthGate, Destination, GateDecision};

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = store::FileStorage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStorage = store::LocalStorage;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type PlatformStorage = store::MemoryStorage;

/// Create the platform session store.
///
/// - **Web** (WASM + `web` feature): `window.localStorage`
/// - **Desktop** (native): `<data_dir>/tenant-notes/<key>.json`
pub fn make_session_store(config: &ClientConfig) -> SessionStore<PlatformStorage> {
    #[cfg(not(target_arch = "wasm32"))]
    let storage = {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("tenant-notes");
        store::FileStorage::new(base)
    };
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    let storage = store::LocalStorage::new();
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    let storage = store::MemoryStorage::new();

    SessionStore::with_key(storage, config.session.key.clone())
}

fn platform_config() -> ClientConfig {
    #[cfg(not(target_arch = "wasm32"))]
    {
        ClientConfig::load()
    }
    #[cfg(target_arch = "wasm32")]
    {
        ClientConfig::for_web()
    }
}

#[derive(Clone, Debug)]
pub struct SessionState {
    /// Last session read from or written to the store.
    pub session: Option<Session>,
    pub config: ClientConfig,
    transport: ReqwestTransport,
}

impl SessionState {
    /// Load configuration and the persisted session, and build the transport.
    pub fn init() -> Result<Self, ApiError> {
        let config = platform_config();
        let transport = ReqwestTransport::from_config(&config).map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            e
        })?;
        let session = make_session_store(&config).load();
        info!(
            "Backend at {}, {}",
            config.backend.url,
            if session.is_some() { "signed in" } else { "signed out" }
        );
        Ok(Self {
            session,
            config,
            transport,
        })
    }

    pub fn store(&self) -> SessionStore<PlatformStorage> {
        make_session_store(&self.config)
    }

    /// The shared transport. Clones share one cookie jar.
    pub fn transport(&self) -> ReqwestTransport {
        self.transport.clone()
    }

    /// Screen-entry check against the persisted session.
    pub fn authorize(&self, required: Option<Role>) -> GateDecision {
        AuthGate::new(&self.store()).authorize(required)
    }

    pub fn authorize_guest(&self) -> Option<Destination> {
        AuthGate::new(&self.store()).authorize_guest()
    }
}

impl PartialEq for SessionState {
    fn eq(&self, other: &Self) -> bool {
        self.session == other.session && self.config == other.config
    }
}

/// Persist a fresh login and publish it.
pub fn sign_in(mut state: Signal<SessionState>, session: Session) {
    if let Err(e) = state.peek().store().save(&session) {
        warn!("Failed to persist session: {}", e);
    }
    state.write().session = Some(session);
}

/// Forget the session locally and tell the backend, best-effort.
pub fn sign_out(mut state: Signal<SessionState>) {
    let (store, transport) = {
        let current = state.peek();
        (current.store(), current.transport())
    };
    if let Err(e) = store.clear() {
        warn!("Failed to clear session: {}", e);
    }
    state.write().session = None;

    spawn(async move {
        AuthClient::new(transport).logout().await;
    });
}

/// Get the session state provided by [`SessionProvider`].
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Wrap the app with this component to load the session once.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let init = use_hook(SessionState::init);

    match init {
        Ok(state) => rsx! {
            SessionScope { state, {children} }
        },
        Err(e) => rsx! {
            div { class: "view-page",
                h1 { class: "view-title", "Cannot start" }
                p { class: "view-error", "{e}" }
            }
        },
    }
}

#[component]
fn SessionScope(state: SessionState, children: Element) -> Element {
    use_context_provider(|| Signal::new(state));

    rsx! {
        {children}
    }
}
