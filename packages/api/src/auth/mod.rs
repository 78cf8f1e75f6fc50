//! Authentication against the backend's cookie session.

mod login;

pub use login::AuthClient;
