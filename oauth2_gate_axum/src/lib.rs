//! oauth2_gate_axum - Axum integration for oauth2_gate
//!
//! Provides the `login_required` middleware, the provider callback and logout
//! routes, cookie-backed sessions and an `OAuthUser` extractor.

mod config;
mod error;
mod middleware;
mod oauth2;
mod request;
mod router;
mod session;
mod state;

pub use config::{
    LOGOUT_PATH, O2G_ORIGIN, O2G_REDIRECT_AFTER_LOGOUT, SESSION_COOKIE_MAX_AGE,
    SESSION_COOKIE_NAME, SESSION_COOKIE_SECURE,
};
pub use middleware::login_required;
pub use router::oauth2_gate_router;
pub use session::OAuthUser;
pub use state::{AfterLogin, GateState};

pub use oauth2_gate::{ProviderConfig, UserDetails};
