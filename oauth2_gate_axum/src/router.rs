use axum::{Router, routing::get};

use super::config::LOGOUT_PATH;
use super::oauth2::{authorized, logout};
use super::state::GateState;

/// Routes owned by the gate: the provider callback at the configured redirect
/// path, and logout.
///
/// Merge it into the application next to the routes protected by
/// [`login_required`](crate::login_required).
pub fn oauth2_gate_router(state: GateState) -> Router {
    let callback_path = state.config.callback_path();
    tracing::debug!("Mounting OAuth2 callback at {}", callback_path);

    Router::new()
        .route(&callback_path, get(authorized))
        .route(LOGOUT_PATH, get(logout))
        .with_state(state)
}
