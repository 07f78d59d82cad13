use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, Uri};
use oauth2_gate::{GateDecision, OAuth2Error, check_login};

use super::error::IntoResponseError;
use super::request::request_url;
use super::session::CookieSession;
use super::state::{GateState, found};

/// Login gate for protected routes
///
/// Authenticated requests reach the handler unchanged. Anyone else is sent to
/// the provider with a 302, after the full request URL has been saved so the
/// callback can bring them back to it.
///
/// ```no_run
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use oauth2_gate_axum::{GateState, login_required};
///
/// fn app(state: GateState) -> Router {
///     Router::new()
///         .route("/restricted", get(|| async { "secret" }))
///         .route_layer(from_fn_with_state(state, login_required))
/// }
/// ```
pub async fn login_required(State(state): State<GateState>, req: Request, next: Next) -> Response {
    let decision = gate(&state, req.headers(), req.uri()).await;
    match decision.into_response_error() {
        Ok(None) => next.run(req).await,
        Ok(Some(response)) => response,
        Err(rejection) => rejection.into_response(),
    }
}

async fn gate(
    state: &GateState,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<Option<Response>, OAuth2Error> {
    let url = request_url(headers, uri)?;
    let session = CookieSession::from_headers(headers, state)?;

    match check_login(&url, &state.config, session.session()).await? {
        GateDecision::Proceed => Ok(None),
        GateDecision::Redirect(redirect) => {
            tracing::debug!("Redirecting anonymous request for {} to provider", url);
            Ok(Some(session.attach_cookie(found(redirect.location()))))
        }
    }
}
