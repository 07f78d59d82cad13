use axum::{
    extract::{Query, State},
    response::Response,
};
use http::{HeaderMap, StatusCode, Uri};
use oauth2_gate::{CallbackParams, handle_callback, sign_out};

use super::config::O2G_REDIRECT_AFTER_LOGOUT;
use super::error::IntoResponseError;
use super::request::request_url;
use super::session::CookieSession;
use super::state::{GateState, found};

/// Provider redirect target: finishes the login, moves it onto a new session
/// id and sends the user back to where the gate stopped them.
pub(crate) async fn authorized(
    State(state): State<GateState>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, (StatusCode, String)> {
    let url = request_url(&headers, &uri).into_response_error()?;
    let session = CookieSession::from_headers(&headers, &state).into_response_error()?;

    let after_login = state.after_login.clone();
    let response = handle_callback(
        &params,
        &url,
        &state.config,
        state.client.as_ref(),
        session.session(),
        |user, destination| after_login(user, destination),
    )
    .await
    .into_response_error()?;

    let session = session.renew(&state).await.into_response_error()?;
    Ok(session.attach_cookie(response))
}

pub(crate) async fn logout(
    State(state): State<GateState>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let session = CookieSession::from_headers(&headers, &state).into_response_error()?;
    if !session.is_new() {
        sign_out(session.session()).await.into_response_error()?;
    }
    Ok(session.expire_cookie(found(O2G_REDIRECT_AFTER_LOGOUT.as_str())))
}
