use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    response::Response,
};
use headers::HeaderMapExt;
use http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE, request::Parts};
use oauth2_gate::{
    OAUTH_EMAIL_KEY, OAUTH_TOKEN_KEY, OAuth2Error, Session, StoredSession, Token,
    authenticated_email, is_valid_session_id, new_session_id, stored_token,
};

use super::config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SESSION_COOKIE_SECURE};
use super::error::IntoResponseError;
use super::state::GateState;

/// Session id carried by the request's cookie, if it has a valid shape.
pub(crate) fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie = headers.typed_get::<headers::Cookie>()?;
    let id = cookie.get(SESSION_COOKIE_NAME.as_str())?;
    if !is_valid_session_id(id) {
        tracing::debug!("Ignoring malformed session cookie");
        return None;
    }
    Some(id.to_string())
}

/// The server-side session of one user-agent, identified by a cookie.
pub(crate) struct CookieSession {
    inner: StoredSession,
    is_new: bool,
}

impl CookieSession {
    /// Attach to the session named by the cookie, or start a new one.
    pub(crate) fn from_headers(headers: &HeaderMap, state: &GateState) -> Result<Self, OAuth2Error> {
        let (id, is_new) = match session_id_from_headers(headers) {
            Some(id) => (id, false),
            None => (new_session_id()?, true),
        };
        Ok(Self {
            inner: StoredSession::new(state.store.clone(), id, *SESSION_COOKIE_MAX_AGE),
            is_new,
        })
    }

    pub(crate) fn session(&self) -> &StoredSession {
        &self.inner
    }

    pub(crate) fn is_new(&self) -> bool {
        self.is_new
    }

    /// Move the signed-in user onto a freshly minted session id and drop the
    /// old session, so an id handed out before login never carries the login.
    pub(crate) async fn renew(self, state: &GateState) -> Result<Self, OAuth2Error> {
        let renewed = StoredSession::new(
            state.store.clone(),
            new_session_id()?,
            *SESSION_COOKIE_MAX_AGE,
        );
        for key in [OAUTH_EMAIL_KEY, OAUTH_TOKEN_KEY] {
            if let Some(value) = self.inner.get(key).await? {
                renewed.set(key, value).await?;
            }
        }
        self.inner.clear().await?;
        tracing::debug!("Session renewed after login");
        Ok(Self {
            inner: renewed,
            is_new: true,
        })
    }

    /// Issue the cookie if the user-agent does not hold it yet.
    pub(crate) fn attach_cookie(&self, mut response: Response) -> Response {
        if !self.is_new {
            return response;
        }
        let cookie = set_cookie_value(self.inner.id(), *SESSION_COOKIE_MAX_AGE);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!("Failed to build session cookie: {}", e),
        }
        response
    }

    /// Tell the user-agent to drop the cookie.
    pub(crate) fn expire_cookie(&self, mut response: Response) -> Response {
        if let Ok(value) = HeaderValue::from_str(&set_cookie_value("", 0)) {
            response.headers_mut().append(SET_COOKIE, value);
        }
        response
    }
}

fn set_cookie_value(value: &str, max_age: u64) -> String {
    let secure = if *SESSION_COOKIE_SECURE { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Lax{}; Path=/; Max-Age={}",
        SESSION_COOKIE_NAME.as_str(),
        value,
        secure,
        max_age
    )
}

/// Signed-in user, available as an Axum extractor
///
/// Rejects with 401 when the request carries no authenticated session. Use
/// `Option<OAuthUser>` on routes that also serve anonymous visitors.
///
/// # Example
///
/// ```no_run
/// use oauth2_gate_axum::OAuthUser;
///
/// async fn whoami(user: OAuthUser) -> String {
///     format!("Signed in as {}", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OAuthUser {
    pub email: String,
    pub token: Option<Token>,
}

async fn load_user(parts: &Parts, state: &GateState) -> Result<Option<OAuthUser>, OAuth2Error> {
    let Some(id) = session_id_from_headers(&parts.headers) else {
        return Ok(None);
    };
    let session = StoredSession::new(state.store.clone(), id, *SESSION_COOKIE_MAX_AGE);
    let Some(email) = authenticated_email(&session).await? else {
        return Ok(None);
    };
    let token = stored_token(&session).await?;
    Ok(Some(OAuthUser { email, token }))
}

impl<S> FromRequestParts<S> for OAuthUser
where
    GateState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = GateState::from_ref(state);
        load_user(parts, &state)
            .await
            .into_response_error()?
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
    }
}

impl<S> OptionalFromRequestParts<S> for OAuthUser
where
    GateState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let state = GateState::from_ref(state);
        load_user(parts, &state).await.into_response_error()
    }
}
