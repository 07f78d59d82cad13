use url::Url;

use crate::config::ProviderConfig;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::{Redirect, Token};
use crate::session::{DEST_URL_KEY, OAUTH_EMAIL_KEY, OAUTH_TOKEN_KEY, Session};

use super::authorize::begin_authorization;

/// What the login gate decided for a request to a protected handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The session is authenticated; call the handler unchanged.
    Proceed,
    /// Send the user-agent to the provider instead of calling the handler.
    Redirect(Redirect),
}

/// True iff both `oauth_email` and `oauth_token` are present and non-empty.
pub async fn is_authenticated(session: &dyn Session) -> Result<bool, OAuth2Error> {
    let email = session.get(OAUTH_EMAIL_KEY).await?;
    if email.as_deref().is_none_or(str::is_empty) {
        return Ok(false);
    }
    let token = session.get(OAUTH_TOKEN_KEY).await?;
    Ok(token.as_deref().is_some_and(|t| !t.is_empty()))
}

/// Decide whether a request may reach a protected handler.
///
/// Authenticated sessions pass through with no side effects. Otherwise the full
/// request URL is saved as the destination and an authorization attempt is
/// started.
pub async fn check_login(
    request_url: &Url,
    config: &ProviderConfig,
    session: &dyn Session,
) -> Result<GateDecision, OAuth2Error> {
    if is_authenticated(session).await? {
        return Ok(GateDecision::Proceed);
    }

    tracing::debug!("Not authenticated, saving destination {}", request_url);
    session.set(DEST_URL_KEY, request_url.to_string()).await?;

    let redirect = begin_authorization(request_url, config, session).await?;
    Ok(GateDecision::Redirect(redirect))
}

/// Email of the signed-in user, if the session is authenticated.
pub async fn authenticated_email(session: &dyn Session) -> Result<Option<String>, OAuth2Error> {
    if !is_authenticated(session).await? {
        return Ok(None);
    }
    Ok(session.get(OAUTH_EMAIL_KEY).await?)
}

/// Token stored for the signed-in user.
pub async fn stored_token(session: &dyn Session) -> Result<Option<Token>, OAuth2Error> {
    let Some(token_json) = session.get(OAUTH_TOKEN_KEY).await? else {
        return Ok(None);
    };
    let token = serde_json::from_str(&token_json).map_err(|e| OAuth2Error::Serde(e.to_string()))?;
    Ok(Some(token))
}

/// Forget everything about the current user-agent.
pub async fn sign_out(session: &dyn Session) -> Result<(), OAuth2Error> {
    if let Some(email) = session.get(OAUTH_EMAIL_KEY).await? {
        tracing::info!("User {} signed out", email);
    }
    session.clear().await?;
    Ok(())
}
