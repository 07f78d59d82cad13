use subtle::ConstantTimeEq;
use url::Url;

use crate::config::ProviderConfig;
use crate::oauth2::client::HttpClient;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::{AuthorizedUser, CallbackParams, UserDetails};
use crate::session::{DEST_URL_KEY, OAUTH_EMAIL_KEY, OAUTH_STATE_KEY, OAUTH_TOKEN_KEY, Session};

use super::provider::{exchange_code_for_token, fetch_user_details};
use super::utils::{email_is_allowed, redirect_uri};

/// Where the user lands when no destination was saved.
pub const DEFAULT_DESTINATION: &str = "/";

/// Handle the provider's redirect back to us.
///
/// Runs [`complete_authorization`], then hands the user details and the
/// destination to `on_success`, which builds the response. `on_success` is only
/// ever called after the session has been committed.
pub async fn handle_callback<F, R>(
    params: &CallbackParams,
    request_url: &Url,
    config: &ProviderConfig,
    client: &dyn HttpClient,
    session: &dyn Session,
    on_success: F,
) -> Result<R, OAuth2Error>
where
    F: FnOnce(UserDetails, String) -> R,
{
    let authorized = complete_authorization(params, request_url, config, client, session).await?;
    let destination = take_destination(session).await?;
    tracing::debug!("Redirecting {} to {}", authorized.user.email, destination);
    Ok(on_success(authorized.user, destination))
}

/// Verify the state, exchange the code, load the user, apply the domain policy
/// and mark the session as authenticated. Each step runs only if the previous
/// one succeeded; the state check happens before any network call.
pub async fn complete_authorization(
    params: &CallbackParams,
    request_url: &Url,
    config: &ProviderConfig,
    client: &dyn HttpClient,
    session: &dyn Session,
) -> Result<AuthorizedUser, OAuth2Error> {
    verify_state(params.state.as_deref(), session).await?;

    let code = params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| OAuth2Error::TokenExchange("Missing authorization code".to_string()))?;

    let callback_uri = redirect_uri(request_url, config.redirect_path())?;
    let token = exchange_code_for_token(client, config, code, &callback_uri).await?;
    let user = fetch_user_details(client, config, &token).await?;

    if !email_is_allowed(&user.email, config.allowed_domains()) {
        return Err(OAuth2Error::DomainNotAllowed(user.email));
    }

    let token_json = serde_json::to_string(&token).map_err(|e| OAuth2Error::Serde(e.to_string()))?;
    session.set(OAUTH_EMAIL_KEY, user.email.clone()).await?;
    session.set(OAUTH_TOKEN_KEY, token_json).await?;
    session.remove(OAUTH_STATE_KEY).await?;

    tracing::info!("User {} signed in", user.email);
    Ok(AuthorizedUser { user, token })
}

/// Compare the state echoed by the provider with the one stored at redirect
/// time. A missing or empty value on either side fails like a mismatch.
pub(super) async fn verify_state(
    stated_state: Option<&str>,
    session: &dyn Session,
) -> Result<(), OAuth2Error> {
    let known_state = session.get(OAUTH_STATE_KEY).await?;

    let (Some(known), Some(stated)) = (
        known_state.as_deref().filter(|s| !s.is_empty()),
        stated_state.filter(|s| !s.is_empty()),
    ) else {
        return Err(OAuth2Error::StateMissing);
    };

    if !bool::from(known.as_bytes().ct_eq(stated.as_bytes())) {
        return Err(OAuth2Error::StateMismatch);
    }
    Ok(())
}

/// Read and forget the saved destination, falling back to `/`.
pub async fn take_destination(session: &dyn Session) -> Result<String, OAuth2Error> {
    let destination = session
        .get(DEST_URL_KEY)
        .await?
        .filter(|d| !d.is_empty());
    match destination {
        Some(destination) => {
            session.remove(DEST_URL_KEY).await?;
            Ok(destination)
        }
        None => Ok(DEFAULT_DESTINATION.to_string()),
    }
}
