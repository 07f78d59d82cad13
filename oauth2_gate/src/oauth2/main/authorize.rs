use url::Url;

use crate::config::ProviderConfig;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::Redirect;
use crate::session::{OAUTH_STATE_KEY, Session};
use crate::utils::gen_random_string;

use super::utils::redirect_uri;

/// Start an authorization attempt.
///
/// Mints a fresh anti-forgery state, stores it in the session (replacing any
/// pending one) and returns the redirect to the provider's authorize endpoint.
pub async fn begin_authorization(
    request_url: &Url,
    config: &ProviderConfig,
    session: &dyn Session,
) -> Result<Redirect, OAuth2Error> {
    let callback_uri = redirect_uri(request_url, config.redirect_path())?;
    let state = gen_random_string(32)?;

    let auth_url = authorization_url(config, &callback_uri, &state);
    tracing::debug!("Auth URL: {}", auth_url);

    session.set(OAUTH_STATE_KEY, state).await?;

    Ok(Redirect::to(auth_url))
}

/// Authorize endpoint with the code-flow parameters appended to any query the
/// configured URL already carries.
pub(super) fn authorization_url(config: &ProviderConfig, callback_uri: &Url, state: &str) -> String {
    let mut url = config.auth_url().clone();
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", config.client_id())
        .append_pair("redirect_uri", callback_uri.as_str())
        .append_pair("scope", &config.scopes().join(" "))
        .append_pair("state", state);
    url.to_string()
}
