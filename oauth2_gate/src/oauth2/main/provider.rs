use url::Url;

use crate::config::ProviderConfig;
use crate::oauth2::client::HttpClient;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::{Token, UserDetails};

use super::utils::parse_token_response;

pub(super) async fn exchange_code_for_token(
    client: &dyn HttpClient,
    config: &ProviderConfig,
    code: &str,
    redirect_uri: &Url,
) -> Result<Token, OAuth2Error> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri.as_str()),
        ("client_id", config.client_id()),
        ("client_secret", config.client_secret()),
    ];

    let response = client
        .post_form(config.token_url().as_str(), &form)
        .await
        .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

    if !response.is_success() {
        tracing::debug!("Token Exchange Response: {:#?}", response);
        return Err(OAuth2Error::TokenExchange(format!(
            "Token endpoint returned status {}",
            response.status
        )));
    }

    let token = parse_token_response(&response)?;
    tracing::debug!(
        "Token received: type={}, expires_in={:?}",
        token.token_type,
        token.expires_in
    );
    Ok(token)
}

pub(super) async fn fetch_user_details(
    client: &dyn HttpClient,
    config: &ProviderConfig,
    token: &Token,
) -> Result<UserDetails, OAuth2Error> {
    let response = client
        .get_with_bearer(config.userinfo_url().as_str(), &token.access_token)
        .await
        .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

    if !response.is_success() {
        tracing::debug!("User Info Response: {:#?}", response);
        return Err(OAuth2Error::FetchUserInfo(format!(
            "User-info endpoint returned status {}",
            response.status
        )));
    }

    let user: UserDetails = serde_json::from_str(&response.body).map_err(|e| {
        OAuth2Error::FetchUserInfo(format!("Failed to deserialize response body: {e}"))
    })?;

    if user.email.trim().is_empty() {
        return Err(OAuth2Error::FetchUserInfo(
            "Empty email in user info".to_string(),
        ));
    }

    tracing::debug!("User data: {:#?}", user);
    Ok(user)
}
