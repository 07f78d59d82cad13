use chrono::Utc;
use serde_json::{Map, Value};
use url::Url;

use crate::oauth2::client::HttpResponse;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::Token;

/// Join the host root of `request_url` with `redirect_path`.
///
/// A path is resolved against the root (`http://host/`), an absolute URL
/// replaces it entirely.
pub fn redirect_uri(request_url: &Url, redirect_path: &str) -> Result<Url, OAuth2Error> {
    let mut root = request_url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root.join(redirect_path)
        .map_err(|e| OAuth2Error::InvalidRequestUrl(format!("{redirect_path}: {e}")))
}

/// Check an email address against the allowed domains.
///
/// An empty list allows every address. Otherwise the part after the last `@`
/// must equal an allowed domain or be a subdomain of it. Comparison ignores
/// ASCII case and a leading `@` on the configured domain.
pub fn email_is_allowed(email: &str, allowed_domains: &[String]) -> bool {
    if allowed_domains.is_empty() {
        return true;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let domain = domain.to_ascii_lowercase();

    allowed_domains.iter().any(|allowed| {
        let allowed = allowed.trim().trim_start_matches('@').to_ascii_lowercase();
        if allowed.is_empty() {
            return false;
        }
        domain == allowed
            || domain
                .strip_suffix(allowed.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Parse a token endpoint response body.
///
/// JSON is the norm; some providers answer `application/x-www-form-urlencoded`
/// (or `text/plain` with a form body), which is accepted too.
pub(super) fn parse_token_response(response: &HttpResponse) -> Result<Token, OAuth2Error> {
    let is_json = response
        .content_type
        .as_deref()
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false)
        || response.body.trim_start().starts_with('{');

    let mut token: Token = if is_json {
        serde_json::from_str(&response.body)
            .map_err(|e| OAuth2Error::TokenExchange(format!("Malformed token body: {e}")))?
    } else {
        let fields: Map<String, Value> = url::form_urlencoded::parse(response.body.as_bytes())
            .map(|(k, v)| {
                let value = match k.as_ref() {
                    "expires_in" => v
                        .parse::<u64>()
                        .map(Value::from)
                        .unwrap_or_else(|_| Value::String(v.to_string())),
                    _ => Value::String(v.to_string()),
                };
                (k.to_string(), value)
            })
            .collect();
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| OAuth2Error::TokenExchange(format!("Malformed token body: {e}")))?
    };

    if token.access_token.is_empty() {
        return Err(OAuth2Error::TokenExchange(
            "Empty access token in response".to_string(),
        ));
    }

    if token.expires_at.is_none() {
        // Out-of-range lifetimes leave the expiry unknown
        token.expires_at = token
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| Utc::now().timestamp().checked_add(secs));
    }

    Ok(token)
}
