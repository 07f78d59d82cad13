//! Web-layer settings read from the environment

use std::sync::LazyLock;

use url::Url;

/// Route that clears the session
pub const LOGOUT_PATH: &str = "/_oauth2/logout";

// "__Host-" prefix makes the cookie host-only; it requires the Secure attribute.
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    let name = std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("__Host-SessionId".to_string());
    cookie_name_for(name, *SESSION_COOKIE_SECURE)
});

/// Upper bound browsers apply to a cookie's lifetime (400 days)
const MAX_COOKIE_MAX_AGE: u64 = 400 * 24 * 60 * 60;

pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> =
    LazyLock::new(|| parse_max_age(std::env::var("SESSION_COOKIE_MAX_AGE").ok().as_deref()));

pub static SESSION_COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_SECURE")
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or(true)
});

/// Public origin of the application (`scheme://host[:port]`), used instead of
/// the Host header when rebuilding request URLs behind a proxy.
pub static O2G_ORIGIN: LazyLock<Option<Url>> = LazyLock::new(|| {
    std::env::var("O2G_ORIGIN").ok().and_then(|origin| {
        Url::parse(&origin)
            .inspect_err(|e| tracing::error!("Ignoring invalid O2G_ORIGIN '{}': {}", origin, e))
            .ok()
    })
});

/// Where `/_oauth2/logout` sends the user-agent afterwards
pub static O2G_REDIRECT_AFTER_LOGOUT: LazyLock<String> = LazyLock::new(|| {
    std::env::var("O2G_REDIRECT_AFTER_LOGOUT").unwrap_or_else(|_| "/".to_string())
});

fn parse_max_age(value: Option<&str>) -> u64 {
    value
        .and_then(|s| s.parse().ok())
        .unwrap_or(3600) // Default to 1 hour if not set or invalid
        .min(MAX_COOKIE_MAX_AGE)
}

/// Prefixed cookie names are rejected by browsers without the Secure attribute.
fn cookie_name_for(name: String, secure: bool) -> String {
    if secure {
        return name;
    }
    for prefix in ["__Host-", "__Secure-"] {
        if let Some(stripped) = name.strip_prefix(prefix) {
            tracing::warn!(
                "SESSION_COOKIE_SECURE is false, using cookie name '{}' instead of '{}'",
                stripped,
                name
            );
            return stripped.to_string();
        }
    }
    name
}
