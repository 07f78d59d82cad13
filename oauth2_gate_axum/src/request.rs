use http::{HeaderMap, Uri, header::HOST};
use oauth2_gate::OAuth2Error;
use url::Url;

use super::config::O2G_ORIGIN;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Absolute URL of the incoming request, as the user-agent addressed it.
pub(crate) fn request_url(headers: &HeaderMap, uri: &Uri) -> Result<Url, OAuth2Error> {
    build_request_url(O2G_ORIGIN.as_ref(), headers, uri)
}

fn build_request_url(
    origin: Option<&Url>,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<Url, OAuth2Error> {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

    if let Some(origin) = origin {
        return origin
            .join(path_and_query)
            .map_err(|e| OAuth2Error::InvalidRequestUrl(e.to_string()));
    }

    // First hop wins when proxies append to the header
    let scheme = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or(uri.scheme_str())
        .unwrap_or("http");

    let host = uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| headers.get(HOST).and_then(|h| h.to_str().ok()))
        .filter(|h| !h.is_empty())
        .ok_or_else(|| OAuth2Error::InvalidRequestUrl("Missing host".to_string()))?;

    Url::parse(&format!("{scheme}://{host}{path_and_query}"))
        .map_err(|e| OAuth2Error::InvalidRequestUrl(e.to_string()))
}
