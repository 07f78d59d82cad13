use async_trait::async_trait;
use http::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

use super::errors::OAuth2Error;

/// Raw response from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP used to talk to the identity provider.
///
/// Transport failures are reported as [`OAuth2Error::Http`]; non-2xx responses
/// are returned as-is and judged by the caller.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST an `application/x-www-form-urlencoded` body.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, OAuth2Error>;

    /// GET with an `Authorization: Bearer` header.
    async fn get_with_bearer(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<HttpResponse, OAuth2Error>;
}

/// [`HttpClient`] backed by `reqwest`.
///
/// - `timeout`: 30 seconds, so a stalled provider cannot hang the request.
/// - `pool_idle_timeout`: 90 seconds.
/// - `pool_max_idle_per_host`: 32.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, OAuth2Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| OAuth2Error::Http(format!("Failed to create reqwest client: {e}")))?;
        Ok(Self { client })
    }

    async fn into_http_response(response: reqwest::Response) -> Result<HttpResponse, OAuth2Error> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::Http(e.to_string()))?;
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, OAuth2Error> {
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(|e| OAuth2Error::Http(e.to_string()))?;
        tracing::debug!("POST {} -> {}", url, response.status());
        Self::into_http_response(response).await
    }

    async fn get_with_bearer(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<HttpResponse, OAuth2Error> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuth2Error::Http(e.to_string()))?;
        tracing::debug!("GET {} -> {}", url, response.status());
        Self::into_http_response(response).await
    }
}
