//! Identity provider configuration

use std::{env, fmt};

use thiserror::Error;
use url::Url;

/// Callback path used when no redirect path override is configured.
pub const DEFAULT_REDIRECT_PATH: &str = "/_oauth2/authorize";

/// Scope requested when none is configured.
pub const DEFAULT_SCOPE: &str = "email";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Immutable settings for the single identity provider the gate talks to.
///
/// Built once at startup through [`ProviderConfig::builder`] or
/// [`ProviderConfig::from_env`]; a missing client id, secret or endpoint is
/// reported there and never surfaces as a per-request error.
#[derive(Clone)]
pub struct ProviderConfig {
    client_id: String,
    client_secret: String,
    auth_url: Url,
    token_url: Url,
    userinfo_url: Url,
    redirect_path: Option<String>,
    allowed_domains: Vec<String>,
    scopes: Vec<String>,
}

impl ProviderConfig {
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::default()
    }

    /// Read the provider configuration from environment variables.
    ///
    /// Required: `OAUTH2_CLIENT_ID`, `OAUTH2_CLIENT_SECRET`, `OAUTH2_AUTH_URL`,
    /// `OAUTH2_TOKEN_URL`, `OAUTH2_USERINFO_URL`.
    /// Optional: `OAUTH2_REDIRECT_PATH`, `OAUTH2_ALLOWED_DOMAINS` (comma separated),
    /// `OAUTH2_SCOPE` (space or comma separated).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(v) = env::var("OAUTH2_CLIENT_ID") {
            builder = builder.client_id(v);
        }
        if let Ok(v) = env::var("OAUTH2_CLIENT_SECRET") {
            builder = builder.client_secret(v);
        }
        if let Ok(v) = env::var("OAUTH2_AUTH_URL") {
            builder = builder.auth_url(v);
        }
        if let Ok(v) = env::var("OAUTH2_TOKEN_URL") {
            builder = builder.token_url(v);
        }
        if let Ok(v) = env::var("OAUTH2_USERINFO_URL") {
            builder = builder.userinfo_url(v);
        }
        if let Ok(v) = env::var("OAUTH2_REDIRECT_PATH") {
            builder = builder.redirect_path(v);
        }
        if let Ok(v) = env::var("OAUTH2_ALLOWED_DOMAINS") {
            builder = builder.allowed_domains(split_list(&v));
        }
        if let Ok(v) = env::var("OAUTH2_SCOPE") {
            builder = builder.scopes(split_list(&v));
        }
        builder.build()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub fn userinfo_url(&self) -> &Url {
        &self.userinfo_url
    }

    /// The configured redirect path, or [`DEFAULT_REDIRECT_PATH`].
    pub fn redirect_path(&self) -> &str {
        self.redirect_path
            .as_deref()
            .unwrap_or(DEFAULT_REDIRECT_PATH)
    }

    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Local route path the callback handler should be mounted on.
    ///
    /// The redirect path may be a path or an absolute URL; either way only its
    /// path component is routable.
    pub fn callback_path(&self) -> String {
        let path = self.redirect_path();
        if path.starts_with('/') {
            return path.split(['?', '#']).next().unwrap_or(path).to_string();
        }
        match Url::parse(path) {
            Ok(url) => url.path().to_string(),
            Err(_) => format!("/{}", path.split(['?', '#']).next().unwrap_or(path)),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("userinfo_url", &self.userinfo_url.as_str())
            .field("redirect_path", &self.redirect_path)
            .field("allowed_domains", &self.allowed_domains)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProviderConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    auth_url: Option<String>,
    token_url: Option<String>,
    userinfo_url: Option<String>,
    redirect_path: Option<String>,
    allowed_domains: Vec<String>,
    scopes: Vec<String>,
}

impl ProviderConfigBuilder {
    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    pub fn client_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secret = Some(value.into());
        self
    }

    pub fn auth_url(mut self, value: impl Into<String>) -> Self {
        self.auth_url = Some(value.into());
        self
    }

    pub fn token_url(mut self, value: impl Into<String>) -> Self {
        self.token_url = Some(value.into());
        self
    }

    pub fn userinfo_url(mut self, value: impl Into<String>) -> Self {
        self.userinfo_url = Some(value.into());
        self
    }

    pub fn redirect_path(mut self, value: impl Into<String>) -> Self {
        self.redirect_path = Some(value.into());
        self
    }

    pub fn allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<ProviderConfig, ConfigError> {
        let client_id = required(self.client_id, "client id")?;
        let client_secret = required(self.client_secret, "client secret")?;
        let auth_url = parse_url(required(self.auth_url, "authorize URL")?, "authorize URL")?;
        let token_url = parse_url(required(self.token_url, "token URL")?, "token URL")?;
        let userinfo_url = parse_url(
            required(self.userinfo_url, "user-info URL")?,
            "user-info URL",
        )?;

        let redirect_path = self
            .redirect_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let allowed_domains = self
            .allowed_domains
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        let mut scopes: Vec<String> = self
            .scopes
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if scopes.is_empty() {
            scopes.push(DEFAULT_SCOPE.to_string());
        }

        Ok(ProviderConfig {
            client_id,
            client_secret,
            auth_url,
            token_url,
            userinfo_url,
            redirect_path,
            allowed_domains,
            scopes,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parse_url(value: String, name: &'static str) -> Result<Url, ConfigError> {
    let url = Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
