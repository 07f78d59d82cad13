use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use http::{StatusCode, header::LOCATION};
use oauth2_gate::{
    HttpClient, ProviderConfig, ReqwestClient, SessionStore, UserDetails, session_store_from_env,
};

/// Builds the response sent after a successful login, given the user and the
/// destination URL that was saved when the gate challenged them.
pub type AfterLogin = Arc<dyn Fn(UserDetails, String) -> Response + Send + Sync>;

/// Everything the gate's middleware and handlers need, shared across requests.
#[derive(Clone)]
pub struct GateState {
    pub(crate) config: Arc<ProviderConfig>,
    pub(crate) client: Arc<dyn HttpClient>,
    pub(crate) store: Arc<dyn SessionStore>,
    pub(crate) after_login: AfterLogin,
}

impl GateState {
    pub fn new(
        config: ProviderConfig,
        client: impl HttpClient + 'static,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            store,
            after_login: Arc::new(|_, destination| found(&destination)),
        }
    }

    /// Provider settings from `OAUTH2_*`, the session store from
    /// `O2G_SESSION_STORE_*` and a reqwest-backed provider client.
    pub async fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ProviderConfig::from_env()?;
        let client = ReqwestClient::new()?;
        let store = session_store_from_env().await?;
        tracing::info!("Login gate configured: {:?}", config);
        Ok(Self::new(config, client, store))
    }

    /// Replace the default post-login response (a 302 to the destination).
    pub fn with_after_login<F>(mut self, after_login: F) -> Self
    where
        F: Fn(UserDetails, String) -> Response + Send + Sync + 'static,
    {
        self.after_login = Arc::new(after_login);
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        self.store.clone()
    }
}

impl std::fmt::Debug for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
