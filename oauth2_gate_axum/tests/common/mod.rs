use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
    middleware::from_fn_with_state,
    routing::get,
};
use oauth2_gate::{
    HttpClient, HttpResponse, InMemorySessionStore, OAuth2Error, ProviderConfig, SessionStore,
};
use oauth2_gate_axum::{GateState, SESSION_COOKIE_NAME, login_required, oauth2_gate_router};
use tower::ServiceExt;

pub const AUTH_URL: &str = "https://accounts.example.com/o/oauth2/auth";
pub const TOKEN_URL: &str = "https://accounts.example.com/o/oauth2/token";
pub const USERINFO_URL: &str = "https://www.example.com/oauth2/v1/userinfo";

/// Provider stand-in that answers every token request with a fixed token and
/// every user-info request with the configured email.
#[derive(Clone)]
pub struct MockProvider {
    email: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockProvider {
    async fn post_form(
        &self,
        url: &str,
        _form: &[(&str, &str)],
    ) -> Result<HttpResponse, OAuth2Error> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(HttpResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: serde_json::json!({
                "access_token": "mock-access-token",
                "token_type": "Bearer",
                "expires_in": 3599
            })
            .to_string(),
        })
    }

    async fn get_with_bearer(
        &self,
        url: &str,
        _access_token: &str,
    ) -> Result<HttpResponse, OAuth2Error> {
        self.calls.lock().unwrap().push(url.to_string());
        Ok(HttpResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: serde_json::json!({ "id": "123456789", "email": self.email }).to_string(),
        })
    }
}

pub fn test_config() -> ProviderConfig {
    ProviderConfig::builder()
        .client_id("test-client-id")
        .client_secret("test-client-secret")
        .auth_url(AUTH_URL)
        .token_url(TOKEN_URL)
        .userinfo_url(USERINFO_URL)
        .allowed_domains(["example.com"])
        .build()
        .unwrap()
}

pub fn test_state(provider: &MockProvider) -> GateState {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    GateState::new(test_config(), provider.clone(), store)
}

/// `/` and `/restricted` behind the gate, plus the gate's own routes
pub fn test_app(state: GateState) -> Router {
    Router::new()
        .route("/", get(|| async { "HOME" }))
        .route("/restricted", get(|| async { "SECRET EATING." }))
        .route_layer(from_fn_with_state(state.clone(), login_required))
        .merge(oauth2_gate_router(state))
}

pub async fn send_get(app: &Router, uri: &str, session_id: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri).header(header::HOST, "localhost");
    if let Some(id) = session_id {
        request = request.header(
            header::COOKIE,
            format!("{}={}", SESSION_COOKIE_NAME.as_str(), id),
        );
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Session id issued through Set-Cookie, if any
pub fn issued_session_id(response: &Response<Body>) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE_NAME.as_str());
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix(&prefix))
        .and_then(|v| v.split(';').next())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn query_param(url: &str, name: &str) -> Option<String> {
    url::Url::parse(url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.to_string())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
