//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use crate::oauth2::{HttpClient, HttpResponse, OAuth2Error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecordedRequest {
    PostForm {
        url: String,
        form: Vec<(String, String)>,
    },
    GetWithBearer {
        url: String,
        access_token: String,
    },
}

#[derive(Clone)]
enum Reply {
    Response(HttpResponse),
    TransportError,
}

/// Provider double: answers token and user-info calls with canned responses and
/// records every request it sees.
#[derive(Clone)]
pub(crate) struct MockHttpClient {
    token_reply: Reply,
    userinfo_reply: Reply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("application/json".to_string()),
        body: body.to_string(),
    }
}

impl MockHttpClient {
    /// A provider that issues a token and reports `email` as the user.
    pub(crate) fn successful(email: &str) -> Self {
        let token = json!({
            "access_token": "mock-access-token",
            "token_type": "Bearer",
            "expires_in": 3599,
            "scope": "email",
            "id_token": "mock.id.token"
        });
        let user = json!({
            "id": "123456789",
            "email": email,
            "verified_email": true,
            "name": "Test User"
        });
        Self {
            token_reply: Reply::Response(json_response(200, &token.to_string())),
            userinfo_reply: Reply::Response(json_response(200, &user.to_string())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_token_response(mut self, status: u16, body: &str) -> Self {
        self.token_reply = Reply::Response(json_response(status, body));
        self
    }

    pub(crate) fn with_token_transport_error(mut self) -> Self {
        self.token_reply = Reply::TransportError;
        self
    }

    pub(crate) fn with_userinfo_response(mut self, status: u16, body: &str) -> Self {
        self.userinfo_reply = Reply::Response(json_response(status, body));
        self
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mutex poisoned").clone()
    }

    fn record(&self, request: RecordedRequest) {
        self.requests.lock().expect("mutex poisoned").push(request);
    }

    fn reply(reply: &Reply) -> Result<HttpResponse, OAuth2Error> {
        match reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::TransportError => Err(OAuth2Error::Http("connection refused".to_string())),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, OAuth2Error> {
        self.record(RecordedRequest::PostForm {
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        Self::reply(&self.token_reply)
    }

    async fn get_with_bearer(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<HttpResponse, OAuth2Error> {
        self.record(RecordedRequest::GetWithBearer {
            url: url.to_string(),
            access_token: access_token.to_string(),
        });
        Self::reply(&self.userinfo_reply)
    }
}
