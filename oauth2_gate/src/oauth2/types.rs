use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters the provider sends back to the callback endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Token returned by the provider's token endpoint.
///
/// Stored verbatim in the session; fields not modelled here are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Unix timestamp derived from `expires_in` when the token was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// User data returned by the provider's user-info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of a completed authorization: who signed in and with which token.
#[derive(Debug, Clone)]
pub struct AuthorizedUser {
    pub user: UserDetails,
    pub token: Token,
}

/// A `302 Found` redirect the web layer should send to the user-agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::FOUND
    }
}
