use http::StatusCode;
use thiserror::Error;

use crate::session::SessionError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    #[error("State token missing")]
    StateMissing,

    #[error("State token mismatch")]
    StateMismatch,

    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("Fetch user info error: {0}")]
    FetchUserInfo(String),

    #[error("Email domain not allowed: {0}")]
    DomainNotAllowed(String),

    #[error("Http client error: {0}")]
    Http(String),

    #[error("Invalid request URL: {0}")]
    InvalidRequestUrl(String),

    #[error("Serde error: {0}")]
    Serde(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),

    /// Error from session operations
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl OAuth2Error {
    /// True for failures that mean "this login attempt is rejected", as opposed to
    /// infrastructure faults on our side.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::StateMissing
                | Self::StateMismatch
                | Self::TokenExchange(_)
                | Self::FetchUserInfo(_)
                | Self::DomainNotAllowed(_)
        )
    }

    /// True for a missing or mismatched anti-forgery token.
    pub fn is_forgery_check(&self) -> bool {
        matches!(self, Self::StateMissing | Self::StateMismatch)
    }

    /// Status the client sees. Every rejected login collapses to 403 so the
    /// response does not reveal which check failed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            e if e.is_auth_failure() => StatusCode::FORBIDDEN,
            Self::InvalidRequestUrl(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
