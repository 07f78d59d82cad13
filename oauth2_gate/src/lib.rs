//! oauth2_gate - OAuth2 "login required" gate
//!
//! Framework-agnostic core of the authorization-code login flow: anti-forgery
//! state handling, destination preservation, token exchange, user-info
//! retrieval and the email domain allow-list. Web frameworks plug in through
//! the [`Session`] and [`HttpClient`] capabilities.

mod config;
mod oauth2;
mod session;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{
    ConfigError, DEFAULT_REDIRECT_PATH, DEFAULT_SCOPE, ProviderConfig, ProviderConfigBuilder,
};

pub use oauth2::{
    AuthorizedUser, CallbackParams, DEFAULT_DESTINATION, GateDecision, HttpClient, HttpResponse,
    OAuth2Error, Redirect, ReqwestClient, Token, UserDetails, authenticated_email,
    begin_authorization, check_login, complete_authorization, email_is_allowed, handle_callback,
    is_authenticated, redirect_uri, sign_out, stored_token, take_destination,
};

pub use session::{
    DEST_URL_KEY, InMemorySessionStore, OAUTH_EMAIL_KEY, OAUTH_STATE_KEY, OAUTH_TOKEN_KEY,
    RedisSessionStore, Session, SessionError, SessionStore, StoredSession, is_valid_session_id,
    new_session_id, session_store_from_env,
};

pub use utils::{UtilError, gen_random_string};
