mod errors;
mod store;
mod types;

pub use errors::SessionError;
pub use store::{InMemorySessionStore, RedisSessionStore, SessionStore, session_store_from_env};
pub use types::{
    DEST_URL_KEY, OAUTH_EMAIL_KEY, OAUTH_STATE_KEY, OAUTH_TOKEN_KEY, Session, StoredSession,
    is_valid_session_id, new_session_id,
};
