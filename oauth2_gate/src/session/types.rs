use async_trait::async_trait;
use std::sync::Arc;

use super::errors::SessionError;
use super::store::SessionStore;
use crate::utils::{UtilError, gen_random_string, is_random_token};

const SESSION_ID_BYTES: usize = 32;

/// URL the user was trying to reach when the login gate challenged them.
pub const DEST_URL_KEY: &str = "dest_url";
/// Anti-forgery token of the pending authorization attempt.
pub const OAUTH_STATE_KEY: &str = "oauth_state";
/// Email of the signed-in user.
pub const OAUTH_EMAIL_KEY: &str = "oauth_email";
/// Provider token of the signed-in user, serialized as JSON.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";

/// Mint an identifier for a new server-side session.
pub fn new_session_id() -> Result<String, UtilError> {
    gen_random_string(SESSION_ID_BYTES)
}

/// True if `id` has the shape of an identifier from [`new_session_id`].
/// Anything else presented by a client is treated as no session at all.
pub fn is_valid_session_id(id: &str) -> bool {
    is_random_token(id, SESSION_ID_BYTES)
}

/// Key/value storage scoped to one user-agent.
///
/// The login flow only relies on key presence and on reading back what it wrote
/// within the same logical session; how values are persisted between requests is
/// up to the implementation.
#[async_trait]
pub trait Session: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    async fn set(&self, key: &str, value: String) -> Result<(), SessionError>;

    async fn remove(&self, key: &str) -> Result<(), SessionError>;

    /// Drop every key of this session.
    async fn clear(&self) -> Result<(), SessionError>;
}

/// A [`Session`] backed by a shared [`SessionStore`], addressed by session id.
#[derive(Clone)]
pub struct StoredSession {
    store: Arc<dyn SessionStore>,
    id: String,
    ttl: u64,
}

impl StoredSession {
    pub fn new(store: Arc<dyn SessionStore>, id: impl Into<String>, ttl: u64) -> Self {
        Self {
            store,
            id: id.into(),
            ttl,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("id", &self.id)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[async_trait]
impl Session for StoredSession {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.store.get(&self.id, key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        self.store.put(&self.id, key, value, self.ttl).await
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.store.remove(&self.id, key).await
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.store.clear(&self.id).await
    }
}
