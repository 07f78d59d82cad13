mod config;
mod memory;
mod redis;

use async_trait::async_trait;

use super::errors::SessionError;

pub use config::session_store_from_env;
pub use memory::InMemorySessionStore;
pub use self::redis::RedisSessionStore;

/// Backend shared by all sessions; values are addressed by session id and key.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Initialize the store. Called once when the store is created.
    async fn init(&self) -> Result<(), SessionError>;

    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value and extend the session's lifetime to `ttl` seconds.
    async fn put(
        &self,
        session_id: &str,
        key: &str,
        value: String,
        ttl: u64,
    ) -> Result<(), SessionError>;

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), SessionError>;

    /// Remove the whole session.
    async fn clear(&self, session_id: &str) -> Result<(), SessionError>;
}
