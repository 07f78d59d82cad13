use async_trait::async_trait;
use redis::AsyncCommands;

use crate::session::errors::SessionError;

use super::SessionStore;

const SESSION_PREFIX: &str = "o2g:session";

/// Session store keeping one Redis hash per session, expiring with the session TTL.
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn make_key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}:{session_id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn init(&self) -> Result<(), SessionError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.hget(Self::make_key(session_id), key).await?;
        Ok(value)
    }

    async fn put(
        &self,
        session_id: &str,
        key: &str,
        value: String,
        ttl: u64,
    ) -> Result<(), SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let redis_key = Self::make_key(session_id);
        let _: () = conn.hset(&redis_key, key, value).await?;
        let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
        let _: () = conn.expire(&redis_key, ttl).await?;
        Ok(())
    }

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.hdel(Self::make_key(session_id), key).await?;
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), SessionError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::make_key(session_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        assert_eq!(RedisSessionStore::make_key("abc"), "o2g:session:abc");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(RedisSessionStore::new("not-a-redis-url").is_err());
    }

    #[test]
    fn test_new_accepts_redis_url() {
        // Opening a client does not connect yet
        assert!(RedisSessionStore::new("redis://127.0.0.1:6379").is_ok());
    }
}
