use std::{env, sync::Arc};

use crate::session::errors::SessionError;

use super::{InMemorySessionStore, RedisSessionStore, SessionStore};

/// Build the session store selected by `O2G_SESSION_STORE_TYPE` (`memory` or
/// `redis`, default `memory`). Redis reads its URL from `O2G_SESSION_STORE_URL`
/// and is verified with a connection attempt before it is returned.
pub async fn session_store_from_env() -> Result<Arc<dyn SessionStore>, SessionError> {
    let store_type = env::var("O2G_SESSION_STORE_TYPE").unwrap_or_else(|_| "memory".to_string());
    let store_url = env::var("O2G_SESSION_STORE_URL").ok();
    build_store(&store_type, store_url.as_deref()).await
}

async fn build_store(
    store_type: &str,
    store_url: Option<&str>,
) -> Result<Arc<dyn SessionStore>, SessionError> {
    tracing::info!("Initializing session store with type: {}", store_type);

    let store: Arc<dyn SessionStore> = match store_type {
        "memory" => Arc::new(InMemorySessionStore::new()),
        "redis" => {
            let url = store_url.ok_or_else(|| {
                SessionError::Storage("O2G_SESSION_STORE_URL must be set for redis".to_string())
            })?;
            Arc::new(RedisSessionStore::new(url)?)
        }
        t => return Err(SessionError::UnsupportedStore(t.to_string())),
    };

    store.init().await.inspect_err(|e| {
        tracing::error!("Failed to initialize session store: {}", e);
    })?;

    tracing::info!("Connected to session store: type={}", store_type);
    Ok(store)
}
