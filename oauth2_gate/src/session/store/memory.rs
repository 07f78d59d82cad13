use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::session::errors::SessionError;

use super::SessionStore;

/// Writes between two sweeps of expired sessions.
const SWEEP_EVERY: usize = 256;

struct SessionEntry {
    values: HashMap<String, String>,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Entries {
    sessions: HashMap<String, SessionEntry>,
    writes_since_sweep: usize,
}

impl Entries {
    /// Drop expired sessions once every `SWEEP_EVERY` writes.
    fn maybe_sweep(&mut self, now: DateTime<Utc>) {
        self.writes_since_sweep += 1;
        if self.writes_since_sweep < SWEEP_EVERY {
            return;
        }
        self.writes_since_sweep = 0;
        let before = self.sessions.len();
        self.sessions.retain(|_, e| e.expires_at > now);
        tracing::debug!("Swept {} expired sessions", before - self.sessions.len());
    }
}

/// Process-local session store. Expired sessions read as empty; they are
/// dropped on access and by a periodic sweep on write.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<Entries>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self::default()
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: u64) -> DateTime<Utc> {
    i64::try_from(ttl)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn init(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, SessionError> {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.sessions.get(session_id) else {
            return Ok(None);
        };
        if entry.expires_at <= Utc::now() {
            tracing::debug!("Session {} expired", session_id);
            entries.sessions.remove(session_id);
            return Ok(None);
        }
        Ok(entry.values.get(key).cloned())
    }

    async fn put(
        &self,
        session_id: &str,
        key: &str,
        value: String,
        ttl: u64,
    ) -> Result<(), SessionError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, ttl);
        let mut entries = self.entries.lock().await;
        entries.maybe_sweep(now);
        let entry = entries
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                values: HashMap::new(),
                expires_at,
            });
        if entry.expires_at <= now {
            entry.values.clear();
        }
        entry.expires_at = expires_at;
        entry.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), SessionError> {
        if let Some(entry) = self.entries.lock().await.sessions.get_mut(session_id) {
            entry.values.remove(key);
        }
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), SessionError> {
        self.entries.lock().await.sessions.remove(session_id);
        Ok(())
    }
}
