use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Json conversion(Serde) error: {0}")]
    Serde(String),

    #[error("Unsupported session store type: {0}")]
    UnsupportedStore(String),
}

impl From<redis::RedisError> for SessionError {
    fn from(err: redis::RedisError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
