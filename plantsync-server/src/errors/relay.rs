#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("failed to decode control command: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("subscription stream closed")]
    StreamClosed,
}
