use thiserror::Error;

pub type RemindResult<T> = Result<T, RemindError>;

#[derive(Error, Debug)]
pub enum RemindError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream fetch failure from the hosted store. Retryable by the
    /// caller; the aggregation core never retries on its own.
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
