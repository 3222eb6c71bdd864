use thiserror::Error;

/// Failure of a remote source. Never reaches the store: callers log it
/// and carry on with an empty result.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}
