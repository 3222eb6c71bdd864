use thiserror::Error;

/// Errors raised while decoding explorer payloads or selectors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown environment '{0}'")]
    UnknownEnvironment(String),

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
