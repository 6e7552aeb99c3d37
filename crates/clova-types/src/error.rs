use thiserror::Error;

/// Errors raised while building a response document.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// A mutator was called on a speech in the wrong shape, e.g. adding a
    /// verbose utterance before a brief one was set. Always a caller bug.
    #[error("invalid builder state: {0}")]
    InvalidState(String),

    #[error("session attributes must serialize to a JSON object, got {0}")]
    SessionAttributesNotObject(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Errors from loading extension configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
