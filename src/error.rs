use thiserror::Error;

/// Errors raised outside the formula engine.
///
/// Formula evaluation never produces one of these; its failures are
/// reported as [`ErrorSentinel`](crate::formula::ErrorSentinel) values
/// stored in the cell instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode grid document: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid range token '{0}'")]
    InvalidRange(String),

    #[error("invalid cell reference '{0}'")]
    InvalidReference(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
