// crates/typed-results/src/error.rs - failures surfaced while executing a typed result

use thiserror::Error;

/// Errors raised while a result is written to a response channel.
///
/// Nothing here is recovered locally. Once `execute` returns one of these the
/// status code may already be committed, so the response is in an
/// indeterminate state and the caller decides what to do with it.
#[derive(Debug, Error)]
pub enum ResultError {
    /// The body could not be serialized.
    #[error("failed to serialize response body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The underlying channel failed while writing.
    #[error("failed to write response: {0}")]
    Io(#[from] std::io::Error),

    /// A body was already written to this channel.
    #[error("response body has already been written")]
    BodyAlreadyWritten,

    /// A synchronous caller drove a channel that needed to suspend.
    #[error("response channel did not complete synchronously")]
    Suspended,
}

/// Result type for executing typed results.
pub type Result<T> = std::result::Result<T, ResultError>;
