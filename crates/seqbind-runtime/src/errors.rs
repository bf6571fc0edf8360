//! Error types for seqbind-runtime.

use thiserror::Error;

/// Failures of the wire layer itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeqError {
    #[error("buffer underflow: needed {needed} bytes, {remaining} remaining")]
    Underflow { needed: usize, remaining: usize },

    #[error("negative length prefix {0}")]
    NegativeLength(i32),

    #[error("payload of {0} bytes does not fit an i32 length prefix")]
    TooLong(usize),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("handler already registered for {descriptor}:{code}")]
    DuplicateRegistration { descriptor: String, code: i32 },

    #[error("no handler registered for {descriptor}:{code}")]
    UnknownHandler { descriptor: String, code: i32 },

    #[error("handler for {descriptor}:{code} failed: {message}")]
    Handler {
        descriptor: String,
        code: i32,
        message: String,
    },
}

/// An error value decoded from the wire
///
/// Only the message crosses the bridge, so this is all that is left of the
/// error raised on the other side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
