//! Unified error types for Recall.
//!
//! This module provides a clean error type that wraps internal errors
//! and presents a consistent interface to users.

use thiserror::Error;

/// All Recall errors.
///
/// This is the canonical error type for all cache, instrumentation and
/// replay operations. Every error is recoverable by the caller; nothing in
/// this crate retries internally or aborts the process.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend cannot be reached or rejected the request
    #[error("backend unavailable: {0}")]
    Backend(String),

    /// Stored bytes do not satisfy the requested decoder
    #[error("decode error: {0}")]
    Decode(String),

    /// A single replayed history entry failed to deserialize
    #[error("corrupt history entry at index {index}: {reason}")]
    CorruptHistory {
        /// Position of the entry in the history lists
        index: usize,
        /// Why the entry could not be decoded
        reason: String,
    },

    /// A tracked operation was invoked with a malformed argument tuple
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for Recall operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a backend failure.
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if this is a decode failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// Check if this is a per-entry replay failure.
    pub fn is_corrupt_history(&self) -> bool {
        matches!(self, Error::CorruptHistory { .. })
    }
}

// Convert from internal backend errors. WRONGTYPE rejections are still the
// backend refusing the request, so both variants surface as `Backend`.
impl From<recall_backend::BackendError> for Error {
    fn from(e: recall_backend::BackendError) -> Self {
        use recall_backend::BackendError;
        match e {
            BackendError::Unavailable(msg) => Error::Backend(msg),
            BackendError::WrongType(msg) => Error::Backend(format!("wrong type: {}", msg)),
        }
    }
}

impl From<recall_core::DecodeError> for Error {
    fn from(e: recall_core::DecodeError) -> Self {
        Error::Decode(e.to_string())
    }
}
