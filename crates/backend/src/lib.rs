//! Key-value backend protocol for Recall
//!
//! The cache layer consumes an already-available key-value store through the
//! narrow [`Backend`] trait: seven operations with Redis semantics. The store
//! itself is an external collaborator; this crate ships an in-process
//! implementation ([`MemoryBackend`]) for tests and ephemeral use, and a
//! binding onto a real Redis connection behind the `redis-backend` feature.
//!
//! Counter increments and list appends are backend-atomic primitives, never
//! read-modify-write sequences, so concurrent processes sharing a namespace
//! stay correct without any locking in the layers above.

mod memory;
#[cfg(feature = "redis-backend")]
mod redis;

pub use memory::MemoryBackend;
#[cfg(feature = "redis-backend")]
pub use self::redis::RedisBackend;

use thiserror::Error;

/// Backend failure.
///
/// Never retried internally; retry policy is a caller concern.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend cannot be reached or rejected the request
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The operation does not apply to the value stored at the key
    /// (e.g. INCR on non-numeric bytes, a list operation on a scalar)
    #[error("wrong type: {0}")]
    WrongType(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// The seven-operation consumer protocol.
///
/// Implementations must be shareable across threads; atomicity of `incr` and
/// `rpush` is the implementation's responsibility.
pub trait Backend: Send + Sync {
    /// Unconditional overwrite of the scalar at `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Overwrite with expiration: the key vanishes `ttl_seconds` after the
    /// write.
    fn set_ex(&self, key: &str, ttl_seconds: u64, value: &[u8]) -> Result<()>;

    /// Read the scalar at `key`. `None` means the key does not exist,
    /// distinct from an empty stored value.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomic increment-and-return of the numeric counter at `key`,
    /// starting from 0 if absent.
    fn incr(&self, key: &str) -> Result<i64>;

    /// Atomic append to the tail of the list at `key`. Returns the new
    /// list length.
    fn rpush(&self, key: &str, value: &[u8]) -> Result<u64>;

    /// Read a range of the list at `key`. Indices follow Redis semantics:
    /// `stop` is inclusive, negative indices count from the end, and
    /// out-of-range bounds clamp rather than fail.
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Clear the entire namespace. Destructive; intended for test setup or
    /// process bootstrap, never mid-session.
    fn flush_all(&self) -> Result<()>;
}
