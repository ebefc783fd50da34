//! Convenient imports for Recall.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```
//! use recall::prelude::*;
//!
//! # fn main() -> recall::Result<()> {
//! let cache = Cache::ephemeral();
//! let key = cache.store(42i64)?;
//! assert_eq!(cache.retrieve_int(&key)?, Some(42));
//! # Ok(())
//! # }
//! ```

// Main entry point
pub use crate::cache::{Cache, CacheBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Instrumentation
pub use crate::instrument::{CountCalls, RecordHistory, StoreOp, TrackedOp};

// Replay
pub use crate::replay::{CallRecord, Replay};

// Backend protocol
pub use recall_backend::{Backend, MemoryBackend};
#[cfg(feature = "redis-backend")]
pub use recall_backend::RedisBackend;

// Core types
pub use recall_core::{CacheKey, Decoder, OpName, Value};
