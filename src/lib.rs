//! # Recall
//!
//! Instrumented key-value cache with call-history capture and replay.
//!
//! Recall stores scalar values under generated keys, reads them back with
//! type-directed decoding, and can wrap any operation with cross-cutting
//! instrumentation (invocation counting and full call-history capture)
//! without the operation knowing about it. The recorded history replays as
//! an ordered, per-call trace.
//!
//! ## Quick Start
//!
//! ```
//! use recall::prelude::*;
//!
//! # fn main() -> recall::Result<()> {
//! let cache = Cache::ephemeral();
//!
//! // Typed storage under generated keys
//! let key = cache.store("hello")?;
//! assert_eq!(cache.retrieve_text(&key)?, Some("hello".to_string()));
//!
//! // Instrument the store operation: count + record, then replay
//! let backend = cache.backend();
//! let store = RecordHistory::new(
//!     CountCalls::new(StoreOp::new(cache.clone()), "Cache.store", backend.clone()),
//!     "Cache.store",
//!     backend.clone(),
//! );
//! store.invoke(&[Value::from("a")])?;
//! store.invoke(&[Value::from("b")])?;
//!
//! let replay = Replay::fetch(backend.as_ref(), "Cache.store")?;
//! assert_eq!(replay.calls(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pieces
//!
//! - [`Cache`] - typed storage with generated [`CacheKey`]s
//! - [`instrument`] - [`CountCalls`] and [`RecordHistory`] wrappers over
//!   the [`TrackedOp`] capability
//! - [`replay`] - [`Replay`], the ordered reconstruction of a history
//! - [`Backend`] - the narrow protocol the external key-value store is
//!   consumed through

#![warn(missing_docs)]

mod cache;
mod error;
pub mod instrument;
pub mod prelude;
pub mod replay;

// Re-export main entry points
pub use cache::{Cache, CacheBuilder};
pub use error::{Error, Result};

// Re-export instrumentation and replay surfaces
pub use instrument::{CountCalls, RecordHistory, StoreOp, TrackedOp};
pub use replay::{CallRecord, Records, Replay};

// Re-export the backend protocol and core types
pub use recall_backend::{Backend, BackendError, MemoryBackend};
#[cfg(feature = "redis-backend")]
pub use recall_backend::RedisBackend;
pub use recall_core::{CacheKey, CodecError, DecodeError, Decoder, OpName, Value};
