//! Cache handle and builder.
//!
//! This module provides the `Cache` struct, the primary entry point for
//! storing and retrieving values.

use crate::error::Result;
use recall_backend::{Backend, MemoryBackend};
#[cfg(feature = "redis-backend")]
use recall_backend::RedisBackend;
use recall_core::{CacheKey, Decoder, Value};
use std::sync::Arc;

/// The Recall cache.
///
/// Stores scalar values under freshly generated keys and retrieves them with
/// type-directed decoding. Create one with [`Cache::builder`] or, for a
/// throwaway in-process namespace, [`Cache::ephemeral`].
///
/// # Example
///
/// ```
/// use recall::prelude::*;
///
/// # fn main() -> recall::Result<()> {
/// let cache = Cache::ephemeral();
///
/// let key = cache.store("hello")?;
/// assert_eq!(cache.retrieve_text(&key)?, Some("hello".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn Backend>,
}

impl Cache {
    /// Create a builder for cache configuration.
    pub fn builder() -> CacheBuilder {
        CacheBuilder::new()
    }

    /// Create a cache over a fresh in-process namespace.
    ///
    /// No network, no disk; data is gone when the last clone is dropped.
    /// Useful for unit tests and temporary computations.
    pub fn ephemeral() -> Self {
        Cache {
            backend: Arc::new(MemoryBackend::new()),
        }
    }

    /// Shared handle to the underlying backend.
    ///
    /// The instrumentation wrappers and the replay engine talk to the same
    /// namespace through this handle.
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Store a value under a freshly generated key.
    ///
    /// The key is never reused and never derived from the value. One backend
    /// write per call.
    pub fn store(&self, value: impl Into<Value>) -> Result<CacheKey> {
        let value = value.into();
        let key = CacheKey::generate();
        tracing::debug!(key = %key, kind = value.type_name(), "store");
        self.backend.set(&key.to_string(), &value.to_bytes())?;
        Ok(key)
    }

    /// Read the raw bytes stored under `key`.
    ///
    /// Returns `None` if the key was never stored (or has expired),
    /// distinct from a stored empty value.
    pub fn retrieve(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        Ok(self.backend.get(&key.to_string())?)
    }

    /// Read and decode the value stored under `key`.
    ///
    /// The decoder must match the encoding chosen at store time; a mismatch
    /// fails with [`crate::Error::Decode`] rather than coercing.
    pub fn retrieve_with(&self, key: &CacheKey, decoder: Decoder) -> Result<Option<Value>> {
        match self.retrieve(key)? {
            None => Ok(None),
            Some(bytes) => Ok(Some(decoder.decode(bytes)?)),
        }
    }

    /// Retrieve as UTF-8 text.
    pub fn retrieve_text(&self, key: &CacheKey) -> Result<Option<String>> {
        let value = self.retrieve_with(key, Decoder::Text)?;
        Ok(value.and_then(|v| match v {
            Value::Text(s) => Some(s),
            _ => None,
        }))
    }

    /// Retrieve as a decimal integer.
    pub fn retrieve_int(&self, key: &CacheKey) -> Result<Option<i64>> {
        Ok(self.retrieve_with(key, Decoder::Int)?.and_then(|v| v.as_int()))
    }

    /// Retrieve as a decimal float.
    pub fn retrieve_float(&self, key: &CacheKey) -> Result<Option<f64>> {
        Ok(self
            .retrieve_with(key, Decoder::Float)?
            .and_then(|v| v.as_float()))
    }

    /// Clear the entire backend namespace.
    ///
    /// Destructive: wipes stored values, call counters and history lists
    /// alike. Intended for test setup or process bootstrap.
    pub fn flush(&self) -> Result<()> {
        tracing::debug!("flushing cache namespace");
        Ok(self.backend.flush_all()?)
    }
}

/// Builder for cache configuration.
///
/// # Example
///
/// ```
/// use recall::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> recall::Result<()> {
/// let cache = Cache::builder()
///     .backend(Arc::new(MemoryBackend::new()))
///     .flush_on_init(true)
///     .open()?;
/// # let _ = cache;
/// # Ok(())
/// # }
/// ```
pub struct CacheBuilder {
    backend: Option<Arc<dyn Backend>>,
    flush_on_init: bool,
}

impl CacheBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        CacheBuilder {
            backend: None,
            flush_on_init: false,
        }
    }

    /// Use an explicit backend handle.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Use a fresh in-process backend (the default when none is set).
    pub fn memory(mut self) -> Self {
        self.backend = Some(Arc::new(MemoryBackend::new()));
        self
    }

    /// Connect to a Redis server and use it as the backend.
    #[cfg(feature = "redis-backend")]
    pub fn redis(mut self, url: &str) -> Result<Self> {
        self.backend = Some(Arc::new(RedisBackend::connect(url)?));
        Ok(self)
    }

    /// Flush the backend namespace when the cache is opened.
    ///
    /// Matches the clean-slate bootstrap of a fresh deployment. Off by
    /// default because the namespace may hold counters and histories from
    /// earlier runs that the caller wants to keep.
    pub fn flush_on_init(mut self, flush: bool) -> Self {
        self.flush_on_init = flush;
        self
    }

    /// Open the cache.
    pub fn open(self) -> Result<Cache> {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MemoryBackend::new()));
        if self.flush_on_init {
            backend.flush_all()?;
        }
        Ok(Cache { backend })
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
