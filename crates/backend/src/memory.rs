//! In-process backend implementation.
//!
//! A namespace behind a single mutex: `incr` and `rpush` hold the lock for
//! the whole read-modify-write, which makes them atomic under concurrent
//! callers the same way the real backend's primitives are. Expiry from
//! `set_ex` is lazy: expired entries are dropped when next touched.

use crate::{Backend, BackendError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

enum Entry {
    Scalar {
        bytes: Vec<u8>,
        expires_at: Option<Instant>,
    },
    List(Vec<Vec<u8>>),
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self, Entry::Scalar { expires_at: Some(at), .. } if *at <= now)
    }
}

/// In-process [`Backend`] holding everything in a map.
///
/// No disk, no network; data is gone when the value is dropped. Intended for
/// tests and ephemeral caches, mirroring what a freshly flushed namespace on
/// the real backend looks like.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.lock().insert(
            key.to_string(),
            Entry::Scalar {
                bytes: value.to_vec(),
                expires_at: None,
            },
        );
        Ok(())
    }

    fn set_ex(&self, key: &str, ttl_seconds: u64, value: &[u8]) -> Result<()> {
        self.entries.lock().insert(
            key.to_string(),
            Entry::Scalar {
                bytes: value.to_vec(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.lock();
        match live_entry(&mut entries, key) {
            None => Ok(None),
            Some(Entry::Scalar { bytes, .. }) => Ok(Some(bytes.clone())),
            Some(Entry::List(_)) => Err(wrong_type(key, "GET", "a list")),
        }
    }

    fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.lock();
        let current = match live_entry(&mut entries, key) {
            None => 0,
            Some(Entry::Scalar { bytes, .. }) => String::from_utf8_lossy(bytes)
                .parse::<i64>()
                .map_err(|_| {
                    BackendError::WrongType(format!(
                        "INCR on {:?}: value is not an integer",
                        key
                    ))
                })?,
            Some(Entry::List(_)) => return Err(wrong_type(key, "INCR", "a list")),
        };
        let next = current.checked_add(1).ok_or_else(|| {
            BackendError::WrongType(format!("INCR on {:?}: counter would overflow", key))
        })?;
        entries.insert(
            key.to_string(),
            Entry::Scalar {
                bytes: next.to_string().into_bytes(),
                expires_at: None,
            },
        );
        Ok(next)
    }

    fn rpush(&self, key: &str, value: &[u8]) -> Result<u64> {
        let mut entries = self.entries.lock();
        match live_entry(&mut entries, key) {
            None => {
                entries.insert(key.to_string(), Entry::List(vec![value.to_vec()]));
                Ok(1)
            }
            Some(Entry::List(items)) => {
                items.push(value.to_vec());
                Ok(items.len() as u64)
            }
            Some(Entry::Scalar { .. }) => Err(wrong_type(key, "RPUSH", "a scalar")),
        }
    }

    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.lock();
        match live_entry(&mut entries, key) {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(match range_bounds(items.len(), start, stop) {
                Some((from, to)) => items[from..=to].to_vec(),
                None => Vec::new(),
            }),
            Some(Entry::Scalar { .. }) => Err(wrong_type(key, "LRANGE", "a scalar")),
        }
    }

    fn flush_all(&self) -> Result<()> {
        self.entries.lock().clear();
        tracing::trace!("memory backend namespace flushed");
        Ok(())
    }
}

fn wrong_type(key: &str, op: &str, found: &str) -> BackendError {
    BackendError::WrongType(format!("{} on {:?}: key holds {}", op, key, found))
}

fn live_entry<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
) -> Option<&'a mut Entry> {
    let expired = entries
        .get(key)
        .map_or(false, |e| e.is_expired(Instant::now()));
    if expired {
        entries.remove(key);
    }
    entries.get_mut(key)
}

// Redis LRANGE index semantics: inclusive stop, negative-from-end, clamped.
fn range_bounds(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let n = len as i64;
    let from = if start < 0 { start + n } else { start }.max(0);
    let to = if stop < 0 { stop + n } else { stop }.min(n - 1);
    if from > to || from >= n || to < 0 {
        return None;
    }
    Some((from as usize, to as usize))
}
