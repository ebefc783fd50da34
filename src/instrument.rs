//! Call instrumentation.
//!
//! Counting and history capture attach to any operation without the
//! operation knowing about it. A tracked operation is a value implementing
//! the single-call [`TrackedOp`] capability; [`CountCalls`] and
//! [`RecordHistory`] each take such a value and return a new one with the
//! same capability, so composition is ordinary wrapping, textually explicit
//! at the call site:
//!
//! ```
//! use recall::prelude::*;
//!
//! # fn main() -> recall::Result<()> {
//! let cache = Cache::ephemeral();
//! let backend = cache.backend();
//!
//! // Count innermost, history outermost: the input is recorded, then the
//! // counter is incremented, then the operation runs, then the output is
//! // recorded.
//! let store = RecordHistory::new(
//!     CountCalls::new(StoreOp::new(cache.clone()), "Cache.store", backend.clone()),
//!     "Cache.store",
//!     backend,
//! );
//!
//! store.invoke(&[Value::from("a")])?;
//! # Ok(())
//! # }
//! ```
//!
//! The counter counts **attempts**: it is incremented before the wrapped
//! call runs, so a failing call still counts. History capture appends one
//! entry to the inputs list before the call and exactly one entry to the
//! outputs list after it; a failed call records the no-result sentinel, so
//! the two lists stay index-aligned no matter what the operation does.

use crate::cache::Cache;
use crate::error::{Error, Result};
use recall_backend::Backend;
use recall_core::{codec, OpName, Value};
use std::sync::Arc;

/// A single-call capability over positional [`Value`] arguments.
///
/// Implemented by adapters around concrete operations and by the
/// instrumentation wrappers themselves, which is what makes them compose.
pub trait TrackedOp: Send + Sync {
    /// Invoke the operation with a positional argument tuple.
    fn invoke(&self, args: &[Value]) -> Result<Value>;
}

// Closures are operations too; tests and one-off adapters rely on this.
impl<F> TrackedOp for F
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        self(args)
    }
}

/// Adapter exposing [`Cache::store`] as a tracked operation.
///
/// Takes exactly one argument (the value to store) and returns the generated
/// key as `Value::Text`.
pub struct StoreOp {
    cache: Cache,
}

impl StoreOp {
    /// Wrap a cache handle.
    pub fn new(cache: Cache) -> Self {
        StoreOp { cache }
    }
}

impl TrackedOp for StoreOp {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        let [value] = args else {
            return Err(Error::InvalidArgument(format!(
                "store takes exactly one value, got {}",
                args.len()
            )));
        };
        let key = self.cache.store(value.clone())?;
        Ok(Value::Text(key.to_string()))
    }
}

/// Count every invocation attempt of the wrapped operation.
///
/// One atomic backend increment on the counter key before delegating.
/// Arguments and result pass through untouched, and a failure of the wrapped
/// call is never swallowed; it just happens after the increment landed.
pub struct CountCalls<T> {
    inner: T,
    name: OpName,
    backend: Arc<dyn Backend>,
}

impl<T: TrackedOp> CountCalls<T> {
    /// Wrap `inner`, counting under the stable operation name `name`.
    pub fn new(inner: T, name: impl Into<OpName>, backend: Arc<dyn Backend>) -> Self {
        CountCalls {
            inner,
            name: name.into(),
            backend,
        }
    }
}

impl<T: TrackedOp> TrackedOp for CountCalls<T> {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        // Attempts, not successes: the increment lands before the call runs.
        self.backend.incr(self.name.counter_key())?;
        self.inner.invoke(args)
    }
}

/// Record the full argument tuple and result of every invocation.
///
/// The encoded arguments are appended to `<name>:inputs` before delegating;
/// the encoded result is appended to `<name>:outputs` after. When the
/// wrapped call fails, the no-result sentinel is appended instead, keeping
/// the lists index-aligned while the failure propagates to the caller.
pub struct RecordHistory<T> {
    inner: T,
    name: OpName,
    backend: Arc<dyn Backend>,
}

impl<T: TrackedOp> RecordHistory<T> {
    /// Wrap `inner`, recording under the stable operation name `name`.
    pub fn new(inner: T, name: impl Into<OpName>, backend: Arc<dyn Backend>) -> Self {
        RecordHistory {
            inner,
            name: name.into(),
            backend,
        }
    }
}

impl<T: TrackedOp> TrackedOp for RecordHistory<T> {
    fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.backend
            .rpush(&self.name.inputs_key(), codec::encode_args(args).as_bytes())?;
        tracing::debug!(op = %self.name, argc = args.len(), "invoking tracked operation");

        let outcome = self.inner.invoke(args);

        let recorded = match &outcome {
            Ok(value) => codec::encode_value(value),
            Err(_) => codec::encode_no_result(),
        };
        let pushed = self
            .backend
            .rpush(&self.name.outputs_key(), recorded.as_bytes());

        // The wrapped call's failure wins; a push failure only surfaces when
        // the call itself succeeded.
        match (outcome, pushed) {
            (Ok(value), Ok(_)) => Ok(value),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), _) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_backend::MemoryBackend;

    fn ok_op() -> impl TrackedOp {
        |args: &[Value]| -> Result<Value> { Ok(args.first().cloned().unwrap_or(Value::Int(0))) }
    }

    fn failing_op() -> impl TrackedOp {
        |_: &[Value]| -> Result<Value> { Err(Error::InvalidArgument("boom".into())) }
    }

    #[test]
    fn count_calls_increments_per_attempt() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let op = CountCalls::new(ok_op(), "op", backend.clone());

        for _ in 0..3 {
            op.invoke(&[Value::Int(1)]).unwrap();
        }
        assert_eq!(backend.get("op").unwrap(), Some(b"3".to_vec()));
    }

    #[test]
    fn failed_attempts_still_count() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let op = CountCalls::new(failing_op(), "op", backend.clone());

        assert!(op.invoke(&[]).is_err());
        assert_eq!(backend.get("op").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn count_calls_passes_arguments_and_result_through() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let op = CountCalls::new(ok_op(), "op", backend);

        let result = op.invoke(&[Value::Text("x".into())]).unwrap();
        assert_eq!(result, Value::Text("x".into()));
    }

    #[test]
    fn record_history_appends_both_lists() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let op = RecordHistory::new(ok_op(), "op", backend.clone());

        op.invoke(&[Value::Int(7)]).unwrap();

        let inputs = backend.lrange("op:inputs", 0, -1).unwrap();
        let outputs = backend.lrange("op:outputs", 0, -1).unwrap();
        assert_eq!(inputs, vec![br#"[{"i":7}]"#.to_vec()]);
        assert_eq!(outputs, vec![br#"{"i":7}"#.to_vec()]);
    }

    #[test]
    fn failure_records_sentinel_and_propagates() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let op = RecordHistory::new(failing_op(), "op", backend.clone());

        let err = op.invoke(&[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        // Both lists grew by one; alignment holds.
        assert_eq!(backend.lrange("op:inputs", 0, -1).unwrap().len(), 1);
        assert_eq!(
            backend.lrange("op:outputs", 0, -1).unwrap(),
            vec![br#"{"none":true}"#.to_vec()]
        );
    }

    #[test]
    fn counter_is_incremented_before_the_call_runs() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let probe = backend.clone();
        // The operation itself observes the counter mid-call.
        let op = CountCalls::new(
            move |_: &[Value]| -> Result<Value> {
                let seen = probe.get("op").unwrap();
                Ok(Value::Text(String::from_utf8(seen.unwrap()).unwrap()))
            },
            "op",
            backend,
        );

        assert_eq!(op.invoke(&[]).unwrap(), Value::Text("1".into()));
    }

    #[test]
    fn store_op_requires_exactly_one_argument() {
        let cache = Cache::ephemeral();
        let op = StoreOp::new(cache);
        assert!(matches!(
            op.invoke(&[]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            op.invoke(&[Value::Int(1), Value::Int(2)]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
