//! Replay of recorded call history.
//!
//! Reconstructs the ordered call trace of a tracked operation from the
//! persisted counter and history lists. Decoding is lazy and per-record:
//! one corrupt entry yields its own error and the iteration moves on, so a
//! damaged record can never fabricate data for a different one.

use crate::error::{Error, Result};
use recall_backend::Backend;
use recall_core::{codec, OpName, Value};
use std::fmt;

/// One reconstructed invocation: the argument tuple and what it returned.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// Position in call order (0-based)
    pub index: usize,
    /// The positional arguments the operation was invoked with
    pub args: Vec<Value>,
    /// The recorded result; `None` when the invocation failed
    pub result: Option<Value>,
}

impl fmt::Display for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(") -> ")?;
        match &self.result {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("<no result>"),
        }
    }
}

/// Fetched call history of one tracked operation.
///
/// Obtained with [`Replay::fetch`]; iterate with [`Replay::records`] (calling
/// it again restarts from the first record) or render the whole trace with
/// [`Replay::render`].
pub struct Replay {
    name: OpName,
    calls: u64,
    inputs: Vec<Vec<u8>>,
    outputs: Vec<Vec<u8>>,
}

impl Replay {
    /// Read the counter and both history lists for `name`.
    ///
    /// An absent counter reads as zero calls. The record count is bounded by
    /// the shorter of the two lists, so a misaligned history can never make
    /// iteration run past either end.
    pub fn fetch(backend: &dyn Backend, name: impl Into<OpName>) -> Result<Self> {
        let name = name.into();
        let calls = match backend.get(name.counter_key())? {
            None => 0,
            Some(bytes) => String::from_utf8_lossy(&bytes).parse::<u64>().map_err(|_| {
                Error::Decode(format!("counter for {} holds non-numeric bytes", name))
            })?,
        };
        let inputs = backend.lrange(&name.inputs_key(), 0, -1)?;
        let outputs = backend.lrange(&name.outputs_key(), 0, -1)?;
        tracing::debug!(
            op = %name,
            calls,
            records = inputs.len().min(outputs.len()),
            "fetched call history"
        );
        Ok(Replay {
            name,
            calls,
            inputs,
            outputs,
        })
    }

    /// The tracked operation this history belongs to.
    pub fn name(&self) -> &OpName {
        &self.name
    }

    /// Total recorded invocation attempts.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Number of replayable records: the shorter of the two lists.
    pub fn len(&self) -> usize {
        self.inputs.len().min(self.outputs.len())
    }

    /// True when there is nothing to replay.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the records in call order, decoding lazily.
    pub fn records(&self) -> Records<'_> {
        Records {
            replay: self,
            index: 0,
        }
    }

    /// Render the trace as text: a header with the call count, then one
    /// line per record. Corrupt records are skipped.
    pub fn render(&self) -> String {
        let mut out = format!("{} was called {} times:\n", self.name, self.calls);
        for record in self.records().flatten() {
            out.push_str(&format!("{}{}\n", self.name, record));
        }
        out
    }
}

/// Lazy record iterator returned by [`Replay::records`].
pub struct Records<'a> {
    replay: &'a Replay,
    index: usize,
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<CallRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.replay.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(decode_record(
            &self.replay.inputs[index],
            &self.replay.outputs[index],
            index,
        ))
    }
}

fn decode_record(input: &[u8], output: &[u8], index: usize) -> Result<CallRecord> {
    let args_text = std::str::from_utf8(input).map_err(|e| corrupt(index, e))?;
    let args = codec::decode_args(args_text).map_err(|e| corrupt(index, e))?;
    let result_text = std::str::from_utf8(output).map_err(|e| corrupt(index, e))?;
    let result = codec::decode_result(result_text).map_err(|e| corrupt(index, e))?;
    Ok(CallRecord {
        index,
        args,
        result,
    })
}

fn corrupt(index: usize, reason: impl ToString) -> Error {
    Error::CorruptHistory {
        index,
        reason: reason.to_string(),
    }
}
