//! Scalar value types for Recall
//!
//! This module defines the canonical `Value` type for everything the cache
//! stores and everything the instrumentation layer records. The enum is a
//! closed set of four scalar kinds.
//!
//! ## Equality Rules
//!
//! - Different kinds are NEVER equal (no type coercion)
//! - `Int(1)` != `Float(1.0)`
//! - `Text("abc")` != `Bytes([97, 98, 99])`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical Recall value type
///
/// Every value written to or read from the cache is one of these four kinds.
/// The byte encoding per kind (see [`Value::to_bytes`]) is invertible by the
/// matching [`Decoder`]; a mismatched decoder fails with [`DecodeError`]
/// instead of coercing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// UTF-8 encoded text
    Text(String),

    /// Arbitrary binary data
    /// NOT equivalent to Text - distinct kind
    Bytes(Vec<u8>),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit IEEE-754 floating point
    /// Supports: NaN, +Inf, -Inf, -0.0, subnormals
    Float(f64),
}

impl Value {
    /// Returns the kind name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "Text",
            Value::Bytes(_) => "Bytes",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
        }
    }

    /// Try to get as text slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bytes slice
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Encode this value to the byte representation written to the backend.
    ///
    /// - `Text` encodes as its UTF-8 bytes
    /// - `Bytes` passes through unchanged
    /// - `Int` encodes as decimal ASCII
    /// - `Float` encodes as shortest-roundtrip decimal ASCII; the special
    ///   values spell as `NaN`, `inf` and `-inf`, all re-parseable by
    ///   `f64::from_str`
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Text(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
            Value::Int(i) => i.to_string().into_bytes(),
            Value::Float(f) => f.to_string().into_bytes(),
        }
    }
}

impl std::fmt::Display for Value {
    /// Human-readable form used by replay rendering: text quoted, bytes as
    /// `0x`-hex, numbers plain.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => {
                f.write_str("0x")?;
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Decode failure: stored bytes do not satisfy the requested decoder.
///
/// Decoding never coerces. Bytes that are not valid UTF-8 fail the text
/// decoder; bytes that are not decimal ASCII fail the numeric decoders.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Bytes are not valid UTF-8 text
    #[error("bytes are not valid UTF-8 text: {0}")]
    NotText(String),

    /// Bytes are not a decimal integer
    #[error("bytes are not a decimal integer: {0:?}")]
    NotInt(String),

    /// Bytes are not a decimal float
    #[error("bytes are not a decimal float: {0:?}")]
    NotFloat(String),
}

/// Type-directed decoder for raw backend bytes.
///
/// The decoder is chosen by the reader and must match the encoding chosen by
/// the writer. `Raw` is the identity decoder and always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    /// Return the bytes unchanged
    Raw,
    /// UTF-8 decode to `Value::Text`
    Text,
    /// Decimal ASCII parse to `Value::Int`
    Int,
    /// Decimal ASCII parse to `Value::Float`
    Float,
}

impl Decoder {
    /// Apply this decoder to raw bytes.
    pub fn decode(&self, bytes: Vec<u8>) -> Result<Value, DecodeError> {
        match self {
            Decoder::Raw => Ok(Value::Bytes(bytes)),
            Decoder::Text => {
                let s = String::from_utf8(bytes)
                    .map_err(|e| DecodeError::NotText(e.utf8_error().to_string()))?;
                Ok(Value::Text(s))
            }
            Decoder::Int => {
                let s = ascii_lossy(&bytes);
                let i = s.parse::<i64>().map_err(|_| DecodeError::NotInt(s))?;
                Ok(Value::Int(i))
            }
            Decoder::Float => {
                let s = ascii_lossy(&bytes);
                let f = s.parse::<f64>().map_err(|_| DecodeError::NotFloat(s))?;
                Ok(Value::Float(f))
            }
        }
    }
}

// Numeric encodings are pure ASCII; lossy conversion keeps the offending
// bytes readable in error messages without a second failure path.
fn ascii_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
