//! Core types for Recall
//!
//! Leaf types shared by the cache facade, the instrumentation wrappers and
//! the replay engine: the canonical [`Value`] scalar, generated [`CacheKey`]s,
//! tracked-operation identity ([`OpName`]), and the history wire codec.

pub mod codec;
mod key;
mod value;

pub use codec::CodecError;
pub use key::{CacheKey, OpName};
pub use value::{DecodeError, Decoder, Value};
