//! History wire codec
//!
//! Encoding of recorded argument tuples and results to a stable textual
//! representation, and the dedicated decoder that reverses it. Stored text is
//! parsed, never evaluated.
//!
//! ## Wire format
//!
//! A value encodes as a single-key JSON object tagged by kind:
//!
//! | Kind | Wire form |
//! |------|-----------|
//! | Text | `{"s":"hello"}` |
//! | Bytes | `{"b":"<base64>"}` |
//! | Int | `{"i":42}` |
//! | Float | `{"f":1.5}`, specials as `{"f":"NaN"}`, `{"f":"+Inf"}`, `{"f":"-Inf"}` |
//!
//! An argument tuple is a JSON array of such objects. A recorded result is a
//! single such object; the literal `{"none":true}` marks an invocation that
//! produced no result.

use crate::Value;
use base64::Engine;
use serde_json::Value as JsonValue;
use thiserror::Error;

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Codec failure for a stored history entry.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// Entry is not valid JSON
    #[error("invalid history encoding: {0}")]
    Syntax(String),

    /// Entry parses but is not the expected wire shape
    #[error("malformed wire entry: {0}")]
    Malformed(String),

    /// Single-key object with a tag this codec does not know
    #[error("unknown wire tag: {0:?}")]
    UnknownTag(String),

    /// Tag is known but its payload has the wrong JSON type
    #[error("invalid payload for tag {tag:?}")]
    InvalidPayload {
        /// The wire tag whose payload was rejected
        tag: &'static str,
    },

    /// `"b"` payload is not valid base64
    #[error("invalid base64 in \"b\" payload: {0}")]
    InvalidBase64(String),

    /// `"f"` payload string is not a recognized special float
    #[error("invalid special float: {0:?}")]
    InvalidFloat(String),
}

/// Encode one value to its wire form.
pub fn encode_value(value: &Value) -> String {
    to_wire(value).to_string()
}

/// Encode an argument tuple to its wire form.
pub fn encode_args(args: &[Value]) -> String {
    JsonValue::Array(args.iter().map(to_wire).collect()).to_string()
}

/// Wire form of the "no result" sentinel appended when a tracked call fails.
pub fn encode_no_result() -> String {
    r#"{"none":true}"#.to_string()
}

/// Decode one value from its wire form.
pub fn decode_value(text: &str) -> Result<Value, CodecError> {
    from_wire(&parse(text)?)
}

/// Decode an argument tuple from its wire form.
pub fn decode_args(text: &str) -> Result<Vec<Value>, CodecError> {
    match parse(text)? {
        JsonValue::Array(items) => items.iter().map(from_wire).collect(),
        other => Err(CodecError::Malformed(format!(
            "expected an argument array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decode a recorded result: `Ok(None)` for the no-result sentinel.
pub fn decode_result(text: &str) -> Result<Option<Value>, CodecError> {
    let tree = parse(text)?;
    if let JsonValue::Object(map) = &tree {
        if map.len() == 1 {
            if let Some(flag) = map.get("none") {
                return match flag {
                    JsonValue::Bool(true) => Ok(None),
                    _ => Err(CodecError::InvalidPayload { tag: "none" }),
                };
            }
        }
    }
    from_wire(&tree).map(Some)
}

fn parse(text: &str) -> Result<JsonValue, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::Syntax(e.to_string()))
}

fn to_wire(value: &Value) -> JsonValue {
    match value {
        Value::Text(s) => serde_json::json!({ "s": s }),
        Value::Bytes(b) => serde_json::json!({ "b": BASE64.encode(b) }),
        Value::Int(i) => serde_json::json!({ "i": i }),
        Value::Float(f) => encode_float(*f),
    }
}

fn encode_float(f: f64) -> JsonValue {
    if f.is_nan() {
        serde_json::json!({ "f": "NaN" })
    } else if f == f64::INFINITY {
        serde_json::json!({ "f": "+Inf" })
    } else if f == f64::NEG_INFINITY {
        serde_json::json!({ "f": "-Inf" })
    } else {
        serde_json::json!({ "f": f })
    }
}

fn from_wire(tree: &JsonValue) -> Result<Value, CodecError> {
    let map = match tree {
        JsonValue::Object(map) => map,
        other => {
            return Err(CodecError::Malformed(format!(
                "expected a wire object, got {}",
                json_kind(other)
            )))
        }
    };
    if map.len() != 1 {
        return Err(CodecError::Malformed(format!(
            "expected a single-key wire object, got {} keys",
            map.len()
        )));
    }
    let (tag, payload) = map.iter().next().expect("len checked above");

    match tag.as_str() {
        "s" => match payload {
            JsonValue::String(s) => Ok(Value::Text(s.clone())),
            _ => Err(CodecError::InvalidPayload { tag: "s" }),
        },
        "b" => match payload {
            JsonValue::String(b64) => BASE64
                .decode(b64)
                .map(Value::Bytes)
                .map_err(|e| CodecError::InvalidBase64(e.to_string())),
            _ => Err(CodecError::InvalidPayload { tag: "b" }),
        },
        "i" => payload
            .as_i64()
            .map(Value::Int)
            .ok_or(CodecError::InvalidPayload { tag: "i" }),
        "f" => decode_float(payload),
        other => Err(CodecError::UnknownTag(other.to_string())),
    }
}

fn decode_float(payload: &JsonValue) -> Result<Value, CodecError> {
    match payload {
        JsonValue::Number(n) => n
            .as_f64()
            .map(Value::Float)
            .ok_or(CodecError::InvalidPayload { tag: "f" }),
        JsonValue::String(s) => match s.as_str() {
            "NaN" => Ok(Value::Float(f64::NAN)),
            "+Inf" => Ok(Value::Float(f64::INFINITY)),
            "-Inf" => Ok(Value::Float(f64::NEG_INFINITY)),
            other => Err(CodecError::InvalidFloat(other.to_string())),
        },
        _ => Err(CodecError::InvalidPayload { tag: "f" }),
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a bool",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_wire_form() {
        assert_eq!(encode_value(&Value::Text("hello".into())), r#"{"s":"hello"}"#);
    }

    #[test]
    fn bytes_wire_form_is_base64() {
        let encoded = encode_value(&Value::Bytes(vec![0, 255, 128]));
        assert_eq!(encoded, r#"{"b":"AP+A"}"#);
        assert_eq!(decode_value(&encoded).unwrap(), Value::Bytes(vec![0, 255, 128]));
    }

    #[test]
    fn int_wire_form() {
        assert_eq!(encode_value(&Value::Int(-7)), r#"{"i":-7}"#);
        assert_eq!(decode_value(r#"{"i":-7}"#).unwrap(), Value::Int(-7));
    }

    #[test]
    fn int_extremes_round_trip() {
        for i in [i64::MIN, i64::MAX] {
            let v = Value::Int(i);
            assert_eq!(decode_value(&encode_value(&v)).unwrap(), v);
        }
    }

    #[test]
    fn special_floats_round_trip() {
        assert_eq!(encode_value(&Value::Float(f64::NAN)), r#"{"f":"NaN"}"#);
        assert_eq!(encode_value(&Value::Float(f64::INFINITY)), r#"{"f":"+Inf"}"#);
        assert_eq!(encode_value(&Value::Float(f64::NEG_INFINITY)), r#"{"f":"-Inf"}"#);

        assert!(decode_value(r#"{"f":"NaN"}"#).unwrap().as_float().unwrap().is_nan());
        assert_eq!(
            decode_value(r#"{"f":"+Inf"}"#).unwrap(),
            Value::Float(f64::INFINITY)
        );
    }

    #[test]
    fn args_round_trip() {
        let args = vec![Value::Text("a".into()), Value::Int(42), Value::Float(1.5)];
        let decoded = decode_args(&encode_args(&args)).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn empty_args_round_trip() {
        assert_eq!(decode_args(&encode_args(&[])).unwrap(), vec![]);
    }

    #[test]
    fn result_round_trip_and_sentinel() {
        let encoded = encode_value(&Value::Int(3));
        assert_eq!(decode_result(&encoded).unwrap(), Some(Value::Int(3)));
        assert_eq!(decode_result(&encode_no_result()).unwrap(), None);
    }

    #[test]
    fn sentinel_is_not_a_value() {
        // The no-result marker must never decode as an ordinary value.
        assert!(matches!(
            decode_value(&encode_no_result()),
            Err(CodecError::UnknownTag(_))
        ));
    }

    #[test]
    fn garbage_is_a_syntax_error() {
        assert!(matches!(decode_args("not json"), Err(CodecError::Syntax(_))));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(
            decode_value(r#"{"x":1}"#),
            Err(CodecError::UnknownTag(_))
        ));
    }

    #[test]
    fn multi_key_object_is_rejected() {
        assert!(matches!(
            decode_value(r#"{"s":"a","i":1}"#),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn wrong_payload_type_is_rejected() {
        assert!(matches!(
            decode_value(r#"{"i":"42"}"#),
            Err(CodecError::InvalidPayload { tag: "i" })
        ));
        assert!(matches!(
            decode_value(r#"{"s":5}"#),
            Err(CodecError::InvalidPayload { tag: "s" })
        ));
    }

    #[test]
    fn bad_base64_is_rejected() {
        assert!(matches!(
            decode_value(r#"{"b":"!!!"}"#),
            Err(CodecError::InvalidBase64(_))
        ));
    }

    #[test]
    fn non_array_args_are_rejected() {
        assert!(matches!(
            decode_args(r#"{"s":"a"}"#),
            Err(CodecError::Malformed(_))
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn value_strategy() -> impl Strategy<Value = Value> {
            prop_oneof![
                any::<String>().prop_map(Value::Text),
                prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
                any::<i64>().prop_map(Value::Int),
                any::<f64>().prop_map(Value::Float),
            ]
        }

        proptest! {
            // Compare re-encoded text rather than values so NaN payloads
            // (which are never equal to themselves) still count as stable.
            #[test]
            fn arg_tuples_survive_the_codec(
                args in prop::collection::vec(value_strategy(), 0..8)
            ) {
                let encoded = encode_args(&args);
                let decoded = decode_args(&encoded).unwrap();
                prop_assert_eq!(encode_args(&decoded), encoded);
            }

            #[test]
            fn decoding_arbitrary_text_never_panics(text in ".*") {
                let _ = decode_args(&text);
                let _ = decode_result(&text);
            }
        }
    }
}
