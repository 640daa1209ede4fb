//! Encoders: [`Value`] → bytes in the target format.
//!
//! [`Value`] implements `Serialize`, so each encoder is a serde serializer:
//!
//! - **JSON**: pretty-printed with 2-space indentation, keys in mapping order.
//!   Non-finite floats have no JSON spelling and are written as `null`.
//! - **YAML**: block style; `Null` is written as `null`.
//! - **MessagePack**: integers in their most compact exact form, `Float` as
//!   float64, strings as `str`, mappings with `str` keys.
//!
//! The output carries no trailing-newline policy; that belongs to
//! [`convert`](crate::convert::convert).

use tracing::trace;

use crate::error::EncodeError;
use crate::format::Format;
use crate::value::Value;

/// Encode `value` as `format`.
///
/// ```
/// use mpt_core::{encode, Format, Value};
/// let bytes = encode(&Value::Sequence(vec![Value::Int(1)]), Format::Json).unwrap();
/// assert_eq!(bytes, b"[\n  1\n]");
/// ```
pub fn encode(value: &Value, format: Format) -> Result<Vec<u8>, EncodeError> {
    trace!(%format, kind = value.kind(), "encoding");
    match format {
        Format::Json => encode_json(value),
        Format::Yaml => encode_yaml(value),
        Format::Msgpack => encode_msgpack(value),
        Format::Unknown => Err(EncodeError::new(
            Format::Unknown,
            "no encoder for an unresolved format",
        )),
    }
}

fn encode_json(value: &Value) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec_pretty(value).map_err(|err| EncodeError::new(Format::Json, err.to_string()))
}

fn encode_yaml(value: &Value) -> Result<Vec<u8>, EncodeError> {
    serde_yaml::to_string(value)
        .map(String::into_bytes)
        .map_err(|err| EncodeError::new(Format::Yaml, err.to_string()))
}

fn encode_msgpack(value: &Value) -> Result<Vec<u8>, EncodeError> {
    rmp_serde::to_vec(value).map_err(|err| EncodeError::new(Format::Msgpack, err.to_string()))
}
