//! Normalization: reshape each decoder's native tree into a [`Value`].
//!
//! Every decoder hands back whatever its parser produces natively. This pass is
//! the only place that knows about those shapes, and it enforces the invariants
//! the encoders rely on:
//!
//! - **Text keys**: non-string mapping keys (YAML `1: a`, MessagePack integer keys)
//!   are rendered with [`key_text`]. When two keys render the same, the later one wins.
//! - **Resolved numbers**: precision-preserving number tokens are resolved with
//!   [`resolve_number`]: `Int` when the literal fits an `i64`, otherwise `Float`,
//!   otherwise the literal text.
//! - **No format-specific leaves**: MessagePack binary and extension payloads and
//!   YAML tags collapse into the seven [`Value`] variants.
//!
//! Normalization never fails.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat};

use crate::decoder::Native;
use crate::value::{Mapping, Value};

/// MessagePack extension type reserved for timestamps.
const TIMESTAMP_EXT: i8 = -1;

/// Conversion from a decoder's native tree into the canonical [`Value`].
pub trait Normalize {
    fn normalize(self) -> Value;
}

impl Normalize for Native {
    fn normalize(self) -> Value {
        match self {
            Native::Json(value) => value.normalize(),
            Native::Yaml(value) => value.normalize(),
            Native::Msgpack(value) => value.normalize(),
        }
    }
}

impl Normalize for serde_json::Value {
    fn normalize(self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // With `arbitrary_precision` the number's text is the original literal.
            serde_json::Value::Number(n) => resolve_number(&n.to_string()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Normalize::normalize).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, value.normalize()))
                    .collect(),
            ),
        }
    }
}

impl Normalize for serde_yaml::Value {
    fn normalize(self) -> Value {
        match self {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Float(u as f64)
                } else {
                    // Every serde_yaml number is representable as f64.
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Normalize::normalize).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key_text(key.normalize()), value.normalize());
                }
                Value::Mapping(out)
            }
            serde_yaml::Value::Tagged(tagged) => tagged.value.normalize(),
        }
    }
}

impl Normalize for rmpv::Value {
    fn normalize(self) -> Value {
        match self {
            rmpv::Value::Nil => Value::Null,
            rmpv::Value::Boolean(b) => Value::Bool(b),
            rmpv::Value::Integer(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            rmpv::Value::F32(f) => Value::Float(f64::from(f)),
            rmpv::Value::F64(f) => Value::Float(f),
            rmpv::Value::String(s) => match s.as_str() {
                Some(text) => Value::String(text.to_string()),
                None => Value::String(String::from_utf8_lossy(s.as_bytes()).into_owned()),
            },
            rmpv::Value::Binary(bytes) => Value::String(blob_text(bytes)),
            rmpv::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Normalize::normalize).collect())
            }
            rmpv::Value::Map(entries) => {
                let mut out = Mapping::with_capacity(entries.len());
                for (key, value) in entries {
                    out.insert(key_text(key.normalize()), value.normalize());
                }
                Value::Mapping(out)
            }
            rmpv::Value::Ext(kind, data) => Value::String(ext_text(kind, &data)),
        }
    }
}

/// Resolve a numeric literal: `Int` if it fits an `i64`, else `Float` if it is
/// within `f64` range, else the literal itself as `String`.
///
/// ```
/// use mpt_core::{normalize::resolve_number, Value};
/// assert_eq!(resolve_number("9223372036854775807"), Value::Int(i64::MAX));
/// assert_eq!(resolve_number("9223372036854775808"), Value::Float(9223372036854775808.0));
/// assert_eq!(resolve_number("1e3"), Value::Float(1000.0));
/// assert_eq!(resolve_number("1e400"), Value::from("1e400"));
/// ```
pub fn resolve_number(literal: &str) -> Value {
    if let Ok(i) = literal.parse::<i64>() {
        return Value::Int(i);
    }
    // `parse` saturates out-of-range literals to infinity.
    match literal.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Float(f),
        _ => Value::String(literal.to_string()),
    }
}

/// Textual form of a mapping key.
///
/// Strings are kept verbatim; scalars use their usual rendering (`null`, `true`,
/// `2`, `1.5`, `1e+20`); sequence and mapping keys become compact JSON.
pub fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => float_key_text(f),
        compound => {
            serde_json::to_string(&compound).unwrap_or_else(|_| format!("{compound:?}"))
        }
    }
}

/// Shortest rendering of a float key. Exponents below -4 or from 6 up switch
/// to `1e+20` / `2.5e-07` notation with at least two exponent digits.
fn float_key_text(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return f.to_string();
    };
    if (-4..6).contains(&exponent) {
        return f.to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// Binary payloads stay readable when they happen to be UTF-8, otherwise they
/// become standard base64.
fn blob_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => STANDARD.encode(err.into_bytes()),
    }
}

/// Timestamps become RFC 3339 strings; any other extension, or a malformed
/// timestamp, becomes the base64 of its payload.
fn ext_text(kind: i8, data: &[u8]) -> String {
    if kind == TIMESTAMP_EXT {
        if let Some(stamp) = timestamp_text(data) {
            return stamp;
        }
    }
    STANDARD.encode(data)
}

/// Decode the 32-, 64-, and 96-bit MessagePack timestamp layouts.
fn timestamp_text(data: &[u8]) -> Option<String> {
    let (secs, nanos) = match data.len() {
        4 => (i64::from(u32::from_be_bytes(data.try_into().ok()?)), 0),
        8 => {
            let raw = u64::from_be_bytes(data.try_into().ok()?);
            ((raw & 0x3_ffff_ffff) as i64, (raw >> 34) as u32)
        }
        12 => {
            let nanos = u32::from_be_bytes(data[..4].try_into().ok()?);
            let secs = i64::from_be_bytes(data[4..].try_into().ok()?);
            (secs, nanos)
        }
        _ => return None,
    };
    if nanos > 999_999_999 {
        return None;
    }
    let stamp = DateTime::from_timestamp(secs, nanos)?;
    Some(stamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
