//! Decoders: raw bytes in one of the supported formats → native parse tree → [`Value`].
//!
//! Each decoder delegates to the format's established parser and wraps its
//! output in [`Native`] untouched. Turning that into a [`Value`] is the
//! [normalizer](crate::normalize)'s job, so the parsers' own number and key
//! types never leak past this module boundary.
//!
//! # Empty input
//!
//! - JSON and MessagePack: an error, since there is no value to decode.
//! - YAML: `Null`. An empty YAML stream is a valid, empty document.
//!
//! # YAML streams
//!
//! Only the first document of a multi-document stream is read, and merge keys
//! (`<<: *base`) are applied before the tree leaves this module.
//!
//! # Nesting depth
//!
//! Every format accepts at most [`MAX_DEPTH`] levels of nested sequences and
//! mappings. The cap sits below the JSON and YAML parsers' own recursion limits,
//! so whatever one decoder accepts, every encoder output can be decoded again.

use serde::Deserialize;
use tracing::trace;

use crate::error::DecodeError;
use crate::format::Format;
use crate::normalize::Normalize;
use crate::value::Value;

/// A parse tree exactly as the format's parser produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Json(serde_json::Value),
    Yaml(serde_yaml::Value),
    Msgpack(rmpv::Value),
}

/// Decode `input` as `format` and normalize the result.
///
/// ```
/// use mpt_core::{decode, Format, Value};
/// let value = decode(b"{\"n\": 9223372036854775807}", Format::Json).unwrap();
/// assert_eq!(value.get("n"), Some(&Value::Int(i64::MAX)));
/// ```
pub fn decode(input: &[u8], format: Format) -> Result<Value, DecodeError> {
    Ok(decode_native(input, format)?.normalize())
}

/// Maximum nesting of sequences and mappings accepted by every decoder.
pub const MAX_DEPTH: usize = 100;

/// Decode `input` as `format` without normalizing.
pub fn decode_native(input: &[u8], format: Format) -> Result<Native, DecodeError> {
    trace!(%format, bytes = input.len(), "decoding");
    let native = match format {
        Format::Json => decode_json(input).map(Native::Json),
        Format::Yaml => decode_yaml(input).map(Native::Yaml),
        Format::Msgpack => decode_msgpack(input).map(Native::Msgpack),
        Format::Unknown => Err(DecodeError::new(
            Format::Unknown,
            "no decoder for an unresolved format",
        )),
    }?;
    if native.exceeds_depth(MAX_DEPTH) {
        return Err(DecodeError::new(
            format,
            format!("nesting exceeds {MAX_DEPTH} levels"),
        ));
    }
    Ok(native)
}

impl Native {
    /// Whether any path through the tree nests more than `limit` containers.
    /// Never descends further than `limit + 1` levels.
    fn exceeds_depth(&self, limit: usize) -> bool {
        match self {
            Native::Json(value) => json_exceeds(value, limit),
            Native::Yaml(value) => yaml_exceeds(value, limit),
            Native::Msgpack(value) => msgpack_exceeds(value, limit),
        }
    }
}

fn json_exceeds(value: &serde_json::Value, remaining: usize) -> bool {
    let mut children: Box<dyn Iterator<Item = &serde_json::Value> + '_> = match value {
        serde_json::Value::Array(items) => Box::new(items.iter()),
        serde_json::Value::Object(map) => Box::new(map.values()),
        _ => return false,
    };
    remaining == 0 || children.any(|child| json_exceeds(child, remaining - 1))
}

fn yaml_exceeds(value: &serde_yaml::Value, remaining: usize) -> bool {
    let mut children: Box<dyn Iterator<Item = &serde_yaml::Value> + '_> = match value {
        serde_yaml::Value::Sequence(items) => Box::new(items.iter()),
        serde_yaml::Value::Mapping(map) => Box::new(map.iter().flat_map(|(k, v)| [k, v])),
        serde_yaml::Value::Tagged(tagged) => return yaml_exceeds(&tagged.value, remaining),
        _ => return false,
    };
    remaining == 0 || children.any(|child| yaml_exceeds(child, remaining - 1))
}

fn msgpack_exceeds(value: &rmpv::Value, remaining: usize) -> bool {
    let mut children: Box<dyn Iterator<Item = &rmpv::Value> + '_> = match value {
        rmpv::Value::Array(items) => Box::new(items.iter()),
        rmpv::Value::Map(entries) => Box::new(entries.iter().flat_map(|(k, v)| [k, v])),
        _ => return false,
    };
    remaining == 0 || children.any(|child| msgpack_exceeds(child, remaining - 1))
}

/// Strict JSON. Number literals are kept verbatim (`arbitrary_precision`) until
/// normalization, so integers beyond 2^53 are not rounded on the way in.
fn decode_json(input: &[u8]) -> Result<serde_json::Value, DecodeError> {
    serde_json::from_slice(input).map_err(|err| DecodeError::new(Format::Json, err.to_string()))
}

/// First document of the stream, with merge keys applied.
fn decode_yaml(input: &[u8]) -> Result<serde_yaml::Value, DecodeError> {
    if input.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_yaml::Value::Null);
    }
    let yaml_error = |err: serde_yaml::Error| DecodeError::new(Format::Yaml, err.to_string());
    let Some(document) = serde_yaml::Deserializer::from_slice(input).next() else {
        return Ok(serde_yaml::Value::Null);
    };
    let mut value = serde_yaml::Value::deserialize(document).map_err(yaml_error)?;
    value.apply_merge().map_err(yaml_error)?;
    Ok(value)
}

/// Exactly one top-level MessagePack value; leftover bytes are an error.
fn decode_msgpack(input: &[u8]) -> Result<rmpv::Value, DecodeError> {
    if input.is_empty() {
        return Err(DecodeError::new(Format::Msgpack, "empty input"));
    }
    let mut rest = input;
    let value = rmpv::decode::read_value(&mut rest)
        .map_err(|err| DecodeError::new(Format::Msgpack, err.to_string()))?;
    if !rest.is_empty() {
        return Err(DecodeError::new(
            Format::Msgpack,
            format!(
                "{} trailing bytes after value at offset {}",
                rest.len(),
                input.len() - rest.len()
            ),
        ));
    }
    Ok(value)
}
