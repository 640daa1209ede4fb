//! # mpt-core
//!
//! Lossless conversion between **MessagePack**, **JSON**, and **YAML**.
//!
//! Every conversion goes through one format-neutral tree, [`Value`]: the source
//! bytes are decoded by the format's parser, [normalized](normalize) into a
//! `Value` (text keys, resolved numbers, no format-specific leaves), and encoded
//! by the target format's serializer.
//!
//! ## Quick start
//!
//! ```rust
//! use mpt_core::{convert, decode, Format, Value};
//!
//! // JSON → MessagePack
//! let packed = convert(br#"{"id":9223372036854775807,"tags":["a","b"]}"#, Format::Json, Format::Msgpack).unwrap();
//!
//! // MessagePack → JSON, integers intact
//! let json = convert(&packed, Format::Msgpack, Format::Json).unwrap();
//! let value = decode(&json, Format::Json).unwrap();
//! assert_eq!(value.get("id"), Some(&Value::Int(i64::MAX)));
//! assert!(json.ends_with(b"\n"));
//! ```
//!
//! ## Modules
//!
//! - [`convert`](mod@convert) — the pipeline (`convert`, trailing-newline policy)
//! - [`decoder`] — bytes → native parse tree → `Value`
//! - [`normalize`] — native parse trees → `Value`
//! - [`encoder`] — `Value` → bytes
//! - [`format`] — `Format` selection and extension inference
//! - [`value`] — the `Value` tree
//! - [`error`] — error types
//!
//! ## Limits
//!
//! Every decoder rejects documents nested deeper than [`MAX_DEPTH`] levels, so
//! any tree that decodes from one format can be encoded into and decoded back
//! from every other.

pub mod convert;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod normalize;
pub mod value;

pub use convert::{convert, ensure_trailing_newline};
pub use decoder::{decode, decode_native, Native, MAX_DEPTH};
pub use encoder::encode;
pub use error::{ConvertError, DecodeError, EncodeError, FormatError, Result};
pub use format::Format;
pub use normalize::Normalize;
pub use value::{Mapping, Value};
