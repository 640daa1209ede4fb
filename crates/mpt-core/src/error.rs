//! Error types for decoding, encoding, format resolution, and conversion.

use thiserror::Error;

use crate::format::Format;

/// The input bytes did not parse as the claimed format.
///
/// Empty input is reported through this type for JSON and MessagePack.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("decode {format}: {message}")]
pub struct DecodeError {
    pub format: Format,
    pub message: String,
}

impl DecodeError {
    pub fn new(format: Format, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }
}

/// A value tree could not be serialized into the target format.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("encode {format}: {message}")]
pub struct EncodeError {
    pub format: Format,
    pub message: String,
}

impl EncodeError {
    pub fn new(format: Format, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }
}

/// A format name or file path could not be mapped to a [`Format`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// An explicit format name that is not one of the supported tags.
    #[error("unknown format {0:?}")]
    Unknown(String),

    /// A path whose extension does not identify a supported format.
    #[error("unable to infer format from {0:?}")]
    Undetectable(String),
}

/// Errors surfaced by [`convert`](crate::convert::convert).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Either side of the conversion is still [`Format::Unknown`].
    /// Raised before any decode attempt.
    #[error("unsupported conversion from \"{from}\" to \"{to}\"")]
    UnsupportedConversion { from: Format, to: Format },

    #[error("convert {from} to {to}: {cause}")]
    Decode {
        from: Format,
        to: Format,
        cause: DecodeError,
    },

    #[error("convert {from} to {to}: {cause}")]
    Encode {
        from: Format,
        to: Format,
        cause: EncodeError,
    },
}

/// Convenience alias used throughout mpt-core.
pub type Result<T> = std::result::Result<T, ConvertError>;
