//! The conversion pipeline: decode → normalize → encode → trailing newline.

use tracing::debug;

use crate::decoder::decode_native;
use crate::encoder::encode;
use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::normalize::Normalize;

/// Convert `input` from one format to another.
///
/// Fails with [`ConvertError::UnsupportedConversion`] before decoding if either
/// format is [`Format::Unknown`]. JSON and YAML output always ends with exactly
/// one added `\n` unless the encoder already produced one; MessagePack output is
/// returned as encoded. Nothing is returned on failure.
///
/// ```
/// use mpt_core::{convert, Format};
/// let packed = convert(br#"{"a":[1,2]}"#, Format::Json, Format::Msgpack).unwrap();
/// let yaml = convert(&packed, Format::Msgpack, Format::Yaml).unwrap();
/// assert_eq!(yaml, b"a:\n- 1\n- 2\n");
/// ```
pub fn convert(input: &[u8], from: Format, to: Format) -> Result<Vec<u8>> {
    if from == Format::Unknown || to == Format::Unknown {
        return Err(ConvertError::UnsupportedConversion { from, to });
    }

    let native = decode_native(input, from).map_err(|cause| ConvertError::Decode { from, to, cause })?;
    let value = native.normalize();
    let mut output = encode(&value, to).map_err(|cause| ConvertError::Encode { from, to, cause })?;

    if to.is_text() {
        ensure_trailing_newline(&mut output);
    }

    debug!(
        %from,
        %to,
        input_bytes = input.len(),
        output_bytes = output.len(),
        "converted"
    );
    Ok(output)
}

/// Append `\n` unless `data` already ends with one.
pub fn ensure_trailing_newline(data: &mut Vec<u8>) {
    if data.last() != Some(&b'\n') {
        data.push(b'\n');
    }
}
