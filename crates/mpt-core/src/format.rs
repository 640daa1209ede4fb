//! Format selection: the supported formats, name parsing, and extension-based inference.
//!
//! A format that has not been determined yet is [`Format::Unknown`] rather than an
//! empty string or an `Option`, so the unresolved state stays visible in signatures
//! and in error messages.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::FormatError;

/// One of the three interchange formats, or the unresolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Unknown,
    Json,
    Yaml,
    Msgpack,
}

impl Format {
    /// Parse a user-supplied format name (case-insensitive).
    ///
    /// Accepts `json`, `yaml`/`yml`, and `msgpack`/`mpk`/`binary`.
    pub fn parse(name: &str) -> Result<Format, FormatError> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "msgpack" | "mpk" | "binary" => Ok(Format::Msgpack),
            _ => Err(FormatError::Unknown(name.to_string())),
        }
    }

    /// Infer the format of a file from its extension (case-insensitive).
    ///
    /// ```
    /// use mpt_core::Format;
    /// assert_eq!(Format::detect("data/users.YML").unwrap(), Format::Yaml);
    /// assert!(Format::detect("notes.txt").is_err());
    /// ```
    pub fn detect(path: impl AsRef<Path>) -> Result<Format, FormatError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("msgpack") | Some("mpk") => Ok(Format::Msgpack),
            _ => Err(FormatError::Undetectable(path.display().to_string())),
        }
    }

    /// Use the explicit format when one was given, otherwise infer it from `path`.
    pub fn resolve(explicit: Option<Format>, path: impl AsRef<Path>) -> Result<Format, FormatError> {
        match explicit {
            Some(format) if format != Format::Unknown => Ok(format),
            _ => Format::detect(path),
        }
    }

    /// Conventional file extension (without the dot) for output files.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Format::Json => Some("json"),
            Format::Yaml => Some("yaml"),
            Format::Msgpack => Some("msgpack"),
            Format::Unknown => None,
        }
    }

    /// Line-oriented text formats receive a trailing newline after encoding.
    pub fn is_text(self) -> bool {
        matches!(self, Format::Json | Format::Yaml)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Unknown => "unknown",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Msgpack => "msgpack",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_in_any_case() {
        assert_eq!(Format::parse("JSON").unwrap(), Format::Json);
        assert_eq!(Format::parse("yml").unwrap(), Format::Yaml);
        assert_eq!(Format::parse("Yaml").unwrap(), Format::Yaml);
        assert_eq!(Format::parse("mpk").unwrap(), Format::Msgpack);
        assert_eq!(Format::parse("binary").unwrap(), Format::Msgpack);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = Format::parse("toml").unwrap_err();
        assert_eq!(err, FormatError::Unknown("toml".to_string()));
        assert_eq!(err.to_string(), "unknown format \"toml\"");
    }

    #[test]
    fn detect_by_extension() {
        assert_eq!(Format::detect("a.json").unwrap(), Format::Json);
        assert_eq!(Format::detect("a.yaml").unwrap(), Format::Yaml);
        assert_eq!(Format::detect("dir/a.yml").unwrap(), Format::Yaml);
        assert_eq!(Format::detect("a.msgpack").unwrap(), Format::Msgpack);
        assert_eq!(Format::detect("A.MPK").unwrap(), Format::Msgpack);
    }

    #[test]
    fn detect_fails_without_known_extension() {
        let err = Format::detect("weird.bin").unwrap_err();
        assert_eq!(err.to_string(), "unable to infer format from \"weird.bin\"");
        assert!(Format::detect("Makefile").is_err());
    }

    #[test]
    fn resolve_prefers_explicit_format() {
        assert_eq!(
            Format::resolve(Some(Format::Msgpack), "input.json").unwrap(),
            Format::Msgpack
        );
        assert_eq!(Format::resolve(None, "input.json").unwrap(), Format::Json);
        assert_eq!(
            Format::resolve(Some(Format::Unknown), "input.yml").unwrap(),
            Format::Yaml
        );
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(Format::default(), Format::Unknown);
        assert_eq!(Format::Unknown.to_string(), "unknown");
        assert_eq!(Format::Unknown.extension(), None);
    }

    #[test]
    fn only_text_formats_get_newlines() {
        assert!(Format::Json.is_text());
        assert!(Format::Yaml.is_text());
        assert!(!Format::Msgpack.is_text());
        assert!(!Format::Unknown.is_text());
    }
}
