//! Configuration options for the TOON codec.
//!
//! - [`Options`]: indentation, delimiter, length-marker, and strictness knobs
//! - [`Delimiter`]: choice of field separator for arrays and tables
//!
//! ## Examples
//!
//! ```rust
//! use toon::{Options, Delimiter, to_string_with_options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let data = Data { x: 1, y: 2 };
//!
//! let options = Options::new().with_delimiter(Delimiter::Pipe);
//! let toon = to_string_with_options(&data, options).unwrap();
//!
//! let options = Options::new().with_length_marker(true);
//! let toon = to_string_with_options(&vec![1, 2, 3], options).unwrap();
//! // Output: "[#3]: 1,2,3"
//! ```

/// Delimiter choice for TOON arrays and tables.
///
/// - **Comma**: default, most compact
/// - **Tab**: TSV-like output
/// - **Pipe**: readable for markdown-style tables
///
/// # Examples
///
/// ```rust
/// use toon::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_char(), ',');
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// The literal character used to separate cells in emitted text.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    /// The suffix placed inside an array/table header's `[N...]` bracket to
    /// mark a non-default delimiter. Comma needs none; tab and pipe are the
    /// delimiter character itself.
    #[must_use]
    pub const fn header_suffix(&self) -> &'static str {
        match self {
            Delimiter::Comma => "",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// Recovers a delimiter from a parsed header suffix. Returns `None` for
    /// any suffix that isn't one of the three recognized forms.
    #[must_use]
    pub fn from_header_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Delimiter::Comma),
            "\t" => Some(Delimiter::Tab),
            "|" => Some(Delimiter::Pipe),
            _ => None,
        }
    }
}

/// Configuration for both encode and decode.
///
/// # Examples
///
/// ```rust
/// use toon::{Options, Delimiter};
///
/// let options = Options::new();
/// assert_eq!(options.indent_size, 2);
/// assert!(options.strict);
///
/// let options = Options::new()
///     .with_delimiter(Delimiter::Pipe)
///     .with_length_marker(true)
///     .with_indent_size(4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    /// Spaces per indentation level. Valid range is 1..=8; out-of-range
    /// values are clamped by the builder methods.
    pub indent_size: usize,
    pub delimiter: Delimiter,
    /// When `true`, array headers carry a `#` length marker: `[#3]` instead of `[3]`.
    pub use_length_marker: bool,
    /// When `true` (the default), the decoder enforces every structural
    /// check (indentation multiples, count coherence, no blank lines inside
    /// array bodies, no tabs, no duplicate keys). When `false`, those
    /// checks are best-effort; genuine lexical errors remain fatal either way.
    pub strict: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            indent_size: 2,
            delimiter: Delimiter::default(),
            use_length_marker: false,
            strict: true,
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for lax decoding: structural checks are best-effort.
    /// Encoding is unaffected by strictness.
    #[must_use]
    pub fn lax() -> Self {
        Options {
            strict: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size.clamp(1, 8);
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_length_marker(mut self, use_length_marker: bool) -> Self {
        self.use_length_marker = use_length_marker;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let options = Options::default();
        assert_eq!(options.indent_size, 2);
        assert_eq!(options.delimiter, Delimiter::Comma);
        assert!(!options.use_length_marker);
        assert!(options.strict);
    }

    #[test]
    fn indent_size_clamped_to_valid_range() {
        assert_eq!(Options::new().with_indent_size(0).indent_size, 1);
        assert_eq!(Options::new().with_indent_size(20).indent_size, 8);
    }

    #[test]
    fn header_suffix_roundtrips_through_delimiter() {
        for d in [Delimiter::Comma, Delimiter::Tab, Delimiter::Pipe] {
            assert_eq!(Delimiter::from_header_suffix(d.header_suffix()), Some(d));
        }
    }
}
