//! Error types for the TOON codec.
//!
//! Every decode error names the failed rule and carries the 1-based source
//! line (plus column, where the failing token's position is known). Errors
//! fall into three families, matching where in the pipeline they're raised:
//!
//! - [`Error::Structural`]: the document's shape is wrong (indentation,
//!   array-length coherence, row width, duplicate keys).
//! - [`Error::Lexical`]: a token couldn't be read (unterminated string, bad
//!   escape, malformed header).
//! - [`Error::Semantic`]: the tokens are well-formed but violate a
//!   higher-level rule (e.g. array-without-key in a context that requires one).
//!
//! ## Examples
//!
//! ```rust
//! use toon::{from_str, Error, Value};
//!
//! let result: Result<Value, Error> = from_str("invalid: [malformed");
//! assert!(result.is_err());
//! ```

use std::fmt;
use thiserror::Error as ThisError;

/// All errors the TOON codec can produce.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    /// I/O failure reading or writing the underlying stream.
    #[error("IO error: {0}")]
    Io(String),

    /// The document's shape violates a structural invariant: indentation
    /// that isn't a multiple of the configured indent size, a declared
    /// array length that doesn't match the number of elements found, a
    /// tabular row with the wrong number of cells, or a duplicate object key.
    #[error("structural error at line {line}: {rule}: {msg}")]
    Structural {
        line: usize,
        col: Option<usize>,
        rule: String,
        msg: String,
    },

    /// A token could not be read at all: an unterminated quoted string, an
    /// invalid escape sequence, or a malformed array header.
    #[error("lexical error at line {line}: {rule}: {msg}")]
    Lexical {
        line: usize,
        col: Option<usize>,
        rule: String,
        msg: String,
    },

    /// The tokens parsed but violate a rule about what may appear where,
    /// such as an array with no enclosing key outside a root or list context.
    #[error("semantic error at line {line}: {rule}: {msg}")]
    Semantic {
        line: usize,
        col: Option<usize>,
        rule: String,
        msg: String,
    },

    /// A type could not be serialized to or deserialized from TOON.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Catch-all for `serde::ser::Error`/`serde::de::Error` custom messages.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn structural(line: usize, rule: &str, msg: impl Into<String>) -> Self {
        Error::Structural {
            line,
            col: None,
            rule: rule.to_string(),
            msg: msg.into(),
        }
    }

    pub fn structural_at(line: usize, col: usize, rule: &str, msg: impl Into<String>) -> Self {
        Error::Structural {
            line,
            col: Some(col),
            rule: rule.to_string(),
            msg: msg.into(),
        }
    }

    pub fn lexical(line: usize, rule: &str, msg: impl Into<String>) -> Self {
        Error::Lexical {
            line,
            col: None,
            rule: rule.to_string(),
            msg: msg.into(),
        }
    }

    pub fn lexical_at(line: usize, col: usize, rule: &str, msg: impl Into<String>) -> Self {
        Error::Lexical {
            line,
            col: Some(col),
            rule: rule.to_string(),
            msg: msg.into(),
        }
    }

    pub fn semantic(line: usize, rule: &str, msg: impl Into<String>) -> Self {
        Error::Semantic {
            line,
            col: None,
            rule: rule.to_string(),
            msg: msg.into(),
        }
    }

    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Error::UnsupportedType(msg.into())
    }

    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// The 1-based source line this error is attached to, if any (`Io`,
    /// `UnsupportedType`, and `Custom` carry no position).
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Structural { line, .. }
            | Error::Lexical { line, .. }
            | Error::Semantic { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
