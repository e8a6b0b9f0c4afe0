//! # toon
//!
//! A Serde-compatible codec for the TOON (Token-Oriented Object Notation) format.
//!
//! ## What is TOON?
//!
//! TOON is a line-oriented, indentation-sensitive data format designed for
//! compact, human-readable communication with Large Language Models. It
//! represents the same tree JSON does, with less punctuation: no braces, no
//! brackets around objects, no quotes around most strings, and homogeneous
//! object arrays collapse into a table with one header line.
//!
//! ## Key Features
//!
//! - **Token-Efficient**: indentation replaces braces/brackets; quoting is
//!   applied only where ambiguity would otherwise result
//! - **Tabular Arrays**: homogeneous object arrays serialize as a header plus
//!   one row per element, in the field order of the first element
//! - **Serde Compatible**: works with existing Rust types via `#[derive(Serialize, Deserialize)]`
//! - **Strict and lax decoding**: strict mode enforces indentation, array
//!   count coherence, and duplicate-key rejection; lax mode treats those as
//!   best-effort
//! - **No unsafe code**
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! toon = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use toon::{to_string, from_str};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let toon_string = to_string(&user).unwrap();
//! // Output: "id: 123\nname: Alice\nactive: true"
//!
//! let user_back: User = from_str(&toon_string).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Working with Arrays (Tabular Format)
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use toon::to_string;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Product {
//!     id: u32,
//!     name: String,
//!     price: f64,
//! }
//!
//! let products = vec![
//!     Product { id: 1, name: "Widget".to_string(), price: 9.99 },
//!     Product { id: 2, name: "Gadget".to_string(), price: 14.99 },
//! ];
//!
//! let toon = to_string(&products).unwrap();
//! // Output: "[2]{id,name,price}:\n  1,Widget,9.99\n  2,Gadget,14.99"
//! ```
//!
//! ### Dynamic Values with the toon! Macro
//!
//! ```rust
//! use toon::{toon, Value};
//!
//! let data = toon!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde", "llm"]
//! });
//!
//! if let Value::Object(obj) = data {
//!     assert_eq!(obj.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! }
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All array indexing is bounds-checked
//! - Proper error propagation with `Result` types
//! - No panics in public API (except for logic errors that indicate bugs)
//!
//! ## Examples
//!
//! See the `demos/` directory for focused, runnable examples:
//!
//! - **`simple.rs`** - basic serialization
//! - **`macro.rs`** - building values with the toon! macro
//! - **`tabular_arrays.rs`** - TOON's killer feature for repeated structures
//! - **`dynamic_values.rs`** - working with `Value` dynamically
//! - **`custom_options.rs`** - customizing delimiters and formatting
//! - **`token_efficiency.rs`** - TOON vs JSON comparison
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod lexical;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod spec;
pub mod value;

pub use de::ValueDeserializer;
pub use error::{Error, Result};
pub use map::ToonMap;
pub use options::{Delimiter, Options};
pub use ser::{to_toon_string, ToonValueSerializer};
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::io;

/// Serializes any `T: Serialize` to a TOON string, using [`Options::default`].
///
/// # Errors
///
/// Returns an error if the value cannot be represented in TOON (e.g. a map
/// with non-string keys, or a type `serde` can't turn into a tree).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, Options::default())
}

/// Serializes any `T: Serialize` to a TOON string with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let tree = value.serialize(ToonValueSerializer)?;
    to_toon_string(&tree, &options)
}

/// Converts any `T: Serialize` to a [`Value`] tree, without encoding it to text.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ToonValueSerializer)
}

/// Serializes any `T: Serialize` to a writer in TOON format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, Options::default())
}

/// Serializes any `T: Serialize` to a writer in TOON format with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: Options) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let toon_string = to_string_with_options(value, options)?;
    writer
        .write_all(toon_string.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserializes an instance of type `T` from a string of TOON text, using
/// [`Options::default`] (strict mode).
///
/// # Errors
///
/// Returns an error if the input is not valid TOON, or cannot be
/// deserialized to type `T`. Structural and lexical errors carry a 1-based
/// source line.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_str_with_options(s, Options::default())
}

/// Deserializes an instance of type `T` from a string of TOON text with
/// custom options (e.g. [`Options::lax`]).
///
/// # Errors
///
/// Returns an error if the input is not valid TOON, or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<'a, T>(s: &'a str, options: Options) -> Result<T>
where
    T: Deserialize<'a>,
{
    let tree = de::from_toon_str(s, &options)?;
    T::deserialize(ValueDeserializer::new(tree))
}

/// Deserializes an instance of type `T` from an I/O stream of TOON.
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not
/// valid TOON, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserializes an instance of type `T` from bytes of TOON text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid TOON, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(v: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
