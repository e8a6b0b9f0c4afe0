//! TOON Format Specification
//!
//! This module documents the TOON (Token-Oriented Object Notation) format as
//! implemented by this library.
//!
//! # Overview
//!
//! TOON is a minimalist data serialization format designed for efficient
//! token usage in Large Language Model (LLM) contexts. It trades JSON's
//! braces, brackets, and near-universal quoting for indentation and a small
//! set of unambiguous-quoting rules, while remaining a faithful encoding of
//! the same JSON-equivalent tree (null, bool, number, string, array, object).
//!
//! ## Design Philosophy
//!
//! - **Token Efficiency**: eliminate syntactic overhead (braces, brackets,
//!   redundant quotes)
//! - **Readability**: maintain clarity through meaningful indentation
//! - **Structural Typing**: leverage homogeneous data patterns for tabular
//!   compression
//! - **Exactness**: every document decodes to exactly the tree that produced
//!   it; there is no format-specific extra type beyond JSON's own
//!
//! # Core Syntax
//!
//! ## Objects
//!
//! Objects use newline-delimited key-value pairs with colon separation:
//!
//! ```text
//! name: Alice
//! age: 30
//! active: true
//! ```
//!
//! **Rules**:
//! - Keys must match the identifier pattern `/^[a-zA-Z_][a-zA-Z0-9_.]*$/` or
//!   be quoted:
//!   - Start with a letter (`a-z`, `A-Z`) or underscore `_`
//!   - Contain only letters, digits, underscores, or dots
//!   - Examples: `userName`, `user_name`, `user.email` (all valid unquoted)
//!   - Keys starting with digits or containing hyphens must be quoted:
//!     `"2ndPlace"`, `"user-id"`
//! - Values follow the `:` separator (a space after `:` is conventional)
//! - Nested objects are indented (default 2 spaces per level)
//! - **Field order is insertion order, never re-sorted.** A tabular array's
//!   `{fields}` header and a list item's field sequence both reproduce the
//!   order fields were inserted in, because the decoded tree must round-trip
//!   back to the exact structure that was encoded.
//!
//! ## Primitives
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Null | `null` | `value: null` |
//! | Boolean | `true` or `false` | `active: true` |
//! | Number | Decimal digits, optional `-`, optional `.` fraction | `count: 42`, `price: 19.99` |
//! | String | Unquoted or `"quoted"` | `name: Alice` |
//!
//! There is exactly one number representation: `f64`. `NaN` and `±Infinity`
//! are never written as literals; a non-finite number always encodes as
//! `null`. There is no date type and no big-integer type at this layer — a
//! timestamp or an oversized integer is simply a `String` if it can't fit
//! losslessly in an `f64`, exactly as it would be in JSON.
//!
//! ## Strings
//!
//! Strings are **unquoted by default** to minimize tokens. Quoting is
//! required when:
//!
//! - The string is empty or contains only whitespace: `""`, `"  "`
//! - It contains the **active delimiter** for the current context (comma by
//!   default; only the active delimiter triggers quoting, not the others)
//! - It contains a colon `:` (conflicts with the key-value separator)
//! - It contains a quote, backslash, or a raw newline/carriage-return/tab
//! - It starts or ends with whitespace (trimming ambiguity)
//! - It matches a reserved word: `true`, `false`, `null`
//! - It is numeric-like: parses as a number, **including** a string with a
//!   leading zero that would otherwise be ambiguous (`"05"`, `"-007"` stay
//!   quoted strings; they are never treated as malformed numbers)
//! - It starts with `-` (ambiguous with both a negative number and a list
//!   item marker once followed by a space)
//! - It looks like a structural token: `[5]`, `{key}`, `[3]: x,y`
//!
//! **Examples**:
//! ```text
//! name: Alice          # Unquoted (safe)
//! note: hello world    # Unquoted (inner spaces OK)
//! data: "hello,world"  # Quoted (contains comma delimiter)
//! flag: "true"         # Quoted (reserved word)
//! id: "007"            # Quoted (numeric-like, leading zero)
//! ```
//!
//! **Escape sequences** (in quoted strings) — exactly five, no more:
//! ```text
//! \"  - quote
//! \\  - backslash
//! \n  - newline
//! \r  - carriage return
//! \t  - tab
//! ```
//!
//! # Number Formatting
//!
//! | Input | TOON Output | Notes |
//! |-------|-------------|-------|
//! | Finite number | Decimal notation | No scientific notation: `1000000` not `1e6` |
//! | `-0.0` | `0` | Negative zero normalizes away |
//! | `NaN`, `±Infinity` | `null` | Collapsed unconditionally; no flag preserves them |
//!
//! # Array Formats
//!
//! TOON uses three array formats based on content structure.
//!
//! ## Inline Arrays
//!
//! For **primitive values** (numbers, booleans, strings, null):
//!
//! ```text
//! [3]: 1,2,3
//! [2]: Alice,Bob
//! [4]: true,false,null,42
//! ```
//!
//! **Syntax**: `[N]: element1,element2,...`
//! - `N` = array length
//! - Elements comma-separated (no spaces by default)
//!
//! ## List Arrays
//!
//! For **complex or heterogeneous elements**:
//!
//! ```text
//! [2]:
//!   - name: Alice
//!     role: admin
//!   - name: Bob
//!     role: user
//! ```
//!
//! **Syntax**: `[N]:` followed by indented items with a `- ` prefix
//! - Each item starts a new line, indented one level from the header
//! - `- ` marks the start of an item
//! - The first field can appear on the same line as the hyphen: `- name: Alice`
//! - Subsequent fields are indented to align under the first field
//! - Nested arrays/objects indent one additional level from their parent
//!
//! ## Tabular Arrays
//!
//! For **homogeneous objects with primitive fields** (TOON's signature feature):
//!
//! ```text
//! [3]{id,name,price}:
//!   1,Widget,9.99
//!   2,Gadget,14.99
//!   3,Tool,19.99
//! ```
//!
//! **Syntax**: `[N]{field1,field2,...}:` followed by rows
//! - The header's field order is the first element's insertion order, never
//!   sorted
//! - One row per line, indented
//! - Values comma-separated, matching header order
//! - All objects must share that exact field set, though any cell may be `null`
//! - All field values must be primitives (no nested objects/arrays) — an
//!   array that fails this falls back to list form
//!
//! # Delimiters
//!
//! | Delimiter | Character | Header Encoding | Use Case |
//! |-----------|-----------|-----------------|----------|
//! | Comma (default) | `,` | (none) | Most compact |
//! | Tab | `\t` | `[N\t]` (literal tab) | TSV-like output |
//! | Pipe | `\|` | `[N\|]` | Markdown-style tables |
//!
//! Pipe-delimited array:
//! ```text
//! [3|]: 1|2|3
//! ```
//!
//! Pipe-delimited table:
//! ```text
//! [3]{a|b|c}:
//!   1|2|3
//! ```
//!
//! # Length Markers
//!
//! Optional `#` prefix on an array's declared length:
//!
//! ```text
//! [#3]: 1,2,3   # with marker
//! [3]: 1,2,3    # without marker (default)
//! ```
//!
//! # Indentation
//!
//! - **Default**: 2 spaces per nesting level, configurable 1-8
//! - In strict mode, every line's leading whitespace must be an exact
//!   multiple of the configured indent size; a mismatch is a decode error
//!
//! # Edge Cases
//!
//! Empty array under a key:
//! ```text
//! empty_array[0]:
//! ```
//!
//! Empty object (key with no fields below):
//! ```text
//! empty_object:
//! ```
//!
//! Root-level empty array:
//! ```text
//! [0]:
//! ```
//!
//! An empty document decodes to an error in strict mode, and to an empty
//! object in lax mode.
//!
//! ## Rust-Specific Serialization
//!
//! This implementation handles Rust enum variants as follows, via the serde
//! bridge — these choices are library details, not part of the core format:
//!
//! - **Unit variants**: serialized as strings: `status: Active`
//! - **Newtype variants**: wrapped as a single-field object keyed by the
//!   variant name
//! - **Struct and tuple variants**: serialized as objects or arrays
//!
//! # Strict vs. Lax Decoding
//!
//! Strict mode (the default) enforces every structural rule: indentation
//! multiples, declared array length matching the actual element count, row
//! width matching the header's field count, no duplicate object keys, and no
//! raw tab characters. Lax mode relaxes all of those to best-effort; a
//! genuinely unreadable token (an unterminated quoted string, an unknown
//! escape sequence, a malformed header) is still a fatal error in both modes.
//!
//! # Format Comparison
//!
//! **JSON** (approximate token count higher due to repeated keys and quoting):
//! ```json
//! [
//!   {"id":1,"name":"Alice","email":"alice@ex.com","active":true},
//!   {"id":2,"name":"Bob","email":"bob@ex.com","active":true}
//! ]
//! ```
//!
//! **TOON** (tabular form eliminates the repeated keys):
//! ```text
//! [2]{id,name,email,active}:
//!   1,Alice,alice@ex.com,true
//!   2,Bob,bob@ex.com,true
//! ```

// This module contains only documentation; no implementation code.
