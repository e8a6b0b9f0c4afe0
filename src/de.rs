//! TOON decoding.
//!
//! The core decoder (this module's [`Decoder`]) turns TOON text into a
//! [`Value`] tree: it never knows about the target Rust type. A separate
//! bridge, [`ValueDeserializer`], implements `serde::Deserializer` over an
//! already-decoded `Value` so that `T: Deserialize` can be pulled out of it
//! the same way `serde_json::Value` backs `serde_json::from_str`.
//!
//! The decoder is line-oriented: it splits the input into [`Line`]s with
//! precomputed indentation depth up front, then reads structure with a
//! cursor over that array rather than backtracking over raw bytes.

use crate::error::{Error, Result};
use crate::lexical;
use crate::map::ToonMap;
use crate::options::{Delimiter, Options};
use crate::value::Value;

struct Line {
    content: String,
    depth: usize,
    line_num: usize,
}

/// Splits `input` into non-blank lines (strict mode rejects blank lines
/// inside array bodies further down the pipeline; a fully blank document is
/// handled by the caller before this runs) with each line's indentation
/// depth precomputed as `leading_spaces / indent_size`.
fn parse_lines(input: &str, options: &Options) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line_num = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if options.strict && raw.contains('\t') {
            return Err(Error::structural(line_num, "no-tabs", "tab character in indentation or body"));
        }
        let spaces = lexical::leading_spaces(raw);
        if options.strict && spaces % options.indent_size != 0 {
            return Err(Error::structural(
                line_num,
                "indentation",
                format!(
                    "leading whitespace of {} spaces is not a multiple of indent size {}",
                    spaces, options.indent_size
                ),
            ));
        }
        let depth = spaces / options.indent_size.max(1);
        lines.push(Line {
            content: raw.to_string(),
            depth,
            line_num,
        });
    }
    Ok(lines)
}

/// The parsed, delimiter-aware pieces of an array header `[N<suffix>]{fields}:`.
struct ArrayHeader {
    declared_len: Option<usize>,
    delimiter: Delimiter,
    fields: Option<Vec<String>>,
    /// Text following the header's trailing `:` on the same line, trimmed.
    rest: String,
}

/// Tries to parse `s` as an array header starting at its first `[`. Returns
/// `None` if `s` doesn't begin with `[` at all (not an array in this
/// position); a malformed header that does start with `[` is a lexical error.
fn try_parse_array_header(s: &str, line_num: usize) -> Result<Option<ArrayHeader>> {
    if !s.starts_with('[') {
        return Ok(None);
    }
    let close = s.find(']').ok_or_else(|| {
        Error::lexical(line_num, "array-header", "unterminated '[' in array header")
    })?;
    let inside = &s[1..close];
    let (count_part, delimiter) = if let Some(stripped) = inside.strip_suffix('\t') {
        (stripped, Delimiter::Tab)
    } else if let Some(stripped) = inside.strip_suffix('|') {
        (stripped, Delimiter::Pipe)
    } else {
        (inside, Delimiter::Comma)
    };
    let declared_len = if count_part.is_empty() {
        None
    } else {
        let digits = count_part.strip_prefix('#').unwrap_or(count_part);
        Some(digits.parse::<usize>().map_err(|_| {
            Error::lexical(line_num, "array-header", format!("invalid array length '{}'", count_part))
        })?)
    };
    let mut rest = &s[close + 1..];
    let fields = if let Some(stripped) = rest.strip_prefix('{') {
        let field_close = stripped.find('}').ok_or_else(|| {
            Error::lexical(line_num, "array-header", "unterminated '{' in tabular header")
        })?;
        let field_list = &stripped[..field_close];
        rest = &stripped[field_close + 1..];
        Some(
            split_by_delimiter(field_list, delimiter, line_num)?
                .into_iter()
                .map(|f| unquote_key(&f))
                .collect(),
        )
    } else {
        None
    };
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| Error::lexical(line_num, "array-header", "array header missing trailing ':'"))?
        .trim()
        .to_string();
    Ok(Some(ArrayHeader {
        declared_len,
        delimiter,
        fields,
        rest,
    }))
}

fn unquote_key(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        lexical::unescape(&trimmed[1..trimmed.len() - 1]).unwrap_or_else(|_| trimmed.to_string())
    } else {
        trimmed.to_string()
    }
}

/// Locates the unquoted `:` that separates a key from its value on an
/// object line, skipping over colons inside a quoted key or value.
fn find_key_separator(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if !in_quotes => in_quotes = true,
            b'"' if in_quotes => {
                // a backslash-escaped quote doesn't close the string
                let mut backslashes = 0;
                let mut j = i;
                while j > 0 && bytes[j - 1] == b'\\' {
                    backslashes += 1;
                    j -= 1;
                }
                if backslashes % 2 == 0 {
                    in_quotes = false;
                }
            }
            b':' if !in_quotes => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits `s` on unquoted occurrences of `delimiter`, honoring quoted
/// segments and backslash escapes inside them.
fn split_by_delimiter(s: &str, delimiter: Delimiter, line_num: usize) -> Result<Vec<String>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let delim = delimiter.as_char();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            current.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                current.push(c);
            }
            c if c == delim => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if in_quotes {
        return Err(Error::lexical(line_num, "quoting", "unterminated quoted string"));
    }
    fields.push(current);
    Ok(fields)
}

/// Parses a single cell (already isolated by [`split_by_delimiter`] or taken
/// whole as a scalar line) into a [`Value`].
fn parse_primitive(cell: &str, line_num: usize) -> Result<Value> {
    let trimmed = cell.trim();
    if trimmed.starts_with('"') {
        if trimmed.len() < 2 || !trimmed.ends_with('"') {
            return Err(Error::lexical(line_num, "quoting", "unterminated quoted string"));
        }
        let body = &trimmed[1..trimmed.len() - 1];
        return lexical::unescape(body)
            .map(Value::String)
            .map_err(|c| Error::lexical(line_num, "escape", format!("invalid escape sequence '\\{}'", c)));
    }
    match trimmed {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if lexical::is_numeric_like(trimmed) && !lexical::has_forbidden_leading_zero(trimmed) {
        let n: f64 = trimmed
            .parse()
            .map_err(|_| Error::lexical(line_num, "number", format!("invalid number literal '{}'", trimmed)))?;
        return Ok(Value::Number(n));
    }
    Ok(Value::String(trimmed.to_string()))
}

/// Cursor-based reader over a pre-split line array.
struct Decoder<'a> {
    lines: &'a [Line],
    pos: usize,
    options: &'a Options,
}

impl<'a> Decoder<'a> {
    fn new(lines: &'a [Line], options: &'a Options) -> Self {
        Decoder { lines, pos: 0, options }
    }

    fn peek(&self) -> Option<&Line> {
        self.lines.get(self.pos)
    }

    fn peek_at_depth(&self, depth: usize) -> Option<&Line> {
        self.peek().filter(|l| l.depth == depth)
    }

    fn decode_root(&mut self) -> Result<Value> {
        if self.lines.is_empty() {
            return if self.options.strict {
                Err(Error::structural(1, "empty-input", "input has no content"))
            } else {
                Ok(Value::Object(ToonMap::new()))
            };
        }
        let first = &self.lines[0];
        if first.depth != 0 {
            return Err(Error::structural(first.line_num, "root-depth", "First line must be at depth 0"));
        }
        let trimmed = first.content.trim_start();
        if trimmed.starts_with('[') {
            return self.decode_array(0);
        }
        if self.lines.len() == 1 && find_key_separator(trimmed).is_none() {
            let value = parse_primitive(trimmed, first.line_num)?;
            self.pos = 1;
            return Ok(value);
        }
        self.decode_object(0)
    }

    fn decode_object(&mut self, depth: usize) -> Result<Value> {
        let mut map = ToonMap::new();
        while let Some(line) = self.peek_at_depth(depth) {
            let line_num = line.line_num;
            let body = line.content.trim_start();
            let sep = find_key_separator(body).ok_or_else(|| {
                Error::structural(line_num, "key-value", "expected 'key: value' line")
            })?;
            let raw_key = &body[..sep];
            let key = unquote_key(raw_key);
            if self.options.strict && map.contains_key(&key) {
                return Err(Error::structural(line_num, "duplicate-key", format!("duplicate key '{}'", key)));
            }
            let after_colon = body[sep + 1..].trim();
            self.pos += 1;

            if after_colon.starts_with('[') {
                let header = try_parse_array_header(after_colon, line_num)?.unwrap();
                let value = self.decode_array_body(header, depth + 1, line_num)?;
                map.insert(key, value);
                continue;
            }

            if after_colon.is_empty() {
                // Either a nested object at depth+1, or an empty object/list-array value.
                if self.peek_at_depth(depth + 1).is_some() {
                    let child = self.decode_object(depth + 1)?;
                    map.insert(key, child);
                } else {
                    map.insert(key, Value::Object(ToonMap::new()));
                }
            } else {
                map.insert(key, parse_primitive(after_colon, line_num)?);
            }
        }
        Ok(Value::Object(map))
    }

    /// Decodes an array whose header line itself is `self.peek()` at `depth`
    /// (used for root arrays and bare `[N]: ...` lines that aren't under a key).
    fn decode_array(&mut self, depth: usize) -> Result<Value> {
        let line = self.peek_at_depth(depth).expect("caller checked header is present");
        let line_num = line.line_num;
        let body = line.content.trim_start();
        let header = try_parse_array_header(body, line_num)?
            .ok_or_else(|| Error::structural(line_num, "array-header", "expected array header"))?;
        self.pos += 1;
        self.decode_array_body(header, depth + 1, line_num)
    }

    fn decode_array_body(&mut self, header: ArrayHeader, body_depth: usize, header_line: usize) -> Result<Value> {
        let value = if header.fields.is_some() {
            self.decode_tabular_body(&header, body_depth, header_line)?
        } else if !header.rest.is_empty() {
            self.decode_inline_body(&header, header_line)?
        } else {
            self.decode_list_body(&header, body_depth, header_line)?
        };
        if self.options.strict {
            if let Some(declared) = header.declared_len {
                let actual = match &value {
                    Value::Array(items) => items.len(),
                    _ => unreachable!("array body always yields Value::Array"),
                };
                if declared != actual {
                    return Err(Error::structural(
                        header_line,
                        "count-coherence",
                        format!("header declares {} elements, found {}", declared, actual),
                    ));
                }
            }
        }
        Ok(value)
    }

    fn decode_inline_body(&mut self, header: &ArrayHeader, line_num: usize) -> Result<Value> {
        if header.rest.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        let cells = split_by_delimiter(&header.rest, header.delimiter, line_num)?;
        let items = cells
            .iter()
            .map(|c| parse_primitive(c, line_num))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(items))
    }

    fn decode_tabular_body(&mut self, header: &ArrayHeader, depth: usize, header_line: usize) -> Result<Value> {
        let fields = header.fields.as_ref().unwrap();
        let mut rows = Vec::new();
        while let Some(line) = self.peek_at_depth(depth) {
            let body = line.content.trim_start();
            if body.starts_with("- ") || body == "-" {
                break;
            }
            let line_num = line.line_num;
            let cells = split_by_delimiter(body, header.delimiter, line_num)?;
            if self.options.strict && cells.len() != fields.len() {
                return Err(Error::structural(
                    line_num,
                    "row-width",
                    format!("expected {} cells, found {}", fields.len(), cells.len()),
                ));
            }
            let mut row = ToonMap::new();
            for (field, cell) in fields.iter().zip(cells.iter()) {
                row.insert(field.clone(), parse_primitive(cell, line_num)?);
            }
            rows.push(Value::Object(row));
            self.pos += 1;
        }
        let _ = header_line;
        Ok(Value::Array(rows))
    }

    fn decode_list_body(&mut self, header: &ArrayHeader, depth: usize, header_line: usize) -> Result<Value> {
        let mut items = Vec::new();
        while let Some(line) = self.peek_at_depth(depth) {
            let body = line.content.trim_start();
            if !(body.starts_with("- ") || body == "-") {
                break;
            }
            items.push(self.decode_list_item(depth)?);
        }
        let _ = header_line;
        Ok(Value::Array(items))
    }

    fn decode_list_item(&mut self, depth: usize) -> Result<Value> {
        let line = self.peek_at_depth(depth).expect("caller checked '- ' prefix");
        let line_num = line.line_num;
        let body = line.content.trim_start();
        let rest = if body == "-" {
            ""
        } else {
            body.strip_prefix("- ").unwrap()
        };
        self.pos += 1;

        if rest.is_empty() {
            // Bare "-" with fields indented further, as an object; or truly an empty item.
            if self.peek_at_depth(depth + 1).is_some() {
                return self.decode_object(depth + 1);
            }
            return Ok(Value::Object(ToonMap::new()));
        }

        if rest.starts_with('[') {
            let header = try_parse_array_header(rest, line_num)?.unwrap();
            return self.decode_array_body(header, depth + 1, line_num);
        }

        let sep = find_key_separator(rest);
        match sep {
            None => parse_primitive(rest, line_num),
            Some(sep_idx) => {
                // First field lives on the hyphen line; subsequent sibling
                // fields are indented to align under it, i.e. at `depth + 1`
                // column-wise but logically still this item's own depth+1 level.
                let mut map = ToonMap::new();
                let key = unquote_key(&rest[..sep_idx]);
                let after_colon = rest[sep_idx + 1..].trim();
                if after_colon.starts_with('[') {
                    let header = try_parse_array_header(after_colon, line_num)?.unwrap();
                    let value = self.decode_array_body(header, depth + 1, line_num)?;
                    map.insert(key, value);
                } else if after_colon.is_empty() {
                    if self.peek_at_depth(depth + 1).is_some() {
                        let child = self.decode_object(depth + 1)?;
                        map.insert(key, child);
                    } else {
                        map.insert(key, Value::Object(ToonMap::new()));
                    }
                } else {
                    map.insert(key, parse_primitive(after_colon, line_num)?);
                }
                while let Some(sibling) = self.peek_at_depth(depth + 1) {
                    let sibling_body = sibling.content.trim_start();
                    if sibling_body.starts_with("- ") || sibling_body == "-" {
                        break;
                    }
                    let sibling_line = sibling.line_num;
                    let sep = find_key_separator(sibling_body).ok_or_else(|| {
                        Error::structural(sibling_line, "key-value", "expected 'key: value' line")
                    })?;
                    let key = unquote_key(&sibling_body[..sep]);
                    let after_colon = sibling_body[sep + 1..].trim();
                    self.pos += 1;
                    if after_colon.starts_with('[') {
                        let header = try_parse_array_header(after_colon, sibling_line)?.unwrap();
                        let value = self.decode_array_body(header, depth + 2, sibling_line)?;
                        map.insert(key, value);
                    } else if after_colon.is_empty() {
                        if self.peek_at_depth(depth + 2).is_some() {
                            let child = self.decode_object(depth + 2)?;
                            map.insert(key, child);
                        } else {
                            map.insert(key, Value::Object(ToonMap::new()));
                        }
                    } else {
                        map.insert(key, parse_primitive(after_colon, sibling_line)?);
                    }
                }
                Ok(Value::Object(map))
            }
        }
    }
}

/// Decodes a complete TOON document into a [`Value`] tree.
pub fn from_toon_str(input: &str, options: &Options) -> Result<Value> {
    let lines = parse_lines(input, options)?;
    let mut decoder = Decoder::new(&lines, options);
    let value = decoder.decode_root()?;
    if decoder.pos != lines.len() {
        let trailing = &lines[decoder.pos];
        return Err(Error::structural(
            trailing.line_num,
            "trailing-content",
            "unexpected content after the decoded value",
        ));
    }
    Ok(value)
}

/// A `serde::Deserializer` that pulls a `T` out of an already-decoded
/// [`Value`] tree, mirroring how `serde_json::Value` backs typed decoding.
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

macro_rules! deserialize_number {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: serde::de::Visitor<'de>,
        {
            match self.value {
                Value::Number(n) => visitor.$visit(n as $ty),
                other => Err(Error::custom(format!("expected number, found {:?}", other))),
            }
        }
    };
}

// `Value` owns every string and nested value it holds, so a `ValueDeserializer`
// can satisfy `Deserializer<'de>` for any `'de` the caller needs, not just
// a lifetime tied to borrowed input text.
impl<'de> serde::de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visitor.visit_f64(n),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => {
                use serde::de::SeqAccess;
                struct SeqWalker {
                    iter: std::vec::IntoIter<Value>,
                }
                impl<'de> SeqAccess<'de> for SeqWalker {
                    type Error = Error;
                    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
                    where
                        T: serde::de::DeserializeSeed<'de>,
                    {
                        match self.iter.next() {
                            Some(v) => seed.deserialize(ValueDeserializer::new(v)).map(Some),
                            None => Ok(None),
                        }
                    }
                }
                visitor.visit_seq(SeqWalker { iter: items.into_iter() })
            }
            Value::Object(obj) => {
                use serde::de::MapAccess;
                struct MapWalker {
                    iter: indexmap::map::IntoIter<String, Value>,
                    value: Option<Value>,
                }
                impl<'de> MapAccess<'de> for MapWalker {
                    type Error = Error;
                    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
                    where
                        K: serde::de::DeserializeSeed<'de>,
                    {
                        match self.iter.next() {
                            Some((k, v)) => {
                                self.value = Some(v);
                                seed.deserialize(serde::de::value::StringDeserializer::new(k))
                                    .map(Some)
                            }
                            None => Ok(None),
                        }
                    }
                    fn next_value_seed<T>(&mut self, seed: T) -> Result<T::Value>
                    where
                        T: serde::de::DeserializeSeed<'de>,
                    {
                        let value = self.value.take().expect("next_value called before next_key");
                        seed.deserialize(ValueDeserializer::new(value))
                    }
                }
                visitor.visit_map(MapWalker {
                    iter: obj.into_iter(),
                    value: None,
                })
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: serde::de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(ValueDeserializer::new(other)),
        }
    }

    deserialize_number!(deserialize_i8, visit_i8, i8);
    deserialize_number!(deserialize_i16, visit_i16, i16);
    deserialize_number!(deserialize_i32, visit_i32, i32);
    deserialize_number!(deserialize_i64, visit_i64, i64);
    deserialize_number!(deserialize_u8, visit_u8, u8);
    deserialize_number!(deserialize_u16, visit_u16, u16);
    deserialize_number!(deserialize_u32, visit_u32, u32);
    deserialize_number!(deserialize_u64, visit_u64, u64);
    deserialize_number!(deserialize_f32, visit_f32, f32);
    deserialize_number!(deserialize_f64, visit_f64, f64);

    serde::forward_to_deserialize_any! {
        bool char str string bytes byte_buf unit unit_struct
        newtype_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> Value {
        from_toon_str(s, &Options::default()).unwrap()
    }

    #[test]
    fn decodes_simple_object() {
        let v = decode("name: Alice\nage: 30");
        let obj = v.as_object().unwrap();
        assert_eq!(obj.get("name"), Some(&Value::String("Alice".into())));
        assert_eq!(obj.get("age"), Some(&Value::Number(30.0)));
    }

    #[test]
    fn decodes_inline_array() {
        let v = decode("tags[2]: a,b");
        let obj = v.as_object().unwrap();
        assert_eq!(
            obj.get("tags"),
            Some(&Value::Array(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn decodes_tabular_array_preserving_header_order() {
        let v = decode("items[2]{sku,price}:\n  A,1\n  B,2");
        let obj = v.as_object().unwrap();
        let items = obj.get("items").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 2);
        let first = items[0].as_object().unwrap();
        assert_eq!(first.field_order(), vec!["sku", "price"]);
    }

    #[test]
    fn decodes_list_array() {
        let v = decode("users[2]:\n  - name: Alice\n    role: admin\n  - name: Bob\n    role: user");
        let obj = v.as_object().unwrap();
        let users = obj.get("users").unwrap().as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(
            users[0].as_object().unwrap().get("name"),
            Some(&Value::from("Alice"))
        );
    }

    #[test]
    fn rejects_duplicate_keys_in_strict_mode() {
        let result = from_toon_str("a: 1\na: 2", &Options::default());
        assert!(result.is_err());
    }

    #[test]
    fn allows_duplicate_keys_in_lax_mode() {
        let result = from_toon_str("a: 1\na: 2", &Options::lax());
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_array_length_mismatch_in_strict_mode() {
        let result = from_toon_str("[3]: 1,2", &Options::default());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_indentation_in_strict_mode() {
        let result = from_toon_str("a:\n   b: 1", &Options::default());
        assert!(result.is_err());
    }

    #[test]
    fn leading_zero_numeric_strings_stay_quoted_strings() {
        let v = decode("id: \"007\"");
        assert_eq!(v.as_object().unwrap().get("id"), Some(&Value::from("007")));
    }

    #[test]
    fn unquoted_leading_zero_stays_a_string() {
        let v = decode("id: 007");
        assert_eq!(v.as_object().unwrap().get("id"), Some(&Value::from("007")));
    }

    #[test]
    fn zero_with_exponent_parses_as_number() {
        let v = decode("n: 0e5");
        assert_eq!(v.as_object().unwrap().get("n"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn root_primitive_decodes_directly() {
        assert_eq!(decode("hello"), Value::String("hello".into()));
        assert_eq!(decode("42"), Value::Number(42.0));
    }

    #[test]
    fn root_array_decodes_directly() {
        assert_eq!(
            decode("[3]: 1,2,3"),
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
        );
    }
}
