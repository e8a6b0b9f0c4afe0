//! TOON encoding.
//!
//! This module provides the core encoder, which walks a [`Value`] tree and
//! writes TOON text, plus [`ToonValueSerializer`], a `serde::Serializer`
//! that converts any `T: Serialize` into a `Value` so it can be handed to
//! the core encoder. The split keeps the format's actual rules (array-shape
//! selection, quoting, numeric emission) in one place that operates on the
//! tree directly, with the serde bridge as a thin adapter in front of it.

use crate::error::{Error, Result};
use crate::lexical;
use crate::map::ToonMap;
use crate::options::Options;
use crate::value::Value;
use serde::ser::{self, Serialize};

/// Encodes `value` as a complete TOON document under `options`.
pub fn to_toon_string(value: &Value, options: &Options) -> Result<String> {
    let mut out = String::new();
    match value {
        Value::Array(items) => write_array_at_root(&mut out, items, options)?,
        Value::Object(obj) => write_object(&mut out, obj, 0, options)?,
        primitive => write_scalar(&mut out, primitive, options.delimiter),
    }
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

fn indent(out: &mut String, depth: usize, options: &Options) {
    for _ in 0..(depth * options.indent_size) {
        out.push(' ');
    }
}

fn write_scalar(out: &mut String, value: &Value, delimiter: crate::options::Delimiter) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if n.is_finite() {
                out.push_str(&lexical::format_number(*n));
            } else {
                out.push_str("null");
            }
        }
        Value::String(s) => {
            if lexical::needs_quoting(s, delimiter) {
                out.push_str(&lexical::quote_and_escape(s));
            } else {
                out.push_str(s);
            }
        }
        Value::Array(_) | Value::Object(_) => unreachable!("write_scalar called on non-primitive"),
    }
}

fn write_key(out: &mut String, key: &str, delimiter: crate::options::Delimiter) {
    if lexical::is_identifier_key(key) {
        out.push_str(key);
    } else {
        out.push_str(&lexical::quote_and_escape(key));
        let _ = delimiter; // quoting a key never depends on the delimiter
    }
}

fn write_object(out: &mut String, obj: &ToonMap, depth: usize, options: &Options) -> Result<()> {
    for (key, value) in obj.iter() {
        match value {
            Value::Array(items) => {
                indent(out, depth, options);
                write_key(out, key, options.delimiter);
                write_array_after_key(out, items, depth, options)?;
            }
            Value::Object(child) => {
                if child.is_empty() {
                    indent(out, depth, options);
                    write_key(out, key, options.delimiter);
                    out.push_str(":\n");
                } else {
                    indent(out, depth, options);
                    write_key(out, key, options.delimiter);
                    out.push_str(":\n");
                    write_object(out, child, depth + 1, options)?;
                }
            }
            primitive => {
                indent(out, depth, options);
                write_key(out, key, options.delimiter);
                out.push_str(": ");
                write_scalar(out, primitive, options.delimiter);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn write_array_at_root(out: &mut String, items: &[Value], options: &Options) -> Result<()> {
    write_array_header_and_body(out, items, None, 0, options)
}

fn write_array_after_key(
    out: &mut String,
    items: &[Value],
    depth: usize,
    options: &Options,
) -> Result<()> {
    write_array_header_and_body(out, items, None, depth, options)
}

fn write_array_header_and_body(
    out: &mut String,
    items: &[Value],
    key_already_written: Option<&str>,
    depth: usize,
    options: &Options,
) -> Result<()> {
    debug_assert!(key_already_written.is_none());
    if let Some(fields) = tabular_fields(items) {
        write_tabular_array(out, items, &fields, depth, options);
    } else if items.iter().all(Value::is_primitive) {
        write_inline_array(out, items, depth, options);
    } else {
        write_list_array(out, items, depth, options)?;
    }
    Ok(())
}

/// If every element of `items` is a non-empty `Object` with the same,
/// insertion-ordered field list and every field value is a primitive,
/// returns that field list (taken from the first element, never
/// alphabetized). Otherwise returns `None`, disqualifying tabular form.
fn tabular_fields(items: &[Value]) -> Option<Vec<String>> {
    if items.is_empty() {
        return None;
    }
    let first = match &items[0] {
        Value::Object(obj) if !obj.is_empty() => obj,
        _ => return None,
    };
    let fields: Vec<String> = first.field_order().into_iter().map(String::from).collect();
    for item in items {
        let obj = match item {
            Value::Object(obj) => obj,
            _ => return None,
        };
        if obj.len() != fields.len() {
            return None;
        }
        for field in &fields {
            match obj.get(field) {
                Some(v) if v.is_primitive() => {}
                _ => return None,
            }
        }
    }
    Some(fields)
}

fn write_header(out: &mut String, count: usize, fields: Option<&[String]>, options: &Options) {
    out.push('[');
    if options.use_length_marker {
        out.push('#');
    }
    out.push_str(&count.to_string());
    out.push_str(options.delimiter.header_suffix());
    out.push(']');
    if let Some(fields) = fields {
        out.push('{');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(options.delimiter.as_char());
            }
            write_key(out, field, options.delimiter);
        }
        out.push('}');
    }
    out.push(':');
}

fn write_inline_array(out: &mut String, items: &[Value], depth: usize, options: &Options) {
    indent(out, depth, options);
    write_header(out, items.len(), None, options);
    if !items.is_empty() {
        out.push(' ');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(options.delimiter.as_char());
            }
            write_scalar(out, item, options.delimiter);
        }
    }
    out.push('\n');
}

fn write_tabular_array(
    out: &mut String,
    items: &[Value],
    fields: &[String],
    depth: usize,
    options: &Options,
) {
    indent(out, depth, options);
    write_header(out, items.len(), Some(fields), options);
    out.push('\n');
    for item in items {
        let obj = match item {
            Value::Object(obj) => obj,
            _ => unreachable!("tabular_fields guarantees Object elements"),
        };
        indent(out, depth + 1, options);
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(options.delimiter.as_char());
            }
            write_scalar(out, obj.get(field).expect("field checked in tabular_fields"), options.delimiter);
        }
        out.push('\n');
    }
}

fn write_list_array(
    out: &mut String,
    items: &[Value],
    depth: usize,
    options: &Options,
) -> Result<()> {
    indent(out, depth, options);
    write_header(out, items.len(), None, options);
    out.push('\n');
    for item in items {
        write_list_item(out, item, depth + 1, options)?;
    }
    Ok(())
}

fn write_list_item(out: &mut String, item: &Value, depth: usize, options: &Options) -> Result<()> {
    indent(out, depth, options);
    out.push_str("- ");
    match item {
        Value::Object(obj) => {
            if obj.is_empty() {
                out.push('\n');
                return Ok(());
            }
            let mut fields = obj.iter();
            let (first_key, first_value) = fields.next().unwrap();
            write_list_item_field(out, first_key, first_value, depth, options, true)?;
            for (key, value) in fields {
                write_list_item_field(out, key, value, depth, options, false)?;
            }
        }
        Value::Array(nested) => {
            // A bare array as a list item has no enclosing key. The header
            // goes right after the "- " already written; any further rows
            // (tabular) indent relative to this item's own depth.
            if let Some(fields) = tabular_fields(nested) {
                write_header(out, nested.len(), Some(&fields), options);
                out.push('\n');
                for element in nested {
                    let row = element.as_object().expect("tabular_fields guarantees Object elements");
                    indent(out, depth + 1, options);
                    for (i, field) in fields.iter().enumerate() {
                        if i > 0 {
                            out.push(options.delimiter.as_char());
                        }
                        write_scalar(out, row.get(field).expect("checked above"), options.delimiter);
                    }
                    out.push('\n');
                }
            } else if nested.iter().all(Value::is_primitive) {
                write_header(out, nested.len(), None, options);
                if !nested.is_empty() {
                    out.push(' ');
                    for (i, element) in nested.iter().enumerate() {
                        if i > 0 {
                            out.push(options.delimiter.as_char());
                        }
                        write_scalar(out, element, options.delimiter);
                    }
                }
                out.push('\n');
            } else {
                return Err(Error::semantic(
                    0,
                    "array-without-key",
                    "nested heterogeneous array cannot appear as a bare list item",
                ));
            }
        }
        primitive => {
            write_scalar(out, primitive, options.delimiter);
            out.push('\n');
        }
    }
    Ok(())
}

fn write_list_item_field(
    out: &mut String,
    key: &str,
    value: &Value,
    depth: usize,
    options: &Options,
    is_first: bool,
) -> Result<()> {
    if !is_first {
        indent(out, depth + 1, options);
    }
    match value {
        Value::Array(items) => {
            write_key(out, key, options.delimiter);
            write_array_after_key(out, items, depth + 1, options)?;
        }
        Value::Object(child) => {
            write_key(out, key, options.delimiter);
            out.push_str(":\n");
            write_object(out, child, depth + 2, options)?;
        }
        primitive => {
            write_key(out, key, options.delimiter);
            out.push_str(": ");
            write_scalar(out, primitive, options.delimiter);
            out.push('\n');
        }
    }
    Ok(())
}

/// Converts any `T: Serialize` into a [`Value`] tree. This is the sole
/// bridge between arbitrary Rust types and the core encoder; it performs no
/// text formatting of its own.
pub struct ToonValueSerializer;

impl serde::Serializer for ToonValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeToonMap;
    type SerializeStruct = SerializeToonMap;
    type SerializeStructVariant = SerializeToonMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }
    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }
    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }
    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }
    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }
    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|b| Value::Number(*b as f64)).collect()))
    }
    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }
    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = ToonMap::new();
        map.insert(variant.to_string(), value.serialize(ToonValueSerializer)?);
        Ok(Value::Object(map))
    }
    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }
    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeToonMap> {
        Ok(SerializeToonMap {
            map: ToonMap::new(),
            next_key: None,
        })
    }
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<SerializeToonMap> {
        Ok(SerializeToonMap {
            map: ToonMap::new(),
            next_key: None,
        })
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeToonMap> {
        Ok(SerializeToonMap {
            map: ToonMap::new(),
            next_key: None,
        })
    }
}

pub struct SerializeVec {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;
    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(ToonValueSerializer)?);
        Ok(())
    }
    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;
    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeToonMap {
    map: ToonMap,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeToonMap {
    type Ok = Value;
    type Error = Error;
    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key_value = key.serialize(ToonValueSerializer)?;
        self.next_key = Some(match key_value {
            Value::String(s) => s,
            other => other.to_string(),
        });
        Ok(())
    }
    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.map.insert(key, value.serialize(ToonValueSerializer)?);
        Ok(())
    }
    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeToonMap {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ToonValueSerializer)?);
        Ok(())
    }
    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeToonMap {
    type Ok = Value;
    type Error = Error;
    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(self, key, value)
    }
    fn end(self) -> Result<Value> {
        ser::SerializeStruct::end(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Delimiter;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        let mut map = ToonMap::new();
        for (k, v) in pairs {
            map.insert((*k).to_string(), v.clone());
        }
        Value::Object(map)
    }

    #[test]
    fn simple_object() {
        let v = obj(&[("name", Value::from("Alice")), ("age", Value::Number(30.0))]);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(out, "name: Alice\nage: 30");
    }

    #[test]
    fn inline_primitive_array() {
        let v = obj(&[(
            "tags",
            Value::Array(vec![Value::from("a"), Value::from("b")]),
        )]);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(out, "tags[2]: a,b");
    }

    #[test]
    fn tabular_array_preserves_first_item_field_order() {
        let items = Value::Array(vec![
            obj(&[("sku", Value::from("A")), ("price", Value::Number(1.0))]),
            obj(&[("sku", Value::from("B")), ("price", Value::Number(2.0))]),
        ]);
        let v = obj(&[("items", items)]);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(out, "items[2]{sku,price}:\n  A,1\n  B,2");
    }

    #[test]
    fn root_inline_array() {
        let v = Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(out, "[3]: 1,2,3");
    }

    #[test]
    fn empty_array_has_no_trailing_space() {
        let v = Value::Array(vec![]);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(out, "[0]:");
    }

    #[test]
    fn quoting_numeric_like_string() {
        let v = obj(&[("id", Value::from("007"))]);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(out, "id: \"007\"");
    }

    #[test]
    fn number_has_no_scientific_notation() {
        let v = Value::Number(1_000_000.0);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(out, "1000000");
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let v = Value::Number(f64::NAN);
        assert_eq!(to_toon_string(&v, &Options::default()).unwrap(), "null");
        let v = Value::Number(f64::INFINITY);
        assert_eq!(to_toon_string(&v, &Options::default()).unwrap(), "null");
    }

    #[test]
    fn list_array_for_heterogeneous_objects() {
        let items = Value::Array(vec![
            obj(&[("name", Value::from("Alice")), ("role", Value::from("admin"))]),
            obj(&[("name", Value::from("Bob")), ("role", Value::from("user"))]),
        ]);
        let v = obj(&[("users", items)]);
        let out = to_toon_string(&v, &Options::default()).unwrap();
        assert_eq!(
            out,
            "users[2]:\n  - name: Alice\n    role: admin\n  - name: Bob\n    role: user"
        );
    }

    #[test]
    fn pipe_delimiter_changes_separators_and_header() {
        let v = obj(&[(
            "tags",
            Value::Array(vec![Value::from("a"), Value::from("b")]),
        )]);
        let options = Options::new().with_delimiter(Delimiter::Pipe);
        let out = to_toon_string(&v, &options).unwrap();
        assert_eq!(out, "tags[2|]: a|b");
    }
}
