//! JSON adapter for the merge tree

use serde_json::{Map, Number, Value};

use super::tree::{Node, Scalar, Table};
use crate::error::{Result, config as config_error};

/// Parse a JSON document into a table; blank input is an empty table.
///
/// JSONC comments are stripped first.
pub fn parse(label: &str, bytes: &[u8]) -> Result<Table> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| config_error::parse_failed(label, e.to_string()))?;
    let text = strip_comments(text);
    if text.trim().is_empty() {
        return Ok(Table::new());
    }
    let value: Value =
        serde_json::from_str(&text).map_err(|e| config_error::parse_failed(label, e.to_string()))?;
    match from_json(value) {
        Node::Table(table) => Ok(table),
        _ => Err(config_error::parse_failed(
            label,
            "top-level JSON value must be an object",
        )),
    }
}

/// Serialize a table as 2-space indented JSON with a trailing newline
pub fn render(table: Table) -> Result<Vec<u8>> {
    let value = to_json(Node::Table(table));
    let mut out = serde_json::to_vec_pretty(&value)
        .map_err(|e| config_error::parse_failed("merged JSON", e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

/// Remove `//` and `/* */` comments outside string literals
pub fn strip_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn from_json(value: Value) -> Node {
    match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
        Value::Number(n) => Node::Scalar(match n.as_i64() {
            Some(i) => Scalar::Integer(i),
            None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(s) => Node::Scalar(Scalar::String(s)),
        Value::Array(items) => Node::Array(items.into_iter().map(from_json).collect()),
        Value::Object(map) => Node::Table(map.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
    }
}

fn to_json(node: Node) -> Value {
    match node {
        Node::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, to_json(v)))
                .collect::<Map<String, Value>>(),
        ),
        Node::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        Node::Scalar(scalar) => match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Integer(i) => Value::Number(i.into()),
            Scalar::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Scalar::String(s) | Scalar::Datetime(s) => Value::String(s),
        },
    }
}
