//! TOML adapter for the merge tree

use toml::Value;
use toml::value::Datetime;

use super::tree::{Node, Scalar, Table};
use crate::error::{Result, config as config_error};

/// Parse a TOML document into a table; blank input is an empty table.
pub fn parse(label: &str, bytes: &[u8]) -> Result<Table> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| config_error::parse_failed(label, e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Table::new());
    }
    let table: toml::Table =
        toml::from_str(text).map_err(|e| config_error::parse_failed(label, e.to_string()))?;
    Ok(table
        .into_iter()
        .map(|(k, v)| (k, from_toml(v)))
        .collect())
}

/// Serialize a table as TOML with a trailing newline.
///
/// TOML has no null; null entries are dropped.
pub fn render(table: Table) -> Result<Vec<u8>> {
    let out_table = to_toml_table(table);
    let mut out = toml::to_string_pretty(&out_table)
        .map_err(|e| config_error::parse_failed("merged TOML", e.to_string()))?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out.into_bytes())
}

fn from_toml(value: Value) -> Node {
    match value {
        Value::String(s) => Node::Scalar(Scalar::String(s)),
        Value::Integer(i) => Node::Scalar(Scalar::Integer(i)),
        Value::Float(f) => Node::Scalar(Scalar::Float(f)),
        Value::Boolean(b) => Node::Scalar(Scalar::Bool(b)),
        Value::Datetime(dt) => Node::Scalar(Scalar::Datetime(dt.to_string())),
        Value::Array(items) => Node::Array(items.into_iter().map(from_toml).collect()),
        Value::Table(table) => {
            Node::Table(table.into_iter().map(|(k, v)| (k, from_toml(v))).collect())
        }
    }
}

fn to_toml_table(table: Table) -> toml::Table {
    table
        .into_iter()
        .filter_map(|(k, v)| to_toml(v).map(|v| (k, v)))
        .collect()
}

fn to_toml(node: Node) -> Option<Value> {
    Some(match node {
        Node::Table(table) => Value::Table(to_toml_table(table)),
        Node::Array(items) => Value::Array(items.into_iter().filter_map(to_toml).collect()),
        Node::Scalar(scalar) => match scalar {
            Scalar::Null => return None,
            Scalar::Bool(b) => Value::Boolean(b),
            Scalar::Integer(i) => Value::Integer(i),
            Scalar::Float(f) => Value::Float(f),
            Scalar::String(s) => Value::String(s),
            Scalar::Datetime(s) => match s.parse::<Datetime>() {
                Ok(dt) => Value::Datetime(dt),
                Err(_) => Value::String(s),
            },
        },
    })
}
