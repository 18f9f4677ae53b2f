//! Encoding-neutral document tree and the recursive merge over it

use std::collections::BTreeMap;

/// Key-ordered mapping of string keys to nodes
pub type Table = BTreeMap<String, Node>;

/// A value inside a structured document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Table(Table),
    Array(Vec<Node>),
    Scalar(Scalar),
}

/// Leaf values shared by the supported encodings
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// RFC 3339 / TOML datetime kept in its textual form
    Datetime(String),
}

/// Fold `incoming` into `acc`.
///
/// Keys present in both whose values are both tables are merged recursively;
/// otherwise the incoming value replaces the existing one. Arrays and scalars
/// are never concatenated.
pub fn merge_tables(acc: &mut Table, incoming: Table) {
    for (key, value) in incoming {
        match value {
            Node::Table(inner) => match acc.get_mut(&key) {
                Some(Node::Table(existing)) => merge_tables(existing, inner),
                _ => {
                    acc.insert(key, Node::Table(inner));
                }
            },
            other => {
                acc.insert(key, other);
            }
        }
    }
}

/// Merge tables left to right into a fresh accumulator
pub fn merge_all(tables: impl IntoIterator<Item = Table>) -> Table {
    tables.into_iter().fold(Table::new(), |mut acc, table| {
        merge_tables(&mut acc, table);
        acc
    })
}
