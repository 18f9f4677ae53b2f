//! Deterministic merging of destination documents
//!
//! Tool configuration fragments from several bundle layers end up in one
//! per-harness document. Structured documents are parsed into a neutral
//! [`tree::Table`], folded left to right and serialized back:
//!
//! ```json
//! Existing: {"a": 1, "b": {"x": 1, "y": 2}}
//! New:      {"b": {"y": 3, "z": 4}, "c": 3}
//! Result:    {"a": 1, "b": {"x": 1, "y": 3, "z": 4}, "c": 3}
//! ```
//!
//! Arrays and scalars from later documents replace earlier ones outright.
//! Destinations that are neither JSON nor TOML are concatenated as raw bytes.
//!
//! Agent definitions for harnesses with a single agent document are composed
//! by [`compose_agent_documents`].

pub mod json;
pub mod toml;
pub mod tree;

use std::path::Path;

use crate::error::Result;

/// Encoding of a destination document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
    /// Schema-less byte concatenation
    Raw,
}

impl DocumentFormat {
    /// Pick the format from a destination file extension
    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json" | "jsonc") => DocumentFormat::Json,
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Raw,
        }
    }
}

/// Merge documents left to right.
///
/// Each input is a `(label, bytes)` pair; the label names the document in
/// parse errors. Empty inputs behave as empty documents.
pub fn merge_documents<'a>(
    format: DocumentFormat,
    documents: impl IntoIterator<Item = (&'a str, &'a [u8])>,
) -> Result<Vec<u8>> {
    match format {
        DocumentFormat::Json => {
            let tables = documents
                .into_iter()
                .map(|(label, bytes)| json::parse(label, bytes))
                .collect::<Result<Vec<_>>>()?;
            json::render(tree::merge_all(tables))
        }
        DocumentFormat::Toml => {
            let tables = documents
                .into_iter()
                .map(|(label, bytes)| toml::parse(label, bytes))
                .collect::<Result<Vec<_>>>()?;
            toml::render(tree::merge_all(tables))
        }
        DocumentFormat::Raw => Ok(concat_raw(documents.into_iter().map(|(_, bytes)| bytes))),
    }
}

/// Concatenate byte chunks, adding a newline between them only when the
/// buffer does not already end in one.
pub fn concat_raw<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in chunks {
        if !out.is_empty() && !out.ends_with(b"\n") {
            out.push(b'\n');
        }
        out.extend_from_slice(chunk);
    }
    out
}

/// Heading written above each composed agent document
pub fn agent_heading(logical_path: &str) -> String {
    format!("## Agent: {logical_path}")
}

/// Drop the sections headed by [`agent_heading`] for any of `logical_paths`.
///
/// A section runs until the next agent heading or the end of the document.
/// Content outside those sections is kept verbatim.
pub fn strip_agent_sections(existing: &str, logical_paths: &[&str]) -> String {
    let mut out = String::with_capacity(existing.len());
    let mut skipping = false;
    for line in existing.split_inclusive('\n') {
        if let Some(path) = line.trim_end().strip_prefix("## Agent: ") {
            skipping = logical_paths.contains(&path);
        }
        if !skipping {
            out.push_str(line);
        }
    }
    out
}

/// Compose agent definitions into one document.
///
/// Trimmed pre-existing content is kept first, minus any earlier sections for
/// the incoming logical paths; each incoming document follows under a heading
/// naming its logical path, separated by blank lines.
pub fn compose_agent_documents(existing: Option<&str>, documents: &[(String, String)]) -> String {
    let incoming: Vec<&str> = documents.iter().map(|(path, _)| path.as_str()).collect();
    let kept = existing.map(|text| strip_agent_sections(text, &incoming));

    let mut sections: Vec<String> = Vec::new();
    if let Some(kept) = kept.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        sections.push(kept.to_string());
    }
    for (logical_path, content) in documents {
        sections.push(format!(
            "{}\n\n{}",
            agent_heading(logical_path),
            content.trim()
        ));
    }
    if sections.is_empty() {
        return String::new();
    }
    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_format_for_path() {
        assert_eq!(DocumentFormat::for_path(Path::new(".mcp.json")), DocumentFormat::Json);
        assert_eq!(
            DocumentFormat::for_path(Path::new(".codex/config.TOML")),
            DocumentFormat::Toml
        );
        assert_eq!(DocumentFormat::for_path(Path::new("AGENTS.md")), DocumentFormat::Raw);
        assert_eq!(DocumentFormat::for_path(Path::new("Makefile")), DocumentFormat::Raw);
    }

    #[test]
    fn test_toml_sections_are_unioned() {
        let existing = b"[mcp_servers.existing]\ncommand = \"old\"\n".as_slice();
        let incoming = b"[mcp_servers.alpha]\ncommand = \"alpha\"\n".as_slice();
        let merged =
            merge_documents(DocumentFormat::Toml, [("config.toml", existing), ("tools/a.toml", incoming)])
                .unwrap();
        let text = String::from_utf8(merged).unwrap();
        assert!(text.contains("[mcp_servers.existing]"));
        assert!(text.contains("[mcp_servers.alpha]"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_json_deep_merge() {
        let a = br#"{"a": 1, "b": {"x": 1, "y": 2}}"#.as_slice();
        let b = br#"{"b": {"y": 3, "z": 4}, "c": 3}"#.as_slice();
        let merged = merge_documents(DocumentFormat::Json, [("a", a), ("b", b)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&merged).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"a": 1, "b": {"x": 1, "y": 3, "z": 4}, "c": 3})
        );
    }

    #[test]
    fn test_jsonc_existing_document_merges() {
        let existing = b"{\n  // editor settings\n  \"theme\": \"dark\"\n}\n".as_slice();
        let incoming = br#"{"mcpServers": {"alpha": {"command": "a"}}}"#.as_slice();
        let merged = merge_documents(
            DocumentFormat::for_path(Path::new(".zed/settings.jsonc")),
            [("settings.jsonc", existing), ("tools/a.json", incoming)],
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&merged).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"theme": "dark", "mcpServers": {"alpha": {"command": "a"}}})
        );
    }

    #[test]
    fn test_empty_inputs_are_empty_documents() {
        let merged =
            merge_documents(DocumentFormat::Json, [("a", b"".as_slice()), ("b", br#"{"k":true}"#.as_slice())])
                .unwrap();
        assert_eq!(merged, b"{\n  \"k\": true\n}\n");
    }

    #[test]
    fn test_parse_error_names_document() {
        let err = merge_documents(
            DocumentFormat::Toml,
            [("ok.toml", b"a = 1".as_slice()), ("tools/bad.toml", b"= nope".as_slice())],
        )
        .unwrap_err();
        assert!(err.to_string().contains("tools/bad.toml"));
    }

    #[test]
    fn test_raw_concat_inserts_newline_only_when_needed() {
        let out = concat_raw([b"one".as_slice(), b"two\n".as_slice(), b"three".as_slice()]);
        assert_eq!(out, b"one\ntwo\nthree");
        assert!(concat_raw(Vec::<&[u8]>::new()).is_empty());
    }

    #[test]
    fn test_compose_agent_documents() {
        let docs = vec![
            ("agents/a.md".to_string(), "Alpha\n".to_string()),
            ("agents/b.md".to_string(), "Beta".to_string()),
        ];
        let out = compose_agent_documents(Some("  # Mine\n\n"), &docs);
        assert_eq!(
            out,
            "# Mine\n\n## Agent: agents/a.md\n\nAlpha\n\n## Agent: agents/b.md\n\nBeta\n"
        );
    }

    #[test]
    fn test_compose_without_existing() {
        let docs = vec![("agents/a.md".to_string(), "Alpha".to_string())];
        assert_eq!(
            compose_agent_documents(None, &docs),
            "## Agent: agents/a.md\n\nAlpha\n"
        );
        assert_eq!(compose_agent_documents(Some("   "), &[]), "");
    }

    #[test]
    fn test_compose_replaces_earlier_section_for_same_path() {
        let v1 = vec![("agents/a.md".to_string(), "Alpha v1".to_string())];
        let first = compose_agent_documents(Some("# Mine\n"), &v1);

        let v2 = vec![("agents/a.md".to_string(), "Alpha v2".to_string())];
        let second = compose_agent_documents(Some(&first), &v2);
        assert_eq!(second, "# Mine\n\n## Agent: agents/a.md\n\nAlpha v2\n");
        assert_eq!(compose_agent_documents(Some(&second), &v2), second);
    }

    #[test]
    fn test_strip_agent_sections_keeps_other_agents() {
        let doc = "# Mine\n\n## Agent: a.md\n\nA\n\n## Agent: b.md\n\nB\n";
        assert_eq!(strip_agent_sections(doc, &["a.md"]), "# Mine\n\n## Agent: b.md\n\nB\n");
        assert_eq!(strip_agent_sections(doc, &[]), doc);
    }

    fn leaf_json() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i32>().prop_map(serde_json::Value::from),
            "[a-z]{0,6}".prop_map(serde_json::Value::from),
        ]
    }

    fn object_json() -> impl Strategy<Value = serde_json::Value> {
        leaf_json()
            .prop_recursive(3, 24, 4, |inner| {
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| serde_json::Value::Object(m.into_iter().collect()))
            })
            .prop_map(|v| match v {
                serde_json::Value::Object(_) => v,
                other => serde_json::json!({ "v": other }),
            })
    }

    proptest! {
        #[test]
        fn prop_merge_is_associative(a in object_json(), b in object_json(), c in object_json()) {
            let (a, b, c) = (
                serde_json::to_vec(&a).unwrap(),
                serde_json::to_vec(&b).unwrap(),
                serde_json::to_vec(&c).unwrap(),
            );
            let ab = merge_documents(DocumentFormat::Json, [("a", a.as_slice()), ("b", b.as_slice())]).unwrap();
            let stepwise =
                merge_documents(DocumentFormat::Json, [("ab", ab.as_slice()), ("c", c.as_slice())]).unwrap();
            let one_pass = merge_documents(
                DocumentFormat::Json,
                [("a", a.as_slice()), ("b", b.as_slice()), ("c", c.as_slice())],
            )
            .unwrap();
            prop_assert_eq!(stepwise, one_pass);
        }
    }
}
