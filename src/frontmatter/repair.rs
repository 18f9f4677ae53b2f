//! Best-effort quoting of colon-bearing frontmatter values

use super::{extract, parse_yaml};
use crate::error::{Result, frontmatter as frontmatter_error};

/// Repair a document whose frontmatter fails to parse.
///
/// Returns `Ok(None)` when there is no block or it already parses, and
/// `Ok(Some(fixed))` when quoting unquoted `key: value` lines whose value
/// contains `": "` makes it parse. Everything outside the block is kept
/// byte-for-byte. When the rewrite still does not parse the caller keeps
/// the original and gets [`crate::error::MushError::FrontmatterUnrepairable`].
pub fn repair(content: &str) -> Result<Option<String>> {
    let Some(block) = extract(content) else {
        return Ok(None);
    };
    let yaml = block.text(content);
    let Err(original) = parse_yaml(yaml) else {
        return Ok(None);
    };

    let mut changed = false;
    let mut rewritten = String::with_capacity(yaml.len() + 16);
    for line in yaml.split_inclusive('\n') {
        let (text, ending) = split_line_ending(line);
        match quote_value(text) {
            Some(fixed) => {
                changed = true;
                rewritten.push_str(&fixed);
            }
            None => rewritten.push_str(text),
        }
        rewritten.push_str(ending);
    }

    if !changed {
        return Err(frontmatter_error::unrepairable(original.to_string()));
    }
    parse_yaml(&rewritten).map_err(|e| frontmatter_error::unrepairable(e.to_string()))?;

    let mut fixed = String::with_capacity(content.len() + 16);
    fixed.push_str(&content[..block.yaml.start]);
    fixed.push_str(&rewritten);
    fixed.push_str(&content[block.yaml.end..]);
    Ok(Some(fixed))
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let without_lf = line.strip_suffix('\n').unwrap_or(line);
    let text = without_lf.strip_suffix('\r').unwrap_or(without_lf);
    (text, &line[text.len()..])
}

/// Quoted form of a `key: value` line, or `None` when it is left alone
fn quote_value(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('#')
        || line.starts_with([' ', '\t'])
        || trimmed == "-"
        || trimmed.starts_with("- ")
    {
        return None;
    }

    let (key, value) = line.split_once(": ")?;
    let value = value.trim();
    if key.is_empty()
        || value.is_empty()
        || value.starts_with(['"', '\'', '|', '>', '[', '{'])
        || !value.contains(": ")
    {
        return None;
    }

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    Some(format!("{key}: \"{escaped}\""))
}
