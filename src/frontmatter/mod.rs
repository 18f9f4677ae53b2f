//! Leading YAML metadata blocks in skill documents
//!
//! A block opens with a line holding only `---` (the first line once leading
//! whitespace is skipped) and closes at the next such line. Documents without
//! a block are accepted as-is.

mod repair;

use std::ops::Range;

use tracing::warn;

pub use repair::repair;

use crate::error::{MushError, Result, frontmatter as frontmatter_error};

/// Byte range of the YAML text between the delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub yaml: Range<usize>,
}

impl Block {
    /// The YAML text of this block within `content`
    pub fn text<'a>(&self, content: &'a str) -> &'a str {
        &content[self.yaml.clone()]
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Locate the frontmatter block, if any
pub fn extract(content: &str) -> Option<Block> {
    let start = content.len() - content.trim_start().len();
    let mut lines = content[start..].split_inclusive('\n');
    let opening = lines.next()?;
    if !opening.ends_with('\n') || !is_delimiter(opening) {
        return None;
    }

    let yaml_start = start + opening.len();
    let mut offset = yaml_start;
    for line in lines {
        if is_delimiter(line) {
            return Some(Block {
                yaml: yaml_start..offset,
            });
        }
        offset += line.len();
    }
    None
}

fn parse_yaml(yaml: &str) -> Result<()> {
    serde_yaml::from_str::<serde_yaml::Value>(yaml)
        .map(|_| ())
        .map_err(|e| frontmatter_error::invalid(e.to_string()))
}

/// Check that the frontmatter block parses; no block is not an error.
pub fn validate(content: &str) -> Result<()> {
    match extract(content) {
        Some(block) => parse_yaml(block.text(content)),
        None => Ok(()),
    }
}

/// Content to write for a document plus an optional warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    pub content: String,
    pub warning: Option<String>,
}

/// Validate a skill document, repairing it when possible.
///
/// Never fails: problems become a warning naming `label`, and the content is
/// the repaired document when repair succeeded or the original otherwise.
pub fn check_document(label: &str, content: &str) -> Checked {
    let Err(problem) = validate(content) else {
        return Checked {
            content: content.to_string(),
            warning: None,
        };
    };

    match repair(content) {
        Ok(Some(fixed)) => {
            warn!(asset = label, "repaired frontmatter");
            Checked {
                content: fixed,
                warning: Some(format!("{label}: repaired frontmatter ({})", reason_of(&problem))),
            }
        }
        Ok(None) => Checked {
            content: content.to_string(),
            warning: None,
        },
        Err(_) => {
            warn!(asset = label, "frontmatter left invalid");
            Checked {
                content: content.to_string(),
                warning: Some(format!(
                    "{label}: invalid frontmatter ({}); strict harnesses may reject this skill",
                    reason_of(&problem)
                )),
            }
        }
    }
}

fn reason_of(err: &MushError) -> String {
    match err {
        MushError::FrontmatterInvalid { reason } => reason.clone(),
        other => other.to_string(),
    }
}
