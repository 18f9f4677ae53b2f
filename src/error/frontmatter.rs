//! Frontmatter errors

use super::MushError;

/// Creates an invalid frontmatter error
pub fn invalid(reason: impl Into<String>) -> MushError {
    MushError::FrontmatterInvalid {
        reason: reason.into(),
    }
}

/// Creates a no repair possible error
pub fn unrepairable(reason: impl Into<String>) -> MushError {
    MushError::FrontmatterUnrepairable {
        reason: reason.into(),
    }
}
