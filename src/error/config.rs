//! Configuration errors

use super::MushError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> MushError {
    MushError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> MushError {
    MushError::ConfigInvalid {
        message: message.into(),
    }
}
