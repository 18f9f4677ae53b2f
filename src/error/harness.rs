//! Harness specification errors

use super::MushError;

/// Creates a harness not found error
pub fn not_found(id: impl Into<String>) -> MushError {
    MushError::HarnessNotFound { id: id.into() }
}

/// Creates a harness config failed error
pub fn config_failed(message: impl Into<String>) -> MushError {
    MushError::HarnessConfigFailed {
        message: message.into(),
    }
}
