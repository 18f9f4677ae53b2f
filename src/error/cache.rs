//! Cache errors

use super::MushError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> MushError {
    MushError::CacheOperationFailed {
        message: message.into(),
    }
}
