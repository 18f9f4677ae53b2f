//! Cooperative cancellation for network calls

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{MushError, Result};

/// Cloneable flag checked before each network request
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once [`CancelToken::cancel`] has been called on any clone
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(MushError::Cancelled)
        } else {
            Ok(())
        }
    }
}
