//! Cooperative cancellation for build-step invocations
//!
//! A build can be cancelled at any blocking point (source resolution, temp
//! file write, process wait). The flag is shared between the invoking thread
//! and whoever owns the cancel control, and each pipeline phase checks it
//! before blocking.

use crate::job::JobError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag checked at every blocking point
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a new flag in the not-cancelled state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; all subsequent checkpoints will fail
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true if cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fails with `JobError::Interrupted` if cancellation has been requested
    ///
    /// # Errors
    ///
    /// Returns `JobError::Interrupted` carrying the phase name when the flag
    /// is set.
    pub fn checkpoint(&self, phase: &'static str) -> Result<(), JobError> {
        if self.is_cancelled() {
            Err(JobError::Interrupted { phase })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_passes_when_not_cancelled() {
        let flag = CancelFlag::new();
        assert!(flag.checkpoint("resolving").is_ok());
    }

    #[test]
    fn test_checkpoint_fails_after_cancel() {
        let flag = CancelFlag::new();
        flag.cancel();
        let err = flag.checkpoint("materializing").unwrap_err();
        assert_eq!(
            err,
            JobError::Interrupted {
                phase: "materializing"
            }
        );
    }

    #[test]
    fn test_clones_share_state() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
    }
}
