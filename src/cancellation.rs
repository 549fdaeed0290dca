//! Cooperative cancellation for pipeline runs.

use crate::error::{ErrorKind, Stage};
use anyhow::Result;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Cancellation handle shared between the caller and a running analysis.
///
/// Clones share the same flag, so a caller can keep one clone and cancel the run from another
/// thread. An optional deadline turns the handle into a timeout.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Creates a handle that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle that cancels itself once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Requests the cancellation of the run.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Checks if the run was cancelled or its deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
            || self
                .deadline
                .map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// Returns a cancellation error for the given stage if the run must stop.
    pub fn check(&self, stage: Stage) -> Result<()> {
        if self.is_cancelled() {
            Err(ErrorKind::Cancelled { stage }.into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cancellation;
    use crate::error::{ErrorKind, Stage};
    use std::time::Duration;

    #[test]
    fn it_cancellation_shared_between_clones() {
        let cancellation = Cancellation::new();
        let clone = cancellation.clone();

        assert!(!clone.is_cancelled());
        assert!(clone.check(Stage::Code).is_ok());

        cancellation.cancel();
        assert!(clone.is_cancelled());

        let error = clone.check(Stage::Code).unwrap_err();
        match error.downcast_ref::<ErrorKind>() {
            Some(ErrorKind::Cancelled { stage }) => assert_eq!(*stage, Stage::Code),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn it_cancellation_timeout() {
        assert!(Cancellation::with_timeout(Duration::from_secs(0)).is_cancelled());
        assert!(!Cancellation::with_timeout(Duration::from_secs(3600)).is_cancelled());
    }
}
