use crate::Result;
use ohno::{IntoAppError, app_err};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Caps the number of fetches in flight.
///
/// Wrap in an `Arc` via [`Throttler::new`], then call [`Throttler::acquire`] before each unit of
/// work. At most `max_concurrent` permits are out at any time; a task waiting in `acquire` starts
/// only once another task drops its permit.
#[derive(Debug)]
pub struct Throttler {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl Throttler {
    /// Create a throttler that allows at most `max_concurrent` tasks at a time.
    ///
    /// # Errors
    ///
    /// A limit of zero is rejected, since no task could ever start.
    pub fn new(max_concurrent: usize) -> Result<Arc<Self>> {
        if max_concurrent == 0 {
            return Err(app_err!("the concurrency limit must be at least 1"));
        }

        Ok(Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }))
    }

    /// Wait for a free slot.
    ///
    /// The returned permit must be held for the duration of the work. When it is dropped, the slot
    /// becomes available for another task.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore).acquire_owned().await.into_app_err("waiting for a fetch slot")
    }

    #[must_use]
    pub const fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.max_concurrent - self.semaphore.available_permits()
    }
}
