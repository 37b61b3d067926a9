use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use common::{MotionReading, ReadingCallback, SourceError};

/// Background task delivering one reading per tick until aborted.
pub(super) struct StreamTask {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl StreamTask {
    pub(super) fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Spawns the delivery loop on the current runtime.
    /// Returns an Unavailable error if the stream is already running or the interval is zero.
    pub(super) fn spawn<F>(
        &self,
        interval: Duration,
        on_reading: ReadingCallback,
        mut next_reading: F,
    ) -> Result<(), SourceError>
    where
        F: FnMut() -> MotionReading + Send + 'static,
    {
        if interval.is_zero() {
            return Err(SourceError::Unavailable(
                "sample interval must be positive".to_string(),
            ));
        }

        let mut handle = self.lock();
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return Err(SourceError::Unavailable(
                "stream already running".to_string(),
            ));
        }

        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                on_reading(Ok(next_reading()));
            }
        }));
        Ok(())
    }

    /// Aborts the delivery loop. Returns false if it was not running.
    pub(super) fn abort(&self) -> bool {
        match self.lock().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub(super) fn is_running(&self) -> bool {
        self.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for StreamTask {
    fn drop(&mut self) {
        self.abort();
    }
}
