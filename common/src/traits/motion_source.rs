use std::time::Duration;

use async_trait::async_trait;

use crate::types::{ReadingCallback, SourceError};

/// Streaming source of motion readings (linear acceleration + rotation rate).
///
/// Once started, the source invokes the callback once per interval with either a
/// reading or an error. Errors do not stop delivery. Callbacks for a given start
/// are never delivered concurrently, but no assumption is made on the thread
/// they run on.
#[async_trait]
pub trait MotionSource: Send + Sync {
    /// Returns true if the underlying sensor can be used.
    fn is_available(&self) -> bool;

    /// Begins periodic delivery of readings to `on_reading` until [`MotionSource::stop`] is called.
    /// Returns an Unavailable error if the stream cannot be started.
    async fn start(
        &self,
        interval: Duration,
        on_reading: ReadingCallback,
    ) -> Result<(), SourceError>;

    /// Halts delivery. Safe to call if never started or already stopped.
    async fn stop(&self);
}
