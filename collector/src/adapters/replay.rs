//! Replays a previously captured motion table as a live stream.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use common::{MotionReading, MotionSource, ReadingCallback, SourceError};

use crate::table;

use super::stream_task::StreamTask;

/// Emits stored readings one per interval, starting over when the end is reached.
pub struct ReplaySource {
    readings: Arc<Vec<MotionReading>>,
    stream: StreamTask,
}

impl ReplaySource {
    pub fn new(readings: Vec<MotionReading>) -> Self {
        Self {
            readings: Arc::new(readings),
            stream: StreamTask::new(),
        }
    }

    /// Loads the readings from a table written by the collector.
    /// Returns an Unavailable error if the file can't be read or doesn't have the expected layout.
    pub fn from_table(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let readings = table::read_table(path.as_ref())
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        info!(
            "Loaded {} readings from '{}'",
            readings.len(),
            path.as_ref().display()
        );
        Ok(Self::new(readings))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[async_trait]
impl MotionSource for ReplaySource {
    fn is_available(&self) -> bool {
        !self.readings.is_empty()
    }

    async fn start(
        &self,
        interval: Duration,
        on_reading: ReadingCallback,
    ) -> Result<(), SourceError> {
        if self.readings.is_empty() {
            return Err(SourceError::Unavailable(
                "nothing to replay".to_string(),
            ));
        }

        let readings = Arc::clone(&self.readings);
        let mut cursor = 0;
        self.stream.spawn(interval, on_reading, move || {
            let reading = readings[cursor];
            cursor = (cursor + 1) % readings.len();
            reading
        })?;

        debug!("Replaying {} readings", self.readings.len());
        Ok(())
    }

    async fn stop(&self) {
        if self.stream.abort() {
            debug!("Replay stopped");
        }
    }
}
