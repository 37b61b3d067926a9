use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use common::{MotionReading, MotionSource, ReadingCallback, SourceError};

/// One delivery of a [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Reading(MotionReading),
    Error(String),
}

/// Deterministic motion source.
///
/// `start` delivers the whole script synchronously, before returning, regardless of how many
/// readings the caller asked for. Deliveries past the target emulate a stream that keeps firing
/// while it is being stopped. Start and stop calls are counted.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    unavailable: bool,
    start_error: Option<SourceError>,
    script: Vec<ScriptStep>,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    delivered: AtomicUsize,
    interval: Mutex<Option<Duration>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    pub fn with_readings(readings: Vec<MotionReading>) -> Self {
        Self::new(readings.into_iter().map(ScriptStep::Reading).collect())
    }

    /// Source whose sensor is reported missing.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    /// Available source whose `start` fails with `error`.
    pub fn failing_start(error: SourceError) -> Self {
        Self {
            start_error: Some(error),
            ..Default::default()
        }
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Number of callbacks fired, accepted or not.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Interval passed to the last `start` call.
    pub fn requested_interval(&self) -> Option<Duration> {
        *self.interval.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MotionSource for ScriptedSource {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    async fn start(
        &self,
        interval: Duration,
        on_reading: ReadingCallback,
    ) -> Result<(), SourceError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        *self.interval.lock().unwrap_or_else(PoisonError::into_inner) = Some(interval);

        if let Some(error) = self.start_error.clone() {
            return Err(error);
        }

        for step in self.script.iter().cloned() {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            match step {
                ScriptStep::Reading(reading) => on_reading(Ok(reading)),
                ScriptStep::Error(reason) => on_reading(Err(SourceError::Stream(reason))),
            }
        }
        Ok(())
    }

    async fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Returns `count` distinct readings; reading `i` carries `i` in every acceleration field and
/// `-i` in every rotation field.
pub fn numbered_readings(count: usize) -> Vec<MotionReading> {
    (0..count)
        .map(|i| MotionReading::new([i as f64; 3], [-(i as f64); 3]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_scripted_source_delivers_script() {
        let source = ScriptedSource::new(vec![
            ScriptStep::Reading(MotionReading::default()),
            ScriptStep::Error("glitch".to_string()),
        ]);
        let received = Arc::new(Mutex::new(Vec::new()));
        let callback: ReadingCallback = {
            let received = Arc::clone(&received);
            Arc::new(move |reading: Result<MotionReading, SourceError>| {
                received.lock().unwrap().push(reading);
            })
        };

        source
            .start(Duration::from_millis(20), callback)
            .await
            .unwrap();
        source.stop().await;
        source.stop().await;

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert!(received[1].is_err());
        assert_eq!(source.start_calls(), 1);
        assert_eq!(source.stop_calls(), 2);
        assert_eq!(source.requested_interval(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_numbered_readings() {
        let readings = numbered_readings(3);
        assert_eq!(readings[2].to_row(), [2.0, 2.0, 2.0, -2.0, -2.0, -2.0]);
    }
}
