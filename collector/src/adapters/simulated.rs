//! Simulated motion source for hosts without motion hardware.
//!
//! Readings are drawn from Gaussian noise. The rotation rate also carries a slow sinusoidal
//! sway so consecutive rows are distinguishable in the output table.

use std::f64::consts::TAU;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use common::{MotionReading, MotionSource, ReadingCallback, SourceError, XYZ};

use super::gaussian::GaussianNoise;
use super::stream_task::StreamTask;

const GAUSSIAN_ACCEL_MEAN: f64 = 0f64;
const GAUSSIAN_ACCEL_STDEV: f64 = 0.02;
const GAUSSIAN_GYRO_MEAN: f64 = 0f64;
const GAUSSIAN_GYRO_STDEV: f64 = 0.01;
const SWAY_AMPLITUDE_RAD_S: f64 = 0.3;
const SWAY_FREQUENCY_HZ: f64 = 0.5;

/// Configures simulated data acquisition
pub struct SimulatedSource {
    available: bool,
    seed: Option<u64>,
    acceleration_noise: GaussianNoise,
    rotation_noise: GaussianNoise,
    stream: StreamTask,
}

impl SimulatedSource {
    /// Creates an available simulated source.
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            available: true,
            seed: None,
            acceleration_noise: GaussianNoise::new(GAUSSIAN_ACCEL_MEAN, GAUSSIAN_ACCEL_STDEV)?,
            rotation_noise: GaussianNoise::new(GAUSSIAN_GYRO_MEAN, GAUSSIAN_GYRO_STDEV)?,
            stream: StreamTask::new(),
        })
    }

    /// Creates a source that reports the sensor as missing.
    pub fn unavailable() -> Result<Self, SourceError> {
        Ok(Self {
            available: false,
            ..Self::new()?
        })
    }

    /// Makes the generated sequence reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns true while readings are being delivered.
    pub fn is_running(&self) -> bool {
        self.stream.is_running()
    }
}

#[async_trait]
impl MotionSource for SimulatedSource {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn start(
        &self,
        interval: Duration,
        on_reading: ReadingCallback,
    ) -> Result<(), SourceError> {
        if !self.available {
            return Err(SourceError::Unavailable(
                "simulated sensor disabled".to_string(),
            ));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let acceleration_noise = self.acceleration_noise.clone();
        let rotation_noise = self.rotation_noise.clone();
        let phase_step = TAU * SWAY_FREQUENCY_HZ * interval.as_secs_f64();
        let mut phase = 0f64;

        self.stream.spawn(interval, on_reading, move || {
            let sway = XYZ::new([phase.sin(), phase.cos(), 0.0]) * SWAY_AMPLITUDE_RAD_S;
            phase = (phase + phase_step) % TAU;
            MotionReading::from_xyz(
                acceleration_noise.draw_xyz(&mut rng),
                sway + rotation_noise.draw_xyz(&mut rng),
            )
        })?;

        info!("Simulated motion stream started every {:?}", interval);
        Ok(())
    }

    async fn stop(&self) {
        if self.stream.abort() {
            debug!("Simulated motion stream stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_callback() -> (ReadingCallback, Arc<Mutex<Vec<MotionReading>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let callback: ReadingCallback = {
            let received = Arc::clone(&received);
            Arc::new(move |reading: Result<MotionReading, SourceError>| {
                if let Ok(reading) = reading {
                    received.lock().unwrap().push(reading);
                }
            })
        };
        (callback, received)
    }

    #[tokio::test]
    async fn test_simulated_source_delivers_until_stopped() {
        let source = SimulatedSource::new().unwrap().with_seed(1);
        let (callback, received) = recording_callback();

        source
            .start(Duration::from_millis(5), callback)
            .await
            .unwrap();
        assert!(source.is_running());

        tokio::time::sleep(Duration::from_millis(60)).await;
        source.stop().await;
        assert!(!source.is_running());

        let delivered = received.lock().unwrap().len();
        assert!(delivered > 0);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(received.lock().unwrap().len(), delivered);
    }

    #[tokio::test]
    async fn test_simulated_source_unavailable() {
        let source = SimulatedSource::unavailable().unwrap();
        let (callback, _) = recording_callback();

        assert!(!source.is_available());
        let result = source.start(Duration::from_millis(5), callback).await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_simulated_source_stop_is_idempotent() {
        let source = SimulatedSource::new().unwrap();
        source.stop().await;
        source.stop().await;
        assert!(!source.is_running());
    }

    #[tokio::test]
    async fn test_simulated_source_rejects_double_start() {
        let source = SimulatedSource::new().unwrap();
        let (callback, _) = recording_callback();

        source
            .start(Duration::from_millis(5), callback.clone())
            .await
            .unwrap();
        let result = source.start(Duration::from_millis(5), callback).await;
        assert!(result.is_err());
        source.stop().await;
    }
}
