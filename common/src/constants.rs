use std::time::Duration;

/// Motion sensors are sampled at a fixed rate.
pub const SAMPLE_RATE_HZ: u64 = 50;

/// Period between two consecutive readings (1/50 s).
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(1000 / SAMPLE_RATE_HZ);

pub const N_XYZ_COORDINATES: usize = 3;

/// Acceleration triple followed by rotation rate triple.
pub const N_READING_FIELDS: usize = 2 * N_XYZ_COORDINATES;
