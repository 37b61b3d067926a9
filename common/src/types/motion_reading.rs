use serde::{Deserialize, Serialize};

use crate::constants::{N_READING_FIELDS, N_XYZ_COORDINATES};
use crate::types::XYZ;

/// A single sampled instant of device motion.
///
/// Acceleration is the user (gravity free) linear acceleration in g, rotation rate is in rad/s.
/// Readings are immutable once produced.
///
/// # Examples
///
/// ```
/// use common::MotionReading;
///
/// let reading = MotionReading::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
///
/// assert_eq!(reading.to_row(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionReading {
    acceleration: XYZ,
    rotation_rate: XYZ,
}

impl MotionReading {
    pub fn new(
        acceleration: [f64; N_XYZ_COORDINATES],
        rotation_rate: [f64; N_XYZ_COORDINATES],
    ) -> Self {
        Self::from_xyz(XYZ::new(acceleration), XYZ::new(rotation_rate))
    }

    pub fn from_xyz(acceleration: XYZ, rotation_rate: XYZ) -> Self {
        Self {
            acceleration,
            rotation_rate,
        }
    }

    pub fn acceleration(&self) -> XYZ {
        self.acceleration
    }

    pub fn rotation_rate(&self) -> XYZ {
        self.rotation_rate
    }

    /// Returns the reading fields in table column order.
    pub fn to_row(&self) -> [f64; N_READING_FIELDS] {
        let [ax, ay, az] = self.acceleration.inner();
        let [gx, gy, gz] = self.rotation_rate.inner();
        [ax, ay, az, gx, gy, gz]
    }
}

impl TryFrom<Vec<f64>> for MotionReading {
    type Error = &'static str;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        if value.len() != N_READING_FIELDS {
            return Err("Invalid length of input vector");
        }
        let acceleration = XYZ::try_from(value[..N_XYZ_COORDINATES].to_vec())?;
        let rotation_rate = XYZ::try_from(value[N_XYZ_COORDINATES..].to_vec())?;
        Ok(Self::from_xyz(acceleration, rotation_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_new() {
        let reading = MotionReading::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);

        assert_eq!(reading.acceleration(), XYZ::from([1.0, 2.0, 3.0]));
        assert_eq!(reading.rotation_rate(), XYZ::from([4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_try_from_vec() {
        let reading = MotionReading::try_from(vec![-0.1, 0.0, 0.25, 1.0, 1.0, 1.0]).unwrap();

        assert_eq!(reading.to_row(), [-0.1, 0.0, 0.25, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_try_from_vec_invalid_length() {
        let result = MotionReading::try_from(vec![1.0, 2.0, 3.0]);

        assert_eq!(result.err(), Some("Invalid length of input vector"));
    }

    #[test]
    fn test_reading_serialize() {
        let reading = MotionReading::new([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);

        let serialized = serde_json::to_string(&reading).unwrap();
        let deserialized: MotionReading = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, reading);
    }
}
