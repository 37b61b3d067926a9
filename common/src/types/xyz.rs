use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use std::ops::{Add, Mul};

use crate::constants::N_XYZ_COORDINATES;

/// Three-axis measurement in device-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct XYZ(Vector3<f64>);

impl XYZ {
    pub fn new(data: [f64; N_XYZ_COORDINATES]) -> Self {
        Self(Vector3::from(data))
    }

    pub fn from_vector(data: Vector3<f64>) -> Self {
        Self(data)
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn inner(&self) -> [f64; N_XYZ_COORDINATES] {
        [self.0.x, self.0.y, self.0.z]
    }
}

impl From<XYZ> for [f64; N_XYZ_COORDINATES] {
    fn from(value: XYZ) -> Self {
        value.inner()
    }
}

impl From<[f64; N_XYZ_COORDINATES]> for XYZ {
    fn from(value: [f64; N_XYZ_COORDINATES]) -> Self {
        Self::new(value)
    }
}

impl TryFrom<Vec<f64>> for XYZ {
    type Error = &'static str;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        if value.len() != N_XYZ_COORDINATES {
            return Err("Can't convert to XYZ");
        }
        Ok(Self(Vector3::from_vec(value)))
    }
}

impl Add for XYZ {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<f64> for XYZ {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
