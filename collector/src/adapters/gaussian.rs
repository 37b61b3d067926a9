use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use common::{SourceError, XYZ};

/// Functionality to add some Gaussian noise.
#[derive(Clone)]
pub(super) struct GaussianNoise {
    normal: Normal<f64>,
}

impl GaussianNoise {
    /// Creates new distribution from mean and stdev
    pub(super) fn new(mean: f64, stdev: f64) -> Result<Self, SourceError> {
        if stdev.is_nan() || stdev < 0.0 {
            return Err(SourceError::Unavailable(format!(
                "invalid noise model: stdev {stdev}"
            )));
        }
        let normal = Normal::new(mean, stdev)
            .map_err(|e| SourceError::Unavailable(format!("invalid noise model: {e}")))?;
        Ok(Self { normal })
    }

    /// Sample from distribution
    pub(super) fn draw_sample(&self, rng: &mut StdRng) -> f64 {
        self.normal.sample(rng)
    }

    /// Draws an independent sample for every axis
    pub(super) fn draw_xyz(&self, rng: &mut StdRng) -> XYZ {
        XYZ::new([
            self.draw_sample(rng),
            self.draw_sample(rng),
            self.draw_sample(rng),
        ])
    }
}
