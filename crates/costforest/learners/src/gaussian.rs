use serde::{Deserialize, Serialize};

const SQRT_TWO_PI: f64 = 2.506_628_274_631_000_2;

/// Weighted incremental estimate of a normal distribution (West, 1979).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussianEstimator {
    weight_sum: f64,
    mean: f64,
    variance_sum: f64,
}

impl GaussianEstimator {
    pub fn add(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || weight <= 0.0 {
            return;
        }
        if self.weight_sum > 0.0 {
            self.weight_sum += weight;
            let last_mean = self.mean;
            self.mean += weight * (value - last_mean) / self.weight_sum;
            self.variance_sum += weight * (value - last_mean) * (value - self.mean);
        } else {
            self.mean = value;
            self.weight_sum = weight;
        }
    }

    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        if self.weight_sum > 1.0 {
            (self.variance_sum / (self.weight_sum - 1.0)).sqrt()
        } else {
            0.0
        }
    }

    /// Density at `value`. A zero-variance estimate puts all mass on its mean.
    pub fn density(&self, value: f64) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        let sd = self.std_dev();
        if sd > 0.0 {
            let z = (value - self.mean) / sd;
            (-0.5 * z * z).exp() / (SQRT_TWO_PI * sd)
        } else if value == self.mean {
            1.0
        } else {
            0.0
        }
    }
}
