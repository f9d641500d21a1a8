use crate::error::{StreamError, StreamResult};
use crate::stream::{InstanceStream, StreamHeader};
use costforest_types::Instance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Class boundary `f1 + f2 <= θ` for SEA functions 1 to 4.
const THRESHOLDS: [f64; 4] = [8.0, 9.0, 7.0, 9.5];

/// SEA concepts generator: three features uniform in `[0, 10)`, the third
/// irrelevant, label 0 when `f1 + f2` falls under the function's threshold.
///
/// `noise_percentage` of labels are flipped. With `drift_at = Some((n, f))`
/// the concept switches abruptly to function `f` from the `n`th instance on.
#[derive(Clone, Debug)]
pub struct SeaGenerator {
    function: u8,
    noise_percentage: u8,
    seed: u64,
    drift_at: Option<(u64, u8)>,
    rng: StdRng,
    emitted: u64,
}

impl SeaGenerator {
    pub fn new(function: u8, seed: u64) -> StreamResult<Self> {
        check_function(function)?;
        Ok(Self {
            function,
            noise_percentage: 10,
            seed,
            drift_at: None,
            rng: StdRng::seed_from_u64(seed),
            emitted: 0,
        })
    }

    pub fn with_noise(mut self, percentage: u8) -> StreamResult<Self> {
        if percentage > 100 {
            return Err(StreamError::InvalidNoise(percentage));
        }
        self.noise_percentage = percentage;
        Ok(self)
    }

    pub fn with_drift(mut self, at: u64, function: u8) -> StreamResult<Self> {
        check_function(function)?;
        self.drift_at = Some((at, function));
        Ok(self)
    }

    /// Function in force for the next instance.
    pub fn active_function(&self) -> u8 {
        match self.drift_at {
            Some((at, function)) if self.emitted + 1 >= at => function,
            _ => self.function,
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn label_for(function: u8, f1: f64, f2: f64) -> usize {
        let threshold = THRESHOLDS[usize::from(function.clamp(1, 4)) - 1];
        usize::from(f1 + f2 > threshold)
    }
}

fn check_function(function: u8) -> StreamResult<()> {
    if (1..=4).contains(&function) {
        Ok(())
    } else {
        Err(StreamError::InvalidFunction(function))
    }
}

impl InstanceStream for SeaGenerator {
    fn header(&self) -> StreamHeader {
        StreamHeader {
            num_features: 3,
            num_classes: 2,
        }
    }

    fn next_instance(&mut self) -> Option<Instance> {
        let function = self.active_function();
        if matches!(self.drift_at, Some((at, _)) if self.emitted + 1 == at) {
            debug!(at = self.emitted + 1, function, "SEA concept switched");
        }
        let features: Vec<f64> = (0..3).map(|_| self.rng.gen_range(0.0..10.0)).collect();
        let mut label = Self::label_for(function, features[0], features[1]);
        if self.rng.gen_range(1..=100u8) <= self.noise_percentage {
            label = 1 - label;
        }
        self.emitted += 1;
        Instance::new(features, label, 2).ok()
    }

    fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.emitted = 0;
    }
}
