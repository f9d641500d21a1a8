use crate::error::{ForestError, ForestResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Poisson};

/// Seeded Poisson(λ) source for online-bagging replication counts.
///
/// Draws always happen on the calling thread, so a given seed produces the
/// same sequence regardless of how training is scheduled.
#[derive(Clone, Debug)]
pub struct ReplicationSampler {
    seed: u64,
    poisson: Poisson<f64>,
    rng: StdRng,
}

impl ReplicationSampler {
    pub fn new(lambda: f64, seed: u64) -> ForestResult<Self> {
        let poisson = Poisson::new(lambda)
            .map_err(|e| ForestError::InvalidConfig(format!("lambda {lambda}: {e}")))?;
        Ok(Self {
            seed,
            poisson,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn draw(&mut self) -> u64 {
        let k: f64 = self.poisson.sample(&mut self.rng);
        k as u64
    }

    /// Rewind to the start of the seeded sequence.
    pub fn reseed(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}
